//! Exports called from inside the game (the GameMaker extension side).

use gameframe::{token_from_query, wrap_results, SendOutcome, DEFAULT_TOKEN};
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::convert;

/// The player token from this page's `?uid=`, or 999 when absent.
#[wasm_bindgen]
pub fn get_token_from_url() -> f64 {
    let token = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .map(|search| token_from_query(&search))
        .unwrap_or(DEFAULT_TOKEN);
    log::info!("adapter: token {}", token);
    token as f64
}

/// Post the results JSON to the embedding page as `GAME_RESULTS`.
///
/// Returns 1 when posted, 0 when not embedded, -1 on a parse or post error.
#[wasm_bindgen]
pub fn send_game_data_to_parent(json: &str) -> i32 {
    send(json).code()
}

fn send(json: &str) -> SendOutcome {
    let Some(parent) = embedding_parent() else {
        log::warn!("adapter: not inside an iframe, results not sent");
        return SendOutcome::NotEmbedded;
    };

    let message = match wrap_results(json) {
        Ok(message) => message,
        Err(err) => {
            log::error!("adapter: {}", err);
            return SendOutcome::Failed;
        }
    };

    match convert::to_js(&message).and_then(|js| parent.post_message(&js, "*")) {
        Ok(()) => {
            log::info!("adapter: results sent to parent");
            SendOutcome::Sent
        }
        Err(err) => {
            log::error!("adapter: post failed: {:?}", err);
            SendOutcome::Failed
        }
    }
}

/// The parent window, when this page is framed.
fn embedding_parent() -> Option<Window> {
    let window = web_sys::window()?;
    let parent = window.parent().ok().flatten()?;
    if JsValue::from(parent.clone()) == JsValue::from(window) {
        None
    } else {
        Some(parent)
    }
}
