pub mod adapter;
pub mod convert;
pub mod dom;
pub mod runner;

pub use runner::FrameRunner;

use std::cell::RefCell;

use gameframe::{FrameConfig, UserId};
use js_sys::Function;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<FrameRunner>> = RefCell::new(None);
}

/// Run `f` against the mounted runner, if any.
///
/// JS callbacks the runner queued are invoked after the borrow is released,
/// so they may call back into any export, `frame_unmount` included.
pub(crate) fn with_runner<R>(f: impl FnOnce(&mut FrameRunner) -> R) -> Option<R> {
    let (result, pending) = RUNNER.with(|cell| {
        let Ok(mut borrow) = cell.try_borrow_mut() else {
            log::warn!("gameframe: re-entrant call ignored");
            return (None, Vec::new());
        };
        match borrow.as_mut() {
            Some(runner) => {
                let result = f(runner);
                (Some(result), runner.take_pending())
            }
            None => (None, Vec::new()),
        }
    });
    for call in pending {
        call.invoke();
    }
    result
}

fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

fn take_runner() -> Option<FrameRunner> {
    RUNNER.with(|cell| match cell.try_borrow_mut() {
        Ok(mut borrow) => borrow.take(),
        Err(_) => {
            log::warn!("gameframe: cannot unmount while handling an event");
            None
        }
    })
}

/// Mount the game frame inside the element with id `parent_id`.
///
/// `user_id` may be a number or a string. `config_json`, when given, is a
/// partial `FrameConfig`; missing fields keep their defaults. Mounting again
/// replaces the previous frame.
#[wasm_bindgen]
pub fn frame_mount(parent_id: &str, user_id: JsValue, config_json: Option<String>) -> Result<(), JsValue> {
    init_logging();

    let user_id: UserId = convert::user_id(&user_id)
        .ok_or_else(|| JsValue::from_str("gameframe: user id must be a number or a non-empty string"))?;
    let config = match config_json.as_deref() {
        Some(json) => FrameConfig::from_json(json).map_err(|err| JsValue::from_str(&err.to_string()))?,
        None => FrameConfig::default(),
    };

    // Drop the old frame first so its listeners never see the new one.
    drop(take_runner());

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("gameframe: no window"))?;
    let parent = window
        .document()
        .and_then(|doc| doc.get_element_by_id(parent_id))
        .ok_or_else(|| JsValue::from_str(&format!("gameframe: no element #{}", parent_id)))?;

    let runner = FrameRunner::mount(window, &parent, user_id, config)?;
    RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));

    with_runner(|r| r.subscribe());
    Ok(())
}

/// Remove the frame and every listener it registered, restoring page styles.
#[wasm_bindgen]
pub fn frame_unmount() {
    drop(take_runner());
}

#[wasm_bindgen]
pub fn frame_toggle_fullscreen() {
    with_runner(|r| r.toggle_fullscreen());
}

/// Fullscreen plus landscape lock, as the rotate prompt's button does.
#[wasm_bindgen]
pub fn frame_enter_fullscreen_and_lock() {
    with_runner(|r| r.enter_fullscreen_and_lock());
}

#[wasm_bindgen]
pub fn frame_dismiss_rotate() {
    with_runner(|r| r.dismiss_rotate());
}

/// `callback(results, isPartial)` for every GAME_RESULTS the game sends.
#[wasm_bindgen]
pub fn frame_set_results_callback(callback: Option<Function>) {
    with_runner(|r| r.set_results_callback(callback));
}

/// `callback(kind, detail)` for session and fullscreen events.
#[wasm_bindgen]
pub fn frame_set_event_callback(callback: Option<Function>) {
    with_runner(|r| r.set_event_callback(callback));
}

// ---- Accessors ----

#[wasm_bindgen]
pub fn frame_state() -> String {
    with_runner(|r| r.state().to_string()).unwrap_or_else(|| "unmounted".to_string())
}

#[wasm_bindgen]
pub fn frame_scale() -> f64 {
    with_runner(|r| r.scale()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn frame_is_fullscreen() -> bool {
    with_runner(|r| r.is_fullscreen()).unwrap_or(false)
}
