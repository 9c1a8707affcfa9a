//! The URL contract between host and game, and the helpers the game side
//! calls (GameMaker extension functions, exported by the wasm bridge).

use serde_json::{json, Value};
use url::form_urlencoded;

use crate::api::error::AdapterError;
use crate::api::types::UserId;

/// Query parameter carrying the player's identifier.
pub const UID_PARAM: &str = "uid";

/// Token the game falls back to when the URL carries none.
pub const DEFAULT_TOKEN: i64 = 999;

/// Result codes returned to GameMaker by the send helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    NotEmbedded,
    Failed,
}

impl SendOutcome {
    pub fn code(self) -> i32 {
        match self {
            SendOutcome::Sent => 1,
            SendOutcome::NotEmbedded => 0,
            SendOutcome::Failed => -1,
        }
    }
}

/// `<base>/index.html?uid=<id>`.
pub fn game_url(base: &str, user_id: &UserId) -> String {
    let base = base.trim().trim_end_matches('/');
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(UID_PARAM, &user_id.to_string())
        .finish();
    format!("{}/index.html?{}", base, query)
}

/// Read the numeric token from a location's query string (with or without
/// the leading `?`). Missing, empty or non-numeric values give
/// [`DEFAULT_TOKEN`].
pub fn token_from_query(search: &str) -> i64 {
    let query = search.strip_prefix('?').unwrap_or(search);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == UID_PARAM)
        .and_then(|(_, value)| parse_int_prefix(&value))
        .unwrap_or(DEFAULT_TOKEN)
}

/// Leading integer of `s`, the way JavaScript's `parseInt` reads it:
/// optional whitespace and sign, then digits up to the first non-digit.
fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let signed = if negative {
        format!("-{}", &rest[..digits])
    } else {
        rest[..digits].to_string()
    };
    match signed.parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => {
            let clamped = if negative { i64::MIN } else { i64::MAX };
            log::warn!("adapter: token {} out of range, clamped to {}", signed, clamped);
            Some(clamped)
        }
    }
}

/// Wrap the game's results JSON in a `GAME_RESULTS` envelope for the host.
/// The payload is forwarded as-is; the host validates it.
pub fn wrap_results(json: &str) -> Result<Value, AdapterError> {
    let payload: Value = serde_json::from_str(json)?;
    Ok(json!({ "type": "GAME_RESULTS", "payload": payload }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_game_url() {
        assert_eq!(game_url("/GAME2", &UserId::from(123)), "/GAME2/index.html?uid=123");
        assert_eq!(game_url("/GAME2/", &UserId::from(123)), "/GAME2/index.html?uid=123");
        assert_eq!(
            game_url("https://cdn.example/game", &UserId::from("a b&c")),
            "https://cdn.example/game/index.html?uid=a+b%26c"
        );
    }

    #[test]
    fn reads_token() {
        assert_eq!(token_from_query("?uid=123"), 123);
        assert_eq!(token_from_query("lang=es&uid=77"), 77);
        assert_eq!(token_from_query("?uid=42abc"), 42);
        assert_eq!(token_from_query("?uid=-5"), -5);
    }

    #[test]
    fn oversized_token_saturates() {
        assert_eq!(token_from_query("?uid=99999999999999999999"), i64::MAX);
        assert_eq!(token_from_query("?uid=-99999999999999999999x"), i64::MIN);
        assert_eq!(token_from_query("?uid=-9223372036854775808"), i64::MIN);
    }

    #[test]
    fn token_defaults() {
        assert_eq!(token_from_query(""), DEFAULT_TOKEN);
        assert_eq!(token_from_query("?uid="), DEFAULT_TOKEN);
        assert_eq!(token_from_query("?uid=abc"), DEFAULT_TOKEN);
        assert_eq!(token_from_query("?user=5"), DEFAULT_TOKEN);
    }

    #[test]
    fn url_and_token_agree() {
        let url = game_url("/GAME2", &UserId::from(31337));
        let query = url.split_once('?').map(|(_, q)| q).unwrap();
        assert_eq!(token_from_query(query), 31337);
    }

    #[test]
    fn wraps_results() {
        let msg = wrap_results(r#"{"user_id":1,"is_partial":true}"#).unwrap();
        assert_eq!(msg["type"], "GAME_RESULTS");
        assert_eq!(msg["payload"]["is_partial"], true);
        assert!(wrap_results("{oops").is_err());
    }

    #[test]
    fn outcome_codes() {
        assert_eq!(SendOutcome::Sent.code(), 1);
        assert_eq!(SendOutcome::NotEmbedded.code(), 0);
        assert_eq!(SendOutcome::Failed.code(), -1);
    }
}
