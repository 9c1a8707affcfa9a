//! JS <-> serde_json conversion through the browser's own `JSON` object.

use serde_json::Value;
use wasm_bindgen::JsValue;

/// Structured-clone data from a `message` event as JSON.
/// Values `JSON.stringify` cannot represent come back as `Null`.
pub fn to_json(value: &JsValue) -> Value {
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|s| s.as_string())
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or(Value::Null)
}

/// Plain JS object for a JSON value, suitable for `postMessage`.
pub fn to_js(value: &Value) -> Result<JsValue, JsValue> {
    js_sys::JSON::parse(&value.to_string())
}

/// A numeric or string JS value as a user id.
pub fn user_id(value: &JsValue) -> Option<gameframe::UserId> {
    if let Some(n) = value.as_f64() {
        if n.is_finite() && n.fract() == 0.0 {
            return Some(gameframe::UserId::Numeric(n as i64));
        }
        return Some(gameframe::UserId::Text(n.to_string()));
    }
    value
        .as_string()
        .map(gameframe::UserId::Text)
        .filter(|id| !id.is_empty())
}
