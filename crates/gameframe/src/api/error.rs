//! Error types for the host logic.

use thiserror::Error;

/// An inbound message that could not be turned into a [`GameMessage`].
///
/// [`GameMessage`]: crate::bridge::protocol::GameMessage
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Payload was not a JSON object
    #[error("message is not an object")]
    NotAnObject,

    /// Object had no string `type` field
    #[error("message has no `type` field")]
    MissingType,

    /// `type` named a message this host does not know
    #[error("unknown message type: {0}")]
    UnknownType(String),

    /// Known `type`, but the body did not match its shape
    #[error("malformed {kind} message: {source}")]
    Malformed {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    /// Text was not JSON, or an outbound message failed to serialize
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Invalid frame configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("native size must be positive, got {width}x{height}")]
    NativeSize { width: f64, height: f64 },

    #[error("breakpoint for widths below {max_width} has scale {max_scale}; expected (0, 1]")]
    Breakpoint { max_width: f64, max_scale: f64 },

    #[error("fit width limit must be positive, got {0}")]
    FitWidth(f64),

    #[error("padding must be non-negative, got {0}")]
    Padding(f64),

    #[error("game base url is empty")]
    EmptyBaseUrl,

    #[error("poll interval must be positive when a ready timeout is set")]
    PollInterval,
}

/// Failure on the game side of the bridge.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("invalid results json: {0}")]
    Json(#[from] serde_json::Error),
}
