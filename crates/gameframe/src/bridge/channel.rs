use serde_json::Value;

use crate::api::error::ProtocolError;
use crate::bridge::protocol::decode;
use crate::core::session::{Session, SessionAction, SessionState};

/// The host end of the cross-frame channel.
///
/// Generic over the source handle `S` so the isolation rule can be checked
/// without a browser: the web layer uses the iframe's content window, tests
/// use plain integers. Every inbound message must come from the tracked
/// source (and, when configured, the expected origin); anything else is
/// ignored without touching the session.
pub struct FrameChannel<S> {
    source: Option<S>,
    expected_origin: Option<String>,
    session: Session,
}

impl<S: PartialEq> FrameChannel<S> {
    /// `expected_origin` of `None` accepts any origin.
    pub fn new(session: Session, expected_origin: Option<String>) -> Self {
        Self {
            source: None,
            expected_origin,
            session,
        }
    }

    /// Start tracking the frame's window, created at `now_ms`.
    pub fn attach(&mut self, source: S, now_ms: f64) {
        self.source = Some(source);
        self.session.attach(now_ms);
    }

    /// Stop accepting messages (frame removed).
    pub fn detach(&mut self) {
        self.source = None;
    }

    pub fn is_attached(&self) -> bool {
        self.source.is_some()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Whether a message from `source`/`origin` belongs to this channel.
    pub fn accepts(&self, source: &S, origin: &str) -> bool {
        let Some(tracked) = &self.source else {
            return false;
        };
        if tracked != source {
            return false;
        }
        match &self.expected_origin {
            Some(expected) => expected == origin,
            None => true,
        }
    }

    /// Handle one `message` event. Foreign, unknown and malformed messages
    /// are logged and dropped.
    pub fn receive(&mut self, source: &S, origin: &str, data: &Value) -> Vec<SessionAction> {
        if !self.accepts(source, origin) {
            return Vec::new();
        }

        match decode(data) {
            Ok(message) => {
                log::debug!("channel: received {}", message.kind());
                self.session.handle(message)
            }
            Err(ProtocolError::UnknownType(kind)) => {
                log::info!("channel: unknown message type {:?} dropped", kind);
                Vec::new()
            }
            Err(err) => {
                log::warn!("channel: dropped message: {}", err);
                Vec::new()
            }
        }
    }

    /// The frame's document fired `load`.
    pub fn frame_loaded(&mut self, now_ms: f64) -> Vec<SessionAction> {
        if !self.is_attached() {
            return Vec::new();
        }
        self.session.frame_loaded(now_ms)
    }

    pub fn poll(&mut self, now_ms: f64) -> Vec<SessionAction> {
        if !self.is_attached() {
            return Vec::new();
        }
        self.session.poll(now_ms)
    }
}
