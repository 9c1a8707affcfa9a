use serde_json::Value;

use crate::api::types::{GameResults, UserId};
use crate::bridge::protocol::{GameMessage, HostMessage};

/// Handshake progress for one play session.
///
/// ```text
/// Init -> AwaitReady -> Authenticated -> (ReceivingPartial)* -> Complete
///             |  ^
///             v  | (late READY / AUTH_ACK)
///           Stalled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No frame yet.
    Init,
    /// Frame exists; waiting for the game to take the token.
    AwaitReady,
    /// The game acknowledged the token.
    Authenticated,
    /// At least one partial result arrived.
    ReceivingPartial,
    /// Final results arrived. Terminal.
    Complete,
    /// Gave up re-sending AUTH. Only reachable with a ready timeout.
    Stalled,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Init => "init",
            SessionState::AwaitReady => "await_ready",
            SessionState::Authenticated => "authenticated",
            SessionState::ReceivingPartial => "receiving_partial",
            SessionState::Complete => "complete",
            SessionState::Stalled => "stalled",
        }
    }
}

/// Notifications for the host's caller.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Acknowledged { id: Option<Value>, token: Option<Value> },
    GameData(Value),
    Partial(GameResults),
    Completed(GameResults),
    Stalled,
}

/// What the bridge must do after feeding the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Post this message into the game frame.
    Send(HostMessage),
    /// Relay this to the host's caller.
    Notify(SessionEvent),
}

/// When to re-send AUTH to a silent game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// `None` waits for READY forever.
    pub ready_timeout_ms: Option<f64>,
    pub max_auth_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            ready_timeout_ms: None,
            max_auth_retries: 3,
        }
    }
}

/// Handshake/result state machine. Pure: the bridge feeds it decoded
/// messages and clock readings and performs the returned actions.
#[derive(Debug, Clone)]
pub struct Session {
    user_id: UserId,
    state: SessionState,
    retry: RetryPolicy,
    /// Start of the current wait for READY. Seeded by `attach` and the
    /// fallback AUTH; after an AUTH sent in reply to READY, by the next `poll`.
    waiting_since: Option<f64>,
    auth_retries: u32,
    fallback_sent: bool,
    partials: u32,
}

impl Session {
    pub fn new(user_id: UserId, retry: RetryPolicy) -> Self {
        Self {
            user_id,
            state: SessionState::Init,
            retry,
            waiting_since: None,
            auth_retries: 0,
            fallback_sent: false,
            partials: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Number of partial results received so far.
    pub fn partials(&self) -> u32 {
        self.partials
    }

    /// The game frame was created at `now_ms`.
    pub fn attach(&mut self, now_ms: f64) {
        if self.state == SessionState::Init {
            self.state = SessionState::AwaitReady;
            self.waiting_since = Some(now_ms);
        }
    }

    /// The frame's document finished loading. Sends AUTH once, for games
    /// that never announce READY.
    pub fn frame_loaded(&mut self, now_ms: f64) -> Vec<SessionAction> {
        if self.fallback_sent || !matches!(self.state, SessionState::AwaitReady | SessionState::Init) {
            return Vec::new();
        }
        self.fallback_sent = true;
        log::debug!("session: frame loaded, sending fallback AUTH");
        let action = self.send_auth();
        self.waiting_since = Some(now_ms);
        vec![action]
    }

    /// Feed one decoded inbound message.
    pub fn handle(&mut self, message: GameMessage) -> Vec<SessionAction> {
        if self.state == SessionState::Complete {
            log::debug!("session: complete, ignoring {}", message.kind());
            return Vec::new();
        }

        match message {
            GameMessage::Ready => {
                if self.state == SessionState::Stalled {
                    self.auth_retries = 0;
                }
                if matches!(self.state, SessionState::Init | SessionState::Stalled) {
                    self.state = SessionState::AwaitReady;
                }
                log::info!("session: game ready, sending AUTH");
                vec![self.send_auth()]
            }
            GameMessage::AuthAck { id, token } => match self.state {
                SessionState::Init | SessionState::AwaitReady | SessionState::Stalled => {
                    self.state = SessionState::Authenticated;
                    log::info!("session: AUTH acknowledged");
                    vec![SessionAction::Notify(SessionEvent::Acknowledged { id, token })]
                }
                _ => {
                    log::debug!("session: duplicate AUTH_ACK ignored");
                    Vec::new()
                }
            },
            GameMessage::GameData { data } => {
                log::debug!("session: game data {}", data);
                vec![SessionAction::Notify(SessionEvent::GameData(data))]
            }
            GameMessage::GameResults { payload } => self.results(payload),
        }
    }

    /// Check the ready timeout. `now_ms` is any monotonic millisecond clock.
    pub fn poll(&mut self, now_ms: f64) -> Vec<SessionAction> {
        let Some(timeout) = self.retry.ready_timeout_ms else {
            return Vec::new();
        };
        if self.state != SessionState::AwaitReady {
            return Vec::new();
        }

        let since = *self.waiting_since.get_or_insert(now_ms);
        if now_ms - since < timeout {
            return Vec::new();
        }

        if self.auth_retries < self.retry.max_auth_retries {
            self.auth_retries += 1;
            log::warn!(
                "session: no answer after {} ms, re-sending AUTH ({}/{})",
                timeout,
                self.auth_retries,
                self.retry.max_auth_retries
            );
            let action = self.send_auth();
            self.waiting_since = Some(now_ms);
            return vec![action];
        }

        self.state = SessionState::Stalled;
        log::error!("session: game never answered AUTH; stalled");
        vec![SessionAction::Notify(SessionEvent::Stalled)]
    }

    fn results(&mut self, payload: GameResults) -> Vec<SessionAction> {
        if payload.user_id != self.user_id {
            log::warn!(
                "session: results for user {} while session holds {}",
                payload.user_id,
                self.user_id
            );
        }

        if payload.is_partial {
            self.partials += 1;
            self.state = SessionState::ReceivingPartial;
            log::info!(
                "session: partial results {}/{}",
                payload.answered_questions,
                payload.total_questions
            );
            vec![SessionAction::Notify(SessionEvent::Partial(payload))]
        } else {
            self.state = SessionState::Complete;
            log::info!("session: final results received");
            vec![SessionAction::Notify(SessionEvent::Completed(payload))]
        }
    }

    fn send_auth(&mut self) -> SessionAction {
        self.waiting_since = None;
        SessionAction::Send(HostMessage::Auth {
            token: self.user_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(partial: bool, answered: u32) -> GameResults {
        GameResults {
            user_id: UserId::from(7),
            is_partial: partial,
            total_questions: 50,
            answered_questions: answered,
            responses: Vec::new(),
        }
    }

    fn auth(id: i64) -> SessionAction {
        SessionAction::Send(HostMessage::Auth { token: UserId::from(id) })
    }

    fn attached(retry: RetryPolicy) -> Session {
        let mut s = Session::new(UserId::from(7), retry);
        s.attach(0.0);
        s
    }

    #[test]
    fn ready_sends_exactly_one_auth() {
        let mut s = attached(RetryPolicy::default());
        assert_eq!(s.state(), SessionState::AwaitReady);
        assert_eq!(s.handle(GameMessage::Ready), vec![auth(7)]);
        assert_eq!(s.state(), SessionState::AwaitReady);
    }

    #[test]
    fn full_happy_path() {
        let mut s = attached(RetryPolicy::default());
        s.handle(GameMessage::Ready);
        let acts = s.handle(GameMessage::AuthAck { id: None, token: None });
        assert!(matches!(acts.as_slice(), [SessionAction::Notify(SessionEvent::Acknowledged { .. })]));
        assert_eq!(s.state(), SessionState::Authenticated);

        s.handle(GameMessage::GameResults { payload: results(true, 10) });
        s.handle(GameMessage::GameResults { payload: results(true, 20) });
        assert_eq!(s.state(), SessionState::ReceivingPartial);
        assert_eq!(s.partials(), 2);

        let acts = s.handle(GameMessage::GameResults { payload: results(false, 50) });
        assert_eq!(acts, vec![SessionAction::Notify(SessionEvent::Completed(results(false, 50)))]);
        assert_eq!(s.state(), SessionState::Complete);
    }

    #[test]
    fn complete_is_terminal() {
        let mut s = attached(RetryPolicy::default());
        s.handle(GameMessage::GameResults { payload: results(false, 50) });
        assert!(s.handle(GameMessage::GameResults { payload: results(false, 50) }).is_empty());
        assert!(s.handle(GameMessage::Ready).is_empty());
        assert_eq!(s.state(), SessionState::Complete);
    }

    #[test]
    fn duplicate_ack_is_quiet() {
        let mut s = attached(RetryPolicy::default());
        s.handle(GameMessage::AuthAck { id: None, token: None });
        assert!(s.handle(GameMessage::AuthAck { id: None, token: None }).is_empty());
    }

    #[test]
    fn fallback_auth_sent_once() {
        let mut s = attached(RetryPolicy::default());
        assert_eq!(s.frame_loaded(0.0), vec![auth(7)]);
        assert!(s.frame_loaded(0.0).is_empty());
    }

    #[test]
    fn no_timeout_waits_forever() {
        let mut s = attached(RetryPolicy::default());
        assert!(s.poll(0.0).is_empty());
        assert!(s.poll(1.0e9).is_empty());
        assert_eq!(s.state(), SessionState::AwaitReady);
    }

    #[test]
    fn timeout_retries_then_stalls() {
        let mut s = attached(RetryPolicy {
            ready_timeout_ms: Some(1000.0),
            max_auth_retries: 2,
        });
        assert!(s.poll(0.0).is_empty());
        assert!(s.poll(999.0).is_empty());
        assert_eq!(s.poll(1000.0), vec![auth(7)]);
        assert!(s.poll(1500.0).is_empty());
        assert_eq!(s.poll(2000.0), vec![auth(7)]);
        assert_eq!(s.poll(3000.0), vec![SessionAction::Notify(SessionEvent::Stalled)]);
        assert_eq!(s.state(), SessionState::Stalled);
        assert!(s.poll(9000.0).is_empty());

        // A late READY revives the session.
        assert_eq!(s.handle(GameMessage::Ready), vec![auth(7)]);
        assert_eq!(s.state(), SessionState::AwaitReady);
    }

    #[test]
    fn ack_stops_the_clock() {
        let mut s = attached(RetryPolicy {
            ready_timeout_ms: Some(100.0),
            max_auth_retries: 1,
        });
        s.poll(0.0);
        s.handle(GameMessage::AuthAck { id: None, token: None });
        assert!(s.poll(10_000.0).is_empty());
        assert_eq!(s.state(), SessionState::Authenticated);
    }

    #[test]
    fn timeout_counts_from_attach() {
        let mut s = Session::new(
            UserId::from(7),
            RetryPolicy {
                ready_timeout_ms: Some(1000.0),
                max_auth_retries: 1,
            },
        );
        s.attach(5000.0);
        // The first poll lands late; the wait already started at attach.
        assert_eq!(s.poll(6000.0), vec![auth(7)]);
    }

    #[test]
    fn timeout_restarts_at_fallback_auth() {
        let mut s = attached(RetryPolicy {
            ready_timeout_ms: Some(1000.0),
            max_auth_retries: 1,
        });
        assert_eq!(s.frame_loaded(800.0), vec![auth(7)]);
        assert!(s.poll(1500.0).is_empty());
        assert_eq!(s.poll(1800.0), vec![auth(7)]);
    }
}
