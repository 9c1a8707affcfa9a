pub mod api;
pub mod core;
pub mod bridge;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::config::FrameConfig;
pub use api::error::{AdapterError, ConfigError, ProtocolError};
pub use api::types::{GameResults, QuestionResponse, UserId};
pub use api::adapter::{game_url, token_from_query, wrap_results, SendOutcome, DEFAULT_TOKEN};
pub use bridge::channel::FrameChannel;
pub use bridge::protocol::{decode, GameMessage, HostMessage};
pub use crate::core::fullscreen::{FullscreenCommand, FullscreenController, FullscreenMode, FullscreenStrategy};
pub use crate::core::layout::FrameLayout;
pub use crate::core::scale::{Breakpoint, BreakpointTable, FitMode};
pub use crate::core::session::{RetryPolicy, Session, SessionAction, SessionEvent, SessionState};
pub use crate::core::style::{StyleDecl, StyleGuard, StyleSurface};
pub use input::device::{DeviceProfile, MobileDetection, Orientation, RotatePrompt};
pub use input::viewport::{Size, ViewportEvent};

