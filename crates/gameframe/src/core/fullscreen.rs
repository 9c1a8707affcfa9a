use serde::{Deserialize, Serialize};

use crate::core::style::StyleDecl;
use crate::input::viewport::Size;

/// How fullscreen is achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FullscreenStrategy {
    /// Only the platform Fullscreen API.
    Native,
    /// Only the CSS emulation (fixed positioning over the whole viewport).
    CssFallback,
    /// Native first; emulate when the platform lacks or refuses it (iOS Safari).
    NativeWithFallback,
}

impl Default for FullscreenStrategy {
    fn default() -> Self {
        FullscreenStrategy::NativeWithFallback
    }
}

/// Current fullscreen presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenMode {
    Off,
    /// The platform reports a fullscreen element.
    Native,
    /// CSS emulation is active.
    Emulated,
}

/// Side effect the bridge must perform after a fullscreen decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenCommand {
    RequestNative,
    ExitNative,
    EnterEmulated,
    ExitEmulated,
    /// Lock the screen to landscape; only honoured while natively fullscreen.
    LockLandscape,
}

/// Fullscreen state, reconciled with platform notifications.
///
/// Native transitions are asynchronous: a request only changes the mode once
/// the platform reports the change. Emulated transitions are immediate.
#[derive(Debug, Clone)]
pub struct FullscreenController {
    strategy: FullscreenStrategy,
    mode: FullscreenMode,
    pending_native: bool,
    lock_requested: bool,
}

impl FullscreenController {
    pub fn new(strategy: FullscreenStrategy) -> Self {
        Self {
            strategy,
            mode: FullscreenMode::Off,
            pending_native: false,
            lock_requested: false,
        }
    }

    pub fn mode(&self) -> FullscreenMode {
        self.mode
    }

    pub fn is_fullscreen(&self) -> bool {
        self.mode != FullscreenMode::Off
    }

    /// Decide what a press of the fullscreen button should do.
    /// `native_supported` is whether the platform exposes the Fullscreen API.
    pub fn toggle(&mut self, native_supported: bool) -> Option<FullscreenCommand> {
        match self.mode {
            FullscreenMode::Native => Some(FullscreenCommand::ExitNative),
            FullscreenMode::Emulated => {
                self.mode = FullscreenMode::Off;
                Some(FullscreenCommand::ExitEmulated)
            }
            FullscreenMode::Off => match self.strategy {
                FullscreenStrategy::CssFallback => self.emulate(),
                FullscreenStrategy::Native if native_supported => self.request_native(),
                FullscreenStrategy::Native => {
                    log::warn!("fullscreen: not supported by this browser");
                    None
                }
                FullscreenStrategy::NativeWithFallback if native_supported => self.request_native(),
                FullscreenStrategy::NativeWithFallback => self.emulate(),
            },
        }
    }

    /// Go fullscreen and then lock the screen to landscape (the rotate
    /// prompt's button). The lock is issued once the platform confirms
    /// native fullscreen; emulation cannot lock.
    pub fn enter_and_lock(&mut self, native_supported: bool) -> Option<FullscreenCommand> {
        match self.mode {
            FullscreenMode::Native => Some(FullscreenCommand::LockLandscape),
            FullscreenMode::Emulated => None,
            FullscreenMode::Off => {
                let command = self.toggle(native_supported);
                self.lock_requested = command == Some(FullscreenCommand::RequestNative);
                command
            }
        }
    }

    /// The platform reported a fullscreen change.
    ///
    /// Native fullscreen entered while emulating (the game can request it
    /// from inside the frame) replaces the emulation, so the bridge is told
    /// to tear it down.
    pub fn native_changed(&mut self, active: bool) -> Option<FullscreenCommand> {
        self.pending_native = false;
        match (active, self.mode) {
            (true, FullscreenMode::Emulated) => {
                self.mode = FullscreenMode::Native;
                self.lock_requested = false;
                Some(FullscreenCommand::ExitEmulated)
            }
            (true, _) => {
                self.mode = FullscreenMode::Native;
                std::mem::take(&mut self.lock_requested).then_some(FullscreenCommand::LockLandscape)
            }
            (false, FullscreenMode::Native) => {
                self.mode = FullscreenMode::Off;
                self.lock_requested = false;
                None
            }
            (false, _) => None,
        }
    }

    /// The platform refused a native request (or the request threw).
    /// Falls back to emulation when the strategy allows it.
    pub fn native_rejected(&mut self) -> Option<FullscreenCommand> {
        let was_pending = std::mem::replace(&mut self.pending_native, false);
        self.lock_requested = false;
        if !was_pending || self.mode != FullscreenMode::Off {
            return None;
        }
        match self.strategy {
            FullscreenStrategy::NativeWithFallback => {
                log::info!("fullscreen: native request refused, emulating");
                self.emulate()
            }
            _ => {
                log::warn!("fullscreen: native request refused");
                None
            }
        }
    }

    fn request_native(&mut self) -> Option<FullscreenCommand> {
        self.pending_native = true;
        Some(FullscreenCommand::RequestNative)
    }

    fn emulate(&mut self) -> Option<FullscreenCommand> {
        self.mode = FullscreenMode::Emulated;
        Some(FullscreenCommand::EnterEmulated)
    }
}

/// Styles that fake fullscreen on the frame's root element.
pub fn emulated_styles(window: Size) -> Vec<StyleDecl> {
    vec![
        ("position", "fixed".to_string()),
        ("top", "0".to_string()),
        ("left", "0".to_string()),
        ("width", format!("{}px", window.width)),
        ("height", format!("{}px", window.height)),
        ("margin", "0".to_string()),
        ("z-index", "2147483000".to_string()),
    ]
}
