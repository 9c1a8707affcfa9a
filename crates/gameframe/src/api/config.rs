use serde::{Deserialize, Serialize};

use crate::api::error::ConfigError;
use crate::core::fullscreen::FullscreenStrategy;
use crate::core::scale::{BreakpointTable, FitMode};
use crate::core::session::RetryPolicy;
use crate::input::device::{DeviceProfile, MobileDetection};
use crate::input::viewport::Size;

/// Configuration for one embedded game, provided by the host page.
///
/// Every field has a default matching the 1440×780 questionnaire game, so a
/// JSON override only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Width the game was authored at, in pixels (default: 1440).
    pub native_width: f64,
    /// Height the game was authored at, in pixels (default: 780).
    pub native_height: f64,
    /// Pixels kept free around the frame on each axis (default: 8).
    pub padding: f64,
    /// Scale caps used on mobile devices.
    pub breakpoints: BreakpointTable,
    /// Scale caps used on desktop browsers.
    pub desktop_breakpoints: BreakpointTable,
    pub fit_mode: FitMode,
    pub fullscreen_strategy: FullscreenStrategy,
    pub mobile_detection: MobileDetection,
    /// Directory holding the game's `index.html` (default: "/GAME2").
    pub game_base_url: String,
    /// Title of the iframe and the header (default: "NOSACQ-50").
    pub title: String,
    /// Origin used for outbound posts and checked on inbound ones.
    /// `"*"` disables the check (default).
    pub target_origin: String,
    /// Delay before re-measuring after a fullscreen change (default: 120 ms).
    pub settle_delay_ms: u32,
    /// Re-send AUTH when the game stays silent this long. `None` waits forever.
    pub ready_timeout_ms: Option<u32>,
    /// AUTH re-sends before the session is declared stalled (default: 3).
    pub max_auth_retries: u32,
    /// How often the ready timeout is checked (default: 500 ms).
    pub poll_interval_ms: u32,
    /// Text of the rotate-your-device prompt.
    pub rotate_message: String,
    /// Show the header, fullscreen button and prompt buttons (default: true).
    pub show_controls: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            native_width: 1440.0,
            native_height: 780.0,
            padding: 8.0,
            breakpoints: BreakpointTable::standard(),
            desktop_breakpoints: BreakpointTable::standard(),
            fit_mode: FitMode::Contain,
            fullscreen_strategy: FullscreenStrategy::NativeWithFallback,
            mobile_detection: MobileDetection::UserAgent,
            game_base_url: "/GAME2".to_string(),
            title: "NOSACQ-50".to_string(),
            target_origin: "*".to_string(),
            settle_delay_ms: 120,
            ready_timeout_ms: None,
            max_auth_retries: 3,
            poll_interval_ms: 500,
            rotate_message: "Para una mejor experiencia, rota tu dispositivo horizontalmente"
                .to_string(),
            show_controls: true,
        }
    }
}

impl FrameConfig {
    /// Parse overrides from JSON and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let native = self.native_size();
        if !native.is_valid() {
            return Err(ConfigError::NativeSize {
                width: native.width,
                height: native.height,
            });
        }
        if !(self.padding >= 0.0 && self.padding.is_finite()) {
            return Err(ConfigError::Padding(self.padding));
        }
        for row in self.breakpoints.rows().iter().chain(self.desktop_breakpoints.rows()) {
            if !(row.max_scale > 0.0 && row.max_scale <= 1.0) {
                return Err(ConfigError::Breakpoint {
                    max_width: row.max_width,
                    max_scale: row.max_scale,
                });
            }
        }
        if let FitMode::FitWidth { max_width } = self.fit_mode {
            if !(max_width > 0.0 && max_width.is_finite()) {
                return Err(ConfigError::FitWidth(max_width));
            }
        }
        if self.game_base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if self.ready_timeout_ms.is_some() && self.poll_interval_ms == 0 {
            return Err(ConfigError::PollInterval);
        }
        Ok(())
    }

    pub fn native_size(&self) -> Size {
        Size::new(self.native_width, self.native_height)
    }

    /// Breakpoint table for the given device class.
    pub fn breakpoints_for(&self, profile: &DeviceProfile) -> &BreakpointTable {
        if profile.mobile {
            &self.breakpoints
        } else {
            &self.desktop_breakpoints
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            ready_timeout_ms: self.ready_timeout_ms.map(f64::from),
            max_auth_retries: self.max_auth_retries,
        }
    }

    /// The configured origin, unless it is the `"*"` wildcard.
    pub fn explicit_origin(&self) -> Option<&str> {
        match self.target_origin.trim() {
            "" | "*" => None,
            origin => Some(origin),
        }
    }
}
