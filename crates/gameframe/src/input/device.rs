use serde::{Deserialize, Serialize};

use crate::input::viewport::Size;

/// User-agent fragments that mark a mobile browser (matched case-insensitively).
pub const MOBILE_UA_TOKENS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// How to decide whether the device is a phone/tablet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MobileDetection {
    /// Sniff the user agent.
    UserAgent,
    /// Treat any window at most `max_width` wide as mobile.
    Width { max_width: f64 },
    /// Either of the above.
    Either { max_width: f64 },
}

impl Default for MobileDetection {
    fn default() -> Self {
        MobileDetection::UserAgent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Best-effort classification of the current device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    pub mobile: bool,
    pub orientation: Orientation,
}

impl DeviceProfile {
    /// Classify from the user agent and window size. Re-run on every resize
    /// and orientation change.
    pub fn classify(user_agent: &str, window: Size, detection: MobileDetection) -> Self {
        let by_agent = || is_mobile_user_agent(user_agent);
        let mobile = match detection {
            MobileDetection::UserAgent => by_agent(),
            MobileDetection::Width { max_width } => window.width <= max_width,
            MobileDetection::Either { max_width } => window.width <= max_width || by_agent(),
        };
        let orientation = if window.is_portrait() {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        };
        Self { mobile, orientation }
    }

    pub fn desktop() -> Self {
        Self {
            mobile: false,
            orientation: Orientation::Landscape,
        }
    }

    pub fn is_portrait(&self) -> bool {
        self.orientation == Orientation::Portrait
    }
}

pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    MOBILE_UA_TOKENS.iter().any(|token| ua.contains(token))
}

/// The "rotate your device" prompt.
///
/// Shown for mobile portrait outside fullscreen. The player may dismiss it;
/// the dismissal lasts until the device is next seen in landscape.
#[derive(Debug, Clone, Default)]
pub struct RotatePrompt {
    dismissed: bool,
}

impl RotatePrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the latest classification.
    pub fn observe(&mut self, profile: &DeviceProfile) {
        if !profile.is_portrait() {
            self.dismissed = false;
        }
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    pub fn visible(&self, profile: &DeviceProfile, fullscreen: bool) -> bool {
        profile.mobile && profile.is_portrait() && !fullscreen && !self.dismissed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
    const DESKTOP: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/126.0";

    #[test]
    fn sniffs_mobile_agents() {
        assert!(is_mobile_user_agent(IPHONE));
        assert!(is_mobile_user_agent("Opera/9.80 (J2ME/MIDP; Opera Mini/9.80)"));
        assert!(is_mobile_user_agent("Mozilla/5.0 (Linux; ANDROID 14)"));
        assert!(!is_mobile_user_agent(DESKTOP));
    }

    #[test]
    fn width_detection_ignores_agent() {
        let narrow = DeviceProfile::classify(DESKTOP, Size::new(700.0, 900.0), MobileDetection::Width { max_width: 768.0 });
        assert!(narrow.mobile);
        let wide = DeviceProfile::classify(IPHONE, Size::new(1024.0, 900.0), MobileDetection::Width { max_width: 768.0 });
        assert!(!wide.mobile);
        let either = DeviceProfile::classify(IPHONE, Size::new(1024.0, 900.0), MobileDetection::Either { max_width: 768.0 });
        assert!(either.mobile);
    }

    #[test]
    fn rotate_prompt_follows_orientation() {
        let mut prompt = RotatePrompt::new();
        let portrait = DeviceProfile::classify(IPHONE, Size::new(375.0, 667.0), MobileDetection::UserAgent);
        let landscape = DeviceProfile::classify(IPHONE, Size::new(667.0, 375.0), MobileDetection::UserAgent);

        assert!(prompt.visible(&portrait, false));
        assert!(!prompt.visible(&portrait, true));
        assert!(!prompt.visible(&landscape, false));
        assert!(!prompt.visible(&DeviceProfile::desktop(), false));
    }

    #[test]
    fn dismissal_resets_on_landscape() {
        let mut prompt = RotatePrompt::new();
        let portrait = DeviceProfile { mobile: true, orientation: Orientation::Portrait };
        let landscape = DeviceProfile { mobile: true, orientation: Orientation::Landscape };

        prompt.dismiss();
        prompt.observe(&portrait);
        assert!(!prompt.visible(&portrait, false));

        prompt.observe(&landscape);
        assert!(!prompt.is_dismissed());
        assert!(prompt.visible(&portrait, false));
    }

    #[test]
    fn detection_config_shape() {
        let parsed: MobileDetection = serde_json::from_str(r#"{ "kind": "width", "max_width": 768 }"#).unwrap();
        assert_eq!(parsed, MobileDetection::Width { max_width: 768.0 });
    }
}
