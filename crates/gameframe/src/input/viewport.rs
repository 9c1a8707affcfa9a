use serde::{Deserialize, Serialize};

/// Width × height in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions scaled by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    /// True when both dimensions are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Platform notifications that can invalidate the current layout.
/// The web layer turns DOM events into these; the runner reacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEvent {
    /// Frame was just mounted.
    Mounted,
    /// Window was resized.
    Resized,
    /// Device was rotated.
    OrientationChanged,
    /// The platform entered or left native fullscreen.
    FullscreenChanged,
    /// Deferred re-check after browser chrome finished animating.
    Settled,
    /// The iframe finished loading its document.
    FrameLoaded,
}

impl ViewportEvent {
    /// Whether the device classification may have changed.
    pub fn reclassifies(self) -> bool {
        matches!(
            self,
            ViewportEvent::Mounted
                | ViewportEvent::Resized
                | ViewportEvent::OrientationChanged
                | ViewportEvent::FullscreenChanged
                | ViewportEvent::Settled
        )
    }

    /// Whether a second layout pass should follow once the window settles.
    /// Browser chrome animates in and out around fullscreen transitions, so
    /// dimensions read in the change handler are not final.
    pub fn needs_settle(self) -> bool {
        matches!(self, ViewportEvent::FullscreenChanged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_multiplies_both_axes() {
        let s = Size::new(1440.0, 780.0).scaled(0.5);
        assert_eq!(s, Size::new(720.0, 390.0));
    }

    #[test]
    fn orientation_from_dimensions() {
        assert!(Size::new(375.0, 667.0).is_portrait());
        assert!(!Size::new(667.0, 375.0).is_portrait());
        // Square counts as landscape.
        assert!(!Size::new(500.0, 500.0).is_portrait());
    }

    #[test]
    fn validity() {
        assert!(Size::new(1.0, 1.0).is_valid());
        assert!(!Size::new(0.0, 10.0).is_valid());
        assert!(!Size::new(f64::NAN, 10.0).is_valid());
    }

    #[test]
    fn only_fullscreen_changes_settle() {
        assert!(ViewportEvent::FullscreenChanged.needs_settle());
        assert!(!ViewportEvent::Resized.needs_settle());
        assert!(!ViewportEvent::FrameLoaded.reclassifies());
    }
}
