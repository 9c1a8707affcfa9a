use crate::api::config::FrameConfig;
use crate::core::scale::{contain_scale, fit_width, FitMode};
use crate::core::style::StyleDecl;
use crate::input::device::DeviceProfile;
use crate::input::viewport::Size;

/// Sizes for the three nested boxes that hold the game:
///
/// ```text
/// container (scaled footprint, clips) > wrapper (native, transformed) > iframe (native)
/// ```
///
/// The iframe always renders at native resolution; only the wrapper's CSS
/// transform shrinks it. The container takes the scaled size so the page
/// layout never sees the native dimensions and no scrollbars appear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLayout {
    /// Uniform scale factor applied to the native canvas.
    pub scale: f64,
    /// Outer footprint in page pixels.
    pub container: Size,
    /// Native resolution of the game.
    pub frame: Size,
}

impl FrameLayout {
    /// Recompute the layout for the current window.
    /// `parent_width` is only consulted by [`FitMode::FitWidth`].
    pub fn compute(
        config: &FrameConfig,
        window: Size,
        parent_width: f64,
        profile: &DeviceProfile,
    ) -> Self {
        let native = config.native_size();
        match config.fit_mode {
            FitMode::Contain => {
                let table = config.breakpoints_for(profile);
                let scale = contain_scale(native, window, config.padding, table);
                Self {
                    scale,
                    container: native.scaled(scale),
                    frame: native,
                }
            }
            FitMode::FitWidth { max_width } => {
                let (container, scale) = fit_width(native, parent_width, max_width);
                Self {
                    scale,
                    container,
                    frame: native,
                }
            }
        }
    }

    /// CSS transform for the wrapper.
    pub fn transform(&self) -> String {
        format!("scale({})", self.scale)
    }

    pub fn container_styles(&self) -> Vec<StyleDecl> {
        vec![
            ("width", px(self.container.width)),
            ("height", px(self.container.height)),
            ("max-width", "100vw".to_string()),
            ("max-height", "100vh".to_string()),
            ("position", "relative".to_string()),
            ("overflow", "hidden".to_string()),
            ("background", "#000".to_string()),
        ]
    }

    pub fn wrapper_styles(&self) -> Vec<StyleDecl> {
        vec![
            ("position", "absolute".to_string()),
            ("top", "0".to_string()),
            ("left", "0".to_string()),
            ("width", px(self.frame.width)),
            ("height", px(self.frame.height)),
            ("transform", self.transform()),
            ("transform-origin", "top left".to_string()),
        ]
    }

    pub fn frame_styles(&self) -> Vec<StyleDecl> {
        vec![
            ("width", px(self.frame.width)),
            ("height", px(self.frame.height)),
            ("border", "none".to_string()),
            ("display", "block".to_string()),
            ("background", "#000".to_string()),
        ]
    }
}

/// Styles of the outermost element that depend on fullscreen.
pub fn chrome_styles(fullscreen: bool) -> Vec<StyleDecl> {
    let (justify, radius, padding) = if fullscreen {
        ("center", "0", "0")
    } else {
        ("flex-start", "12px", "12px")
    };
    vec![
        ("justify-content", justify.to_string()),
        ("border-radius", radius.to_string()),
        ("padding", padding.to_string()),
        ("min-height", if fullscreen { "100vh" } else { "auto" }.to_string()),
    ]
}

fn px(v: f64) -> String {
    format!("{}px", v)
}
