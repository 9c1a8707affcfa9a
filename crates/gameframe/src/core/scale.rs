use serde::{Deserialize, Serialize};

use crate::input::viewport::Size;

/// Upper bound on the scale for windows narrower than `max_width`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub max_width: f64,
    pub max_scale: f64,
}

/// Hand-tuned scale caps for narrow windows, sorted by width.
/// The first row whose `max_width` exceeds the window width applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Breakpoint>", into = "Vec<Breakpoint>")]
pub struct BreakpointTable {
    rows: Vec<Breakpoint>,
}

impl BreakpointTable {
    pub fn new(mut rows: Vec<Breakpoint>) -> Self {
        rows.sort_by(|a, b| a.max_width.total_cmp(&b.max_width));
        Self { rows }
    }

    /// The table tuned for the 1440×780 questionnaire game.
    pub fn standard() -> Self {
        Self::new(vec![
            Breakpoint { max_width: 400.0, max_scale: 0.28 },
            Breakpoint { max_width: 500.0, max_scale: 0.38 },
            Breakpoint { max_width: 600.0, max_scale: 0.48 },
            Breakpoint { max_width: 700.0, max_scale: 0.58 },
            Breakpoint { max_width: 900.0, max_scale: 0.68 },
        ])
    }

    /// No caps at all.
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn rows(&self) -> &[Breakpoint] {
        &self.rows
    }

    /// Scale cap for a window `width` pixels wide, if any row applies.
    pub fn cap_for(&self, width: f64) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| width < row.max_width)
            .map(|row| row.max_scale)
    }
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl From<Vec<Breakpoint>> for BreakpointTable {
    fn from(rows: Vec<Breakpoint>) -> Self {
        Self::new(rows)
    }
}

impl From<BreakpointTable> for Vec<Breakpoint> {
    fn from(table: BreakpointTable) -> Self {
        table.rows
    }
}

/// How the frame is fitted to the space around it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FitMode {
    /// Fit inside the window on both axes, never upscaling.
    Contain,
    /// Fill the parent's width up to `max_width`; height follows the
    /// native aspect ratio.
    FitWidth { max_width: f64 },
}

impl Default for FitMode {
    fn default() -> Self {
        FitMode::Contain
    }
}

/// Space available along one axis once padding is taken off.
/// Windows no larger than the padding keep their full size.
fn available(dim: f64, padding: f64) -> f64 {
    if dim > padding {
        dim - padding
    } else {
        dim
    }
}

/// Uniform scale that fits `native` inside `window`.
///
/// `min(avail_w / native_w, avail_h / native_h, 1)`, then capped by the
/// breakpoint table. For any positive window the result is in `(0, 1]` and
/// the scaled canvas never exceeds the window on either axis.
pub fn contain_scale(native: Size, window: Size, padding: f64, table: &BreakpointTable) -> f64 {
    let avail_w = available(window.width, padding);
    let avail_h = available(window.height, padding);

    let mut scale = (avail_w / native.width).min(avail_h / native.height).min(1.0);
    if let Some(cap) = table.cap_for(window.width) {
        scale = scale.min(cap);
    }
    scale
}

/// Container size and scale for [`FitMode::FitWidth`].
/// Height is rounded to whole pixels to avoid sub-pixel seams.
pub fn fit_width(native: Size, parent_width: f64, max_width: f64) -> (Size, f64) {
    let width = parent_width.min(max_width);
    let height = (width * native.height / native.width).round();
    (Size::new(width, height), width / native.width)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NATIVE: Size = Size::new(1440.0, 780.0);

    #[test]
    fn large_window_never_upscales() {
        let s = contain_scale(NATIVE, Size::new(3840.0, 2160.0), 8.0, &BreakpointTable::standard());
        assert_eq!(s, 1.0);
    }

    #[test]
    fn portrait_phone_is_capped() {
        let s = contain_scale(NATIVE, Size::new(375.0, 667.0), 8.0, &BreakpointTable::standard());
        assert!(s <= 0.28);
        assert!((s - 367.0 / 1440.0).abs() < 1e-9);
    }

    #[test]
    fn landscape_phone_is_width_bound() {
        let s = contain_scale(NATIVE, Size::new(667.0, 375.0), 8.0, &BreakpointTable::standard());
        assert!((s - 659.0 / 1440.0).abs() < 1e-9);
        assert!((s - 0.458).abs() < 1e-3);
    }

    #[test]
    fn breakpoint_caps_apply_below_threshold() {
        let table = BreakpointTable::standard();
        assert_eq!(table.cap_for(399.0), Some(0.28));
        assert_eq!(table.cap_for(400.0), Some(0.38));
        assert_eq!(table.cap_for(899.9), Some(0.68));
        assert_eq!(table.cap_for(900.0), None);
        assert_eq!(BreakpointTable::empty().cap_for(10.0), None);
    }

    #[test]
    fn cap_wins_over_fit() {
        // 850 wide and very tall: fit would be ~0.585, cap is 0.68, fit wins.
        let s = contain_scale(NATIVE, Size::new(850.0, 2000.0), 8.0, &BreakpointTable::standard());
        assert!((s - 842.0 / 1440.0).abs() < 1e-9);
        // With a tighter custom table the cap wins.
        let tight = BreakpointTable::new(vec![Breakpoint { max_width: 900.0, max_scale: 0.5 }]);
        assert_eq!(contain_scale(NATIVE, Size::new(850.0, 2000.0), 8.0, &tight), 0.5);
    }

    #[test]
    fn table_sorts_rows() {
        let table = BreakpointTable::new(vec![
            Breakpoint { max_width: 900.0, max_scale: 0.7 },
            Breakpoint { max_width: 400.0, max_scale: 0.3 },
        ]);
        assert_eq!(table.rows()[0].max_width, 400.0);
        assert_eq!(table.cap_for(300.0), Some(0.3));
    }

    #[test]
    fn tiny_windows_stay_positive() {
        for (w, h) in [(1.0, 1.0), (8.0, 8.0), (0.5, 300.0), (9.0, 4.0)] {
            let s = contain_scale(NATIVE, Size::new(w, h), 8.0, &BreakpointTable::standard());
            assert!(s > 0.0 && s <= 1.0, "scale {} for {}x{}", s, w, h);
            assert!(NATIVE.width * s <= w + 1e-9);
            assert!(NATIVE.height * s <= h + 1e-9);
        }
    }

    #[test]
    fn fit_width_keeps_aspect() {
        let (size, scale) = fit_width(NATIVE, 1920.0, 1200.0);
        assert_eq!(size, Size::new(1200.0, 650.0));
        assert!((scale - 1200.0 / 1440.0).abs() < 1e-9);

        let (size, _) = fit_width(NATIVE, 500.0, 1200.0);
        assert_eq!(size.width, 500.0);
        assert_eq!(size.height, (500.0_f64 * 780.0 / 1440.0).round());
    }

    #[test]
    fn table_roundtrips_as_plain_list() {
        let json = r#"[{ "max_width": 600, "max_scale": 0.5 }]"#;
        let table: BreakpointTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.cap_for(100.0), Some(0.5));
    }
}
