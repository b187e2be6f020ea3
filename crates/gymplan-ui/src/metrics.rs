//! Fixed layout constants.
//!
//! All values are logical pixels; the layout pass multiplies them by the
//! viewport scale. Row height does not depend on content.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
    /// Week tab bar.
    pub tab_h: f32,
    /// Strip under the tabs showing the week name.
    pub header_h: f32,
    pub padding: f32,
    /// Height of every day and exercise card.
    pub card_h: f32,
    pub card_r: f32,
    /// Vertical gap between cards.
    pub card_gap: f32,
    pub checkbox: f32,
    pub btn_h: f32,
    /// Radius of the floating action buttons.
    pub fab_r: f32,
    pub thumb: f32,
    /// Pointer travel before a press turns into a scroll.
    pub scroll_slop: f32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            tab_h: 56.0,
            header_h: 18.0,
            padding: 14.0,
            card_h: 88.0,
            card_r: 14.0,
            card_gap: 10.0,
            checkbox: 22.0,
            btn_h: 44.0,
            fab_r: 28.0,
            thumb: 64.0,
            scroll_slop: 2.0,
        }
    }
}

impl Metrics {
    /// Card height plus gap, the unit of list layout and drag quantisation.
    pub fn slot(&self) -> f32 {
        self.card_h + self.card_gap
    }
}

/// Width estimate for a run of text. Hit geometry that depends on label width
/// (tabs, chips) is derived from this, so it must be deterministic and shared
/// by paint and hit registration.
pub trait TextMeasure {
    fn width(&self, text: &str, size: f32, bold: bool) -> f32;
}

/// Average advance per character; good enough for the short labels the
/// planner sizes boxes around.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproxMeasure;

impl TextMeasure for ApproxMeasure {
    fn width(&self, text: &str, size: f32, bold: bool) -> f32 {
        let per_char = if bold { 0.6 } else { 0.55 };
        text.chars()
            .map(|c| match c {
                ' ' | 'i' | 'l' | '.' | ',' | '\'' | '|' => 0.3,
                'm' | 'w' | 'M' | 'W' => 0.85,
                _ if c.is_ascii_uppercase() || c.is_ascii_digit() => 0.65,
                _ => per_char,
            })
            .sum::<f32>()
            * size
    }
}
