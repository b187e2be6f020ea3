//! Colors used by the planner surface.
//!
//! The theme is passed explicitly into each render pass; there is no
//! thread-local override stack.

use crate::Color;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Theme {
    /// Root background behind everything.
    pub background: Color,
    /// Tab bar, sub-header, checkbox and thumbnail wells.
    pub panel: Color,
    /// Day and exercise cards.
    pub card: Color,

    /// Active tab, buttons, floating actions.
    pub accent: Color,
    /// Inactive tabs and chips.
    pub accent_soft: Color,

    pub text: Color,
    pub text_dim: Color,

    /// Checked checkbox fill.
    pub success: Color,
    pub danger: Color,
    pub outline: Color,
    /// Drop shadow under cards.
    pub shadow: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from_hex("#0b0b12"),
            panel: Color::from_hex("#121225"),
            card: Color::from_hex("#191933"),
            accent: Color::from_hex("#7b6cff"),
            accent_soft: Color::from_hex("#2b2859"),
            text: Color::from_hex("#e7e7f1"),
            text_dim: Color::from_hex("#b8b8cf"),
            success: Color::from_hex("#3ada8a"),
            danger: Color::from_hex("#ff667a"),
            outline: Color(255, 255, 255, 20),
            shadow: Color(0, 0, 0, 89),
        }
    }
}
