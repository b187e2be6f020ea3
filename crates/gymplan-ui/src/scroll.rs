//! # Scroll model
//!
//! The planner has a single vertical scroll offset for the content area
//! below the tab bar and sub-header. The offset is always kept inside
//! `[0, max(0, content_height - viewport_height)]`; content height comes from
//! [`ListLayout::content_height`](crate::layout::ListLayout::content_height),
//! the same pass that positions every row, so the bounds never drift from
//! what is painted.
//!
//! `scroll_by` consumes a delta and returns the leftover motion, like a
//! nested scroll container would.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollController {
    offset: f32,
}

impl ScrollController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Largest valid offset for the given sizes.
    pub fn max_offset(content_h: f32, viewport_h: f32) -> f32 {
        (content_h - viewport_h).max(0.0)
    }

    /// Consume `delta` (pixels), clamp to bounds, return leftover.
    pub fn scroll_by(&mut self, delta: f32, content_h: f32, viewport_h: f32) -> f32 {
        if !delta.is_finite() {
            return 0.0;
        }
        let before = self.offset;
        let max_off = Self::max_offset(content_h, viewport_h);
        self.offset = (before + delta).clamp(0.0, max_off);
        let consumed = self.offset - before;
        log::trace!("scroll_by {delta} -> offset {} (max {max_off})", self.offset);
        delta - consumed
    }

    pub fn reset_to_top(&mut self) {
        self.offset = 0.0;
    }

    /// Re-clamps after content shrank or the viewport grew. Returns `true`
    /// if the offset moved.
    pub fn clamp_to(&mut self, content_h: f32, viewport_h: f32) -> bool {
        let clamped = self.offset.clamp(0.0, Self::max_offset(content_h, viewport_h));
        let moved = clamped != self.offset;
        self.offset = clamped;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_both_ends_and_returns_leftover() {
        let mut s = ScrollController::new();
        assert_eq!(s.scroll_by(-50.0, 1000.0, 400.0), -50.0);
        assert_eq!(s.offset(), 0.0);

        assert_eq!(s.scroll_by(250.0, 1000.0, 400.0), 0.0);
        assert_eq!(s.offset(), 250.0);

        assert_eq!(s.scroll_by(500.0, 1000.0, 400.0), 150.0);
        assert_eq!(s.offset(), 600.0);
    }

    #[test]
    fn short_content_never_scrolls() {
        let mut s = ScrollController::new();
        s.scroll_by(120.0, 300.0, 400.0);
        assert_eq!(s.offset(), 0.0);
    }

    #[test]
    fn clamp_after_content_shrinks() {
        let mut s = ScrollController::new();
        s.scroll_by(600.0, 1000.0, 400.0);
        assert!(s.clamp_to(700.0, 400.0));
        assert_eq!(s.offset(), 300.0);
        assert!(!s.clamp_to(700.0, 400.0));
        s.reset_to_top();
        assert_eq!(s.offset(), 0.0);
    }

    #[test]
    fn ignores_non_finite_delta() {
        let mut s = ScrollController::new();
        s.scroll_by(10.0, 1000.0, 400.0);
        assert_eq!(s.scroll_by(f32::NAN, 1000.0, 400.0), 0.0);
        assert_eq!(s.offset(), 10.0);
    }
}
