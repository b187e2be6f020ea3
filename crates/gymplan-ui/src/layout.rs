//! One layout pass for everything that scrolls.
//!
//! [`ListLayout`] walks the active week once and records the top of every day
//! and item row, the control buttons and the status line. Painting, hit
//! registration, drag activation and scroll bounds all read these numbers;
//! nothing recomputes row positions on its own.
//!
//! All coordinates are device pixels. Rows have a constant height, so the
//! pass needs only item counts, never text.

use gymplan_core::{Rect, Vec2, Viewport};
use gymplan_model::Week;
use smallvec::SmallVec;

use crate::metrics::{Metrics, TextMeasure};

/// Font size of the tab labels, also used to size the pills.
pub const TAB_LABEL_SIZE: f32 = 14.0;
/// Font size of the chip labels.
pub const CHIP_LABEL_SIZE: f32 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChipAction {
    Edit,
    Drag,
    Menu,
}

impl ChipAction {
    pub const ALL: [ChipAction; 3] = [ChipAction::Edit, ChipAction::Drag, ChipAction::Menu];

    pub fn label(self) -> &'static str {
        match self {
            ChipAction::Edit => "Edit",
            ChipAction::Drag => "Drag",
            ChipAction::Menu => "•••",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    AddPreset,
    AddCustom,
}

impl ButtonAction {
    pub fn label(self) -> &'static str {
        match self {
            ButtonAction::AddPreset => "Add preset to selected day",
            ButtonAction::AddCustom => "Add custom exercise to selected day",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Day { day: usize },
    Item { day: usize, index: usize },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Row {
    pub kind: RowKind,
    /// Painted top of the card, scroll offset applied.
    pub top: f32,
}

#[derive(Clone, Debug)]
pub struct ListLayout {
    viewport: Viewport,
    metrics: Metrics,
    /// Clip rectangle of the scrolling area.
    pub content: Rect,
    pub rows: Vec<Row>,
    pub add_preset: Rect,
    pub add_custom: Rect,
    /// Baseline start of the status line.
    pub status: Vec2,
    content_height: f32,
}

impl ListLayout {
    pub fn compute(week: &Week, viewport: Viewport, metrics: &Metrics, scroll_offset: f32) -> Self {
        let px = |v: f32| viewport.px(v);
        let top = Self::content_top(viewport, metrics);
        let content = Rect::new(0.0, top, viewport.width, (viewport.height - top).max(0.0));
        let slot = px(metrics.slot());
        let pad = px(metrics.padding);
        let origin = top + pad - scroll_offset;

        let mut rows = Vec::with_capacity(week.item_count() + week.days.len());
        let mut y = origin;
        for (d, day) in week.days.iter().enumerate() {
            rows.push(Row {
                kind: RowKind::Day { day: d },
                top: y,
            });
            y += slot;
            for i in 0..day.items.len() {
                rows.push(Row {
                    kind: RowKind::Item { day: d, index: i },
                    top: y,
                });
                y += slot;
            }
        }

        let btn_w = viewport.width - 2.0 * pad;
        let btn_h = px(metrics.btn_h);
        y += pad;
        let add_preset = Rect::new(pad, y, btn_w, btn_h);
        y += btn_h + pad / 2.0;
        let add_custom = Rect::new(pad, y, btn_w, btn_h);
        y += btn_h + pad;
        let status = Vec2 { x: pad, y };

        // Room under the status line so the floating buttons never sit on
        // top of the last control when scrolled to the end.
        let end = y + pad + 2.0 * px(metrics.fab_r) * 2.0 + px(12.0);
        let content_height = (end - origin + pad).max(0.0);

        Self {
            viewport,
            metrics: *metrics,
            content,
            rows,
            add_preset,
            add_custom,
            status,
            content_height,
        }
    }

    /// Y where the scrolling area starts.
    pub fn content_top(viewport: Viewport, metrics: &Metrics) -> f32 {
        viewport.px(metrics.tab_h + metrics.header_h)
    }

    /// Height of the content viewport the scroll offset is clamped against.
    pub fn viewport_height(&self) -> f32 {
        self.content.h
    }

    /// Total height of the scrolling content, independent of the offset.
    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    pub fn slot(&self) -> f32 {
        self.px(self.metrics.slot())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn px(&self, v: f32) -> f32 {
        self.viewport.px(v)
    }

    pub fn item_row_top(&self, day: usize, index: usize) -> Option<f32> {
        self.rows
            .iter()
            .find(|r| r.kind == RowKind::Item { day, index })
            .map(|r| r.top)
    }

    pub fn day_row_top(&self, day: usize) -> Option<f32> {
        self.rows
            .iter()
            .find(|r| r.kind == RowKind::Day { day })
            .map(|r| r.top)
    }

    /// Whether any part of a row starting at `top` is inside the content area.
    pub fn is_row_visible(&self, top: f32) -> bool {
        top + self.px(self.metrics.card_h) >= self.content.y && top <= self.content.bottom()
    }

    // Per-row geometry. Every helper takes the row's painted top.

    pub fn card(&self, top: f32) -> Rect {
        let pad = self.px(self.metrics.padding);
        Rect::new(
            pad,
            top,
            self.viewport.width - 2.0 * pad,
            self.px(self.metrics.card_h),
        )
    }

    pub fn day_label_origin(&self, top: f32) -> Vec2 {
        Vec2 {
            x: self.px(self.metrics.padding + 18.0),
            y: top + self.px(28.0),
        }
    }

    pub fn day_hint_origin(&self, top: f32) -> Vec2 {
        Vec2 {
            x: self.px(self.metrics.padding + 18.0),
            y: top + self.px(52.0),
        }
    }

    /// The day card's `+` button.
    pub fn add_button(&self, top: f32) -> Rect {
        let pad = self.px(self.metrics.padding);
        Rect::new(
            self.viewport.width - pad - self.px(42.0),
            top + self.px(self.metrics.card_h) / 2.0 - self.px(18.0),
            self.px(42.0),
            self.px(36.0),
        )
    }

    pub fn checkbox(&self, top: f32) -> Rect {
        let s = self.px(self.metrics.checkbox);
        Rect::new(self.px(self.metrics.padding + 16.0), top + self.px(18.0), s, s)
    }

    /// Left edge shared by the title, meta line and first chip.
    fn text_x(&self) -> f32 {
        self.px(self.metrics.padding + self.metrics.checkbox + 28.0)
    }

    pub fn title_origin(&self, top: f32) -> Vec2 {
        Vec2 {
            x: self.text_x(),
            y: top + self.px(28.0),
        }
    }

    pub fn meta_origin(&self, top: f32) -> Vec2 {
        Vec2 {
            x: self.text_x(),
            y: top + self.px(52.0),
        }
    }

    pub fn thumb(&self, top: f32) -> Rect {
        let t = self.px(self.metrics.thumb);
        let pad = self.px(self.metrics.padding);
        Rect::new(
            self.viewport.width - pad - t,
            top + (self.px(self.metrics.card_h) - t) / 2.0,
            t,
            t,
        )
    }

    /// `Edit`, `Drag` and `•••` chips, left to right.
    pub fn chips(&self, top: f32, measure: &dyn TextMeasure) -> SmallVec<[(ChipAction, Rect); 3]> {
        let chip_y = top + self.px(self.metrics.card_h - 16.0);
        let mut x = self.text_x();
        let mut out = SmallVec::new();
        for action in ChipAction::ALL {
            let w = measure.width(action.label(), self.px(CHIP_LABEL_SIZE), true) + self.px(18.0);
            out.push((action, Rect::new(x, chip_y - self.px(20.0), w, self.px(24.0))));
            x += w + self.px(8.0);
        }
        out
    }

    pub fn button(&self, action: ButtonAction) -> Rect {
        match action {
            ButtonAction::AddPreset => self.add_preset,
            ButtonAction::AddCustom => self.add_custom,
        }
    }

    // Fixed chrome, independent of scrolling.

    pub fn tab_bar(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport.width, self.px(self.metrics.tab_h))
    }

    pub fn sub_header(&self) -> Rect {
        Rect::new(
            0.0,
            self.px(self.metrics.tab_h),
            self.viewport.width,
            self.px(self.metrics.header_h),
        )
    }

    /// Visual pill of each week tab. Hit regions span the full bar height
    /// over the same horizontal extent.
    pub fn tab_pills(&self, count: usize, measure: &dyn TextMeasure) -> Vec<Rect> {
        let bar_h = self.px(self.metrics.tab_h);
        let pill_h = bar_h - self.px(18.0);
        let mut x = self.px(16.0);
        (0..count)
            .map(|i| {
                let label = tab_label(i);
                let w = measure.width(&label, self.px(TAB_LABEL_SIZE), true) + self.px(28.0);
                let r = Rect::new(x, (bar_h - pill_h) / 2.0, w, pill_h);
                x += w + self.px(10.0);
                r
            })
            .collect()
    }

    pub fn tab_hit(&self, pill: Rect) -> Rect {
        Rect::new(pill.x, 0.0, pill.w, self.px(self.metrics.tab_h))
    }

    /// Rename-week button, bottom right.
    pub fn fab_rename(&self) -> Rect {
        let d = 2.0 * self.px(self.metrics.fab_r);
        let pad = self.px(self.metrics.padding);
        Rect::new(
            self.viewport.width - pad - d,
            self.viewport.height - pad - d,
            d,
            d,
        )
    }

    /// Scroll-to-top button, stacked above the rename button.
    pub fn fab_scroll_top(&self) -> Rect {
        let r = self.fab_rename();
        r.translate(0.0, -(r.h + self.px(12.0)))
    }
}

pub fn tab_label(week: usize) -> String {
    format!("W{}", week + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ApproxMeasure;
    use gymplan_model::Item;

    fn week_with(counts: [usize; 7]) -> Week {
        let mut w = Week::new(0);
        for (d, n) in counts.into_iter().enumerate() {
            for _ in 0..n {
                w.days[d].items.push(Item::blank());
            }
        }
        w
    }

    #[test]
    fn rows_are_one_slot_apart() {
        let m = Metrics::default();
        let l = ListLayout::compute(&week_with([2, 0, 1, 0, 0, 0, 0]), Viewport::default(), &m, 0.0);
        assert_eq!(l.rows.len(), 10);
        for pair in l.rows.windows(2) {
            assert_eq!(pair[1].top - pair[0].top, m.slot());
        }
        assert_eq!(l.rows[0].top, m.tab_h + m.header_h + m.padding);
        assert_eq!(l.rows[1].kind, RowKind::Item { day: 0, index: 0 });
        assert_eq!(l.rows[3].kind, RowKind::Day { day: 1 });
    }

    #[test]
    fn content_height_ignores_offset() {
        let m = Metrics::default();
        let w = week_with([3, 1, 0, 0, 0, 0, 2]);
        let a = ListLayout::compute(&w, Viewport::default(), &m, 0.0);
        let b = ListLayout::compute(&w, Viewport::default(), &m, 420.0);
        assert_eq!(a.content_height(), b.content_height());
        assert_eq!(a.rows[4].top - 420.0, b.rows[4].top);
        assert!(a.content_height() > 13.0 * m.slot());
    }

    #[test]
    fn content_covers_controls() {
        let m = Metrics::default();
        let l = ListLayout::compute(&Week::new(0), Viewport::default(), &m, 0.0);
        let origin = l.rows[0].top - m.padding;
        assert!(origin + l.content_height() >= l.add_custom.bottom());
        assert!(origin + l.content_height() >= l.status.y);
    }

    #[test]
    fn geometry_scales() {
        let m = Metrics::default();
        let one = ListLayout::compute(&Week::new(0), Viewport::new(390.0, 844.0, 1.0), &m, 0.0);
        let two = ListLayout::compute(&Week::new(0), Viewport::new(780.0, 1688.0, 2.0), &m, 0.0);
        assert_eq!(two.slot(), one.slot() * 2.0);
        assert_eq!(two.content_height(), one.content_height() * 2.0);
        let (a, b) = (one.add_button(one.rows[0].top), two.add_button(two.rows[0].top));
        assert_eq!(b.x, a.x * 2.0);
        assert_eq!(b.w, a.w * 2.0);
    }

    #[test]
    fn chips_and_tabs_do_not_overlap() {
        let l = ListLayout::compute(&Week::new(0), Viewport::default(), &Metrics::default(), 0.0);
        let chips = l.chips(200.0, &ApproxMeasure);
        assert_eq!(chips.len(), 3);
        for pair in chips.windows(2) {
            assert!(pair[0].1.right() < pair[1].1.x);
        }
        let pills = l.tab_pills(8, &ApproxMeasure);
        for pair in pills.windows(2) {
            assert!(pair[0].right() < pair[1].x);
        }
    }

    #[test]
    fn fabs_stack_bottom_right() {
        let l = ListLayout::compute(&Week::new(0), Viewport::default(), &Metrics::default(), 0.0);
        let (rename, top) = (l.fab_rename(), l.fab_scroll_top());
        assert_eq!(rename.right(), 390.0 - 14.0);
        assert_eq!(rename.bottom(), 844.0 - 14.0);
        assert_eq!(top.bottom() + 12.0, rename.y);
    }
}
