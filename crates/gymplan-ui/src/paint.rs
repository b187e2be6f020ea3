//! Frame painting.
//!
//! [`render`] turns the plan into a [`Scene`] and, in the same walk, fills
//! the hit registry with exactly the rectangles it painted. Geometry comes
//! from [`ListLayout`]; this module only decides colors, text and order.
//!
//! Paint order is hit priority: the tab bar, the scrolling list, then the
//! floating buttons, so the floating buttons win wherever they overlap rows.

use gymplan_core::{
    Color, FontWeight, HitRegistry, Rect, Scene, SceneNode, TextAlign, Theme, Vec2, Viewport,
};
use gymplan_model::{Item, Plan, Week};

use crate::drag::DragState;
use crate::images::ImageCache;
use crate::layout::{
    ButtonAction, CHIP_LABEL_SIZE, ChipAction, ListLayout, RowKind, TAB_LABEL_SIZE, tab_label,
};
use crate::metrics::{Metrics, TextMeasure};

/// Payload of a hit region.
#[derive(Clone, Debug, PartialEq)]
pub enum Hit {
    WeekTab(usize),
    AddItem {
        day: usize,
    },
    Toggle {
        id: String,
    },
    Image {
        day: usize,
        item: usize,
    },
    Chip {
        day: usize,
        item: usize,
        action: ChipAction,
        /// Painted top of the row, captured for drag activation.
        row_top: f32,
    },
    Button(ButtonAction),
    ScrollTop,
    RenameWeek,
}

/// Everything a frame is computed from.
pub struct FrameInput<'a> {
    pub plan: &'a Plan,
    pub active_week: usize,
    pub scroll_offset: f32,
    pub viewport: Viewport,
    pub metrics: &'a Metrics,
    pub theme: &'a Theme,
    pub drag: &'a DragState,
    pub measure: &'a dyn TextMeasure,
}

pub const STATUS_TEXT: &str = "Saved automatically";
pub const DAY_HINT: &str = "Tap + to add below";

struct Painter<'a> {
    scene: Scene,
    hits: &'a mut HitRegistry<Hit>,
    theme: &'a Theme,
    layout: &'a ListLayout,
}

impl Painter<'_> {
    fn px(&self, v: f32) -> f32 {
        self.layout.px(v)
    }

    fn rect(&mut self, rect: Rect, color: Color, radius: f32) {
        self.scene.push(SceneNode::Rect {
            rect,
            color,
            radius,
        });
    }

    fn card(&mut self, rect: Rect, color: Color, radius: f32) {
        let shadow = rect.translate(0.0, self.px(4.0));
        self.rect(shadow, self.theme.shadow, radius);
        self.rect(rect, color, radius);
    }

    fn text(&mut self, text: impl Into<String>, origin: Vec2, size: f32, color: Color, weight: FontWeight, align: TextAlign) {
        self.scene.push(SceneNode::Text {
            origin,
            text: text.into(),
            color,
            size: self.px(size),
            weight,
            align,
        });
    }

    /// Registers a region inside the scrolling area.
    fn hit_content(&mut self, rect: Rect, hit: Hit) {
        self.hits.register_clipped(rect, self.layout.content, hit);
    }
}

/// Paints one frame. `hits` is cleared and refilled; thumbnails that are
/// not cached yet are requested from `images` and left blank.
pub fn render(
    input: &FrameInput<'_>,
    images: &mut ImageCache,
    hits: &mut HitRegistry<Hit>,
) -> (Scene, ListLayout) {
    hits.clear();
    let empty;
    let week = match input.plan.week(input.active_week) {
        Some(w) => w,
        None => {
            log::warn!("active week {} out of range", input.active_week);
            empty = Week::new(input.active_week);
            &empty
        }
    };
    let layout = ListLayout::compute(week, input.viewport, input.metrics, input.scroll_offset);
    let theme = input.theme;

    let mut p = Painter {
        scene: Scene {
            clear_color: theme.background,
            nodes: Vec::new(),
        },
        hits,
        theme,
        layout: &layout,
    };
    p.rect(input.viewport.bounds(), theme.background, 0.0);

    paint_tabs(&mut p, input);
    paint_sub_header(&mut p, &week.name);

    p.scene.push(SceneNode::PushClip {
        rect: layout.content,
    });
    for row in &layout.rows {
        if !layout.is_row_visible(row.top) {
            continue;
        }
        match row.kind {
            RowKind::Day { day } => {
                let label = week.days.get(day).map_or("", |d| d.label.label());
                paint_day(&mut p, day, label, row.top);
            }
            RowKind::Item { day, index } => {
                if let Some(item) = week.days.get(day).and_then(|d| d.items.get(index)) {
                    paint_item(&mut p, input, images, day, index, item, row.top);
                }
            }
        }
    }
    for action in [ButtonAction::AddPreset, ButtonAction::AddCustom] {
        paint_button(&mut p, action);
    }
    p.text(
        STATUS_TEXT,
        layout.status,
        12.0,
        theme.text_dim,
        FontWeight::Medium,
        TextAlign::Left,
    );
    if let Some(s) = input.drag.session() {
        let ghost = layout.card(s.current_y);
        let r = p.px(input.metrics.card_r);
        p.rect(ghost, theme.accent.mul_alpha(0.15), r);
        p.scene.push(SceneNode::Border {
            rect: ghost,
            color: theme.accent,
            width: p.px(2.0),
            radius: r,
        });
    }
    p.scene.push(SceneNode::PopClip);

    paint_fab(&mut p, layout.fab_scroll_top(), "⇧", Hit::ScrollTop);
    paint_fab(&mut p, layout.fab_rename(), "✎", Hit::RenameWeek);

    log::trace!(
        "frame: {} nodes, {} hit regions, content {}",
        p.scene.len(),
        p.hits.len(),
        layout.content_height()
    );
    let scene = p.scene;
    (scene, layout)
}

fn paint_tabs(p: &mut Painter<'_>, input: &FrameInput<'_>) {
    let bar = p.layout.tab_bar();
    p.card(bar, p.theme.panel, 0.0);
    let pills = p.layout.tab_pills(input.plan.weeks.len(), input.measure);
    for (i, pill) in pills.into_iter().enumerate() {
        let fill = if i == input.active_week {
            p.theme.accent
        } else {
            p.theme.accent_soft
        };
        p.rect(pill, fill, pill.h / 2.0);
        let origin = Vec2 {
            x: pill.center().x,
            y: bar.h / 2.0 + p.px(5.0),
        };
        p.text(tab_label(i), origin, TAB_LABEL_SIZE, p.theme.text, FontWeight::Bold, TextAlign::Center);
        let hit = p.layout.tab_hit(pill);
        p.hits.register(hit, Hit::WeekTab(i));
    }
}

fn paint_sub_header(p: &mut Painter<'_>, name: &str) {
    let strip = p.layout.sub_header();
    p.rect(strip, p.theme.panel, 0.0);
    let origin = Vec2 {
        x: p.px(16.0),
        y: strip.bottom() - p.px(4.0),
    };
    p.text(name, origin, 13.0, p.theme.text_dim, FontWeight::Medium, TextAlign::Left);
}

fn paint_day(p: &mut Painter<'_>, day: usize, label: &str, top: f32) {
    let card = p.layout.card(top);
    let r = p.px(p.layout.metrics().card_r);
    p.card(card, p.theme.card, r);
    p.text(label, p.layout.day_label_origin(top), 20.0, p.theme.text, FontWeight::Bold, TextAlign::Left);
    p.text(DAY_HINT, p.layout.day_hint_origin(top), 12.0, p.theme.text_dim, FontWeight::Regular, TextAlign::Left);

    let b = p.layout.add_button(top);
    p.rect(b, p.theme.accent, p.px(12.0));
    let origin = Vec2 {
        x: b.x + p.px(21.0),
        y: b.y + p.px(24.0),
    };
    p.text("+", origin, 24.0, p.theme.text, FontWeight::Bold, TextAlign::Center);
    p.hit_content(b, Hit::AddItem { day });
}

fn paint_item(
    p: &mut Painter<'_>,
    input: &FrameInput<'_>,
    images: &mut ImageCache,
    day: usize,
    index: usize,
    item: &Item,
    top: f32,
) {
    let card = p.layout.card(top);
    let r = p.px(p.layout.metrics().card_r);
    p.card(card, p.theme.card, r);

    let cb = p.layout.checkbox(top);
    let done = input.plan.is_completed(&item.id);
    p.rect(cb, if done { p.theme.success } else { p.theme.panel }, p.px(6.0));
    if done {
        let origin = Vec2 {
            x: cb.center().x,
            y: cb.y + cb.h * 0.78,
        };
        p.text("✓", origin, 20.0, p.theme.background, FontWeight::Bold, TextAlign::Center);
    }
    p.hit_content(cb, Hit::Toggle { id: item.id.clone() });

    p.text(item.display_title(), p.layout.title_origin(top), 18.0, p.theme.text, FontWeight::Bold, TextAlign::Left);
    p.text(item.meta_line(), p.layout.meta_origin(top), 12.0, p.theme.text_dim, FontWeight::Regular, TextAlign::Left);

    let thumb = p.layout.thumb(top);
    let tr = p.px(10.0);
    p.rect(thumb, p.theme.panel, tr);
    if let Some(key) = &item.image {
        match images.get(key) {
            Some(image) => p.scene.push(SceneNode::Image {
                rect: thumb,
                image,
                radius: tr,
            }),
            None => {
                let blob = item.store_id().and_then(|id| input.plan.image_blob(id));
                images.request(key, blob);
            }
        }
    }
    p.hit_content(thumb, Hit::Image { day, item: index });

    for (action, rect) in p.layout.chips(top, input.measure) {
        p.rect(rect, p.theme.accent_soft, p.px(8.0));
        let origin = Vec2 {
            x: rect.center().x,
            y: rect.y + p.px(16.0),
        };
        p.text(action.label(), origin, CHIP_LABEL_SIZE, p.theme.text, FontWeight::Bold, TextAlign::Center);
        p.hit_content(
            rect,
            Hit::Chip {
                day,
                item: index,
                action,
                row_top: top,
            },
        );
    }
}

fn paint_button(p: &mut Painter<'_>, action: ButtonAction) {
    let rect = p.layout.button(action);
    p.card(rect, p.theme.accent, p.px(12.0));
    let origin = Vec2 {
        x: rect.center().x,
        y: rect.center().y + p.px(6.0),
    };
    p.text(action.label(), origin, 16.0, p.theme.text, FontWeight::Bold, TextAlign::Center);
    p.hit_content(rect, Hit::Button(action));
}

fn paint_fab(p: &mut Painter<'_>, rect: Rect, glyph: &str, hit: Hit) {
    p.rect(rect, p.theme.accent, rect.w / 2.0);
    let origin = Vec2 {
        x: rect.center().x,
        y: rect.center().y + p.px(6.0),
    };
    p.text(glyph, origin, 18.0, p.theme.text, FontWeight::Bold, TextAlign::Center);
    p.hits.register(rect, hit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ApproxMeasure;
    use gymplan_model::IdGen;

    fn frame(plan: &Plan, offset: f32) -> (Scene, ListLayout, HitRegistry<Hit>) {
        let mut hits = HitRegistry::new();
        let mut images = ImageCache::default();
        let input = FrameInput {
            plan,
            active_week: 0,
            scroll_offset: offset,
            viewport: Viewport::default(),
            metrics: &Metrics::default(),
            theme: &Theme::default(),
            drag: &DragState::Idle,
            measure: &ApproxMeasure,
        };
        let (scene, layout) = render(&input, &mut images, &mut hits);
        (scene, layout, hits)
    }

    #[test]
    fn empty_week_has_tabs_days_and_controls() {
        let (scene, _, hits) = frame(&Plan::new_default(), 0.0);
        let texts: Vec<_> = scene.texts().collect();
        assert!(texts.starts_with(&["W1", "W2"]));
        assert!(texts.contains(&"Week 1"));
        assert!(texts.contains(&"Mon"));
        assert!(texts.contains(&STATUS_TEXT));

        let tabs = hits.iter().filter(|h| matches!(h.payload, Hit::WeekTab(_))).count();
        assert_eq!(tabs, 8);
        assert!(hits.iter().any(|h| h.payload == Hit::RenameWeek));
    }

    #[test]
    fn item_row_registers_every_control() {
        let mut plan = Plan::new_default();
        let id = plan
            .push_item(0, 0, Item::blank(), &mut IdGen::seeded(1))
            .expect("push");
        let (_, layout, hits) = frame(&plan, 0.0);
        let top = layout.item_row_top(0, 0).expect("row");

        let cb = layout.checkbox(top);
        assert_eq!(hits.resolve(cb.center()), Some(&Hit::Toggle { id }));
        assert_eq!(
            hits.resolve(layout.thumb(top).center()),
            Some(&Hit::Image { day: 0, item: 0 })
        );
        let chips = layout.chips(top, &ApproxMeasure);
        assert_eq!(
            hits.resolve(chips[1].1.center()),
            Some(&Hit::Chip {
                day: 0,
                item: 0,
                action: ChipAction::Drag,
                row_top: top
            })
        );
    }

    #[test]
    fn scrolled_away_rows_are_not_clickable() {
        let (_, layout, hits) = frame(&Plan::new_default(), 60.0);
        let top = layout.day_row_top(0).expect("monday");
        let plus = layout.add_button(top);
        // Monday's `+` now sits partly under the header.
        assert!(plus.y < layout.content.y);
        let region = hits
            .iter()
            .find(|h| h.payload == Hit::AddItem { day: 0 })
            .expect("still partly visible");
        assert!(region.rect.y >= layout.content.y);
        // Below the tab bar, above the clip: painted but not clickable.
        assert_eq!(hits.resolve(Vec2 { x: plus.center().x, y: plus.y + 5.0 }), None);
    }

    #[test]
    fn completed_item_shows_tick() {
        let mut plan = Plan::new_default();
        let id = plan
            .push_item(0, 0, Item::blank(), &mut IdGen::seeded(1))
            .expect("push");
        plan.toggle_completion(&id);
        let (scene, _, _) = frame(&plan, 0.0);
        assert!(scene.texts().any(|t| t == "✓"));
    }
}
