use std::sync::Arc;
use std::time::Duration;

use gymplan_core::{PointerEvent, Rect, SceneNode, Vec2};
use gymplan_model::{FileStore, IdGen, ImageRef, Item, Plan, PlanStore};
use gymplan_ui::*;

fn options(seed: u64) -> PlannerOptions {
    PlannerOptions {
        ids: IdGen::seeded(seed),
        ..PlannerOptions::default()
    }
}

/// Plan with the given titles on Monday of week 1, saved under `dir`.
fn seed_store(dir: &std::path::Path, titles: &[&str]) -> Vec<String> {
    let mut ids = IdGen::seeded(99);
    let mut plan = Plan::new_default();
    let out = titles
        .iter()
        .map(|t| plan.push_item(0, 0, Item::new(*t, 3, "10"), &mut ids).expect("push"))
        .collect();
    PlanStore::new(FileStore::new(dir)).save(&plan).expect("save");
    out
}

fn open(dir: &std::path::Path) -> Planner {
    Planner::with_options(PlanStore::new(FileStore::new(dir)), options(1))
}

fn monday_titles(plan: &Plan) -> Vec<String> {
    plan.weeks[0].days[0].items.iter().map(|i| i.title.clone()).collect()
}

fn hit_rect(p: &Planner, want: &Hit) -> Rect {
    p.hits()
        .iter()
        .find(|h| &h.payload == want)
        .map(|h| h.rect)
        .unwrap_or_else(|| panic!("no hit region for {want:?}"))
}

fn tap(p: &mut Planner, at: Vec2) -> bool {
    let a = p.pointer_down(&PointerEvent::down(at.x, at.y));
    let b = p.pointer_up(&PointerEvent::up(at.x, at.y));
    a || b
}

fn chip(p: &Planner, day: usize, item: usize, action: ChipAction) -> Vec2 {
    p.hits()
        .iter()
        .find(|h| matches!(h.payload, Hit::Chip { day: d, item: i, action: a, .. } if d == day && i == item && a == action))
        .map(|h| h.rect.center())
        .expect("chip")
}

#[test]
fn drag_by_two_point_four_slots_moves_first_to_last() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_store(dir.path(), &["A", "B", "C"]);
    let mut p = open(dir.path());

    let slot = p.layout().slot();
    let grab = chip(&p, 0, 0, ChipAction::Drag);
    assert!(p.pointer_down(&PointerEvent::down(grab.x, grab.y)));
    assert!(p.drag().is_dragging());
    assert!(p.pointer_move(&PointerEvent::moved(grab.x, grab.y + 2.4 * slot)));
    assert!(p.pointer_up(&PointerEvent::up(grab.x, grab.y + 2.4 * slot)));

    assert!(!p.drag().is_dragging());
    assert_eq!(monday_titles(p.plan()), ["B", "C", "A"]);

    let reloaded = PlanStore::new(FileStore::new(dir.path())).load().expect("load");
    assert_eq!(monday_titles(&reloaded), ["B", "C", "A"]);
}

#[test]
fn short_drag_snaps_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_store(dir.path(), &["A", "B", "C"]);
    let mut p = open(dir.path());

    let slot = p.layout().slot();
    let grab = chip(&p, 0, 1, ChipAction::Drag);
    p.pointer_down(&PointerEvent::down(grab.x, grab.y));
    p.pointer_move(&PointerEvent::moved(grab.x, grab.y - 0.4 * slot));
    assert!(p.pointer_up(&PointerEvent::up(grab.x, grab.y - 0.4 * slot)));
    assert_eq!(monday_titles(p.plan()), ["A", "B", "C"]);
}

#[test]
fn drag_ghost_follows_pointer_without_hit_region() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_store(dir.path(), &["A", "B"]);
    let mut p = open(dir.path());
    let regions = p.hits().len();

    let grab = chip(&p, 0, 0, ChipAction::Drag);
    p.pointer_down(&PointerEvent::down(grab.x, grab.y));
    p.pointer_move(&PointerEvent::moved(grab.x, grab.y + 30.0));

    let borders = p
        .scene()
        .nodes
        .iter()
        .filter(|n| matches!(n, SceneNode::Border { .. }))
        .count();
    assert_eq!(borders, 1);
    assert_eq!(p.hits().len(), regions);

    p.pointer_cancel(&PointerEvent::up(grab.x, grab.y + 30.0));
    assert!(!p.drag().is_dragging());
    assert_eq!(monday_titles(p.plan()), ["A", "B"]);
}

#[test]
fn scroll_offset_stays_in_bounds() {
    let dir = tempfile::tempdir().expect("tempdir");
    let titles: Vec<String> = (0..20).map(|i| format!("Ex {i}")).collect();
    let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
    seed_store(dir.path(), &refs);
    let mut p = open(dir.path());

    let (content, viewport) = (p.layout().content_height(), p.layout().viewport_height());
    assert!(content > viewport);
    p.wheel(1.0e9);
    assert_eq!(p.scroll_offset(), content - viewport);

    // The last control is reachable once scrolled to the end.
    let custom = hit_rect(&p, &Hit::Button(ButtonAction::AddCustom));
    assert!(custom.bottom() <= p.layout().content.bottom());

    p.wheel(-1.0e9);
    assert_eq!(p.scroll_offset(), 0.0);

    // Switching week resets the offset.
    p.wheel(300.0);
    let tab = hit_rect(&p, &Hit::WeekTab(1));
    tap(&mut p, tab.center());
    assert_eq!(p.active_week(), 1);
    assert_eq!(p.scroll_offset(), 0.0);
}

#[test]
fn offset_reclamps_when_viewport_grows() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_store(dir.path(), &["A", "B", "C", "D"]);
    let mut p = open(dir.path());
    p.wheel(1.0e9);
    assert!(p.scroll_offset() > 0.0);

    p.resize(gymplan_core::Viewport::new(390.0, 4000.0, 1.0));
    assert_eq!(p.scroll_offset(), 0.0);
}

#[test]
fn painted_rects_match_hit_regions() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_store(dir.path(), &["A", "B"]);
    let p = open(dir.path());
    let painted: Vec<Rect> = p
        .scene()
        .nodes
        .iter()
        .filter_map(|n| match n {
            SceneNode::Rect { rect, .. } => Some(*rect),
            _ => None,
        })
        .collect();

    let content = p.layout().content;
    for region in p.hits().iter() {
        match region.payload {
            // Tabs react over the full bar height, wider than the pill.
            Hit::WeekTab(_) => assert!(painted.iter().any(|r| r.x == region.rect.x && r.w == region.rect.w)),
            Hit::ScrollTop | Hit::RenameWeek => assert!(painted.contains(&region.rect)),
            _ => {
                let full = painted.iter().any(|r| *r == region.rect);
                let clipped = painted
                    .iter()
                    .any(|r| r.intersect(&content) == Some(region.rect));
                assert!(full || clipped, "{:?} has no painted counterpart", region.payload);
                assert!(region.rect.y >= content.y && region.rect.bottom() <= content.bottom());
            }
        }
    }
}

#[test]
fn resolve_is_idempotent_between_frames() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_store(dir.path(), &["A"]);
    let p = open(dir.path());
    for y in (0..844).step_by(7) {
        let at = Vec2 { x: 180.0, y: y as f32 };
        assert_eq!(p.hits().resolve(at), p.hits().resolve(at));
    }
}

#[test]
fn cancelled_edit_changes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_store(dir.path(), &["A"]);
    let mut p = open(dir.path());
    let before = p.plan().clone();

    let edit = chip(&p, 0, 0, ChipAction::Edit);
    assert!(!tap(&mut p, edit));
    assert_eq!(p.prompt().map(|q| q.message), Some("Exercise name:".to_string()));
    p.answer(Some("Renamed".into()));
    p.answer(Some("5".into()));

    // Input is ignored while the dialog waits.
    let toggle = p.hits().iter().find(|h| matches!(h.payload, Hit::Toggle { .. })).map(|h| h.rect.center()).expect("toggle");
    assert!(!p.pointer_down(&PointerEvent::down(toggle.x, toggle.y)));
    assert!(!p.wheel(100.0));

    assert!(!p.answer(None));
    assert!(!p.has_dialog());
    assert_eq!(p.plan(), &before);
    let stored = PlanStore::new(FileStore::new(dir.path())).load().expect("load");
    assert_eq!(stored, before);
}

#[test]
fn edit_applies_after_last_answer() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ids = seed_store(dir.path(), &["A"]);
    let mut p = open(dir.path());

    let edit = chip(&p, 0, 0, ChipAction::Edit);
    tap(&mut p, edit);
    let mut dialog = Scripted::new([Some("Deadlift"), Some("5"), Some("3"), Some("140kg"), Some("belt")]);
    assert!(p.run_dialog(&mut dialog));
    assert_eq!(dialog.asked().len(), 5);
    assert_eq!(dialog.asked()[1].default, "3");

    let item = p.plan().item(&ids[0]).expect("item");
    assert_eq!(item.title, "Deadlift");
    assert_eq!(item.sets, gymplan_model::SetCount::Count(5.0));
    assert_eq!(item.meta_line(), "5 sets × 3  •  140kg  •  belt");
    assert!(p.scene().texts().any(|t| t == "Deadlift"));
}

#[test]
fn preset_picker_adds_three_items_to_monday() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut p = open(dir.path());
    let button = hit_rect(&p, &Hit::Button(ButtonAction::AddPreset));
    tap(&mut p, button.center());
    assert!(p.has_dialog());
    assert!(p.answer(Some("1 1".into())));

    let monday = &p.plan().weeks[0].days[0];
    assert_eq!(monday.items.len(), 3);
    for item in &monday.items {
        assert_eq!(item.image, Some(ImageRef::Preset("biceps".into())));
        assert!(item.weight.is_empty() && item.notes.is_empty());
        assert!(item.has_id());
    }
    assert_eq!(monday.items[0].title, "Bench Press");
}

#[test]
fn custom_exercise_lands_on_chosen_day() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut p = open(dir.path());
    let button = hit_rect(&p, &Hit::Button(ButtonAction::AddCustom));
    tap(&mut p, button.center());
    let mut dialog = Scripted::new([Some("3"), Some("Curl"), Some("4"), Some("12")]);
    assert!(p.run_dialog(&mut dialog));
    let wed = &p.plan().weeks[0].days[2];
    assert_eq!(wed.items.len(), 1);
    assert_eq!(wed.items[0].reps, "12");
}

#[test]
fn plus_button_and_toggle() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut p = open(dir.path());
    let plus = hit_rect(&p, &Hit::AddItem { day: 4 });
    assert!(tap(&mut p, plus.center()));
    let fri = &p.plan().weeks[0].days[4];
    assert_eq!(fri.items.len(), 1);
    let id = fri.items[0].id.clone();
    assert_eq!(fri.items[0].title, "New Exercise");

    let toggle = hit_rect(&p, &Hit::Toggle { id: id.clone() });
    assert!(tap(&mut p, toggle.center()));
    assert!(p.plan().is_completed(&id));
    let toggle = hit_rect(&p, &Hit::Toggle { id: id.clone() });
    assert!(tap(&mut p, toggle.center()));
    assert!(!p.plan().is_completed(&id));
}

#[test]
fn rename_week_requires_a_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut p = open(dir.path());
    let fab = hit_rect(&p, &Hit::RenameWeek);

    tap(&mut p, fab.center());
    assert_eq!(p.prompt().map(|q| q.default), Some("Week 1".to_string()));
    assert!(!p.answer(Some(String::new())));
    assert_eq!(p.plan().weeks[0].name, "Week 1");

    tap(&mut p, fab.center());
    assert!(p.answer(Some("Deload".into())));
    assert_eq!(p.plan().weeks[0].name, "Deload");
    assert!(p.scene().texts().any(|t| t == "Deload"));
}

#[test]
fn clearing_image_keeps_stored_blob() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ids = seed_store(dir.path(), &["A"]);
    let mut p = open(dir.path());

    let thumb = hit_rect(&p, &Hit::Image { day: 0, item: 0 });
    tap(&mut p, thumb.center());
    let mut dialog = Scripted::new([Some("1"), Some("legs")]);
    assert!(p.run_dialog(&mut dialog));
    assert_eq!(p.plan().item(&ids[0]).and_then(|i| i.preset_key()), Some("legs"));

    // Give the item a stored image too, then clear it.
    let mut plan = p.plan().clone();
    let store_id = plan
        .attach_stored_image(&ids[0], "data:image/png;base64,AAAA".into(), &mut IdGen::seeded(5))
        .expect("attach");
    PlanStore::new(FileStore::new(dir.path())).save(&plan).expect("save");
    let mut p = open(dir.path());

    let menu = chip(&p, 0, 0, ChipAction::Menu);
    tap(&mut p, menu);
    let mut dialog = Scripted::new([Some("1"), Some("4")]);
    assert!(p.run_dialog(&mut dialog));

    let item = p.plan().item(&ids[0]).expect("item");
    assert_eq!(item.image, None);
    assert!(p.plan().images.contains_key(&store_id));
}

struct OnePixel;

impl Fetch for OnePixel {
    fn fetch(&self, _url: &str) -> Result<Vec<u8>, ImageError> {
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([1, 2, 3, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img).write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)?;
        Ok(buf)
    }
}

#[test]
fn url_image_is_attached_as_stored_blob() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ids = seed_store(dir.path(), &["A"]);
    let mut p = Planner::with_options(
        PlanStore::new(FileStore::new(dir.path())),
        PlannerOptions {
            fetch: Arc::new(OnePixel),
            ..options(3)
        },
    );

    let thumb = hit_rect(&p, &Hit::Image { day: 0, item: 0 });
    tap(&mut p, thumb.center());
    // Acquisition is asynchronous: nothing changes when the dialog ends.
    assert!(!p.run_dialog(&mut Scripted::new([Some("2"), Some("https://example.com/a.png")])));
    assert_eq!(p.plan().item(&ids[0]).and_then(|i| i.store_id()), None);

    assert!(p.settle_images(Duration::from_secs(10)));
    let store_id = p
        .plan()
        .item(&ids[0])
        .and_then(|i| i.store_id())
        .expect("stored image")
        .to_string();
    assert!(p.plan().images[&store_id].starts_with("data:image/png;base64,"));

    // The decoded thumbnail is painted in the thumb slot.
    let thumb = p.layout().thumb(p.layout().item_row_top(0, 0).expect("row"));
    assert!(p.scene().nodes.iter().any(|n| matches!(n, SceneNode::Image { rect, .. } if *rect == thumb)));

    let reloaded = PlanStore::new(FileStore::new(dir.path())).load().expect("load");
    assert_eq!(reloaded.images.len(), 1);
}

#[test]
fn failed_url_leaves_item_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ids = seed_store(dir.path(), &["A"]);
    let mut p = open(dir.path());
    let thumb = hit_rect(&p, &Hit::Image { day: 0, item: 0 });
    tap(&mut p, thumb.center());
    p.run_dialog(&mut Scripted::new([Some("2"), Some("https://example.com/a.png")]));
    p.settle_images(Duration::from_secs(10));
    assert_eq!(p.plan().item(&ids[0]).and_then(|i| i.image.clone()), None);
    assert!(p.plan().images.is_empty());
}

#[test]
fn delete_from_item_menu() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ids = seed_store(dir.path(), &["A", "B"]);
    let mut p = open(dir.path());
    let menu = chip(&p, 0, 0, ChipAction::Menu);
    tap(&mut p, menu);
    assert!(p.answer(Some("2".into())));
    assert_eq!(monday_titles(p.plan()), ["B"]);
    assert!(p.plan().item(&ids[0]).is_none());
}

#[test]
fn hit_layout_of_empty_week() {
    let dir = tempfile::tempdir().expect("tempdir");
    let p = open(dir.path());
    let summary: Vec<String> = p
        .hits()
        .iter()
        .map(|h| match &h.payload {
            Hit::WeekTab(i) => format!("tab {i}"),
            Hit::AddItem { day } => format!("add {day}"),
            Hit::Button(b) => format!("button {}", b.label()),
            other => format!("{other:?}"),
        })
        .collect();
    insta::assert_snapshot!(summary.join("\n"), @r"
    tab 0
    tab 1
    tab 2
    tab 3
    tab 4
    tab 5
    tab 6
    tab 7
    add 0
    add 1
    add 2
    add 3
    add 4
    add 5
    add 6
    button Add preset to selected day
    button Add custom exercise to selected day
    ScrollTop
    RenameWeek
    ");
}
