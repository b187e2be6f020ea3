//! Property tests for scrolling and drag quantisation.
//!
//! 1. The scroll offset stays inside `[0, max(0, content - viewport)]`
//! 2. Wheel input through the planner respects the same bounds
//! 3. `reorder_target` always names a different, in-range row

use gymplan_core::Viewport;
use gymplan_model::{IdGen, Item, Plan, PlanStore};
use gymplan_ui::*;
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn delta_strategy() -> impl Strategy<Value = f32> {
    prop_oneof![
        8 => -5000.0f32..5000.0,
        1 => Just(f32::NAN),
        1 => Just(f32::INFINITY),
        1 => Just(f32::NEG_INFINITY),
    ]
}

fn planner_with(per_day: &[usize], height: f32) -> Planner {
    let mut ids = IdGen::seeded(5);
    let mut plan = Plan::new_default();
    for (day, &n) in per_day.iter().enumerate() {
        for i in 0..n {
            plan.push_item(0, day, Item::new(format!("Lift {i}"), 3, "10"), &mut ids)
                .expect("day exists");
        }
    }
    let mut store = PlanStore::in_memory();
    store.save(&plan).expect("save");
    let opts = PlannerOptions {
        ids: IdGen::seeded(6),
        viewport: Viewport::new(400.0, height, 1.0),
        ..PlannerOptions::default()
    };
    Planner::with_options(store, opts)
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn offset_stays_in_bounds(
        content in 0.0f32..20_000.0,
        viewport in 1.0f32..4_000.0,
        deltas in prop::collection::vec(delta_strategy(), 1..40),
    ) {
        let mut s = ScrollController::new();
        let max = ScrollController::max_offset(content, viewport);
        for d in deltas {
            let before = s.offset();
            let leftover = s.scroll_by(d, content, viewport);
            prop_assert!(s.offset() >= 0.0 && s.offset() <= max);
            if d.is_finite() {
                // Leftover never points against the input.
                prop_assert!(
                    leftover * d >= 0.0 || leftover.abs() < 0.01,
                    "delta {} leftover {}",
                    d,
                    leftover
                );
                prop_assert!(leftover.abs() <= d.abs() + 0.01);
            } else {
                prop_assert_eq!(s.offset(), before);
                prop_assert_eq!(leftover, 0.0);
            }
        }
    }

    #[test]
    fn planner_wheel_stays_in_bounds(
        per_day in prop::collection::vec(0usize..5, 7),
        height in 200.0f32..1600.0,
        deltas in prop::collection::vec(-3000.0f32..3000.0, 1..20),
    ) {
        let mut p = planner_with(&per_day, height);
        for d in deltas {
            p.wheel(d);
            let layout = p.layout();
            let max = ScrollController::max_offset(layout.content_height(), layout.viewport_height());
            prop_assert!(p.scroll_offset() >= 0.0);
            prop_assert!(p.scroll_offset() <= max + 1e-3);
        }
    }

    #[test]
    fn reorder_target_in_range(
        count in 0usize..12,
        from in 0usize..14,
        delta in -3000.0f32..3000.0,
        slot in 1.0f32..200.0,
    ) {
        match reorder_target(from, delta, slot, count) {
            Some(to) => {
                prop_assert!(to < count);
                prop_assert_ne!(to, from);
            }
            None => {
                let moved = (delta / slot).round() as i64;
                let clamped = (from as i64 + moved).clamp(0, count.max(1) as i64 - 1);
                prop_assert!(count < 2 || from >= count || clamped == from as i64);
            }
        }
    }
}
