//! Property tests for plan mutations and persistence.
//!
//! 1. `reorder_items` is a permutation of the day, for any `from`/`to`
//! 2. A valid move lands the item at the clamped target, others keep order
//! 3. `save` then `load` returns the same plan

use gymplan_model::*;
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn sets_strategy() -> impl Strategy<Value = SetCount> {
    prop_oneof![
        (1u32..20).prop_map(SetCount::from),
        "[A-Za-z -]{0,8}".prop_map(SetCount::Text),
    ]
}

fn image_strategy() -> impl Strategy<Value = Option<ImageRef>> {
    prop_oneof![
        Just(None),
        prop::sample::select(ICON_KEYS.to_vec()).prop_map(|k| Some(ImageRef::Preset(k.to_string()))),
    ]
}

#[derive(Debug, Clone)]
struct Placed {
    week: usize,
    day: usize,
    item: Item,
    done: bool,
    blob: Option<String>,
}

fn placed_strategy() -> impl Strategy<Value = Placed> {
    (
        0..MAX_WEEKS,
        0usize..7,
        "[A-Za-z ]{1,12}",
        sets_strategy(),
        "[0-9x-]{0,6}",
        "[a-z0-9 ]{0,6}",
        "[a-z ]{0,10}",
        image_strategy(),
        any::<bool>(),
        prop::option::of("[A-Za-z0-9+/]{4,16}"),
    )
        .prop_map(|(week, day, title, sets, reps, weight, notes, image, done, blob)| {
            let mut item = Item::new(title, sets, reps);
            item.weight = weight;
            item.notes = notes;
            item.image = image;
            Placed {
                week,
                day,
                item,
                done,
                blob: blob.map(|b| format!("data:image/png;base64,{b}")),
            }
        })
}

fn plan_strategy() -> impl Strategy<Value = Plan> {
    (
        any::<u64>(),
        prop::collection::vec(placed_strategy(), 0..24),
        prop::collection::vec("[A-Za-z0-9 ]{1,10}", MAX_WEEKS),
    )
        .prop_map(|(seed, placed, names)| {
            let mut ids = IdGen::seeded(seed);
            let mut plan = Plan::new_default();
            for (week, name) in plan.weeks.iter_mut().zip(names) {
                week.name = name;
            }
            for p in placed {
                let id = plan
                    .push_item(p.week, p.day, p.item, &mut ids)
                    .expect("slot exists");
                if p.done {
                    plan.toggle_completion(&id);
                }
                if let Some(blob) = p.blob {
                    plan.attach_stored_image(&id, blob, &mut ids);
                }
            }
            plan
        })
}

fn day_ids(plan: &Plan) -> Vec<String> {
    plan.weeks[0].days[0].items.iter().map(|i| i.id.clone()).collect()
}

fn monday_of(len: usize, seed: u64) -> Plan {
    let mut ids = IdGen::seeded(seed);
    let mut plan = Plan::new_default();
    for i in 0..len {
        plan.push_item(0, 0, Item::new(format!("Lift {i}"), 3, "10"), &mut ids)
            .expect("monday exists");
    }
    plan
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn reorder_is_a_permutation(len in 0usize..12, from in 0usize..14, to in 0usize..14, seed in any::<u64>()) {
        let mut plan = monday_of(len, seed);
        let before = day_ids(&plan);

        let changed = plan.reorder_items(0, 0, from, to);
        let after = day_ids(&plan);

        let mut a = before.clone();
        let mut b = after.clone();
        a.sort();
        b.sort();
        prop_assert_eq!(a, b);
        prop_assert_eq!(changed, before != after);

        if from < len {
            let target = to.min(len - 1);
            prop_assert_eq!(&after[target], &before[from]);
            let rest_before: Vec<_> = before.iter().filter(|id| **id != before[from]).collect();
            let rest_after: Vec<_> = after.iter().filter(|id| **id != before[from]).collect();
            prop_assert_eq!(rest_before, rest_after);
        } else {
            prop_assert!(!changed);
        }
    }

    #[test]
    fn save_then_load_round_trips(plan in plan_strategy()) {
        let mut store = PlanStore::in_memory();
        store.save(&plan).expect("save");
        prop_assert_eq!(store.load(), Some(plan));
    }

    #[test]
    fn file_store_round_trips(plan in plan_strategy()) {
        let dir = tempfile::tempdir().expect("tempdir");
        PlanStore::new(FileStore::new(dir.path())).save(&plan).expect("save");
        let loaded = PlanStore::new(FileStore::new(dir.path())).load();
        prop_assert_eq!(loaded, Some(plan));
    }
}
