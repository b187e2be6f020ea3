//! Plan data model and persistence.
//!
//! A [`Plan`] owns `MAX_WEEKS` weeks of seven fixed days, each day an ordered
//! list of [`Item`]s, plus a completion map and an image store. The order of
//! `Day::items` is the only ordering there is: display and drag-reorder both
//! read and write it directly.
//!
//! ```rust
//! use gymplan_model::*;
//!
//! let mut ids = IdGen::seeded(1);
//! let mut plan = Plan::new_default();
//! let id = plan.push_item(0, 0, Item::new("Bench Press", 4, "6–10"), &mut ids).unwrap();
//!
//! assert!(plan.toggle_completion(&id));
//! assert!(plan.is_completed(&id));
//!
//! let mut store = PlanStore::in_memory();
//! store.save(&plan).unwrap();
//! assert_eq!(store.load(), Some(plan));
//! ```

pub mod error;
pub mod ids;
pub mod item;
pub mod plan;
pub mod preset;
pub mod store;

pub use error::StoreError;
pub use ids::IdGen;
pub use item::{ImageRef, Item, SetCount};
pub use plan::{Day, ItemLocation, MAX_WEEKS, Plan, Week, Weekday};
pub use preset::{ICON_KEYS, PRESETS, Preset, PresetItem};
pub use store::{FileStore, KeyValueStore, MemoryStore, PlanStore, STORAGE_KEY};
