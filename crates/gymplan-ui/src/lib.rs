//! # Planner surface
//!
//! Layout, paint, hit-testing, scrolling and drag-reorder for the gym
//! planner, driven by raw pointer events.
//!
//! The [`Planner`] owns the plan. Each mutation is saved and followed by a
//! full repaint: [`paint::render`] walks the active week once through a
//! [`ListLayout`], producing the [`Scene`](gymplan_core::Scene) and the hit
//! regions for the next event from the same numbers.
//!
//! ```rust
//! use gymplan_core::PointerEvent;
//! use gymplan_model::PlanStore;
//! use gymplan_ui::{Hit, Planner};
//!
//! let mut planner = Planner::new(PlanStore::in_memory());
//!
//! // Tap Monday's `+` button.
//! let plus = planner
//!     .hits()
//!     .iter()
//!     .find(|h| h.payload == Hit::AddItem { day: 0 })
//!     .map(|h| h.rect.center())
//!     .unwrap();
//! assert!(planner.pointer_down(&PointerEvent::down(plus.x, plus.y)));
//! planner.pointer_up(&PointerEvent::up(plus.x, plus.y));
//!
//! assert_eq!(planner.plan().weeks[0].days[0].items[0].title, "New Exercise");
//! ```
//!
//! Dialogs are request/response: a tap that needs text input opens a flow,
//! [`Planner::prompt`] returns the question and [`Planner::answer`] feeds the
//! reply back. Hosts with a blocking input source use
//! [`Planner::run_dialog`] instead.

pub mod dialog;
pub mod dispatch;
pub mod drag;
pub mod icons;
pub mod images;
pub mod layout;
pub mod metrics;
pub mod paint;
pub mod planner;
pub mod scroll;

pub use dialog::{Dialog, DialogFlow, Effect, FlowKind, Prompt, Scripted, Step};
pub use drag::{DragSession, DragState, reorder_target};
pub use images::{Fetch, ImageCache, ImageError, ImageSource, Offline};
pub use layout::{ButtonAction, ChipAction, ListLayout, Row, RowKind};
pub use metrics::{ApproxMeasure, Metrics, TextMeasure};
pub use paint::{FrameInput, Hit};
pub use planner::{Planner, PlannerOptions};
pub use scroll::ScrollController;
