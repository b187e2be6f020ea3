//! # Frames, scenes and hit regions
//!
//! Gymplan renders in immediate mode: there is no retained widget tree. Each
//! frame produces two things from the same layout pass:
//!
//! - a [`Scene`], a flat display list of [`SceneNode`]s consumed by a
//!   [`RenderBackend`];
//! - a [`HitRegistry`], the ordered list of interactive rectangles used to
//!   resolve the *next* pointer event.
//!
//! ```rust
//! use gymplan_core::*;
//!
//! let mut hits = HitRegistry::new();
//! hits.clear();
//! hits.register(Rect { x: 0.0, y: 0.0, w: 100.0, h: 40.0 }, "row");
//! hits.register(Rect { x: 60.0, y: 10.0, w: 20.0, h: 20.0 }, "button");
//!
//! // Later registrations are painted on top and win.
//! assert_eq!(hits.resolve(Vec2 { x: 70.0, y: 20.0 }), Some(&"button"));
//! assert_eq!(hits.resolve(Vec2 { x: 10.0, y: 20.0 }), Some(&"row"));
//! assert_eq!(hits.resolve(Vec2 { x: 500.0, y: 20.0 }), None);
//! ```
//!
//! Everything is expressed in device pixels. Hosts translate raw input into
//! that space (see [`Viewport::scale`]) before handing it to the engine.

pub mod color;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod render_api;
pub mod theme;
pub mod view;

pub use color::*;
pub use geometry::*;
pub use hit::*;
pub use input::*;
pub use render_api::*;
pub use theme::*;
pub use view::*;
