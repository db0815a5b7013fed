//! Multi-monitor layout: unifies monitor geometries into one canvas space.
//!
//! The layout is computed once when a session starts and is read-only
//! afterwards. Every draw call receives it through [`SessionContext`].

pub mod background;
pub mod geometry;

pub use background::{BackgroundStyle, background};
pub use geometry::{
    Bounds, CanvasGeometry, LayoutError, Monitor, Offset, Position, SessionContext, VerticalAxis,
    canvas_size, compute_bounding_box, monitor_origin, primary_offset, select_primary,
};
