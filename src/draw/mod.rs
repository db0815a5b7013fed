//! Raster canvas and drawing primitives (Cairo-based).
//!
//! This module defines the core drawing types:
//! - [`Color`]: RGBA color with 8-bit channels and predefined constants
//! - [`Raster`]: owned pixel buffer with the source-over blend
//! - [`Compositor`]: the lock-guarded canvas that strokes and markers are drawn onto
//! - Cairo rasterization of stroke and marker overlays

pub mod color;
pub mod compositor;
pub mod raster;
pub mod render;

// Re-export commonly used types at module level
pub use color::Color;
pub use compositor::{Compositor, DrawTarget};
pub use raster::{Raster, blend_over};
pub use render::{Overlay, RenderError};
