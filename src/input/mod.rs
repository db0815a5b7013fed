//! Pointer input sources.
//!
//! Every source delivers [`PointerEvent`]s to a [`Tracker`](crate::track::Tracker):
//! - [`replay`]: a line-oriented event script (file or stdin)
//! - `live` (cargo feature `live`): polls the system pointer

pub mod events;
#[cfg(all(feature = "live", unix))]
pub mod live;
pub mod replay;

// Re-export commonly used types at module level
pub use events::{MouseButton, PointerEvent};
