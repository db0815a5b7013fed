//! Pointer tracking: live settings, the stroke pipeline, click markers and
//! the session controller.
//!
//! Three execution contexts meet here:
//! - the capture context calling [`Tracker::on_move`] / [`Tracker::on_click`]
//! - one render thread per session draining the stroke queue
//! - the controller issuing start/stop/save and flipping [`LiveSettings`]

pub mod markers;
pub mod pipeline;
pub mod session;
pub mod settings;


pub use markers::{DEFAULT_MARKER_RADIUS, MarkerPalette, MarkerSink};
pub use pipeline::{DEFAULT_RENDER_INTERVAL, StrokePipeline};
pub use session::{Session, SessionError, SessionOptions, Tracker};
pub use settings::{LiveSettings, opacity_to_alpha};
