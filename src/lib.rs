//! Library exports for reusing mousetrack subsystems.
//!
//! The binary is a thin CLI over these modules; integration tests and other
//! front-ends drive a [`Tracker`](track::Tracker) directly.

pub mod config;
pub mod draw;
pub mod input;
pub mod layout;
pub mod output;
pub mod track;
pub mod util;

pub use config::Config;
