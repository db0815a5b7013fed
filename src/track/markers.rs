//! Click-to-marker conversion.
//!
//! Clicks are rare compared to motion, so markers are drawn synchronously on
//! the capture context without any queueing.

use super::settings::LiveSettings;
use crate::draw::{Color, DrawTarget, color};
use crate::input::MouseButton;
use crate::layout::Position;
use std::sync::Arc;

pub const DEFAULT_MARKER_RADIUS: u32 = 10;

/// Marker color per mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerPalette {
    pub left: Color,
    pub right: Color,
    pub middle: Color,
}

impl Default for MarkerPalette {
    fn default() -> Self {
        Self {
            left: color::LEFT_MARKER,
            right: color::RIGHT_MARKER,
            middle: color::MIDDLE_MARKER,
        }
    }
}

impl MarkerPalette {
    pub fn color_for(&self, button: MouseButton) -> Color {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Right => self.right,
            MouseButton::Middle => self.middle,
        }
    }
}

pub struct MarkerSink {
    target: Arc<dyn DrawTarget>,
    settings: Arc<LiveSettings>,
    palette: MarkerPalette,
    radius: u32,
}

impl MarkerSink {
    pub fn new(
        target: Arc<dyn DrawTarget>,
        settings: Arc<LiveSettings>,
        palette: MarkerPalette,
        radius: u32,
    ) -> Self {
        Self {
            target,
            settings,
            palette,
            radius,
        }
    }

    /// Pointer-button callback. Returns whether a marker was drawn.
    ///
    /// Only presses of buttons whose recording toggle is on produce a marker.
    pub fn on_click(&self, x: i32, y: i32, button: MouseButton, pressed: bool) -> bool {
        if !pressed || !self.settings.click_enabled(button) {
            return false;
        }

        self.target.ellipse(
            Position::new(x, y),
            self.palette.color_for(button),
            self.radius,
        );
        true
    }
}
