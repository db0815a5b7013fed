//! Live knobs shared between the controller, capture and render contexts.
//!
//! Every field is an atomic cell: readers never see a torn value, and no
//! further ordering is promised. Draws use whatever value is current when a
//! segment is flushed, not when its samples were captured.

use crate::input::MouseButton;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

pub const OPACITY_RANGE: std::ops::RangeInclusive<u8> = 1..=100;
pub const WIDTH_RANGE: std::ops::RangeInclusive<u32> = 1..=25;

pub const DEFAULT_OPACITY: u8 = 20;
pub const DEFAULT_WIDTH: u32 = 2;

/// Recording toggles and stroke appearance, mutable at any time.
#[derive(Debug)]
pub struct LiveSettings {
    move_enabled: AtomicBool,
    left_enabled: AtomicBool,
    right_enabled: AtomicBool,
    middle_enabled: AtomicBool,
    opacity: AtomicU8,
    width: AtomicU32,
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self::new(DEFAULT_OPACITY, DEFAULT_WIDTH)
    }
}

impl LiveSettings {
    /// All channels enabled, with the given stroke opacity (percent) and width.
    pub fn new(opacity_percent: u8, width: u32) -> Self {
        let settings = Self {
            move_enabled: AtomicBool::new(true),
            left_enabled: AtomicBool::new(true),
            right_enabled: AtomicBool::new(true),
            middle_enabled: AtomicBool::new(true),
            opacity: AtomicU8::new(DEFAULT_OPACITY),
            width: AtomicU32::new(DEFAULT_WIDTH),
        };
        settings.set_opacity(opacity_percent);
        settings.set_width(width);
        settings
    }

    pub fn move_enabled(&self) -> bool {
        self.move_enabled.load(Ordering::SeqCst)
    }

    pub fn set_move_enabled(&self, enabled: bool) {
        self.move_enabled.store(enabled, Ordering::SeqCst);
    }

    fn click_cell(&self, button: MouseButton) -> &AtomicBool {
        match button {
            MouseButton::Left => &self.left_enabled,
            MouseButton::Right => &self.right_enabled,
            MouseButton::Middle => &self.middle_enabled,
        }
    }

    pub fn click_enabled(&self, button: MouseButton) -> bool {
        self.click_cell(button).load(Ordering::SeqCst)
    }

    pub fn set_click_enabled(&self, button: MouseButton, enabled: bool) {
        self.click_cell(button).store(enabled, Ordering::SeqCst);
    }

    /// Stroke opacity in percent (1 - 100).
    pub fn opacity(&self) -> u8 {
        self.opacity.load(Ordering::SeqCst)
    }

    /// Sets the stroke opacity, clamped to 1 - 100 percent.
    pub fn set_opacity(&self, percent: u8) {
        let clamped = percent.clamp(*OPACITY_RANGE.start(), *OPACITY_RANGE.end());
        self.opacity.store(clamped, Ordering::SeqCst);
    }

    /// Stroke opacity mapped onto the 0 - 255 alpha scale.
    pub fn stroke_alpha(&self) -> u8 {
        opacity_to_alpha(self.opacity())
    }

    /// Stroke width in pixels (1 - 25).
    pub fn width(&self) -> u32 {
        self.width.load(Ordering::SeqCst)
    }

    /// Sets the stroke width, clamped to 1 - 25 pixels.
    pub fn set_width(&self, width: u32) {
        let clamped = width.clamp(*WIDTH_RANGE.start(), *WIDTH_RANGE.end());
        self.width.store(clamped, Ordering::SeqCst);
    }
}

/// Maps a 0 - 100 percentage onto 0 - 255, rounding to nearest.
pub fn opacity_to_alpha(percent: u8) -> u8 {
    ((percent.min(100) as u32 * 255 + 50) / 100) as u8
}
