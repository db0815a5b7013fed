//! Configuration type definitions.

use super::enums::{AxisSetting, ColorSpec};
use crate::layout::Monitor;
use crate::track::settings::{DEFAULT_OPACITY, DEFAULT_WIDTH};
use serde::{Deserialize, Serialize};

/// Motion stroke settings.
///
/// Numeric fields are read as wide signed integers so that out-of-range values
/// are clamped instead of failing to parse.
///
/// `opacity` and `width` are the initial values of the live knobs; they can
/// still be changed while a session runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrokeConfig {
    /// Record pointer motion as strokes
    #[serde(default = "default_true")]
    pub track_moves: bool,

    /// Stroke opacity in percent (valid range: 1 - 100)
    #[serde(default = "default_opacity")]
    pub opacity: i64,

    /// Stroke width in pixels (valid range: 1 - 25)
    #[serde(default = "default_width")]
    pub width: i64,

    /// Pause between render batches in milliseconds (valid range: 1 - 1000)
    #[serde(default = "default_render_interval_ms")]
    pub render_interval_ms: i64,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            track_moves: true,
            opacity: default_opacity(),
            width: default_width(),
            render_interval_ms: default_render_interval_ms(),
        }
    }
}

/// Click marker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Record left-button presses
    #[serde(default = "default_true")]
    pub left: bool,

    /// Record right-button presses
    #[serde(default = "default_true")]
    pub right: bool,

    /// Record middle-button presses
    #[serde(default = "default_true")]
    pub middle: bool,

    /// Marker radius in pixels (valid range: 1 - 100)
    #[serde(default = "default_radius")]
    pub radius: i64,

    /// Left-click marker color
    #[serde(default = "default_left_color")]
    pub left_color: ColorSpec,

    /// Right-click marker color
    #[serde(default = "default_right_color")]
    pub right_color: ColorSpec,

    /// Middle-click marker color
    #[serde(default = "default_middle_color")]
    pub middle_color: ColorSpec,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            left: true,
            right: true,
            middle: true,
            radius: default_radius(),
            left_color: default_left_color(),
            right_color: default_right_color(),
            middle_color: default_middle_color(),
        }
    }
}

/// Snapshot output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for `mouse_track-*.png` files; `~/` is expanded.
    /// Defaults to `<Pictures>/mousetrack`.
    #[serde(default)]
    pub directory: Option<String>,

    /// Create the directory if it is missing
    #[serde(default = "default_true")]
    pub create_dir: bool,

    /// Reset the canvas after each successful save
    #[serde(default = "default_true")]
    pub clean_after_save: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            create_dir: true,
            clean_after_save: true,
        }
    }
}

/// Monitor layout settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Vertical axis convention of pointer coordinates
    #[serde(default)]
    pub vertical_axis: AxisSetting,

    /// Static monitor layout, used when monitors are not enumerated live
    #[serde(default)]
    pub monitors: Vec<Monitor>,
}

/// Canvas background (desktop map) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundConfig {
    /// Canvas fill color
    #[serde(default = "default_fill")]
    pub fill: ColorSpec,

    /// Monitor outline color
    #[serde(default = "default_border")]
    pub border: ColorSpec,

    /// Monitor outline width in pixels (valid range: 0 - 16)
    #[serde(default = "default_border_width")]
    pub border_width: i64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            fill: default_fill(),
            border: default_border(),
            border_width: default_border_width(),
        }
    }
}

/// Live capture settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Pointer polling interval in milliseconds (valid range: 1 - 100)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: i64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_opacity() -> i64 {
    DEFAULT_OPACITY.into()
}

fn default_width() -> i64 {
    DEFAULT_WIDTH.into()
}

fn default_render_interval_ms() -> i64 {
    10
}

fn default_radius() -> i64 {
    crate::track::DEFAULT_MARKER_RADIUS.into()
}

fn default_left_color() -> ColorSpec {
    ColorSpec::Rgba([0, 255, 0, 100])
}

fn default_right_color() -> ColorSpec {
    ColorSpec::Rgba([255, 0, 0, 100])
}

fn default_middle_color() -> ColorSpec {
    ColorSpec::Rgba([255, 255, 0, 100])
}

fn default_fill() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_border() -> ColorSpec {
    ColorSpec::Rgb([64, 64, 64])
}

fn default_border_width() -> i64 {
    1
}

fn default_poll_interval_ms() -> i64 {
    8
}
