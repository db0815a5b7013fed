//! Canvas background: a map of the desktop with one outlined tile per monitor.

use super::geometry::{Bounds, Monitor, VerticalAxis, canvas_size, monitor_origin};
use crate::draw::{Color, Raster, color};
use crate::util::Rect;

/// Colors used to paint the desktop map underneath the strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundStyle {
    /// Fill for the whole canvas and every monitor tile
    pub fill: Color,
    /// Outline color drawn along each monitor's edges
    pub border: Color,
    /// Outline thickness in pixels (0 disables outlines)
    pub border_width: u32,
}

impl Default for BackgroundStyle {
    fn default() -> Self {
        Self {
            fill: color::BLACK,
            border: color::OUTLINE_GREY,
            border_width: 1,
        }
    }
}

/// Builds the background raster for the given layout.
///
/// Areas of the bounding box not covered by any monitor keep the fill color.
pub fn background(
    monitors: &[Monitor],
    bounds: &Bounds,
    axis: VerticalAxis,
    style: &BackgroundStyle,
) -> Raster {
    let (width, height) = canvas_size(bounds);
    let mut raster = Raster::new(width, height, style.fill);

    for monitor in monitors {
        let (x, y) = monitor_origin(monitor, bounds, axis);
        let Some(tile) = Rect::new(x, y, monitor.width, monitor.height) else {
            continue;
        };
        raster.fill_rect(tile, style.fill);
        raster.outline_rect(tile, style.border, style.border_width);
    }

    raster
}
