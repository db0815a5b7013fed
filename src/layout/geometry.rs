//! Monitor geometry: bounding box, canvas size and the primary-monitor offset.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while turning a monitor enumeration into a canvas layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("no monitors were enumerated")]
    NoMonitors,

    #[error("monitor {index} has invalid size {width}x{height}")]
    InvalidMonitor { index: usize, width: i32, height: i32 },

    #[error(
        "desktop spans {width}x{height} pixels, more than the {} pixel limit per side",
        MAX_CANVAS_DIMENSION
    )]
    CanvasTooLarge { width: i64, height: i64 },
}

/// Largest canvas side; cairo image surfaces cannot be bigger.
pub const MAX_CANVAS_DIMENSION: i32 = 32767;

/// A monitor rectangle in virtual-desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default, rename = "primary")]
    pub is_primary: bool,
}

impl Monitor {
    pub fn new(x: i32, y: i32, width: i32, height: i32, is_primary: bool) -> Self {
        Self {
            x,
            y,
            width,
            height,
            is_primary,
        }
    }
}

impl fmt::Display for Monitor {
    /// Formats as `WxH+X+Y`, with a trailing `*` for the primary monitor.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}{:+}{:+}", self.width, self.height, self.x, self.y)?;
        if self.is_primary {
            write!(f, "*")?;
        }
        Ok(())
    }
}

impl FromStr for Monitor {
    type Err = String;

    /// Parses X11-style geometry: `1920x1080+0+0`, `1280x1024-1280+0*`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (body, is_primary) = match s.strip_suffix('*') {
            Some(rest) => (rest, true),
            None => (s, false),
        };

        let invalid = || format!("invalid monitor geometry '{s}', expected WxH+X+Y[*]");

        let (width, rest) = body.split_once('x').ok_or_else(invalid)?;
        let sign_at = rest
            .find(['+', '-'])
            .ok_or_else(invalid)?;
        let (height, offsets) = rest.split_at(sign_at);
        let second = offsets[1..]
            .find(['+', '-'])
            .map(|i| i + 1)
            .ok_or_else(invalid)?;
        let (x, y) = offsets.split_at(second);

        let parse = |v: &str| v.parse::<i32>().map_err(|_| invalid());
        let monitor = Monitor::new(
            parse(x.trim_start_matches('+'))?,
            parse(y.trim_start_matches('+'))?,
            parse(width)?,
            parse(height)?,
            is_primary,
        );
        if monitor.width <= 0 || monitor.height <= 0 {
            return Err(invalid());
        }
        Ok(monitor)
    }
}

/// Minimal rectangle enclosing every monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }
}

/// Which way the OS vertical axis grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAxis {
    /// y grows downward from the top edge (Windows, X11, Wayland).
    TopDown,
    /// y grows upward from the bottom edge (macOS/Quartz global space).
    BottomUp,
}

impl VerticalAxis {
    /// The axis convention of the platform this binary was built for.
    pub fn native() -> Self {
        if cfg!(target_os = "macos") {
            VerticalAxis::BottomUp
        } else {
            VerticalAxis::TopDown
        }
    }
}

/// Translation from pointer-hook coordinates into canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

/// Absolute pointer position as delivered by the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Canvas origin and size for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasGeometry {
    /// Virtual-desktop coordinate of the canvas' top-left pixel.
    pub origin: (i32, i32),
    pub width: u32,
    pub height: u32,
}

/// Immutable per-session layout passed to every draw call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub monitors: Vec<Monitor>,
    pub bounds: Bounds,
    pub geometry: CanvasGeometry,
    pub offset: Offset,
    pub axis: VerticalAxis,
}

impl SessionContext {
    /// Computes the canvas layout once for a session.
    pub fn new(monitors: Vec<Monitor>, axis: VerticalAxis) -> Result<Self, LayoutError> {
        let bounds = compute_bounding_box(&monitors)?;
        let (width, height) = canvas_size(&bounds);
        let offset = primary_offset(&monitors, &bounds, axis);

        for (index, monitor) in monitors.iter().enumerate() {
            let (ox, oy) = monitor_origin(monitor, &bounds, axis);
            debug!(
                "monitor{} size ({}, {}), location ({}, {}), primary: {}, canvas origin ({}, {})",
                index,
                monitor.width,
                monitor.height,
                monitor.x,
                monitor.y,
                monitor.is_primary,
                ox,
                oy
            );
        }

        Ok(Self {
            monitors,
            bounds,
            geometry: CanvasGeometry {
                origin: (bounds.min_x, bounds.min_y),
                width,
                height,
            },
            offset,
            axis,
        })
    }

    /// Maps a raw pointer position into canvas pixels.
    pub fn to_canvas(&self, position: Position) -> (i32, i32) {
        (
            position.x.saturating_add(self.offset.dx),
            position.y.saturating_add(self.offset.dy),
        )
    }
}

/// Scans all monitors for the enclosing rectangle.
///
/// Fails for an empty list, for monitors with a non-positive size or whose far
/// edge overflows `i32`, and when the box exceeds [`MAX_CANVAS_DIMENSION`].
pub fn compute_bounding_box(monitors: &[Monitor]) -> Result<Bounds, LayoutError> {
    if monitors.is_empty() {
        return Err(LayoutError::NoMonitors);
    }

    let mut bounds: Option<Bounds> = None;
    for (index, monitor) in monitors.iter().enumerate() {
        let invalid = || LayoutError::InvalidMonitor {
            index,
            width: monitor.width,
            height: monitor.height,
        };
        if monitor.width <= 0 || monitor.height <= 0 {
            return Err(invalid());
        }
        let max_x = monitor.x.checked_add(monitor.width).ok_or_else(invalid)?;
        let max_y = monitor.y.checked_add(monitor.height).ok_or_else(invalid)?;

        bounds = Some(match bounds {
            None => Bounds {
                min_x: monitor.x,
                min_y: monitor.y,
                max_x,
                max_y,
            },
            Some(acc) => Bounds {
                min_x: acc.min_x.min(monitor.x),
                min_y: acc.min_y.min(monitor.y),
                max_x: acc.max_x.max(max_x),
                max_y: acc.max_y.max(max_y),
            },
        });
    }

    let bounds = bounds.ok_or(LayoutError::NoMonitors)?;
    let width = bounds.max_x as i64 - bounds.min_x as i64;
    let height = bounds.max_y as i64 - bounds.min_y as i64;
    let limit = MAX_CANVAS_DIMENSION as i64;
    if width > limit || height > limit {
        return Err(LayoutError::CanvasTooLarge { width, height });
    }
    Ok(bounds)
}

/// Canvas dimensions spanned by the bounding box.
pub fn canvas_size(bounds: &Bounds) -> (u32, u32) {
    (bounds.width().max(0) as u32, bounds.height().max(0) as u32)
}

/// Picks the primary monitor.
///
/// The first monitor flagged primary wins. If none is flagged, the first
/// enumerated monitor stands in. Returns `None` only for an empty slice.
pub fn select_primary(monitors: &[Monitor]) -> Option<&Monitor> {
    let flagged = monitors.iter().filter(|m| m.is_primary).count();
    match flagged {
        0 => {
            if !monitors.is_empty() {
                warn!("No monitor is flagged primary; using the first one");
            }
            monitors.first()
        }
        1 => monitors.iter().find(|m| m.is_primary),
        n => {
            warn!("{} monitors are flagged primary; using the first of them", n);
            monitors.iter().find(|m| m.is_primary)
        }
    }
}

/// Top-left pixel of `monitor` inside the canvas.
pub fn monitor_origin(monitor: &Monitor, bounds: &Bounds, axis: VerticalAxis) -> (i32, i32) {
    let x = monitor.x - bounds.min_x;
    let y = match axis {
        VerticalAxis::TopDown => monitor.y - bounds.min_y,
        VerticalAxis::BottomUp => bounds.height() - (monitor.y - bounds.min_y) - monitor.height,
    };
    (x, y)
}

/// Offset that maps primary-monitor-relative pointer samples into canvas space.
pub fn primary_offset(monitors: &[Monitor], bounds: &Bounds, axis: VerticalAxis) -> Offset {
    select_primary(monitors)
        .map(|primary| {
            let (dx, dy) = monitor_origin(primary, bounds, axis);
            Offset { dx, dy }
        })
        .unwrap_or_default()
}
