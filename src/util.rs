//! Integer geometry helpers shared by the layout and drawing code.

/// Axis-aligned rectangle in pixel coordinates (inclusive min, exclusive max).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle. Width/height must be positive.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// Builds a rectangle from min/max bounds (inclusive min, exclusive max).
    ///
    /// Returns `None` when the extent does not fit in an `i32`.
    pub fn from_min_max(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Option<Self> {
        let width = max_x.checked_sub(min_x)?;
        let height = max_y.checked_sub(min_y)?;
        Self::new(min_x, min_y, width, height)
    }

    /// Builds the bounding rectangle of a segment stroked with `half_width` padding.
    ///
    /// The padding is rounded up and one extra pixel is added on every side so
    /// antialiased edges are never cut off.
    pub fn around_segment(start: (i32, i32), end: (i32, i32), half_width: f64) -> Option<Self> {
        let pad = (half_width.ceil() as i32).saturating_add(1);
        Self::from_min_max(
            start.0.min(end.0).saturating_sub(pad),
            start.1.min(end.1).saturating_sub(pad),
            start.0.max(end.0).saturating_add(pad + 1),
            start.1.max(end.1).saturating_add(pad + 1),
        )
    }

    pub fn max_x(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn max_y(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Returns the overlapping area of two rectangles, if any.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        Self::from_min_max(
            self.x.max(other.x),
            self.y.max(other.y),
            self.max_x().min(other.max_x()),
            self.max_y().min(other.max_y()),
        )
    }

    /// Clamps the rectangle to a `width` x `height` surface anchored at the origin.
    pub fn clip_to(&self, width: i32, height: i32) -> Option<Rect> {
        Rect::new(0, 0, width, height).and_then(|bounds| self.intersect(&bounds))
    }
}
