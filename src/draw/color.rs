//! RGBA color type and predefined color constants.

use serde::{Deserialize, Serialize};

/// Represents an RGBA color with 8-bit integer components.
///
/// All components are in the range 0 (minimum) to 255 (maximum). The alpha
/// channel is the compositing opacity, not a 0.0-1.0 float.
///
/// # Examples
///
/// ```
/// use mousetrack::draw::Color;
/// let red = Color::new(255, 0, 0, 255);
/// let faint_white = Color::new(255, 255, 255, 50);
/// assert_eq!(red.with_alpha(50).a, faint_white.a);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Color {
    /// Red component
    pub r: u8,
    /// Green component
    pub g: u8,
    /// Blue component
    pub b: u8,
    /// Opacity (0 = fully transparent, 255 = fully opaque)
    pub a: u8,
}

impl Color {
    /// Creates a new color from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the same color with a different opacity.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Components as Cairo expects them (0.0 - 1.0 floats).
    pub fn to_cairo_rgba(self) -> (f64, f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.a as f64 / 255.0,
        )
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Color> for [u8; 4] {
    fn from(color: Color) -> Self {
        [color.r, color.g, color.b, color.a]
    }
}

// ============================================================================
// Predefined Color Constants
// ============================================================================

/// Opaque black, the canvas fill.
pub const BLACK: Color = Color::new(0, 0, 0, 255);

/// Opaque white, the base stroke color before the opacity knob is applied.
pub const WHITE: Color = Color::new(255, 255, 255, 255);

/// Dark grey used for the monitor outlines.
pub const OUTLINE_GREY: Color = Color::new(64, 64, 64, 255);

/// Fully transparent color, the overlay fill.
pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

/// Default left-click marker (translucent green)
pub const LEFT_MARKER: Color = Color::new(0, 255, 0, 100);

/// Default right-click marker (translucent red)
pub const RIGHT_MARKER: Color = Color::new(255, 0, 0, 100);

/// Default middle-click marker (translucent yellow)
pub const MIDDLE_MARKER: Color = Color::new(255, 255, 0, 100);

/// Maps a color name (case-insensitive) to an opaque [`Color`].
pub fn name_to_color(name: &str) -> Option<Color> {
    let color = match name.to_lowercase().as_str() {
        "black" => BLACK,
        "white" => WHITE,
        "grey" | "gray" => OUTLINE_GREY,
        "red" => Color::new(255, 0, 0, 255),
        "green" => Color::new(0, 255, 0, 255),
        "blue" => Color::new(0, 0, 255, 255),
        "yellow" => Color::new(255, 255, 0, 255),
        _ => return None,
    };
    Some(color)
}
