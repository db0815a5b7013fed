//! Configuration enum types.

use crate::draw::{Color, color};
use crate::layout::VerticalAxis;
use log::warn;
use serde::{Deserialize, Serialize};

/// Vertical axis convention for pointer coordinates.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AxisSetting {
    /// Follow the platform (bottom-up on macOS, top-down elsewhere)
    #[default]
    Auto,
    /// y grows downward
    TopDown,
    /// y grows upward
    BottomUp,
}

impl AxisSetting {
    pub fn resolve(self) -> VerticalAxis {
        match self {
            AxisSetting::Auto => VerticalAxis::native(),
            AxisSetting::TopDown => VerticalAxis::TopDown,
            AxisSetting::BottomUp => VerticalAxis::BottomUp,
        }
    }
}

/// Color specification - a named color, RGB or RGBA values.
///
/// # Examples
/// ```toml
/// # Named color (opaque)
/// fill = "black"
///
/// # Custom RGB color (0-255 per component, opaque)
/// border = [64, 64, 64]
///
/// # RGBA, alpha 0-255
/// left_color = [0, 255, 0, 100]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color: black, white, grey, red, green, blue, yellow
    Name(String),
    /// RGBA color as [red, green, blue, alpha]
    Rgba([u8; 4]),
    /// RGB color as [red, green, blue]
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`].
    ///
    /// Unknown color names fall back to `fallback` with a warning.
    pub fn to_color(&self, fallback: Color) -> Color {
        match self {
            ColorSpec::Name(name) => color::name_to_color(name).unwrap_or_else(|| {
                warn!("Unknown color '{}', using {:?}", name, fallback);
                fallback
            }),
            ColorSpec::Rgba([r, g, b, a]) => Color::new(*r, *g, *b, *a),
            ColorSpec::Rgb([r, g, b]) => Color::new(*r, *g, *b, 255),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_spec_variants_convert() {
        assert_eq!(
            ColorSpec::Name("White".into()).to_color(color::BLACK),
            color::WHITE
        );
        assert_eq!(
            ColorSpec::Name("chartreuse".into()).to_color(color::BLACK),
            color::BLACK
        );
        assert_eq!(
            ColorSpec::Rgb([1, 2, 3]).to_color(color::BLACK),
            Color::new(1, 2, 3, 255)
        );
        assert_eq!(
            ColorSpec::Rgba([1, 2, 3, 4]).to_color(color::BLACK),
            Color::new(1, 2, 3, 4)
        );
    }

    #[test]
    fn axis_setting_parses_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            axis: AxisSetting,
        }
        let parsed: Wrapper = toml::from_str("axis = \"bottom-up\"").unwrap();
        assert_eq!(parsed.axis.resolve(), VerticalAxis::BottomUp);
        assert_eq!(AxisSetting::TopDown.resolve(), VerticalAxis::TopDown);
    }
}
