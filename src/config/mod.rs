//! Configuration file support for mousetrack.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/mousetrack/config.toml`. Settings include stroke defaults,
//! click markers, the output directory and the monitor layout.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::{AxisSetting, ColorSpec};
pub use types::{
    BackgroundConfig, CaptureConfig, LayoutConfig, MarkerConfig, OutputConfig, StrokeConfig,
};

use crate::draw::color;
use crate::input::MouseButton;
use crate::layout::{BackgroundStyle, VerticalAxis};
use crate::output::{SaveTarget, default_output_dir, expand_tilde};
use crate::track::settings::{OPACITY_RANGE, WIDTH_RANGE};
use crate::track::{LiveSettings, MarkerPalette, SessionOptions};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [stroke]
/// opacity = 20
/// width = 2
///
/// [markers]
/// middle = false
/// radius = 12
///
/// [output]
/// directory = "~/Pictures/mousetrack"
///
/// [layout]
/// vertical_axis = "auto"
/// ```
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Motion stroke defaults (opacity, width, render pacing)
    #[serde(default)]
    pub stroke: StrokeConfig,

    /// Click marker settings
    #[serde(default)]
    pub markers: MarkerConfig,

    /// Snapshot output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Monitor layout settings
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Desktop map drawn under the strokes
    #[serde(default)]
    pub background: BackgroundConfig,

    /// Live pointer capture settings
    #[serde(default)]
    pub capture: CaptureConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `stroke.opacity`: 1 - 100
    /// - `stroke.width`: 1 - 25
    /// - `stroke.render_interval_ms`: 1 - 1000
    /// - `markers.radius`: 1 - 100
    /// - `background.border_width`: 0 - 16
    /// - `capture.poll_interval_ms`: 1 - 100
    fn validate_and_clamp(&mut self) {
        let opacity = (i64::from(*OPACITY_RANGE.start()), i64::from(*OPACITY_RANGE.end()));
        clamp_setting("stroke opacity", &mut self.stroke.opacity, opacity);

        let width = (i64::from(*WIDTH_RANGE.start()), i64::from(*WIDTH_RANGE.end()));
        clamp_setting("stroke width", &mut self.stroke.width, width);

        clamp_setting(
            "render_interval_ms",
            &mut self.stroke.render_interval_ms,
            (1, 1000),
        );
        clamp_setting("marker radius", &mut self.markers.radius, (1, 100));
        clamp_setting("border_width", &mut self.background.border_width, (0, 16));
        clamp_setting(
            "poll_interval_ms",
            &mut self.capture.poll_interval_ms,
            (1, 100),
        );

        // Non-positive sizes cannot be laid out
        let before = self.layout.monitors.len();
        self.layout
            .monitors
            .retain(|m| m.width > 0 && m.height > 0);
        if self.layout.monitors.len() != before {
            warn!(
                "Dropped {} monitor(s) with non-positive size from [layout]",
                before - self.layout.monitors.len()
            );
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/mousetrack/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("mousetrack");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path.
    ///
    /// Unlike [`Config::load`], a missing file is an error.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let config = Self::parse(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn parse(config_str: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(config_str)?;
        config.validate_and_clamp();
        Ok(config)
    }

    /// Saves the current configuration to `~/.config/mousetrack/config.toml`.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory cannot be created
    /// - The config cannot be serialized to TOML
    /// - The file cannot be written
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Serializes the config to `config_path`.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Writes the documented example config to the user's config directory.
    ///
    /// # Errors
    /// Returns an error if:
    /// - A config file already exists at the target path
    /// - The config directory cannot be created
    /// - The file cannot be written
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&config_path, EXAMPLE_CONFIG)?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }

    /// Initial values of the live knobs.
    pub fn live_settings(&self) -> LiveSettings {
        let settings = LiveSettings::new(self.stroke.opacity as u8, self.stroke.width as u32);
        settings.set_move_enabled(self.stroke.track_moves);
        settings.set_click_enabled(MouseButton::Left, self.markers.left);
        settings.set_click_enabled(MouseButton::Right, self.markers.right);
        settings.set_click_enabled(MouseButton::Middle, self.markers.middle);
        settings
    }

    /// Fixed drawing options for every session.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            background: BackgroundStyle {
                fill: self.background.fill.to_color(color::BLACK),
                border: self.background.border.to_color(color::OUTLINE_GREY),
                border_width: self.background.border_width as u32,
            },
            palette: MarkerPalette {
                left: self.markers.left_color.to_color(color::LEFT_MARKER),
                right: self.markers.right_color.to_color(color::RIGHT_MARKER),
                middle: self.markers.middle_color.to_color(color::MIDDLE_MARKER),
            },
            marker_radius: self.markers.radius as u32,
            render_interval: Duration::from_millis(self.stroke.render_interval_ms as u64),
        }
    }

    /// Where snapshots are written.
    pub fn save_target(&self) -> SaveTarget {
        SaveTarget {
            directory: self
                .output
                .directory
                .as_deref()
                .map(expand_tilde)
                .unwrap_or_else(default_output_dir),
            create_dir: self.output.create_dir,
            clean: self.output.clean_after_save,
        }
    }

    pub fn vertical_axis(&self) -> VerticalAxis {
        self.layout.vertical_axis.resolve()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.capture.poll_interval_ms as u64)
    }
}

/// Clamps `value` into `min..=max`, warning when it was out of range.
fn clamp_setting(name: &str, value: &mut i64, (min, max): (i64, i64)) {
    if !(min..=max).contains(value) {
        warn!(
            "Invalid {} {}, clamping to {}-{} range",
            name, value, min, max
        );
        *value = (*value).clamp(min, max);
    }
}

/// The documented example configuration shipped with the binary.
pub const EXAMPLE_CONFIG: &str = include_str!("../../config.example.toml");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Color;
    use crate::layout::Monitor;

    #[test]
    fn empty_document_yields_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.stroke.opacity, 20);
        assert_eq!(config.stroke.width, 2);
        assert!(config.stroke.track_moves);
        assert_eq!(config.markers.radius, 10);
        assert_eq!(config.capture.poll_interval_ms, 8);

        let options = config.session_options();
        assert_eq!(options.palette, MarkerPalette::default());
        assert_eq!(options.background, BackgroundStyle::default());
        assert_eq!(options.render_interval, Duration::from_millis(10));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = Config::parse(
            r#"
            [stroke]
            opacity = 0
            width = 90
            render_interval_ms = 0

            [markers]
            radius = 500

            [background]
            border_width = 40
            "#,
        )
        .unwrap();
        assert_eq!(config.stroke.opacity, 1);
        assert_eq!(config.stroke.width, 25);
        assert_eq!(config.stroke.render_interval_ms, 1);
        assert_eq!(config.markers.radius, 100);
        assert_eq!(config.background.border_width, 16);
    }

    #[test]
    fn values_outside_the_storage_type_are_clamped() {
        let config = Config::parse(
            r#"
            [stroke]
            opacity = 300
            width = -1

            [markers]
            radius = -5

            [capture]
            poll_interval_ms = 100000
            "#,
        )
        .unwrap();
        assert_eq!(config.stroke.opacity, 100);
        assert_eq!(config.stroke.width, 1);
        assert_eq!(config.markers.radius, 1);
        assert_eq!(config.capture.poll_interval_ms, 100);

        let settings = config.live_settings();
        assert_eq!(settings.opacity(), 100);
        assert_eq!(settings.width(), 1);
        assert_eq!(config.session_options().marker_radius, 1);
    }

    #[test]
    fn marker_toggles_and_colors_flow_into_settings() {
        let config = Config::parse(
            r#"
            [stroke]
            track_moves = false
            opacity = 50

            [markers]
            middle = false
            left_color = "blue"
            right_color = [10, 20, 30]
            "#,
        )
        .unwrap();

        let settings = config.live_settings();
        assert!(!settings.move_enabled());
        assert!(settings.click_enabled(MouseButton::Left));
        assert!(!settings.click_enabled(MouseButton::Middle));
        assert_eq!(settings.stroke_alpha(), 128);

        let palette = config.session_options().palette;
        assert_eq!(palette.left, Color::new(0, 0, 255, 255));
        assert_eq!(palette.right, Color::new(10, 20, 30, 255));
        assert_eq!(palette.middle, color::MIDDLE_MARKER);
    }

    #[test]
    fn layout_monitors_parse_and_drop_degenerate_entries() {
        let config = Config::parse(
            r#"
            [layout]
            vertical_axis = "top-down"

            [[layout.monitors]]
            x = 0
            y = 0
            width = 1920
            height = 1080
            primary = true

            [[layout.monitors]]
            x = 1920
            y = 0
            width = 0
            height = 1080
            "#,
        )
        .unwrap();
        assert_eq!(config.vertical_axis(), VerticalAxis::TopDown);
        assert_eq!(
            config.layout.monitors,
            vec![Monitor::new(0, 0, 1920, 1080, true)]
        );
    }

    #[test]
    fn output_directory_expands_tilde() {
        let config = Config::parse(
            r#"
            [output]
            directory = "/tmp/tracks"
            create_dir = false
            clean_after_save = false
            "#,
        )
        .unwrap();
        let target = config.save_target();
        assert_eq!(target.directory, PathBuf::from("/tmp/tracks"));
        assert!(!target.create_dir);
        assert!(!target.clean);
    }

    #[test]
    fn example_config_parses() {
        let config = Config::parse(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config.stroke.opacity, 20);
    }

    #[test]
    fn save_to_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.stroke.width = 7;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.stroke.width, 7);
    }

    #[test]
    fn load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(&dir.path().join("absent.toml")).is_err());
    }
}
