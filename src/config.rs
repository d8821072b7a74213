//! Configuration for the annotation overlay

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Serializable color representation (components in 0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl ShapeColor {
    /// Opaque color from 8-bit components
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Same color with a different opacity
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Convert to RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        ]
    }
}

/// Drawing tool that creates a new shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Rectangle,
    Polygon,
}

impl Tool {
    /// Tool id used by hosts
    pub fn id(self) -> &'static str {
        match self {
            Tool::Rectangle => "rectangle",
            Tool::Polygon => "polygon",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tool {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rectangle" => Ok(Tool::Rectangle),
            "polygon" => Ok(Tool::Polygon),
            other => anyhow::bail!("unknown tool '{other}'"),
        }
    }
}

/// Colors and stroke sizes used to draw shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeStyle {
    /// Radius of anchor markers in pixels
    pub marker_radius: f32,
    /// Stroke width for markers and finalized geometry
    pub line_width: f32,
    pub marker_color: ShapeColor,
    pub rectangle_color: ShapeColor,
    pub polygon_color: ShapeColor,
    pub polygon_fill: ShapeColor,
    /// Alert color for hovered anchors and dragged shapes
    pub highlight_color: ShapeColor,
    /// Color of live previews while drawing
    pub preview_color: ShapeColor,
    pub preview_line_width: f32,
    /// Dash pattern (on, off) for previews
    pub preview_dash: [f32; 2],
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            marker_radius: 5.0,
            line_width: 2.0,
            marker_color: ShapeColor::rgb8(0xF9, 0x69, 0x0E),
            rectangle_color: ShapeColor::rgb8(0x26, 0xA6, 0x5B),
            polygon_color: ShapeColor::rgb8(0xF1, 0xC4, 0x0F),
            polygon_fill: ShapeColor::rgb8(243, 156, 18).with_alpha(0.1),
            highlight_color: ShapeColor::rgb8(0xE7, 0x4C, 0x3C),
            preview_color: ShapeColor::rgb8(0, 0, 0),
            preview_line_width: 1.0,
            preview_dash: [6.0, 4.0],
        }
    }
}

/// Overlay configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Screen distance (inclusive) within which an anchor becomes editable
    pub activation_radius: f32,
    /// Start a new session with the same tool after one finishes
    pub rearm_after_finish: bool,
    pub style: ShapeStyle,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            activation_radius: 5.0,
            rearm_after_finish: false,
            style: ShapeStyle::default(),
        }
    }
}

impl OverlayConfig {
    /// Directory name under the user config directory
    pub const APP_DIR: &'static str = "slicemark";
    pub const FILE_NAME: &'static str = "slicemark.json";

    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join(Self::FILE_NAME))
    }

    /// Load configuration from the default location, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Load configuration from a JSON file; missing fields take defaults
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Write configuration as JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write config {}", path.display()))
    }

    /// Save configuration to the default location
    pub fn save(&self) {
        let Some(path) = Self::default_path() else {
            log::error!("No config directory available for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }
}
