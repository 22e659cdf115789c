//! Shared configuration for surfpaint
//!
//! This crate provides the single source of truth for render-target size,
//! brush settings and mesh topology options. Brush state lives here as an
//! explicit value handed to whatever constructs a brush, never as globals.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default render-target width in pixels
pub const DEFAULT_WIDTH: u32 = 1024;

/// Default render-target height in pixels
pub const DEFAULT_HEIGHT: u32 = 768;

/// Viewing UV assigned to every face corner before the face is first painted
pub const DEFAULT_PLACEHOLDER_UV: [f32; 2] = [0.5, 0.5];

/// Default brush diameter in pixels
pub const DEFAULT_BRUSH_SIZE: f32 = 24.0;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Blend modes for painting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    #[default]
    Normal,
    Erase,
}

/// Stroke rendering style, selected by its lowercase tag in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BrushKind {
    /// Round dab with hardness falloff
    #[default]
    Solid,
    /// Dab textured by a stamp image
    Stamp,
    /// Random particles spread inside the brush radius
    Scatter,
    /// Radial spokes around each dab center
    #[serde(rename = "starburst")]
    StarBurst,
}

/// How face adjacency is computed when a mesh is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdjacencyStrategy {
    /// Test every pair of faces. Quadratic in face count.
    #[default]
    Pairwise,
    /// Only test face pairs that share an edge key. Same acceptance rule.
    EdgeIndexed,
}

/// Render target and default surface appearance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Render-target width in pixels
    pub width: u32,
    /// Render-target height in pixels
    pub height: u32,
    /// Color shown on faces that were never painted
    pub base_color: [f32; 4],
    /// Color behind the mesh in the drawing surface
    pub background: [f32; 4],
    /// Viewing UV given to every face corner until the face is reconciled
    pub placeholder_uv: [f32; 2],
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            base_color: [1.0, 1.0, 1.0, 1.0],
            background: [0.0, 0.0, 0.0, 0.0],
            placeholder_uv: DEFAULT_PLACEHOLDER_UV,
        }
    }
}

/// Brush configuration.
///
/// Only the fields relevant to `kind` are read by a brush; the rest keep
/// their defaults so a config can switch kinds without losing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    pub kind: BrushKind,
    /// Diameter in pixels
    pub size: f32,
    /// RGBA color
    pub color: [f32; 4],
    /// Edge hardness: 0.0 = soft, 1.0 = hard
    pub hardness: f32,
    /// Opacity 0.0-1.0
    pub opacity: f32,
    /// Dab spacing as fraction of size (e.g., 0.25 = 25% of diameter)
    pub spacing: f32,
    pub blend_mode: BlendMode,
    /// Stamp image, required by [`BrushKind::Stamp`]
    pub stamp_path: Option<PathBuf>,
    /// Particles per dab for [`BrushKind::Scatter`]
    pub scatter_density: u32,
    /// Spokes per dab for [`BrushKind::StarBurst`]
    pub spoke_count: u32,
    /// Seed for the scatter particle generator
    pub seed: u64,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            kind: BrushKind::Solid,
            size: DEFAULT_BRUSH_SIZE,
            color: [0.0, 0.0, 0.0, 1.0],
            hardness: 0.8,
            opacity: 1.0,
            spacing: 0.25,
            blend_mode: BlendMode::Normal,
            stamp_path: None,
            scatter_density: 12,
            spoke_count: 8,
            seed: 0x5eed,
        }
    }
}

impl BrushSettings {
    /// Radius of the brush's impact circle in pixels
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct PaintConfig {
    pub surface: SurfaceConfig,
    pub brush: BrushSettings,
    pub adjacency: AdjacencyStrategy,
}

impl PaintConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.surface.width == 0 || self.surface.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "surface size must be non-zero, got {}x{}",
                self.surface.width, self.surface.height
            )));
        }
        let brush = &self.brush;
        if !(brush.size >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "brush size must be >= 0, got {}",
                brush.size
            )));
        }
        if !(brush.spacing > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "brush spacing must be > 0, got {}",
                brush.spacing
            )));
        }
        if !(0.0..=1.0).contains(&brush.opacity) || !(0.0..=1.0).contains(&brush.hardness) {
            return Err(ConfigError::Invalid(
                "brush opacity and hardness must be within 0..=1".to_string(),
            ));
        }
        if brush.kind == BrushKind::Stamp && brush.stamp_path.is_none() {
            return Err(ConfigError::Invalid(
                "stamp brush requires stamp_path".to_string(),
            ));
        }
        Ok(())
    }
}
