//! Drafting parameters.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DraftingError, Result};

/// Parameters for one geometry extraction.
///
/// Missing keys in a TOML file fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftingSettings {
    /// Drawing scale (drawing units per model unit).
    pub scale: f64,
    /// Distance in drawing units under which points are considered equal.
    pub tolerance: f64,
    /// Emit tangent-continuous edges.
    pub smooth_edges: bool,
    /// Reconstruct face wires for shading.
    pub extract_faces: bool,
    /// Tessellation resolution of the built-in hidden-line kernel.
    pub tessellation_segments: usize,
}

impl Default for DraftingSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            tolerance: 0.01,
            smooth_edges: true,
            extract_faces: true,
            tessellation_segments: 64,
        }
    }
}

impl DraftingSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(DraftingError::InvalidSettings(
                "scale must be positive and finite".into(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(DraftingError::InvalidSettings(
                "tolerance must be positive and finite".into(),
            ));
        }
        if self.tessellation_segments < 3 {
            return Err(DraftingError::InvalidSettings(
                "tessellation_segments must be at least 3".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse, and validate a TOML settings file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
