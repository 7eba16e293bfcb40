//! Editor settings persisted as JSON in the platform config directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::form::DEFAULT_SWITCHES;
use crate::geometry::Resolution;
use crate::polygon::DEFAULT_HIT_RADIUS;
use crate::proximity::DEFAULT_MARKER_RADIUS;
use crate::trapezoid::Orientation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Coordinate space persisted zones are expressed in
    pub source_resolution: Resolution,
    /// Pointer distance (px) that grabs an existing polygon vertex
    pub hit_radius: f32,
    pub marker_radius: f32,
    pub highlight_radius: f32,
    /// Grab radius (px) of the calibration markers
    pub calibration_marker_radius: f32,
    /// Form fields rendered as checkboxes
    pub switch_fields: Vec<String>,
    pub trapezoid_orientation: Orientation,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            source_resolution: Resolution::new(1280.0, 720.0),
            hit_radius: DEFAULT_HIT_RADIUS,
            marker_radius: 8.0,
            highlight_radius: 10.0,
            calibration_marker_radius: DEFAULT_MARKER_RADIUS,
            switch_fields: DEFAULT_SWITCHES.iter().map(|s| s.to_string()).collect(),
            trapezoid_orientation: Orientation::Horizontal,
        }
    }
}

impl AppSettings {
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("zone-annotate").join("settings.json"))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("ignoring malformed settings {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)
    }
}
