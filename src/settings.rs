//! Scene settings and XML persistence
//!
//! Settings are stored as XML in the user's config directory and loaded once
//! at startup. Missing fields fall back to their defaults.

use quick_xml::de::from_str;
use quick_xml::se::to_string;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::plane::{AnimationSettings, GridParams, HoverSettings};

/// Perspective camera parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    #[serde(rename = "fovDegrees", default = "default_fov")]
    pub fov_degrees: f32,

    #[serde(rename = "near", default = "default_near")]
    pub near: f32,

    #[serde(rename = "far", default = "default_far")]
    pub far: f32,

    /// Initial distance from the plane center
    #[serde(rename = "distance", default = "default_distance")]
    pub distance: f32,
}

fn default_fov() -> f32 {
    75.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}

fn default_distance() -> f32 {
    50.0
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            distance: default_distance(),
        }
    }
}

impl CameraSettings {
    fn sanitize(&mut self) {
        if !self.fov_degrees.is_finite() {
            self.fov_degrees = default_fov();
        }
        if !self.near.is_finite() || self.near <= 0.0 {
            self.near = default_near();
        }
        if !self.far.is_finite() || self.far <= self.near {
            self.far = default_far().max(self.near * 2.0);
        }
        if !self.distance.is_finite() || self.distance <= 0.0 {
            self.distance = default_distance();
        }
    }
}

/// Everything persisted between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "HoverPlaneSettings")]
pub struct SceneSettings {
    /// Grid dimensions and subdivisions
    #[serde(rename = "plane", default)]
    pub plane: GridParams,

    #[serde(rename = "animation", default)]
    pub animation: AnimationSettings,

    #[serde(rename = "hover", default)]
    pub hover: HoverSettings,

    #[serde(rename = "camera", default)]
    pub camera: CameraSettings,

    /// Target frames per second (24-240)
    #[serde(rename = "targetFps", default = "default_target_fps")]
    pub target_fps: u32,

    /// Whether the debug panel is visible at startup
    #[serde(rename = "showDebugPanel", default = "default_show_debug_panel")]
    pub show_debug_panel: bool,
}

fn default_target_fps() -> u32 {
    60
}

fn default_show_debug_panel() -> bool {
    true
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            plane: GridParams::default(),
            animation: AnimationSettings::default(),
            hover: HoverSettings::default(),
            camera: CameraSettings::default(),
            target_fps: default_target_fps(),
            show_debug_panel: default_show_debug_panel(),
        }
    }
}

impl SceneSettings {
    /// Bring every value into its valid range
    pub fn clamp(&mut self) {
        self.target_fps = self.target_fps.clamp(24, 240);
        self.plane.clamp();
        self.animation.sanitize();
        self.hover.sanitize();
        self.camera.sanitize();
    }

    /// Settings file path in the config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("HoverPlane");
            p.push("settings.xml");
            p
        })
    }

    /// Load settings from an XML file
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        let mut settings: Self = from_str(&contents)?;
        settings.clamp();
        Ok(settings)
    }

    /// Save settings to an XML file, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let xml = to_string(self)?;
        let formatted = format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}", xml);

        fs::write(path, formatted)?;
        Ok(())
    }

    /// Load from the config directory, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            tracing::warn!("No config directory, using default settings");
            return Self::default();
        };

        if !path.exists() {
            tracing::info!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from_file(&path) {
            Ok(settings) => {
                tracing::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                tracing::warn!("Failed to load settings from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save to the config directory
    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let path = Self::default_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to_file(&path)?;
        Ok(path)
    }
}

/// Settings-related errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::DeError),

    #[error("XML write error: {0}")]
    XmlWrite(#[from] quick_xml::SeError),

    #[error("Could not find config directory")]
    NoConfigDir,
}
