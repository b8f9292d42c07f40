//! Orrery configuration (window, scene, planet catalog). Loaded from config.ron at startup.

use crate::catalog::{self, PlanetSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Startup settings. Loaded from `config.ron` in the current directory; never written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrreryConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Enable vsync (recommended to avoid tearing).
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Start in borderless fullscreen.
    #[serde(default)]
    pub fullscreen: bool,
    /// Number of background stars.
    #[serde(default = "default_star_count")]
    pub star_count: usize,
    /// Seed for the starfield, initial angles and spin rates. `None` draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Show the speed panel at startup.
    #[serde(default)]
    pub show_controls: bool,
    /// Planets in display order.
    #[serde(default = "catalog::default_catalog")]
    pub planets: Vec<PlanetSpec>,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}
fn default_star_count() -> usize {
    procgen::DEFAULT_STAR_COUNT
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            vsync: default_true(),
            fullscreen: false,
            star_count: default_star_count(),
            seed: None,
            show_controls: false,
            planets: catalog::default_catalog(),
        }
    }
}

impl OrreryConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => Self::parse(&data).unwrap_or_else(|e| {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Parse RON text. An invalid planet catalog is replaced by the default one.
    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        let mut config: Self = ron::from_str(data)?;
        if let Err(e) = catalog::validate(&config.planets) {
            log::warn!("Invalid planet catalog in config: {}, using default planets", e);
            config.planets = catalog::default_catalog();
        }
        Ok(config)
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")).join("config.ron")
}
