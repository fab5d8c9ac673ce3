//! Engine configuration.
//!
//! Timing, the starting inventory and the controller tuning for a headless
//! run. Configuration can be loaded from and saved to a TOML file.

use std::fs;
use std::path::Path;

use louhos_common::{ConfigError, LouhosResult};
use louhos_gameplay::{ControllerConfig, ToolKind};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "louhos.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Timing ===
    /// Physics timestep in seconds
    pub fixed_timestep: f32,
    /// Simulated frame time in seconds
    pub frame_time: f32,
    /// Length of the scripted run in seconds
    pub demo_duration: f32,

    // === Starting Inventory ===
    /// Stamina ceiling (the character starts full)
    pub max_stamina: u32,
    /// Stamina potions carried at start
    pub starting_potions: u32,
    /// Torches carried at start
    pub starting_torches: u32,
    /// Tool equipped at start
    pub starting_tool: ToolKind,

    // === Ambience ===
    /// Seconds between ambience depth updates
    pub ambience_interval: f64,

    /// Player controller tuning
    pub controller: ControllerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            frame_time: 1.0 / 60.0,
            demo_duration: 20.0,

            max_stamina: 100,
            starting_potions: 6,
            starting_torches: 3,
            starting_tool: ToolKind::Shovel,

            ambience_interval: 0.5,

            controller: ControllerConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> LouhosResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Write(e.to_string()))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.fixed_timestep = self.fixed_timestep.clamp(0.001, 0.1);
        self.frame_time = self.frame_time.clamp(0.001, 0.25);
        self.demo_duration = self.demo_duration.clamp(0.0, 3600.0);
        self.max_stamina = self.max_stamina.max(1);
        self.ambience_interval = self.ambience_interval.max(0.01);
        self.controller.validate();
    }
}
