//! Controller configuration.
//!
//! Every tunable of the player controller lives here, grouped by concern.
//! Configuration can be loaded from and saved to a TOML file; missing keys
//! fall back to the defaults below.

use std::fs;
use std::path::Path;

use louhos_common::{ConfigError, LayerMask, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::resources::IntoxicationTier;

/// Movement and jump tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Walk speed in tiles per second
    pub walk_speed: f32,
    /// Climb speed in tiles per second
    pub climb_speed: f32,
    /// Upward velocity applied by a jump
    pub jump_impulse: f32,
    /// Grace window after leaving the ground, in seconds
    pub coyote_time: f32,
    /// Vertical velocity multiplier on early jump release
    pub jump_cutoff: f32,
    /// Horizontal input needed to turn around
    pub facing_deadzone: f32,
    /// Walk speed multiplier granted by the run boost
    pub run_boost: f32,
    /// Gravity used by the body stand-in
    pub gravity: f32,
    /// Maximum fall speed used by the body stand-in
    pub terminal_velocity: f32,
    /// Collision box of the character body
    pub body_size: Vec2,
    /// Emit `Land` when touching down after being airborne
    pub emit_land_events: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            climb_speed: 3.0,
            jump_impulse: 8.0,
            coyote_time: 0.2,
            jump_cutoff: 0.5,
            facing_deadzone: 0.01,
            run_boost: 1.25,
            gravity: 20.0,
            terminal_velocity: 20.0,
            body_size: Vec2::new(0.8, 1.8),
            emit_land_events: true,
        }
    }
}

/// Geometry of the environment probes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Box swept downward to detect ground
    pub ground_box: Vec2,
    /// Ground sweep distance
    pub ground_distance: f32,
    /// Box swept toward the facing side to detect climbable walls
    pub climb_box: Vec2,
    /// Climb sweep distance
    pub climb_distance: f32,
    /// How far below the center the climb sweep starts
    pub climb_drop: f32,
    /// Distance a dig hit point is pushed into the struck tile
    pub dig_bias: f32,
    /// Area searched for torches around the character
    pub torch_checker: Vec2,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ground_box: Vec2::new(0.7, 1.7),
            ground_distance: 0.1,
            climb_box: Vec2::new(0.5, 0.5),
            climb_distance: 0.3,
            climb_drop: 0.5,
            dig_bias: 0.01,
            torch_checker: Vec2::new(1.0, 1.0),
        }
    }
}

/// Stamina costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaminaConfig {
    /// Drained every slow tick while not climbing
    pub passive_cost: u32,
    /// Drained every slow tick while climbing
    pub climb_cost: u32,
    /// Charged per executed jump
    pub jump_cost: u32,
    /// Fraction of max stamina a potion restores
    pub potion_replenish: f32,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            passive_cost: 1,
            climb_cost: 3,
            jump_cost: 5,
            potion_replenish: 0.2,
        }
    }
}

/// Intoxication gain, decay and tier thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntoxicationConfig {
    /// Intoxication added per potion
    pub potion_gain: f32,
    /// Intoxication removed per slow tick
    pub decay_per_tick: f32,
    /// Levels above this are Mild
    pub mild_threshold: f32,
    /// Levels above this are Strong
    pub strong_threshold: f32,
    /// Levels above this are Critical and end the session
    pub critical_threshold: f32,
}

impl Default for IntoxicationConfig {
    fn default() -> Self {
        Self {
            potion_gain: 40.0,
            decay_per_tick: 1.0,
            mild_threshold: 100.0,
            strong_threshold: 150.0,
            critical_threshold: 200.0,
        }
    }
}

impl IntoxicationConfig {
    /// Maps a level to its tier.
    #[must_use]
    pub fn tier(&self, level: f32) -> IntoxicationTier {
        if level > self.critical_threshold {
            IntoxicationTier::Critical
        } else if level > self.strong_threshold {
            IntoxicationTier::Strong
        } else if level > self.mild_threshold {
            IntoxicationTier::Mild
        } else {
            IntoxicationTier::None
        }
    }

    /// Normalized effect intensity in [0, 1].
    #[must_use]
    pub fn intensity(&self, level: f32) -> f32 {
        let span = self.critical_threshold - self.mild_threshold;
        if span <= 0.0 {
            return if level > self.mild_threshold { 1.0 } else { 0.0 };
        }
        ((level - self.mild_threshold) / span).clamp(0.0, 1.0)
    }
}

/// Screen effect multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Lens distortion oscillation speed
    pub distortion_multiplier: f32,
    /// Hue shift degrees added per physics tick at full intensity
    pub hue_shift_multiplier: f32,
    /// Camera sway oscillation speed
    pub camera_shift_multiplier: f32,
    /// Maximum camera sway in tiles
    pub camera_shift_max: f32,
    /// Threats closer than this desaturate the screen
    pub threat_radius: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            distortion_multiplier: 3.0,
            hue_shift_multiplier: 2.0,
            camera_shift_multiplier: 1.0,
            camera_shift_max: 3.0,
            threat_radius: 25.0,
        }
    }
}

/// Slow tick and action sampler cadence, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Delay before the first slow tick
    pub slow_tick_delay: f64,
    /// Interval between slow ticks (drain and decay)
    pub slow_tick_interval: f64,
    /// Delay before the first walk/climb sample
    pub action_sample_delay: f64,
    /// Interval between walk/climb samples
    pub action_sample_interval: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            slow_tick_delay: 1.0,
            slow_tick_interval: 1.0,
            action_sample_delay: 0.6,
            action_sample_interval: 0.6,
        }
    }
}

/// Layer masks the probes filter on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Ground and climbable walls
    pub ground: LayerMask,
    /// Diggable terrain
    pub dig: LayerMask,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            ground: LayerMask::GROUND,
            dig: LayerMask::DIGGABLE,
        }
    }
}

/// Complete controller configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Movement tuning
    pub movement: MovementConfig,
    /// Probe geometry
    pub probes: ProbeConfig,
    /// Stamina costs
    pub stamina: StaminaConfig,
    /// Intoxication tuning
    pub intoxication: IntoxicationConfig,
    /// Screen effects
    pub effects: EffectsConfig,
    /// Periodic task cadence
    pub schedule: ScheduleConfig,
    /// Probe layers
    pub layers: LayerConfig,
}

impl ControllerConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Controller config not found at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(config) => {
                info!("Loaded controller config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("{e}; using defaults");
                Self::default()
            },
        }
    }

    /// Load and validate configuration, reporting why it failed.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut config: Self = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate();
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Write(e.to_string()))?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Write(e.to_string()))?;
        fs::write(path, contents).map_err(|e| ConfigError::Write(e.to_string()))?;

        info!("Saved controller config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        let movement = &mut self.movement;
        movement.walk_speed = movement.walk_speed.max(0.0);
        movement.climb_speed = movement.climb_speed.max(0.0);
        movement.jump_impulse = movement.jump_impulse.max(0.0);
        movement.coyote_time = movement.coyote_time.max(0.0);
        movement.jump_cutoff = movement.jump_cutoff.clamp(0.0, 1.0);
        movement.facing_deadzone = movement.facing_deadzone.clamp(0.0, 1.0);
        movement.run_boost = movement.run_boost.max(1.0);
        movement.gravity = movement.gravity.max(0.0);
        movement.terminal_velocity = movement.terminal_velocity.max(0.1);
        movement.body_size = movement.body_size.abs().max(Vec2::splat(0.1));

        let probes = &mut self.probes;
        probes.ground_distance = probes.ground_distance.max(0.0);
        probes.climb_distance = probes.climb_distance.abs();
        probes.dig_bias = probes.dig_bias.clamp(0.0, 0.5);

        self.stamina.potion_replenish = self.stamina.potion_replenish.clamp(0.0, 1.0);

        let intox = &mut self.intoxication;
        intox.potion_gain = intox.potion_gain.max(0.0);
        intox.decay_per_tick = intox.decay_per_tick.max(0.0);
        intox.strong_threshold = intox.strong_threshold.max(intox.mild_threshold);
        intox.critical_threshold = intox.critical_threshold.max(intox.strong_threshold);

        self.effects.camera_shift_max = self.effects.camera_shift_max.max(0.0);
        self.effects.threat_radius = self.effects.threat_radius.max(0.0);

        let schedule = &mut self.schedule;
        schedule.slow_tick_delay = schedule.slow_tick_delay.max(0.0);
        schedule.slow_tick_interval = schedule.slow_tick_interval.max(0.01);
        schedule.action_sample_delay = schedule.action_sample_delay.max(0.0);
        schedule.action_sample_interval = schedule.action_sample_interval.max(0.01);
    }
}
