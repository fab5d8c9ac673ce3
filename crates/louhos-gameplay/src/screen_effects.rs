//! Continuous screen-effect parameters.
//!
//! The renderer owns the actual post-processing; this driver only turns the
//! intoxication tier and nearby threats into numbers once per physics tick.

use louhos_common::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::EffectsConfig;
use crate::resources::IntoxicationTier;

/// Saturation applied when a threat stands on top of the character.
const MAX_DESATURATION: f32 = -100.0;

/// Effect parameters for one physics tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenEffects {
    /// Lens distortion intensity in [-0.5, 0.5]
    pub lens_distortion: f32,
    /// Horizontal camera offset from the character, in tiles
    pub camera_offset: f32,
    /// Hue shift in degrees, (-180, 180]
    pub hue_shift: f32,
    /// Saturation adjustment in [-100, 0]
    pub saturation: f32,
}

/// Maps intoxication and threat proximity to effect parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenEffectDriver {
    config: EffectsConfig,
    hue_shift: f32,
}

impl ScreenEffectDriver {
    /// Creates a driver with no accumulated hue shift.
    #[must_use]
    pub fn new(config: EffectsConfig) -> Self {
        Self {
            config,
            hue_shift: 0.0,
        }
    }

    /// Returns the accumulated hue shift.
    #[must_use]
    pub fn hue_shift(&self) -> f32 {
        self.hue_shift
    }

    /// Computes this tick's parameters.
    ///
    /// `time` is the running clock in seconds used for the oscillations.
    /// Critical levels render like Strong ones; ending the session is the
    /// controller's job.
    pub fn update(
        &mut self,
        tier: IntoxicationTier,
        intensity: f32,
        time: f32,
        position: Vec2,
        threats: &[Vec2],
    ) -> ScreenEffects {
        let saturation = self.desaturation(position, threats);

        if !tier.has_effects() {
            self.hue_shift = 0.0;
            return ScreenEffects {
                saturation,
                ..ScreenEffects::default()
            };
        }

        let intensity = intensity.clamp(0.0, 1.0);
        let lens_distortion = (time * self.config.distortion_multiplier).sin() * 0.5 * intensity;
        let camera_offset = (time * self.config.camera_shift_multiplier).cos()
            * self.config.camera_shift_max
            * intensity;

        if tier >= IntoxicationTier::Strong {
            self.hue_shift = wrap_degrees(self.hue_shift + intensity * self.config.hue_shift_multiplier);
        } else {
            self.hue_shift = 0.0;
        }

        ScreenEffects {
            lens_distortion,
            camera_offset,
            hue_shift: self.hue_shift,
            saturation,
        }
    }

    /// Saturation from the closest threat within the configured radius.
    #[must_use]
    pub fn desaturation(&self, position: Vec2, threats: &[Vec2]) -> f32 {
        let radius = self.config.threat_radius;
        let closest = threats
            .iter()
            .map(|threat| threat.distance(position))
            .fold(f32::INFINITY, f32::min);

        if radius <= 0.0 || closest > radius {
            return 0.0;
        }
        let strength = (1.0 - closest / radius).clamp(0.0, 1.0);
        MAX_DESATURATION * strength
    }
}

/// Wraps an angle in degrees into (-180, 180].
#[must_use]
pub fn wrap_degrees(mut degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    while degrees > 180.0 {
        degrees -= 360.0;
    }
    while degrees <= -180.0 {
        degrees += 360.0;
    }
    degrees
}
