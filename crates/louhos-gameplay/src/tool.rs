//! Digging tools.
//!
//! A tool is pure data: a tier that picks the dig animation, the damage
//! dealt per strike, the aim reach and the stamina charged per strike.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when building a tool from untrusted values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    /// Tier must be at least 1
    #[error("tool tier must be at least 1")]
    InvalidTier,

    /// Range must be finite and positive
    #[error("tool range must be finite and positive, got {0}")]
    InvalidRange(f32),

    /// Damage must be finite and non-negative
    #[error("tool damage must be finite and non-negative, got {0}")]
    InvalidDamage(f32),
}

/// Immutable description of the equipped tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tier ordinal (selects the dig animation)
    pub tier: u8,
    /// Damage dealt to a tile per strike
    pub damage: f32,
    /// Aim reach in tiles
    pub range: f32,
    /// Stamina charged per strike
    pub energy_cost: u32,
}

impl ToolDescriptor {
    /// Creates a tool, validating its numbers.
    pub fn try_new(tier: u8, damage: f32, range: f32, energy_cost: u32) -> Result<Self, ToolError> {
        if tier == 0 {
            return Err(ToolError::InvalidTier);
        }
        if !range.is_finite() || range <= 0.0 {
            return Err(ToolError::InvalidRange(range));
        }
        if !damage.is_finite() || damage < 0.0 {
            return Err(ToolError::InvalidDamage(damage));
        }
        Ok(Self {
            tier,
            damage,
            range,
            energy_cost,
        })
    }
}

impl Default for ToolDescriptor {
    fn default() -> Self {
        ToolKind::Shovel.descriptor()
    }
}

/// The tools a miner can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Starting tool
    #[default]
    Shovel,
    /// Breaks stone
    Pickaxe,
    /// Late-game tool
    Drill,
}

impl ToolKind {
    /// Returns the stats of this tool.
    #[must_use]
    pub const fn descriptor(self) -> ToolDescriptor {
        match self {
            Self::Shovel => ToolDescriptor {
                tier: 1,
                damage: 1.0,
                range: 3.0,
                energy_cost: 2,
            },
            Self::Pickaxe => ToolDescriptor {
                tier: 2,
                damage: 2.5,
                range: 4.0,
                energy_cost: 3,
            },
            Self::Drill => ToolDescriptor {
                tier: 3,
                damage: 5.0,
                range: 5.0,
                energy_cost: 5,
            },
        }
    }

    /// Get all tools in tier order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Shovel, Self::Pickaxe, Self::Drill]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_validates() {
        assert_eq!(ToolDescriptor::try_new(0, 1.0, 3.0, 1), Err(ToolError::InvalidTier));
        assert_eq!(
            ToolDescriptor::try_new(1, 1.0, 0.0, 1),
            Err(ToolError::InvalidRange(0.0))
        );
        assert_eq!(
            ToolDescriptor::try_new(1, -2.0, 3.0, 1),
            Err(ToolError::InvalidDamage(-2.0))
        );
        assert!(ToolDescriptor::try_new(2, 1.5, 5.0, 4).is_ok());
    }

    #[test]
    fn test_tiers_ascend() {
        let tiers: Vec<u8> = ToolKind::all().iter().map(|k| k.descriptor().tier).collect();
        assert_eq!(tiers, vec![1, 2, 3]);
    }

    #[test]
    fn test_kind_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            tool: ToolKind,
        }
        let parsed: Wrapper = toml::from_str("tool = \"pickaxe\"").expect("valid toml");
        assert_eq!(parsed.tool, ToolKind::Pickaxe);
    }
}
