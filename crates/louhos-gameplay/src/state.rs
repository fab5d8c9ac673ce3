//! Kinematic state of the character.

use louhos_common::Vec2;
use serde::{Deserialize, Serialize};

/// Side the character faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Facing -x
    Left,
    /// Facing +x (default)
    #[default]
    Right,
}

impl Facing {
    /// Returns +1 for right, -1 for left.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Unit vector pointing toward the character's front.
    #[must_use]
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.sign(), 0.0)
    }

    /// Returns the opposite side.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Position, velocity and movement flags, owned by the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    /// Body center in world space
    pub position: Vec2,
    /// Current velocity
    pub velocity: Vec2,
    /// Side the character faces
    pub facing: Facing,
    /// Ground probe hit on the last physics tick
    pub grounded: bool,
    /// Clinging to or climbing a wall
    pub climbing: bool,
    /// Climbing with non-zero vertical input
    pub climbing_moving: bool,
    /// Rising from a jump that has not been cut off yet
    pub jumping: bool,
    /// Jump accepted this frame, executed on the next physics tick
    pub jump_pending: bool,
    /// Remaining coyote time in seconds, never negative
    pub coyote_remaining: f32,
    /// Latest horizontal input
    pub horizontal: f32,
    /// Latest vertical input
    pub vertical: f32,
}

impl KinematicState {
    /// Creates a grounded, idle state at a position.
    #[must_use]
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            grounded: true,
            climbing: false,
            climbing_moving: false,
            jumping: false,
            jump_pending: false,
            coyote_remaining: 0.0,
            horizontal: 0.0,
            vertical: 0.0,
        }
    }

    /// Checks if the character is neither grounded nor climbing.
    #[must_use]
    pub fn is_airborne(&self) -> bool {
        !self.grounded && !self.climbing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_vectors() {
        assert_eq!(Facing::Right.to_vec2(), Vec2::X);
        assert_eq!(Facing::Left.to_vec2(), Vec2::NEG_X);
        assert_eq!(Facing::Left.flipped(), Facing::Right);
    }

    #[test]
    fn test_new_state() {
        let state = KinematicState::new(Vec2::new(1.0, 2.0));
        assert!(state.grounded);
        assert!(!state.is_airborne());
        assert_eq!(state.facing, Facing::Right);
        assert_eq!(state.coyote_remaining, 0.0);
    }
}
