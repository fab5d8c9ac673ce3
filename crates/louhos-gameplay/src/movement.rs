//! Horizontal locomotion and the jump arc.
//!
//! Input is read on the frame pass ([`Movement::handle_input`]): coyote time
//! is refreshed or counted down, jump presses are accepted or refused, and
//! an early release cuts the rise short. The physics pass
//! ([`Movement::apply`]) executes an accepted jump and sets the horizontal
//! velocity directly from the axis, without smoothing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MovementConfig;
use crate::input::FrameInput;
use crate::state::{Facing, KinematicState};

/// What happened to this frame's jump input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpOutcome {
    /// No jump press this frame
    NotPressed,
    /// Press accepted; the jump executes on the next physics tick
    Accepted,
    /// Press refused: the coyote window had run out
    NoCoyoteTime,
}

/// Walk and jump rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    config: MovementConfig,
    walk_speed: f32,
}

impl Movement {
    /// Creates movement rules from configuration.
    #[must_use]
    pub fn new(config: MovementConfig) -> Self {
        let walk_speed = config.walk_speed;
        Self { config, walk_speed }
    }

    /// Returns the movement configuration.
    #[must_use]
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Current walk speed, including any run boost.
    #[must_use]
    pub fn walk_speed(&self) -> f32 {
        self.walk_speed
    }

    /// Permanently raises walk speed by the configured boost factor.
    pub fn activate_run_boost(&mut self) {
        self.walk_speed *= self.config.run_boost;
        debug!(walk_speed = self.walk_speed, "Run boost activated");
    }

    /// Frame pass: coyote countdown, jump acceptance and early-release cutoff.
    pub fn handle_input(&self, state: &mut KinematicState, input: &FrameInput, dt: f32) -> JumpOutcome {
        state.horizontal = input.horizontal;
        state.vertical = input.vertical;

        if state.grounded {
            state.coyote_remaining = self.config.coyote_time;
        } else {
            state.coyote_remaining = (state.coyote_remaining - dt).max(0.0);
        }

        let outcome = if !input.jump_pressed {
            JumpOutcome::NotPressed
        } else if state.coyote_remaining > 0.0 {
            state.jump_pending = true;
            state.coyote_remaining = 0.0;
            JumpOutcome::Accepted
        } else {
            JumpOutcome::NoCoyoteTime
        };

        if input.jump_released && state.jumping {
            state.jumping = false;
            if state.velocity.y > 0.0 {
                state.velocity.y *= self.config.jump_cutoff;
            }
        }

        outcome
    }

    /// Physics pass: executes a pending jump and applies horizontal velocity.
    ///
    /// Returns the impulse when a jump was executed this tick.
    pub fn apply(&self, state: &mut KinematicState) -> Option<f32> {
        let jumped = if state.jump_pending {
            state.jump_pending = false;
            state.velocity.y = 0.0;
            state.velocity.y += self.config.jump_impulse;
            state.jumping = true;
            Some(self.config.jump_impulse)
        } else {
            None
        };

        state.velocity.x = state.horizontal * self.walk_speed;
        jumped
    }

    /// Turns the character when the horizontal input passes the deadzone
    /// away from the current facing. Returns whether it turned.
    pub fn update_facing(&self, state: &mut KinematicState) -> bool {
        let deadzone = self.config.facing_deadzone;
        let turn_to = if state.horizontal > deadzone && state.facing == Facing::Left {
            Some(Facing::Right)
        } else if state.horizontal < -deadzone && state.facing == Facing::Right {
            Some(Facing::Left)
        } else {
            None
        };

        match turn_to {
            Some(facing) => {
                state.facing = facing;
                true
            },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use louhos_common::Vec2;
    use proptest::prelude::*;

    fn movement() -> Movement {
        Movement::new(MovementConfig::default())
    }

    fn jump_press() -> FrameInput {
        FrameInput {
            jump_pressed: true,
            ..FrameInput::default()
        }
    }

    #[test]
    fn test_grounded_refreshes_coyote() {
        let movement = movement();
        let mut state = KinematicState::new(Vec2::ZERO);

        movement.handle_input(&mut state, &FrameInput::new(), 0.016);

        assert!((state.coyote_remaining - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_coyote_counts_down_and_clamps() {
        let movement = movement();
        let mut state = KinematicState::new(Vec2::ZERO);
        state.coyote_remaining = 0.2;
        state.grounded = false;

        movement.handle_input(&mut state, &FrameInput::new(), 0.15);
        assert!((state.coyote_remaining - 0.05).abs() < 1e-6);

        movement.handle_input(&mut state, &FrameInput::new(), 0.15);
        assert_eq!(state.coyote_remaining, 0.0);
    }

    #[test]
    fn test_jump_within_coyote_window() {
        let movement = movement();
        let mut state = KinematicState::new(Vec2::ZERO);
        state.grounded = false;
        state.coyote_remaining = 0.1;

        let outcome = movement.handle_input(&mut state, &jump_press(), 0.05);

        assert_eq!(outcome, JumpOutcome::Accepted);
        assert!(state.jump_pending);
        assert_eq!(state.coyote_remaining, 0.0);
    }

    #[test]
    fn test_no_double_jump_from_one_contact() {
        let movement = movement();
        let mut state = KinematicState::new(Vec2::ZERO);

        assert_eq!(
            movement.handle_input(&mut state, &jump_press(), 0.016),
            JumpOutcome::Accepted
        );
        state.grounded = false;
        assert_eq!(
            movement.handle_input(&mut state, &jump_press(), 0.016),
            JumpOutcome::NoCoyoteTime
        );
    }

    #[test]
    fn test_exhausted_coyote_refuses_jump() {
        let movement = movement();
        let mut state = KinematicState::new(Vec2::ZERO);
        state.grounded = false;
        state.coyote_remaining = 0.01;

        // dt consumes exactly the remaining budget
        let outcome = movement.handle_input(&mut state, &jump_press(), 0.01);

        assert_eq!(outcome, JumpOutcome::NoCoyoteTime);
        assert!(!state.jump_pending);
    }

    #[test]
    fn test_apply_executes_jump() {
        let movement = movement();
        let mut state = KinematicState::new(Vec2::ZERO);
        state.velocity.y = -3.0;
        state.jump_pending = true;
        state.horizontal = -1.0;

        let impulse = movement.apply(&mut state);

        assert_eq!(impulse, Some(8.0));
        assert_eq!(state.velocity, Vec2::new(-5.0, 8.0));
        assert!(state.jumping);
        assert!(!state.jump_pending);
        assert_eq!(movement.apply(&mut state), None);
    }

    #[test]
    fn test_early_release_halves_rise() {
        let movement = movement();
        let mut state = KinematicState::new(Vec2::ZERO);
        state.jumping = true;
        state.velocity.y = 6.0;

        let release = FrameInput {
            jump_released: true,
            ..FrameInput::default()
        };
        movement.handle_input(&mut state, &release, 0.016);

        assert_eq!(state.velocity.y, 3.0);
        assert!(!state.jumping);
    }

    #[test]
    fn test_release_while_falling_keeps_velocity() {
        let movement = movement();
        let mut state = KinematicState::new(Vec2::ZERO);
        state.jumping = true;
        state.velocity.y = -2.0;

        let release = FrameInput {
            jump_released: true,
            ..FrameInput::default()
        };
        movement.handle_input(&mut state, &release, 0.016);

        assert_eq!(state.velocity.y, -2.0);
        assert!(!state.jumping);
    }

    #[test]
    fn test_facing_deadzone() {
        let movement = movement();
        let mut state = KinematicState::new(Vec2::ZERO);

        state.horizontal = -0.005;
        assert!(!movement.update_facing(&mut state));
        assert_eq!(state.facing, Facing::Right);

        state.horizontal = -0.5;
        assert!(movement.update_facing(&mut state));
        assert_eq!(state.facing, Facing::Left);

        state.horizontal = -1.0;
        assert!(!movement.update_facing(&mut state));
    }

    #[test]
    fn test_run_boost() {
        let mut movement = movement();
        movement.activate_run_boost();
        assert!((movement.walk_speed() - 6.25).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn jump_accepted_iff_coyote_positive(remaining in 0.0f32..0.3, dt in 0.0f32..0.1) {
            let movement = movement();
            let mut state = KinematicState::new(Vec2::ZERO);
            state.grounded = false;
            state.coyote_remaining = remaining;

            let budget = (remaining - dt).max(0.0);
            let outcome = movement.handle_input(&mut state, &jump_press(), dt);

            if budget > 0.0 {
                prop_assert_eq!(outcome, JumpOutcome::Accepted);
            } else {
                prop_assert_eq!(outcome, JumpOutcome::NoCoyoteTime);
            }
            prop_assert_eq!(state.coyote_remaining, 0.0);
        }
    }
}
