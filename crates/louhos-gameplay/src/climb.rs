//! Wall climbing.
//!
//! Each physics tick a small box is swept from just below the body center
//! toward the facing side. A hit starts or keeps a climb when the character
//! is off the ground, or when it is grounded and pushing up into the wall.

use louhos_common::{LayerMask, Vec2};
use tracing::debug;

use crate::config::ProbeConfig;
use crate::physics::PhysicsProbe;
use crate::state::KinematicState;

/// Flags that changed during a climb step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClimbChange {
    /// `climbing` flipped
    pub climbing: bool,
    /// `climbing_moving` flipped
    pub climbing_moving: bool,
}

/// Climb probe and velocity rules.
#[derive(Debug, Clone)]
pub struct Climb {
    speed: f32,
    probe_box: Vec2,
    probe_distance: f32,
    probe_drop: f32,
    mask: LayerMask,
}

impl Climb {
    /// Creates climb rules.
    #[must_use]
    pub fn new(speed: f32, probes: &ProbeConfig, mask: LayerMask) -> Self {
        Self {
            speed,
            probe_box: probes.climb_box,
            probe_distance: probes.climb_distance,
            probe_drop: probes.climb_drop,
            mask,
        }
    }

    /// Checks for a climbable surface in front of the character.
    pub fn probe<P: PhysicsProbe + ?Sized>(&self, world: &P, state: &KinematicState) -> bool {
        let origin = Vec2::new(state.position.x, state.position.y - self.probe_drop);
        world.box_cast(
            origin,
            self.probe_box,
            0.0,
            state.facing.to_vec2(),
            self.probe_distance,
            self.mask,
        )
    }

    /// Resolves the climb flags and, while climbing, the vertical velocity.
    ///
    /// Must run after the grounded flag was refreshed for this tick.
    pub fn step<P: PhysicsProbe + ?Sized>(&self, world: &P, state: &mut KinematicState) -> ClimbChange {
        let was_climbing = state.climbing;
        let was_moving = state.climbing_moving;

        let climbing = self.probe(world, state) && (!state.grounded || state.vertical > 0.0);
        state.climbing = climbing;
        state.climbing_moving = climbing && state.vertical != 0.0;

        if climbing {
            state.velocity.y = state.vertical * self.speed;
        }

        if climbing != was_climbing {
            debug!(climbing, x = state.position.x, y = state.position.y, "Climb state changed");
        }

        ClimbChange {
            climbing: climbing != was_climbing,
            climbing_moving: state.climbing_moving != was_moving,
        }
    }
}
