//! # Louhos Gameplay
//!
//! Player controller for Louhos.
//!
//! This crate provides the character logic of the mining game:
//! - Walking, coyote-time jumps and early-release jump cutoff
//! - Wall climbing driven by a facing-side probe
//! - Aiming, dig sessions and the two-phase break/end handshake
//! - Torches and stamina potions
//! - Stamina drain and the intoxication economy
//! - Screen effect parameters and semantic action events
//! - A logical-clock scheduler for the periodic tasks
//! - A tile-grid world implementing the physics probes

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod animation;
pub mod climb;
pub mod config;
pub mod controller;
pub mod dig;
pub mod events;
pub mod input;
pub mod inventory;
pub mod movement;
pub mod physics;
pub mod resources;
pub mod scheduler;
pub mod screen_effects;
pub mod session;
pub mod state;
pub mod tool;
pub mod torch;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::animation::*;
    pub use crate::climb::*;
    pub use crate::config::*;
    pub use crate::controller::*;
    pub use crate::dig::*;
    pub use crate::events::*;
    pub use crate::input::*;
    pub use crate::inventory::*;
    pub use crate::movement::*;
    pub use crate::physics::*;
    pub use crate::resources::*;
    pub use crate::scheduler::*;
    pub use crate::screen_effects::*;
    pub use crate::session::*;
    pub use crate::state::*;
    pub use crate::tool::*;
    pub use crate::torch::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use louhos_common::{CellCoord, LayerMask, Vec2};

    #[test]
    fn test_prelude_builds_controller() {
        let mut world = GridWorld::new();
        world.fill_rect(
            CellCoord::new(-4, -1),
            CellCoord::new(4, -1),
            LayerMask::GROUND | LayerMask::DIGGABLE,
        );
        let mut controller = PlayerController::new(
            ControllerConfig::default(),
            world,
            Inventory::new(50),
            Vec2::new(0.5, 0.9),
        );

        let tick = controller.fixed_update(1.0 / 60.0);

        assert!(tick.grounded);
        assert_eq!(controller.inventory().stamina(), 50);
    }

    #[test]
    fn test_events_reach_channel_subscriber() {
        let mut controller = PlayerController::new(
            ControllerConfig::default(),
            GridWorld::new(),
            Inventory::new(10).with_item(Item::Torch, 1),
            Vec2::ZERO,
        );
        let (sink, receiver) = ChannelSink::new(8);
        controller.subscribe(Box::new(sink));

        let input = FrameInput {
            torch_pressed: true,
            ..FrameInput::default()
        };
        controller.update(&input, 0.016);

        assert_eq!(receiver.try_recv().ok(), Some(GameEvent::PlaceTorch));
    }
}
