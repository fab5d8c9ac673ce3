//! Torch placement and pickup.

use louhos_common::{snap_torch_position, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::inventory::InventoryLedger;
use crate::physics::TorchField;

/// Result of pressing the torch button.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TorchOutcome {
    /// A torch was mounted at this point
    Placed(Vec2),
    /// Nearby torches were taken back into the inventory
    PickedUp(u32),
    /// Nothing nearby and no torch carried
    NoTorches,
}

impl TorchOutcome {
    /// Checks if the world's torches changed.
    #[must_use]
    pub fn changed_world(self) -> bool {
        !matches!(self, Self::NoTorches)
    }
}

/// Picks up every torch inside the checker box around `position`, or, if
/// there are none, mounts a carried torch on the current tile.
pub fn use_torch<F, L>(field: &mut F, ledger: &mut L, position: Vec2, checker: Vec2) -> TorchOutcome
where
    F: TorchField + ?Sized,
    L: InventoryLedger + ?Sized,
{
    let nearby = field.torches_in(position, checker);
    if !nearby.is_empty() {
        let picked = nearby
            .into_iter()
            .filter(|&id| field.remove_torch(id))
            .count() as u32;
        ledger.add_torch(picked);
        debug!(picked, "Picked up torches");
        return TorchOutcome::PickedUp(picked);
    }

    if !ledger.has_torches() || !ledger.remove_torch(1) {
        return TorchOutcome::NoTorches;
    }

    let mount = snap_torch_position(position);
    let id = field.place_torch(mount);
    debug!(torch = id.raw(), x = mount.x, y = mount.y, "Placed torch");
    TorchOutcome::Placed(mount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{Inventory, Item};
    use crate::physics::GridWorld;

    const CHECKER: Vec2 = Vec2::new(1.0, 1.0);

    #[test]
    fn test_place_then_pick_up() {
        let mut world = GridWorld::new();
        let mut ledger = Inventory::new(10).with_item(Item::Torch, 2);
        let position = Vec2::new(3.2, 0.9);

        let placed = use_torch(&mut world, &mut ledger, position, CHECKER);
        assert_eq!(placed, TorchOutcome::Placed(Vec2::new(3.5, 0.75)));
        assert_eq!(ledger.torches(), 1);
        assert_eq!(world.torch_count(), 1);

        let picked = use_torch(&mut world, &mut ledger, position, CHECKER);
        assert_eq!(picked, TorchOutcome::PickedUp(1));
        assert_eq!(ledger.torches(), 2);
        assert_eq!(world.torch_count(), 0);
    }

    #[test]
    fn test_pick_up_takes_every_nearby_torch() {
        let mut world = GridWorld::new();
        world.place_torch(Vec2::new(0.3, 0.2));
        world.place_torch(Vec2::new(-0.3, -0.2));
        world.place_torch(Vec2::new(5.0, 0.0));
        let mut ledger = Inventory::new(10);

        let outcome = use_torch(&mut world, &mut ledger, Vec2::ZERO, CHECKER);

        assert_eq!(outcome, TorchOutcome::PickedUp(2));
        assert_eq!(ledger.torches(), 2);
        assert_eq!(world.torch_count(), 1);
    }

    #[test]
    fn test_nothing_to_place() {
        let mut world = GridWorld::new();
        let mut ledger = Inventory::new(10);

        let outcome = use_torch(&mut world, &mut ledger, Vec2::ZERO, CHECKER);

        assert_eq!(outcome, TorchOutcome::NoTorches);
        assert!(!outcome.changed_world());
        assert_eq!(world.torch_count(), 0);
    }
}
