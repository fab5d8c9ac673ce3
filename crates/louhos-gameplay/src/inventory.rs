//! Inventory system: carried items and the stamina pool.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Inventory error types.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Not enough items
    #[error("Not enough items: need {needed}, have {have}")]
    NotEnough {
        /// Amount needed
        needed: u32,
        /// Amount available
        have: u32,
    },
}

/// Result type for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Items a miner can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    /// Placeable light source
    Torch,
    /// Restores stamina, raises intoxication
    StaminaPotion,
}

/// Item counts and stamina as seen by the controller.
///
/// Implementations clamp stamina into `[0, max_stamina]` themselves; the
/// resource economy also never asks for more than fits.
pub trait InventoryLedger {
    /// Current stamina.
    fn stamina(&self) -> u32;

    /// Stamina ceiling.
    fn max_stamina(&self) -> u32;

    /// Adds stamina, clamped at the ceiling.
    fn add_stamina(&mut self, amount: u32);

    /// Removes stamina, clamped at zero.
    fn remove_stamina(&mut self, amount: u32);

    /// Number of potions carried.
    fn potions(&self) -> u32;

    /// Removes potions, returning whether there were enough.
    fn remove_potion(&mut self, amount: u32) -> bool;

    /// Number of torches carried.
    fn torches(&self) -> u32;

    /// Adds torches.
    fn add_torch(&mut self, amount: u32);

    /// Removes torches, returning whether there were enough.
    fn remove_torch(&mut self, amount: u32) -> bool;

    /// Checks if any stamina is left.
    fn has_stamina(&self) -> bool {
        self.stamina() > 0
    }

    /// Checks if at least `cost` stamina is left.
    fn has_stamina_for(&self, cost: u32) -> bool {
        self.stamina() >= cost
    }

    /// Checks if at least one potion is carried.
    fn has_potions(&self) -> bool {
        self.potions() > 0
    }

    /// Checks if at least one torch is carried.
    fn has_torches(&self) -> bool {
        self.torches() > 0
    }
}

/// An inventory container with a stamina pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    /// Items and their quantities
    items: HashMap<Item, u32>,
    /// Current stamina
    stamina: u32,
    /// Maximum stamina
    max_stamina: u32,
}

impl Inventory {
    /// Creates an empty inventory with full stamina.
    #[must_use]
    pub fn new(max_stamina: u32) -> Self {
        Self {
            items: HashMap::new(),
            stamina: max_stamina,
            max_stamina,
        }
    }

    /// Sets the starting item count (builder style).
    #[must_use]
    pub fn with_item(mut self, item: Item, amount: u32) -> Self {
        self.add(item, amount);
        self
    }

    /// Sets the current stamina, clamped to the ceiling.
    pub fn set_stamina(&mut self, stamina: u32) {
        self.stamina = stamina.min(self.max_stamina);
    }

    /// Returns the count of a specific item.
    #[must_use]
    pub fn count(&self, item: Item) -> u32 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    /// Checks if the inventory contains at least the given amount.
    #[must_use]
    pub fn has(&self, item: Item, amount: u32) -> bool {
        self.count(item) >= amount
    }

    /// Adds items to the inventory.
    pub fn add(&mut self, item: Item, amount: u32) {
        if amount == 0 {
            return;
        }
        *self.items.entry(item).or_insert(0) += amount;
    }

    /// Removes items from the inventory.
    pub fn remove(&mut self, item: Item, amount: u32) -> InventoryResult<()> {
        let current = self.count(item);
        if current < amount {
            return Err(InventoryError::NotEnough {
                needed: amount,
                have: current,
            });
        }
        if current == amount {
            self.items.remove(&item);
        } else {
            self.items.insert(item, current - amount);
        }
        Ok(())
    }

    /// Returns an iterator over all items.
    pub fn iter(&self) -> impl Iterator<Item = (Item, u32)> + '_ {
        self.items.iter().map(|(&item, &count)| (item, count))
    }
}

impl InventoryLedger for Inventory {
    fn stamina(&self) -> u32 {
        self.stamina
    }

    fn max_stamina(&self) -> u32 {
        self.max_stamina
    }

    fn add_stamina(&mut self, amount: u32) {
        self.stamina = self.stamina.saturating_add(amount).min(self.max_stamina);
    }

    fn remove_stamina(&mut self, amount: u32) {
        self.stamina = self.stamina.saturating_sub(amount);
    }

    fn potions(&self) -> u32 {
        self.count(Item::StaminaPotion)
    }

    fn remove_potion(&mut self, amount: u32) -> bool {
        self.remove(Item::StaminaPotion, amount).is_ok()
    }

    fn torches(&self) -> u32 {
        self.count(Item::Torch)
    }

    fn add_torch(&mut self, amount: u32) {
        self.add(Item::Torch, amount);
    }

    fn remove_torch(&mut self, amount: u32) -> bool {
        self.remove(Item::Torch, amount).is_ok()
    }
}
