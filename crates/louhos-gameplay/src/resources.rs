//! Stamina and intoxication economy.
//!
//! Stamina itself is stored by the [`InventoryLedger`]; the economy decides
//! how much to move and guarantees the pool stays inside `[0, max]`.
//! Intoxication is owned here. It rises with every potion, decays on the
//! slow tick and escalates through [`IntoxicationTier`]s; crossing into
//! `Critical` is reported exactly once until the level drops back.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{IntoxicationConfig, StaminaConfig};
use crate::inventory::InventoryLedger;

/// Effect tier derived from the intoxication level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum IntoxicationTier {
    /// No screen effects
    #[default]
    None,
    /// Distortion and camera sway
    Mild,
    /// Mild effects plus hue cycling
    Strong,
    /// The session ends
    Critical,
}

impl IntoxicationTier {
    /// Checks if this tier drives any screen effect.
    #[must_use]
    pub const fn has_effects(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Result of drinking a potion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PotionOutcome {
    /// A potion was consumed
    Consumed {
        /// Stamina actually restored
        restored: u32,
        /// Intoxication level afterwards
        intoxication: f32,
    },
    /// No potion was carried
    NoPotions,
}

/// What one slow tick did.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SlowTickReport {
    /// Stamina drained this tick
    pub drained: u32,
    /// Intoxication level after decay
    pub intoxication: f32,
}

/// Stamina drain/refill rules and the intoxication level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceEconomy {
    stamina: StaminaConfig,
    intoxication_config: IntoxicationConfig,
    intoxication: f32,
    passive_drain_active: bool,
    critical_latched: bool,
    critical_pending: bool,
}

impl ResourceEconomy {
    /// Creates an economy with zero intoxication.
    #[must_use]
    pub fn new(stamina: StaminaConfig, intoxication_config: IntoxicationConfig) -> Self {
        Self {
            stamina,
            intoxication_config,
            intoxication: 0.0,
            passive_drain_active: true,
            critical_latched: false,
            critical_pending: false,
        }
    }

    /// Returns the stamina tuning.
    #[must_use]
    pub fn stamina_config(&self) -> &StaminaConfig {
        &self.stamina
    }

    /// Subtracts stamina, clamped at zero. Returns the amount removed.
    pub fn drain_stamina<L: InventoryLedger + ?Sized>(&self, ledger: &mut L, amount: u32) -> u32 {
        let drained = amount.min(ledger.stamina());
        if drained > 0 {
            ledger.remove_stamina(drained);
        }
        drained
    }

    /// Adds stamina, clamped at the ledger's maximum. Returns the amount added.
    pub fn refill_stamina<L: InventoryLedger + ?Sized>(&self, ledger: &mut L, amount: u32) -> u32 {
        let room = ledger.max_stamina().saturating_sub(ledger.stamina());
        let added = amount.min(room);
        if added > 0 {
            ledger.add_stamina(added);
        }
        added
    }

    /// Drinks one potion if carried: restores `floor(max × replenish)`
    /// stamina and raises intoxication by the configured gain.
    pub fn consume_potion<L: InventoryLedger + ?Sized>(&mut self, ledger: &mut L) -> PotionOutcome {
        if !ledger.has_potions() || !ledger.remove_potion(1) {
            debug!("No stamina potion to drink");
            return PotionOutcome::NoPotions;
        }

        let amount = (ledger.max_stamina() as f32 * self.stamina.potion_replenish).floor() as u32;
        let restored = self.refill_stamina(ledger, amount);
        self.intoxication += self.intoxication_config.potion_gain;
        self.track_critical();

        debug!(restored, intoxication = self.intoxication, "Drank stamina potion");
        PotionOutcome::Consumed {
            restored,
            intoxication: self.intoxication,
        }
    }

    /// Lowers intoxication by the per-tick decay, floored at zero.
    pub fn decay_intoxication(&mut self) {
        self.intoxication = (self.intoxication - self.intoxication_config.decay_per_tick).max(0.0);
        self.track_critical();
    }

    /// Runs one slow tick: the climb or passive drain (never both) and
    /// intoxication decay.
    pub fn slow_tick<L: InventoryLedger + ?Sized>(
        &mut self,
        ledger: &mut L,
        climbing: bool,
    ) -> SlowTickReport {
        let drained = if self.passive_drain_active {
            let cost = if climbing {
                self.stamina.climb_cost
            } else {
                self.stamina.passive_cost
            };
            self.drain_stamina(ledger, cost)
        } else {
            0
        };
        self.decay_intoxication();

        SlowTickReport {
            drained,
            intoxication: self.intoxication,
        }
    }

    /// Returns whether the slow tick drains stamina.
    #[must_use]
    pub fn passive_drain_active(&self) -> bool {
        self.passive_drain_active
    }

    /// Suspends or resumes the slow-tick stamina drain.
    pub fn set_passive_drain_active(&mut self, active: bool) {
        self.passive_drain_active = active;
    }

    /// Returns the intoxication level.
    #[must_use]
    pub fn intoxication(&self) -> f32 {
        self.intoxication
    }

    /// Sets the intoxication level, floored at zero.
    pub fn set_intoxication(&mut self, level: f32) {
        self.intoxication = level.max(0.0);
        self.track_critical();
    }

    /// Maps the current level to its tier.
    #[must_use]
    pub fn intoxication_tier(&self) -> IntoxicationTier {
        self.intoxication_config.tier(self.intoxication)
    }

    /// Normalized effect intensity in [0, 1].
    #[must_use]
    pub fn intensity(&self) -> f32 {
        self.intoxication_config.intensity(self.intoxication)
    }

    /// Returns true exactly once for each crossing into `Critical`, even
    /// when the level has already decayed back below the threshold.
    pub fn take_critical_crossing(&mut self) -> bool {
        if !self.critical_pending {
            return false;
        }
        self.critical_pending = false;
        info!(level = self.intoxication, "Intoxication reached critical");
        true
    }

    /// Latches a crossing whenever the level changes. The latch re-arms
    /// once the level is back below `Critical`.
    fn track_critical(&mut self) {
        if self.intoxication_tier() == IntoxicationTier::Critical {
            if !self.critical_latched {
                self.critical_latched = true;
                self.critical_pending = true;
            }
        } else {
            self.critical_latched = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{Inventory, Item};
    use proptest::prelude::*;

    fn economy() -> ResourceEconomy {
        ResourceEconomy::new(StaminaConfig::default(), IntoxicationConfig::default())
    }

    #[test]
    fn test_slow_tick_climb_vs_passive() {
        let mut economy = economy();
        let mut ledger = Inventory::new(100);

        ledger.set_stamina(10);
        let report = economy.slow_tick(&mut ledger, true);
        assert_eq!(report.drained, 3);
        assert_eq!(ledger.stamina(), 7);

        ledger.set_stamina(10);
        economy.slow_tick(&mut ledger, false);
        assert_eq!(ledger.stamina(), 9);
    }

    #[test]
    fn test_slow_tick_respects_suspended_drain() {
        let mut economy = economy();
        let mut ledger = Inventory::new(100);
        economy.set_intoxication(5.0);
        economy.set_passive_drain_active(false);

        let report = economy.slow_tick(&mut ledger, true);

        assert_eq!(report.drained, 0);
        assert_eq!(ledger.stamina(), 100);
        assert_eq!(economy.intoxication(), 4.0);
    }

    #[test]
    fn test_drain_and_refill_clamp() {
        let economy = economy();
        let mut ledger = Inventory::new(20);
        ledger.set_stamina(4);

        assert_eq!(economy.drain_stamina(&mut ledger, 10), 4);
        assert_eq!(ledger.stamina(), 0);
        assert_eq!(economy.refill_stamina(&mut ledger, 50), 20);
        assert_eq!(ledger.stamina(), 20);
    }

    #[test]
    fn test_potion_scenario() {
        let mut economy = economy();
        let mut ledger = Inventory::new(100).with_item(Item::StaminaPotion, 1);
        ledger.set_stamina(50);
        economy.set_intoxication(90.0);

        let outcome = economy.consume_potion(&mut ledger);

        assert_eq!(
            outcome,
            PotionOutcome::Consumed {
                restored: 20,
                intoxication: 130.0
            }
        );
        assert_eq!(ledger.stamina(), 70);
        assert_eq!(economy.intoxication_tier(), IntoxicationTier::Mild);
        assert!((economy.intensity() - 0.3).abs() < 1e-6);
        assert_eq!(economy.consume_potion(&mut ledger), PotionOutcome::NoPotions);
        assert_eq!(economy.intoxication(), 130.0);
    }

    #[test]
    fn test_potion_floors_replenish() {
        let mut economy = economy();
        let mut ledger = Inventory::new(37).with_item(Item::StaminaPotion, 1);
        ledger.set_stamina(0);

        economy.consume_potion(&mut ledger);

        // floor(37 * 0.2) = 7
        assert_eq!(ledger.stamina(), 7);
    }

    #[test]
    fn test_decay_floors_at_zero() {
        let mut economy = economy();
        economy.set_intoxication(0.5);
        economy.decay_intoxication();
        assert_eq!(economy.intoxication(), 0.0);
        economy.decay_intoxication();
        assert_eq!(economy.intoxication(), 0.0);
    }

    #[test]
    fn test_critical_crossing_fires_once() {
        let mut economy = economy();
        economy.set_intoxication(210.0);

        assert!(economy.take_critical_crossing());
        assert!(!economy.take_critical_crossing());
        economy.set_intoxication(205.0);
        assert!(!economy.take_critical_crossing());

        economy.set_intoxication(190.0);
        assert!(!economy.take_critical_crossing());
        economy.set_intoxication(201.0);
        assert!(economy.take_critical_crossing());
    }

    #[test]
    fn test_critical_crossing_survives_decay() {
        let mut economy = economy();
        let mut ledger = Inventory::new(100).with_item(Item::StaminaPotion, 1);
        economy.set_intoxication(160.5);

        economy.consume_potion(&mut ledger);
        assert_eq!(economy.intoxication(), 200.5);
        economy.slow_tick(&mut ledger, false);
        assert_eq!(economy.intoxication(), 199.5);

        assert!(economy.take_critical_crossing());
        assert!(!economy.take_critical_crossing());
    }

    proptest! {
        #[test]
        fn stamina_stays_in_range(
            max in 1u32..500,
            ops in proptest::collection::vec((any::<bool>(), 0u32..300), 0..100),
        ) {
            let economy = economy();
            let mut ledger = Inventory::new(max);
            for (drain, amount) in ops {
                if drain {
                    economy.drain_stamina(&mut ledger, amount);
                } else {
                    economy.refill_stamina(&mut ledger, amount);
                }
                prop_assert!(ledger.stamina() <= max);
            }
        }

        #[test]
        fn decay_is_monotone(start in 0.0f32..400.0, ticks in 0usize..500) {
            let mut economy = economy();
            economy.set_intoxication(start);
            let mut previous = economy.intoxication();
            for _ in 0..ticks {
                economy.decay_intoxication();
                prop_assert!(economy.intoxication() <= previous);
                prop_assert!(economy.intoxication() >= 0.0);
                previous = economy.intoxication();
            }
        }
    }
}
