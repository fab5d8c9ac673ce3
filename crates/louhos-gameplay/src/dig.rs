//! Aiming and dig sessions.
//!
//! Digging is a two-phase handshake driven from outside. The controller
//! only opens a [`DigSession`]; the animation layer later calls
//! [`Dig::break_block`] once per completed swing (damage and cost) and
//! [`Dig::end_dig`] to close the session. Either signal may arrive in any
//! order, or without the other.

use louhos_common::{snap_to_cell_center, CellCoord, LayerMask, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::inventory::InventoryLedger;
use crate::physics::{PhysicsProbe, TerrainQuery};
use crate::resources::ResourceEconomy;
use crate::state::KinematicState;
use crate::tool::ToolDescriptor;

/// A live dig.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DigSession {
    /// Targeted cell
    pub cell: CellCoord,
    /// Scheduler time the session opened at
    pub started_at: f64,
}

/// Result of a dig start attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DigStart {
    /// A session opened on this cell
    Started {
        /// Targeted cell
        cell: CellCoord,
        /// Tier of the tool, for the dig animation
        tier: u8,
    },
    /// A session is already live
    AlreadyActive,
    /// Climbing characters cannot dig
    Climbing,
    /// Only grounded characters can dig
    Airborne,
    /// Nothing diggable is highlighted
    NoTarget,
    /// The dig button is not held
    NotHeld,
}

/// Result of a break signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BreakOutcome {
    /// Damage dealt and energy charged
    Struck {
        /// Struck cell
        cell: CellCoord,
        /// Tool damage
        damage: f32,
    },
    /// Out of stamina: no damage, no cost, session stays open
    InsufficientStamina,
    /// No session to strike for
    NoSession,
}

/// Aim highlight and the current dig session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dig {
    bias: f32,
    mask: LayerMask,
    highlight: Option<CellCoord>,
    session: Option<DigSession>,
}

impl Dig {
    /// Creates dig rules. `bias` pushes hit points into the struck tile.
    #[must_use]
    pub fn new(bias: f32, mask: LayerMask) -> Self {
        Self {
            bias,
            mask,
            highlight: None,
            session: None,
        }
    }

    /// Currently highlighted cell, if any.
    #[must_use]
    pub fn highlight(&self) -> Option<CellCoord> {
        self.highlight
    }

    /// The live session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&DigSession> {
        self.session.as_ref()
    }

    /// Checks if a session is live.
    #[must_use]
    pub fn is_digging(&self) -> bool {
        self.session.is_some()
    }

    /// Refreshes the highlight by casting from the character toward `aim`
    /// for the tool's range.
    ///
    /// The highlight is cleared first and stays cleared while climbing or
    /// airborne.
    pub fn aim<W: PhysicsProbe + TerrainQuery + ?Sized>(
        &mut self,
        world: &W,
        state: &KinematicState,
        aim: Vec2,
        tool: &ToolDescriptor,
    ) -> Option<CellCoord> {
        self.highlight = None;

        if state.climbing || !state.grounded {
            return None;
        }

        let hit = world.ray_cast(state.position, aim - state.position, tool.range, self.mask)?;
        let inside = hit.point - hit.normal * self.bias;
        let center = snap_to_cell_center(inside);

        if world.cell_exists_at(center) {
            self.highlight = Some(CellCoord::from_world(center));
        }
        self.highlight
    }

    /// Opens a session on the highlighted cell if every precondition holds.
    pub fn try_start(
        &mut self,
        state: &KinematicState,
        dig_held: bool,
        tool: &ToolDescriptor,
        now: f64,
    ) -> DigStart {
        if self.session.is_some() {
            return DigStart::AlreadyActive;
        }
        if state.climbing {
            return DigStart::Climbing;
        }
        if !state.grounded {
            return DigStart::Airborne;
        }
        let Some(cell) = self.highlight else {
            return DigStart::NoTarget;
        };
        if !dig_held {
            return DigStart::NotHeld;
        }

        self.session = Some(DigSession {
            cell,
            started_at: now,
        });
        debug!(x = cell.x, y = cell.y, tier = tool.tier, "Dig started");
        DigStart::Started {
            cell,
            tier: tool.tier,
        }
    }

    /// Break signal: strikes the session's cell if any stamina is left and
    /// charges the tool's energy cost. Never closes the session.
    pub fn break_block<L: InventoryLedger + ?Sized>(
        &self,
        ledger: &mut L,
        economy: &ResourceEconomy,
        tool: &ToolDescriptor,
    ) -> BreakOutcome {
        let Some(session) = self.session else {
            trace!("Break signal without a dig session ignored");
            return BreakOutcome::NoSession;
        };

        if !ledger.has_stamina() {
            debug!("Dig strike skipped, no stamina");
            return BreakOutcome::InsufficientStamina;
        }

        economy.drain_stamina(ledger, tool.energy_cost);
        BreakOutcome::Struck {
            cell: session.cell,
            damage: tool.damage,
        }
    }

    /// End signal: closes the session unconditionally. Returns whether one
    /// was open.
    pub fn end_dig(&mut self) -> bool {
        let ended = self.session.take().is_some();
        if ended {
            debug!("Dig ended");
        }
        ended
    }
}
