//! Decision seam between the battle loop and whoever controls a side.

use crate::battle::actions::ultimate_available;
use crate::battle::energy::TeamEnergyLedger;
use crate::battle::state::{Battlefield, UnitRef};

/// What an actor wants to do on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionChoice {
    /// Ask for the ultimate; the loop falls back to a basic if it is unavailable.
    pub use_ultimate: bool,
    /// Preferred target for single-target patterns. Ignored when invalid.
    pub manual_target: Option<UnitRef>,
}

impl ActionChoice {
    pub fn basic() -> Self {
        Self::default()
    }

    pub fn ultimate() -> Self {
        Self {
            use_ultimate: true,
            manual_target: None,
        }
    }

    pub fn targeting(mut self, target: UnitRef) -> Self {
        self.manual_target = Some(target);
        self
    }
}

/// A trait for any system that can pick an action for a combatant.
///
/// Implementations only read the field; all randomness and mutation stay in
/// the loop so a behavior cannot break replay determinism.
pub trait Behavior {
    fn decide_action(
        &self,
        actor: UnitRef,
        field: &Battlefield,
        ledger: &TeamEnergyLedger,
    ) -> ActionChoice;
}

/// Fires the ultimate whenever it is available, otherwise attacks. Leaves
/// every target choice to the resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoBehavior;

impl AutoBehavior {
    pub fn new() -> Self {
        Self
    }
}

impl Behavior for AutoBehavior {
    fn decide_action(
        &self,
        actor: UnitRef,
        field: &Battlefield,
        ledger: &TeamEnergyLedger,
    ) -> ActionChoice {
        if ultimate_available(field, actor, ledger) {
            ActionChoice::ultimate()
        } else {
            ActionChoice::basic()
        }
    }
}
