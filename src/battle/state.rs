use crate::combatant::Combatant;
use crate::status_effects::StackOutcome;
use schema::{PassiveTrigger, Side, StatusEffectKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to one combatant: its side and its index in that side's roster.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitRef {
    pub side: Side,
    pub index: usize,
}

impl UnitRef {
    pub fn new(side: Side, index: usize) -> Self {
        Self { side, index }
    }

    pub fn player(index: usize) -> Self {
        Self::new(Side::Player, index)
    }

    pub fn enemy(index: usize) -> Self {
        Self::new(Side::Enemy, index)
    }
}

impl fmt::Display for UnitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.side, self.index)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    InProgress,
    /// No living enemies, at least one living player unit.
    Victory,
    /// No living player units, including a simultaneous wipe.
    Defeat,
    /// Turn cap reached with both sides standing.
    TurnLimit,
}

impl BattleOutcome {
    pub fn is_terminal(self) -> bool {
        self != BattleOutcome::InProgress
    }
}

/// Both rosters of a battle, indexed by `Side::index()`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Battlefield {
    pub teams: [Vec<Combatant>; 2],
}

impl Battlefield {
    pub fn new(players: Vec<Combatant>, enemies: Vec<Combatant>) -> Self {
        Self {
            teams: [players, enemies],
        }
    }

    pub fn team(&self, side: Side) -> &[Combatant] {
        &self.teams[side.index()]
    }

    pub fn get(&self, unit: UnitRef) -> Option<&Combatant> {
        self.teams[unit.side.index()].get(unit.index)
    }

    pub fn get_mut(&mut self, unit: UnitRef) -> Option<&mut Combatant> {
        self.teams[unit.side.index()].get_mut(unit.index)
    }

    pub fn is_alive(&self, unit: UnitRef) -> bool {
        self.get(unit).is_some_and(|c| c.is_alive())
    }

    /// Living members of `side`, in roster order.
    pub fn living(&self, side: Side) -> Vec<UnitRef> {
        self.team(side)
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_alive())
            .map(|(i, _)| UnitRef::new(side, i))
            .collect()
    }

    /// Living allies of `unit`, excluding `unit` itself.
    pub fn living_allies_excluding(&self, unit: UnitRef) -> Vec<UnitRef> {
        self.living(unit.side)
            .into_iter()
            .filter(|u| *u != unit)
            .collect()
    }

    /// Every combatant, players first, each roster in order.
    pub fn all_units(&self) -> Vec<UnitRef> {
        [Side::Player, Side::Enemy]
            .into_iter()
            .flat_map(|side| (0..self.team(side).len()).map(move |i| UnitRef::new(side, i)))
            .collect()
    }

    pub fn name_of(&self, unit: UnitRef) -> String {
        self.get(unit)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| unit.to_string())
    }

    /// Classifies the field from the player side's point of view.
    pub fn evaluate_outcome(&self) -> BattleOutcome {
        let players_alive = !self.living(Side::Player).is_empty();
        let enemies_alive = !self.living(Side::Enemy).is_empty();
        match (players_alive, enemies_alive) {
            (false, _) => BattleOutcome::Defeat,
            (true, false) => BattleOutcome::Victory,
            (true, true) => BattleOutcome::InProgress,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded {
        turn_number: u32,
    },

    // Actions
    ActionStarted {
        actor: UnitRef,
        is_ultimate: bool,
    },
    ActionSkipped {
        actor: UnitRef,
        reason: SkipReason,
    },
    UltimateUnavailable {
        actor: UnitRef,
        energy: i32,
        cost: i32,
        cooldown: i32,
    },
    DamageDealt {
        attacker: UnitRef,
        target: UnitRef,
        damage: i32,
        absorbed: i32,
        is_crit: bool,
        remaining_hp: i32,
    },
    Healed {
        target: UnitRef,
        amount: i32,
        new_hp: i32,
    },
    BurnDamage {
        target: UnitRef,
        damage: i32,
        remaining_hp: i32,
    },
    UnitDefeated {
        unit: UnitRef,
    },

    // Status Effects
    StatusApplied {
        target: UnitRef,
        kind: StatusEffectKind,
        outcome: StackOutcome,
    },
    StatusExpired {
        target: UnitRef,
        kind: StatusEffectKind,
    },

    // Passives
    PassiveTriggered {
        owner: UnitRef,
        trigger: PassiveTrigger,
        targets: Vec<UnitRef>,
    },

    // Energy
    EnergyGained {
        side: Side,
        amount: i32,
        new_total: i32,
    },
    EnergySpent {
        side: Side,
        amount: i32,
        new_total: i32,
    },

    // Battle End
    BattleEnded {
        outcome: BattleOutcome,
        turns_elapsed: u32,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Stunned,
    DiedToBurn,
}

impl BattleEvent {
    /// Formats the event into a human-readable line using the field for names.
    /// Returns None for silent events.
    pub fn format(&self, field: &Battlefield) -> Option<String> {
        let name = |unit: &UnitRef| field.name_of(*unit);
        match self {
            BattleEvent::TurnStarted { turn_number } => {
                Some(format!("=== Turn {} ===", turn_number))
            }
            BattleEvent::TurnEnded { .. } => None,
            BattleEvent::ActionStarted { actor, is_ultimate } => {
                if *is_ultimate {
                    Some(format!("{} unleashes an ultimate!", name(actor)))
                } else {
                    None
                }
            }
            BattleEvent::ActionSkipped { actor, reason } => match reason {
                SkipReason::Stunned => Some(format!("{} is stunned and cannot act.", name(actor))),
                SkipReason::DiedToBurn => None,
            },
            BattleEvent::UltimateUnavailable { .. } => None,
            BattleEvent::DamageDealt {
                attacker,
                target,
                damage,
                absorbed,
                is_crit,
                ..
            } => {
                let crit = if *is_crit { " Critical hit!" } else { "" };
                let shield = if *absorbed > 0 {
                    format!(" ({} absorbed by shields)", absorbed)
                } else {
                    String::new()
                };
                Some(format!(
                    "{} hits {} for {}{}.{}",
                    name(attacker),
                    name(target),
                    damage,
                    shield,
                    crit
                ))
            }
            BattleEvent::Healed { target, amount, .. } => {
                Some(format!("{} recovered {} HP!", name(target), amount))
            }
            BattleEvent::BurnDamage { target, damage, .. } => {
                Some(format!("{} is hurt by its burn! ({} damage)", name(target), damage))
            }
            BattleEvent::UnitDefeated { unit } => Some(format!("{} was defeated!", name(unit))),
            BattleEvent::StatusApplied {
                target,
                kind,
                outcome,
            } => match outcome {
                StackOutcome::Discarded => None,
                _ => Some(format!("{} gained {}.", name(target), kind)),
            },
            BattleEvent::StatusExpired { target, kind } => {
                Some(format!("{}'s {} wore off.", name(target), kind))
            }
            BattleEvent::PassiveTriggered { owner, trigger, .. } => {
                let passive = field
                    .get(*owner)
                    .and_then(|c| c.passive.as_ref())
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| trigger.to_string());
                Some(format!("{}'s {} activates!", name(owner), passive))
            }
            BattleEvent::EnergyGained { .. } | BattleEvent::EnergySpent { .. } => None,
            BattleEvent::BattleEnded {
                outcome,
                turns_elapsed,
            } => Some(format!(
                "Battle ended: {:?} after {} turns.",
                outcome, turns_elapsed
            )),
        }
    }
}

/// Event bus for collecting battle events.
///
/// Purely advisory: nothing in the core reads events back, so dropping or
/// ignoring them never changes an outcome.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        log::trace!(target: "skirmish::event", "{:?}", event);
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Removes and returns everything collected so far.
    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Print all events in debug format with indentation.
    pub fn print_debug(&self) {
        for event in &self.events {
            println!("  {:?}", event);
        }
    }

    /// Print all events in debug format with a custom prefix message.
    pub fn print_debug_with_message(&self, message: &str) {
        println!("{}", message);
        self.print_debug();
    }

    /// Print all non-silent events as human-readable lines.
    pub fn print_formatted(&self, field: &Battlefield) {
        for event in &self.events {
            if let Some(line) = event.format(field) {
                println!("  {}", line);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl fmt::Display for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}
