use crate::battle::actions::{self, ActionResult};
use crate::battle::ai::{AutoBehavior, Behavior};
use crate::battle::energy::TeamEnergyLedger;
use crate::battle::passives::{self, TriggerContext};
use crate::battle::rng::{BattleRng, SeededRng};
use crate::battle::state::{BattleEvent, BattleOutcome, Battlefield, EventBus, SkipReason, UnitRef};
use crate::battle::timeline::TurnTimeline;
use crate::combatant::Combatant;
use crate::config::{check_unique_ids, BattleConfig, EnergyConfig};
use crate::errors::EngineResult;
use schema::{CombatantDefinition, PassiveTrigger, Side};
use serde::{Deserialize, Serialize};

/// One surviving combatant at the time of the snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SurvivorSnapshot {
    pub id: String,
    pub name: String,
    pub current_hp: i32,
    pub max_hp: i32,
    pub unit_energy: i32,
}

impl SurvivorSnapshot {
    fn of(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id.clone(),
            name: combatant.name.clone(),
            current_hp: combatant.current_hp(),
            max_hp: combatant.max_hp(),
            unit_energy: combatant.unit_energy,
        }
    }
}

/// Read-only summary of a battle, final or in progress.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BattleResult {
    pub outcome: BattleOutcome,
    pub turns_elapsed: u32,
    pub player_survivors: Vec<SurvivorSnapshot>,
    pub enemy_survivors: Vec<SurvivorSnapshot>,
    pub player_energy: i32,
    pub enemy_energy: i32,
}

/// Owns one battle's mutable state and drives it turn by turn.
///
/// A turn gives every living combatant one action in timeline order. The run
/// ends on the first terminal outcome or when the turn cap is used up.
/// Callers cancel simply by not advancing any further.
pub struct BattleRunner {
    field: Battlefield,
    ledgers: [TeamEnergyLedger; 2],
    timeline: TurnTimeline,
    rng: Box<dyn BattleRng>,
    behaviors: [Box<dyn Behavior>; 2],
    bus: EventBus,
    bar_percent_per_hit: f64,
    turn_cap: u32,
    turns_elapsed: u32,
    outcome: BattleOutcome,
}

impl BattleRunner {
    /// Sets up a battle from already-built combatants.
    ///
    /// Battle-start passives fire here, players first, each roster in order.
    pub fn new(
        mut players: Vec<Combatant>,
        mut enemies: Vec<Combatant>,
        energy: EnergyConfig,
        turn_cap: u32,
        rng: Box<dyn BattleRng>,
    ) -> EngineResult<Self> {
        energy.validate()?;
        check_unique_ids(players.iter().chain(&enemies).map(|c| c.id.as_str()))?;
        for unit in &mut players {
            unit.side = Side::Player;
        }
        for unit in &mut enemies {
            unit.side = Side::Enemy;
        }

        let ledger = TeamEnergyLedger::new(energy.max_energy, energy.start_energy);
        let mut runner = Self {
            field: Battlefield::new(players, enemies),
            ledgers: [ledger.clone(), ledger],
            timeline: TurnTimeline::new(),
            rng,
            behaviors: [Box::new(AutoBehavior), Box::new(AutoBehavior)],
            bus: EventBus::new(),
            bar_percent_per_hit: energy.bar_percent_per_hit,
            turn_cap,
            turns_elapsed: 0,
            outcome: BattleOutcome::InProgress,
        };

        let outcome = runner.field.evaluate_outcome();
        if outcome.is_terminal() {
            runner.finish(outcome);
            return Ok(runner);
        }

        for unit in runner.field.all_units() {
            passives::trigger(
                &mut runner.field,
                unit,
                PassiveTrigger::BattleStart,
                TriggerContext::none(),
                runner.rng.as_mut(),
                &mut runner.bus,
            );
        }
        let outcome = runner.field.evaluate_outcome();
        if outcome.is_terminal() {
            runner.finish(outcome);
        }
        Ok(runner)
    }

    /// Validates the definitions and builds the combatants.
    pub fn from_definitions(
        players: &[CombatantDefinition],
        enemies: &[CombatantDefinition],
        energy: EnergyConfig,
        turn_cap: u32,
        rng: Box<dyn BattleRng>,
    ) -> EngineResult<Self> {
        let players = players
            .iter()
            .map(|d| Combatant::from_definition(d, Side::Player))
            .collect::<Result<Vec<_>, _>>()?;
        let enemies = enemies
            .iter()
            .map(|d| Combatant::from_definition(d, Side::Enemy))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(players, enemies, energy, turn_cap, rng)
    }

    /// Seeds a `SeededRng` from the config.
    pub fn from_config(config: &BattleConfig) -> EngineResult<Self> {
        Self::from_definitions(
            &config.players,
            &config.enemies,
            config.energy,
            config.turn_cap,
            Box::new(SeededRng::new(config.seed)),
        )
    }

    /// Replaces the decision-maker for one side.
    pub fn with_behavior(mut self, side: Side, behavior: Box<dyn Behavior>) -> Self {
        self.behaviors[side.index()] = behavior;
        self
    }

    // === Queries ===

    pub fn field(&self) -> &Battlefield {
        &self.field
    }

    pub fn outcome(&self) -> BattleOutcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn turns_elapsed(&self) -> u32 {
        self.turns_elapsed
    }

    pub fn turn_cap(&self) -> u32 {
        self.turn_cap
    }

    pub fn ledger(&self, side: Side) -> &TeamEnergyLedger {
        &self.ledgers[side.index()]
    }

    pub fn timeline(&self) -> &TurnTimeline {
        &self.timeline
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    /// Hands over the events collected so far, leaving the bus empty.
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        self.bus.drain()
    }

    pub fn result(&self) -> BattleResult {
        let survivors = |side: Side| {
            self.field
                .team(side)
                .iter()
                .filter(|c| c.is_alive())
                .map(SurvivorSnapshot::of)
                .collect()
        };
        BattleResult {
            outcome: self.outcome,
            turns_elapsed: self.turns_elapsed,
            player_survivors: survivors(Side::Player),
            enemy_survivors: survivors(Side::Enemy),
            player_energy: self.ledgers[Side::Player.index()].energy(),
            enemy_energy: self.ledgers[Side::Enemy.index()].energy(),
        }
    }

    // === Turn loop ===

    /// Runs one full turn and returns every executed action in order.
    /// A finished battle returns nothing and changes nothing.
    pub fn advance_turn(&mut self) -> Vec<ActionResult> {
        if self.outcome.is_terminal() {
            return Vec::new();
        }
        if self.turns_elapsed >= self.turn_cap {
            self.finish(BattleOutcome::TurnLimit);
            return Vec::new();
        }

        self.turns_elapsed += 1;
        let turn_number = self.turns_elapsed;
        self.bus.push(BattleEvent::TurnStarted { turn_number });
        log::debug!(target: "skirmish::turn", "turn {} begins", turn_number);

        let all_units = self.field.all_units();
        self.timeline.rebuild(&self.field, &all_units);

        let mut results = Vec::new();
        for actor in self.timeline.order() {
            if !self.field.is_alive(actor) {
                self.timeline.remove_dead_units(&self.field);
                continue;
            }

            if let Some(result) = self.take_turn(actor) {
                results.push(result);
            }
            self.timeline.remove_dead_units(&self.field);
            self.timeline.roll_after_action(actor, &self.field);

            let outcome = self.field.evaluate_outcome();
            if outcome.is_terminal() {
                self.bus.push(BattleEvent::TurnEnded { turn_number });
                self.finish(outcome);
                return results;
            }
        }

        self.bus.push(BattleEvent::TurnEnded { turn_number });
        if self.turns_elapsed >= self.turn_cap {
            self.finish(BattleOutcome::TurnLimit);
        }
        results
    }

    /// Advances until the outcome is terminal and returns the final snapshot.
    pub fn run_to_completion(&mut self) -> BattleResult {
        while !self.outcome.is_terminal() {
            self.advance_turn();
        }
        self.result()
    }

    /// One actor's slot in the turn. Returns None when the actor never got
    /// to act (killed by burn, or stunned).
    fn take_turn(&mut self, actor: UnitRef) -> Option<ActionResult> {
        let unit = self.field.get_mut(actor)?;

        let burn = unit.process_burn_damage();
        if burn > 0 {
            let remaining_hp = unit.current_hp();
            self.bus.push(BattleEvent::BurnDamage {
                target: actor,
                damage: burn,
                remaining_hp,
            });
            if remaining_hp == 0 {
                self.bus.push(BattleEvent::UnitDefeated { unit: actor });
                self.bus.push(BattleEvent::ActionSkipped {
                    actor,
                    reason: SkipReason::DiedToBurn,
                });
                return None;
            }
        }

        // Sampled before the tick so a stun lasting N turns blocks N actions.
        let stunned_at_turn_start = unit.is_stunned();
        for kind in unit.on_new_turn_tick_cooldown() {
            self.bus.push(BattleEvent::StatusExpired { target: actor, kind });
        }

        passives::trigger(
            &mut self.field,
            actor,
            PassiveTrigger::TurnStart,
            TriggerContext::none(),
            self.rng.as_mut(),
            &mut self.bus,
        );

        let unit = self.field.get(actor).filter(|c| c.is_alive())?;
        if stunned_at_turn_start || unit.is_stunned() {
            self.bus.push(BattleEvent::ActionSkipped {
                actor,
                reason: SkipReason::Stunned,
            });
            return None;
        }

        let team = actor.side.index();
        let choice = self.behaviors[team].decide_action(actor, &self.field, &self.ledgers[team]);

        let mut result = ActionResult::empty(actor);
        if choice.use_ultimate {
            result = actions::execute_ultimate_action(
                &mut self.field,
                actor,
                &mut self.ledgers[team],
                self.rng.as_mut(),
                &mut self.bus,
                choice.manual_target,
            );
        }
        if !result.is_ultimate {
            result = actions::execute_basic_action(
                &mut self.field,
                actor,
                self.rng.as_mut(),
                &mut self.bus,
                choice.manual_target,
            );
        }

        self.credit_energy(actor, &result);
        Some(result)
    }

    fn credit_energy(&mut self, actor: UnitRef, result: &ActionResult) {
        let ledger = &mut self.ledgers[actor.side.index()];
        let mut gained = ledger.gain_energy(result.energy_generated);
        if self.bar_percent_per_hit > 0.0 {
            for _ in 0..result.hits_landed {
                gained += ledger.add_to_bar_and_convert(self.bar_percent_per_hit);
            }
        }
        if gained <= 0 {
            return;
        }

        let new_total = ledger.energy();
        let max_energy = ledger.max_energy();
        self.bus.push(BattleEvent::EnergyGained {
            side: actor.side,
            amount: gained,
            new_total,
        });
        if actor.side == Side::Enemy {
            if let Some(unit) = self.field.get_mut(actor) {
                unit.unit_energy = (unit.unit_energy + gained).min(max_energy);
            }
        }
    }

    fn finish(&mut self, outcome: BattleOutcome) {
        self.outcome = outcome;
        self.bus.push(BattleEvent::BattleEnded {
            outcome,
            turns_elapsed: self.turns_elapsed,
        });
        log::debug!(
            target: "skirmish::turn",
            "battle ended: {:?} after {} turns",
            outcome,
            self.turns_elapsed
        );
    }
}
