use crate::battle::calculators::{basic_damage, round_half_even, ultimate_damage};
use crate::battle::energy::TeamEnergyLedger;
use crate::battle::passives::{self, TriggerContext};
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, Battlefield, EventBus, UnitRef};
use crate::battle::targeting::resolve_targets;
use schema::PassiveTrigger;
use serde::{Deserialize, Serialize};

/// Share of basic-action damage returned as team energy.
pub const BASIC_ENERGY_RATE: f64 = 0.25;
/// Share of ultimate damage returned as team energy.
pub const ULTIMATE_ENERGY_RATE: f64 = 0.10;
/// Skill multiplier of an enemy-targeting ultimate, one hit per target.
pub const ULTIMATE_DAMAGE_MULTIPLIER: f64 = 2.0;
/// Fraction of the caster's ATK restored by an ally-targeting ultimate.
pub const ULTIMATE_HEAL_RATIO: f64 = 0.5;

/// One target's share of an action.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerTargetOutcome {
    pub target: UnitRef,
    /// Damage rolled against the target, or HP restored when `is_heal`.
    pub amount: i32,
    pub is_crit: bool,
    pub is_heal: bool,
}

/// Read-only summary of one executed action.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActionResult {
    pub actor: UnitRef,
    pub is_ultimate: bool,
    pub outcomes: Vec<PerTargetOutcome>,
    pub energy_generated: i32,
    /// Hits that reached a living target; feeds per-hit bar energy.
    pub hits_landed: u32,
}

impl ActionResult {
    /// An action that did nothing at all.
    pub fn empty(actor: UnitRef) -> Self {
        Self {
            actor,
            is_ultimate: false,
            outcomes: Vec::new(),
            energy_generated: 0,
            hits_landed: 0,
        }
    }

    pub fn targets(&self) -> Vec<UnitRef> {
        self.outcomes.iter().map(|o| o.target).collect()
    }

    pub fn total_damage(&self) -> i32 {
        self.outcomes
            .iter()
            .filter(|o| !o.is_heal)
            .map(|o| o.amount)
            .sum()
    }
}

/// Energy on hand covers the cost and the cooldown has run out.
pub fn ultimate_available(field: &Battlefield, actor: UnitRef, ledger: &TeamEnergyLedger) -> bool {
    field.get(actor).is_some_and(|c| {
        c.is_alive() && ledger.energy() >= c.ultimate.energy_cost && c.ultimate_cooldown() == 0
    })
}

/// Basic action: one hit count drawn for the whole action, that many hits on
/// every resolved target.
pub fn execute_basic_action(
    field: &mut Battlefield,
    actor: UnitRef,
    rng: &mut dyn BattleRng,
    bus: &mut EventBus,
    manual_target: Option<UnitRef>,
) -> ActionResult {
    let Some(unit) = field.get(actor).filter(|c| c.is_alive()) else {
        return ActionResult::empty(actor);
    };
    let basic = unit.basic;

    bus.push(BattleEvent::ActionStarted {
        actor,
        is_ultimate: false,
    });

    let targets = resolve_targets(basic.pattern, actor, field, rng, manual_target);
    let hits = rng.next_int(basic.hits_min, basic.hits_max + 1).max(1) as u32;

    let mut result = ActionResult::empty(actor);
    for target in targets {
        if let Some(outcome) = strike(field, actor, target, hits, None, rng, bus, &mut result) {
            result.outcomes.push(outcome);
        }
    }
    result.energy_generated = round_half_even(result.total_damage() as f64 * BASIC_ENERGY_RATE);

    log::debug!(
        target: "skirmish::action",
        "{} basic x{} on {} target(s), {} damage",
        field.name_of(actor),
        hits,
        result.outcomes.len(),
        result.total_damage()
    );
    result
}

/// Ultimate action.
///
/// Returns `ActionResult::empty` with nothing spent, rolled or triggered when
/// the ultimate is unavailable; the caller is expected to fall back to a basic
/// action. Otherwise spends the cost, fires on-ultimate passives, resolves the
/// ultimate pattern, and always starts the cooldown at the end.
pub fn execute_ultimate_action(
    field: &mut Battlefield,
    actor: UnitRef,
    ledger: &mut TeamEnergyLedger,
    rng: &mut dyn BattleRng,
    bus: &mut EventBus,
    manual_target: Option<UnitRef>,
) -> ActionResult {
    let Some(unit) = field.get(actor) else {
        return ActionResult::empty(actor);
    };
    let ultimate = unit.ultimate;

    if !ultimate_available(field, actor, ledger) || !ledger.try_spend_energy(ultimate.energy_cost) {
        bus.push(BattleEvent::UltimateUnavailable {
            actor,
            energy: ledger.energy(),
            cost: ultimate.energy_cost,
            cooldown: unit.ultimate_cooldown(),
        });
        return ActionResult::empty(actor);
    }

    if ultimate.energy_cost > 0 {
        bus.push(BattleEvent::EnergySpent {
            side: actor.side,
            amount: ultimate.energy_cost,
            new_total: ledger.energy(),
        });
    }
    bus.push(BattleEvent::ActionStarted {
        actor,
        is_ultimate: true,
    });
    passives::trigger(
        field,
        actor,
        PassiveTrigger::OnUltimate,
        TriggerContext::none(),
        rng,
        bus,
    );

    let mut result = ActionResult::empty(actor);
    result.is_ultimate = true;

    let targets = resolve_targets(ultimate.pattern, actor, field, rng, manual_target);
    if ultimate.pattern.is_ally_targeting() {
        let heal = field
            .get(actor)
            .map_or(0, |c| round_half_even(c.current_atk() as f64 * ULTIMATE_HEAL_RATIO));
        for target in targets {
            let Some(unit) = field.get_mut(target) else {
                continue;
            };
            let restored = unit.heal(heal);
            bus.push(BattleEvent::Healed {
                target,
                amount: restored,
                new_hp: unit.current_hp(),
            });
            result.outcomes.push(PerTargetOutcome {
                target,
                amount: restored,
                is_crit: false,
                is_heal: true,
            });
        }
    } else {
        for target in targets {
            let multiplier = Some(ULTIMATE_DAMAGE_MULTIPLIER);
            if let Some(outcome) = strike(field, actor, target, 1, multiplier, rng, bus, &mut result) {
                result.outcomes.push(outcome);
            }
        }
    }
    result.energy_generated = round_half_even(result.total_damage() as f64 * ULTIMATE_ENERGY_RATE);

    if let Some(unit) = field.get_mut(actor) {
        unit.start_ultimate_cooldown();
    }

    log::debug!(
        target: "skirmish::action",
        "{} ultimate on {} target(s), {} damage",
        field.name_of(actor),
        result.outcomes.len(),
        result.total_damage()
    );
    result
}

/// Rolls all `hits` hits of one action against one target, then runs the
/// damage passives. Every roll counts toward the reported amount, including
/// rolls after the target has died; those no longer reach its HP.
/// `multiplier: None` means basic-hit damage.
#[allow(clippy::too_many_arguments)]
fn strike(
    field: &mut Battlefield,
    actor: UnitRef,
    target: UnitRef,
    hits: u32,
    multiplier: Option<f64>,
    rng: &mut dyn BattleRng,
    bus: &mut EventBus,
    result: &mut ActionResult,
) -> Option<PerTargetOutcome> {
    let mut dealt = 0;
    let mut hp_lost = 0;
    let mut is_crit = false;
    let mut rolled = 0;
    let mut landed = 0;

    for _ in 0..hits {
        let roll = {
            let (Some(attacker), Some(defender)) = (field.get(actor), field.get(target)) else {
                break;
            };
            match multiplier {
                Some(m) => ultimate_damage(attacker, defender, m, rng),
                None => basic_damage(attacker, defender, rng),
            }
        };
        dealt += roll.damage;
        is_crit |= roll.is_crit;
        rolled += 1;

        let defender = field.get_mut(target)?;
        if !defender.is_alive() {
            continue;
        }
        let taken = defender.take_damage(roll.damage);
        let remaining_hp = defender.current_hp();
        hp_lost += taken.hp_lost;
        landed += 1;

        bus.push(BattleEvent::DamageDealt {
            attacker: actor,
            target,
            damage: roll.damage,
            absorbed: taken.absorbed,
            is_crit: roll.is_crit,
            remaining_hp,
        });
    }

    if rolled == 0 {
        return None;
    }
    result.hits_landed += landed;

    let killed = !field.is_alive(target);
    if killed {
        bus.push(BattleEvent::UnitDefeated { unit: target });
    }
    fire_damage_passives(field, actor, target, dealt, hp_lost, killed, rng, bus);

    Some(PerTargetOutcome {
        target,
        amount: dealt,
        is_crit,
        is_heal: false,
    })
}

/// On-damage-taken, threshold and ally-low-HP passives only fire when HP was
/// actually lost; a hit fully absorbed by shields does not count.
#[allow(clippy::too_many_arguments)]
fn fire_damage_passives(
    field: &mut Battlefield,
    actor: UnitRef,
    target: UnitRef,
    dealt: i32,
    hp_lost: i32,
    killed: bool,
    rng: &mut dyn BattleRng,
    bus: &mut EventBus,
) {
    passives::trigger(
        field,
        actor,
        PassiveTrigger::OnDamageDealt,
        TriggerContext::damage_dealt(target, dealt),
        rng,
        bus,
    );

    if hp_lost > 0 {
        passives::trigger(
            field,
            target,
            PassiveTrigger::OnDamageTaken,
            TriggerContext::about(actor),
            rng,
            bus,
        );
        passives::trigger(
            field,
            target,
            PassiveTrigger::OnHpThreshold,
            TriggerContext::none(),
            rng,
            bus,
        );
        for ally in field.living_allies_excluding(target) {
            passives::trigger(
                field,
                ally,
                PassiveTrigger::OnAllyLowHp,
                TriggerContext::about(target),
                rng,
                bus,
            );
        }
    }

    if killed {
        passives::trigger(
            field,
            actor,
            PassiveTrigger::OnKill,
            TriggerContext::about(target),
            rng,
            bus,
        );
    }
}
