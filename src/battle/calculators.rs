use crate::battle::rng::BattleRng;
use crate::combatant::Combatant;

/// Damage variance band, inclusive.
pub const VARIANCE_MIN: f64 = 0.95;
pub const VARIANCE_MAX: f64 = 1.05;

/// Constant in the mitigation factor `1000 / (1000 + DEF)`.
pub const MITIGATION_CONSTANT: f64 = 1000.0;

/// Skill multiplier of a plain basic hit.
pub const BASIC_MULTIPLIER: f64 = 1.0;

/// Round to nearest, ties to even.
pub fn round_half_even(value: f64) -> i32 {
    value.round_ties_even() as i32
}

/// Outcome of one damage roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRoll {
    pub damage: i32,
    pub is_crit: bool,
}

pub fn mitigation(defense: i32) -> f64 {
    MITIGATION_CONSTANT / (MITIGATION_CONSTANT + defense.max(0) as f64)
}

/// One basic hit. Draws one variance sample then one crit sample.
pub fn basic_damage(attacker: &Combatant, defender: &Combatant, rng: &mut dyn BattleRng) -> DamageRoll {
    scaled_damage(attacker, defender, BASIC_MULTIPLIER, rng)
}

/// One ultimate hit at `skill_multiplier`. Multi-hit ultimates call this once
/// per hit with weights summing to the ability's total multiplier.
pub fn ultimate_damage(
    attacker: &Combatant,
    defender: &Combatant,
    skill_multiplier: f64,
    rng: &mut dyn BattleRng,
) -> DamageRoll {
    scaled_damage(attacker, defender, skill_multiplier, rng)
}

fn scaled_damage(
    attacker: &Combatant,
    defender: &Combatant,
    skill_multiplier: f64,
    rng: &mut dyn BattleRng,
) -> DamageRoll {
    let base = attacker.current_atk() as f64 * skill_multiplier;
    let variance = rng.range(VARIANCE_MIN, VARIANCE_MAX);
    let pre_crit = round_half_even(base * mitigation(defender.current_def()) * variance);

    let is_crit = rng.range(0.0, 100.0) < attacker.crit_rate;
    let damage = if is_crit {
        round_half_even(pre_crit as f64 * attacker.crit_damage / 100.0)
    } else {
        pre_crit
    };

    DamageRoll {
        damage: damage.max(1),
        is_crit,
    }
}

/// `round(ATK × multiplier × variance)`, at least 1.
pub fn heal_amount(caster: &Combatant, skill_multiplier: f64, rng: &mut dyn BattleRng) -> i32 {
    let variance = rng.range(VARIANCE_MIN, VARIANCE_MAX);
    round_half_even(caster.current_atk() as f64 * skill_multiplier * variance).max(1)
}

/// `round(DEF × multiplier × variance)`, at least 1.
pub fn shield_amount(caster: &Combatant, skill_multiplier: f64, rng: &mut dyn BattleRng) -> i32 {
    let variance = rng.range(VARIANCE_MIN, VARIANCE_MAX);
    round_half_even(caster.current_def() as f64 * skill_multiplier * variance).max(1)
}
