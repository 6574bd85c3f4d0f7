use crate::battle::calculators::round_half_even;
use crate::errors::{DefinitionError, DefinitionResult};
use crate::status_effects::{self, StackOutcome, StatusEffect};
use schema::{
    BaseStats, BasicAttackData, CombatantDefinition, ModifiedStat, PassiveAbility, Position,
    Side, StatusEffectKind, UltimateData, UnitKind,
};
use serde::{Deserialize, Serialize};

/// How an incoming hit was split between shields and HP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DamageTaken {
    pub absorbed: i32,
    pub hp_lost: i32,
}

/// Mutable runtime state of one fighter.
///
/// HP is kept in `[0, max_hp]` by every mutator; a combatant at 0 HP is dead
/// and nothing brings it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub side: Side,
    pub kind: UnitKind,
    pub stats: BaseStats,
    pub crit_rate: f64,
    pub crit_damage: f64,
    pub position: Position,
    pub basic: BasicAttackData,
    pub ultimate: UltimateData,
    pub passive: Option<PassiveAbility>,
    /// Energy this unit generated itself; only tracked for the AI-controlled side.
    pub unit_energy: i32,
    current_hp: i32,
    ultimate_cooldown: i32,
    status_effects: Vec<StatusEffect>,
}

impl Combatant {
    /// Validates a static definition and builds a full-HP combatant from it.
    pub fn from_definition(definition: &CombatantDefinition, side: Side) -> DefinitionResult<Self> {
        let id = definition.id.clone();
        let stats = definition.stats;

        if stats.hp <= 0 {
            return Err(DefinitionError::NonPositiveMaxHp { id, hp: stats.hp });
        }
        for (stat, value) in [("ATK", stats.atk), ("DEF", stats.def), ("SPD", stats.spd)] {
            if value < 0 {
                return Err(DefinitionError::NegativeStat { id, stat, value });
            }
        }

        let mut basic = definition.basic;
        basic.hits_min = basic.hits_min.max(1);
        if basic.hits_min > basic.hits_max {
            return Err(DefinitionError::InvalidHitRange {
                id,
                min: basic.hits_min,
                max: basic.hits_max,
            });
        }

        if !(0.0..=100.0).contains(&definition.crit_rate) {
            return Err(DefinitionError::CritRateOutOfRange {
                id,
                value: definition.crit_rate,
            });
        }
        if !(100.0..=300.0).contains(&definition.crit_damage) {
            return Err(DefinitionError::CritDamageOutOfRange {
                id,
                value: definition.crit_damage,
            });
        }

        let ultimate = definition.ultimate;
        if ultimate.energy_cost < 0 || ultimate.cooldown_turns < 0 {
            return Err(DefinitionError::InvalidUltimate {
                id,
                details: format!(
                    "cost {} and cooldown {} must not be negative",
                    ultimate.energy_cost, ultimate.cooldown_turns
                ),
            });
        }

        if let Some(passive) = &definition.passive {
            if passive.trigger.uses_threshold() {
                let valid = passive
                    .trigger_threshold
                    .is_some_and(|t| t > 0.0 && t <= 1.0);
                if !valid {
                    return Err(DefinitionError::InvalidPassiveThreshold {
                        id,
                        threshold: passive.trigger_threshold,
                    });
                }
            }
        }

        Ok(Self {
            id,
            name: definition.name.clone(),
            side,
            kind: definition.kind,
            stats,
            crit_rate: definition.crit_rate,
            crit_damage: definition.crit_damage,
            position: definition.position,
            basic,
            ultimate,
            passive: definition.passive.clone(),
            unit_energy: 0,
            current_hp: stats.hp,
            ultimate_cooldown: 0,
            status_effects: Vec::new(),
        })
    }

    // === HP ===

    pub fn max_hp(&self) -> i32 {
        self.stats.hp
    }

    pub fn current_hp(&self) -> i32 {
        self.current_hp
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn hp_ratio(&self) -> f64 {
        self.current_hp as f64 / self.max_hp() as f64
    }

    /// Sets HP directly, clamped to `[0, max_hp]`.
    pub fn set_hp(&mut self, hp: i32) {
        self.current_hp = hp.clamp(0, self.max_hp());
    }

    /// Restores up to `amount` HP. Dead combatants stay dead.
    /// Returns the HP actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if amount <= 0 || !self.is_alive() {
            return 0;
        }
        let before = self.current_hp;
        self.set_hp(before.saturating_add(amount));
        self.current_hp - before
    }

    /// Shields absorb first, newest shield first; the rest comes off HP.
    pub fn take_damage(&mut self, raw_damage: i32) -> DamageTaken {
        if raw_damage <= 0 || !self.is_alive() {
            return DamageTaken::default();
        }
        let penetrating = self.absorb_damage_with_shield(raw_damage);
        let hp_lost = self.take_direct_damage(penetrating);
        DamageTaken {
            absorbed: raw_damage - penetrating,
            hp_lost,
        }
    }

    /// Damage that bypasses shields (burn, thorns). Returns HP lost.
    pub fn take_direct_damage(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let before = self.current_hp;
        self.set_hp(before.saturating_sub(amount));
        before - self.current_hp
    }

    /// Returns the part of `raw_damage` that gets past every shield.
    pub fn absorb_damage_with_shield(&mut self, raw_damage: i32) -> i32 {
        status_effects::absorb_with_shields(&mut self.status_effects, raw_damage).0
    }

    /// Applies this turn's burn straight to HP. Returns the HP lost.
    pub fn process_burn_damage(&mut self) -> i32 {
        let burn = status_effects::burn_total(&self.status_effects);
        self.take_direct_damage(burn)
    }

    // === Stats ===

    pub fn current_atk(&self) -> i32 {
        self.modified_stat(self.stats.atk, ModifiedStat::Attack)
    }

    pub fn current_def(&self) -> i32 {
        self.modified_stat(self.stats.def, ModifiedStat::Defense)
    }

    pub fn speed(&self) -> i32 {
        self.stats.spd
    }

    fn modified_stat(&self, base: i32, stat: ModifiedStat) -> i32 {
        let net = status_effects::stat_modifier_sum(&self.status_effects, stat);
        round_half_even(base as f64 * (1.0 + net)).max(0)
    }

    // === Status effects ===

    pub fn status_effects(&self) -> &[StatusEffect] {
        &self.status_effects
    }

    pub fn apply_status_effect(
        &mut self,
        kind: StatusEffectKind,
        value: i32,
        modifier: f64,
        duration: i32,
    ) -> StackOutcome {
        status_effects::apply_stacked(
            &mut self.status_effects,
            StatusEffect::new(kind, value, modifier, duration),
        )
    }

    pub fn shield_amount(&self) -> i32 {
        status_effects::shield_total(&self.status_effects)
    }

    pub fn is_stunned(&self) -> bool {
        status_effects::has_active(&self.status_effects, StatusEffectKind::Stun)
    }

    // === Ultimate cooldown ===

    pub fn ultimate_cooldown(&self) -> i32 {
        self.ultimate_cooldown
    }

    pub fn start_ultimate_cooldown(&mut self) {
        self.ultimate_cooldown = self.ultimate.cooldown_turns;
    }

    /// Turn-start bookkeeping: cooldown and every effect duration drop by one.
    /// Returns the effect kinds that expired.
    pub fn on_new_turn_tick_cooldown(&mut self) -> Vec<StatusEffectKind> {
        self.ultimate_cooldown = (self.ultimate_cooldown - 1).max(0);
        status_effects::tick_durations(&mut self.status_effects)
    }
}
