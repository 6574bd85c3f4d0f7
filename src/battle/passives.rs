//! Data-driven passive dispatch.
//!
//! Every passive is a `PassiveAbility` record; one handler interprets the
//! record for any trigger kind, so no unit carries bespoke passive code.

use crate::battle::calculators::round_half_even;
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, Battlefield, EventBus, UnitRef};
use schema::{PassiveAbility, PassiveTargetRule, PassiveTrigger};

/// What the triggering event was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerContext {
    /// The other party of the event: the victim for damage dealt and kills,
    /// the attacker for damage taken, the damaged ally for ally-low-HP.
    pub other: Option<UnitRef>,
    /// Damage dealt, for lifesteal-style passives.
    pub amount: Option<i32>,
}

impl TriggerContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn about(other: UnitRef) -> Self {
        Self {
            other: Some(other),
            amount: None,
        }
    }

    pub fn damage_dealt(target: UnitRef, amount: i32) -> Self {
        Self {
            other: Some(target),
            amount: Some(amount),
        }
    }
}

/// Fires `owner`'s passive if it listens for `trigger`.
///
/// Dead owners never fire. Threshold triggers additionally require the
/// watched unit's HP ratio to be at or below the ability's threshold: the
/// owner for `OnHpThreshold`, the damaged ally for `OnAllyLowHp`.
/// Returns true when the passive fired.
pub fn trigger(
    field: &mut Battlefield,
    owner: UnitRef,
    trigger: PassiveTrigger,
    context: TriggerContext,
    rng: &mut dyn BattleRng,
    bus: &mut EventBus,
) -> bool {
    let passive = match field.get(owner) {
        Some(c) if c.is_alive() => match &c.passive {
            Some(p) if p.trigger == trigger => p.clone(),
            _ => return false,
        },
        _ => return false,
    };

    if trigger.uses_threshold() {
        let watched = match trigger {
            PassiveTrigger::OnAllyLowHp => match context.other {
                Some(ally) => ally,
                None => return false,
            },
            _ => owner,
        };
        let Some(threshold) = passive.trigger_threshold else {
            return false;
        };
        let below = field
            .get(watched)
            .is_some_and(|c| c.is_alive() && c.hp_ratio() <= threshold);
        if !below {
            return false;
        }
    }

    let targets = resolve_passive_targets(field, owner, &passive, trigger, context, rng);
    log::debug!(
        target: "skirmish::passive",
        "{} fires {} ({}) on {} target(s)",
        field.name_of(owner),
        passive.name,
        trigger,
        targets.len()
    );
    bus.push(BattleEvent::PassiveTriggered {
        owner,
        trigger,
        targets: targets.clone(),
    });

    for target in targets {
        apply_passive_effect(field, owner, target, &passive, context, bus);
    }
    true
}

fn resolve_passive_targets(
    field: &Battlefield,
    owner: UnitRef,
    passive: &PassiveAbility,
    trigger: PassiveTrigger,
    context: TriggerContext,
    rng: &mut dyn BattleRng,
) -> Vec<UnitRef> {
    if trigger == PassiveTrigger::OnAllyLowHp {
        if let Some(ally) = context.other {
            return vec![ally];
        }
    }

    match passive.target {
        PassiveTargetRule::SelfOnly => vec![owner],
        PassiveTargetRule::RandomAlly => {
            let allies = field.living_allies_excluding(owner);
            if allies.is_empty() {
                Vec::new()
            } else {
                vec![allies[rng.pick_index(allies.len())]]
            }
        }
        PassiveTargetRule::AllAllies => field.living_allies_excluding(owner),
        PassiveTargetRule::ContextTarget => context.other.into_iter().collect(),
    }
}

fn apply_passive_effect(
    field: &mut Battlefield,
    owner: UnitRef,
    target: UnitRef,
    passive: &PassiveAbility,
    context: TriggerContext,
    bus: &mut EventBus,
) {
    let Some(unit) = field.get_mut(target) else {
        return;
    };
    if !unit.is_alive() {
        return;
    }

    if let Some(kind) = passive.effect {
        let outcome =
            unit.apply_status_effect(kind, passive.value, passive.modifier, passive.duration);
        bus.push(BattleEvent::StatusApplied {
            target,
            kind,
            outcome,
        });
        return;
    }

    let heal = match context.amount {
        Some(dealt) if passive.modifier > 0.0 => round_half_even(dealt as f64 * passive.modifier),
        _ if passive.value > 0 => passive.value,
        _ if passive.value < 0 => {
            // Thorns go straight to HP; shields do not block them.
            let damage = unit.take_direct_damage(passive.value.saturating_abs());
            let remaining_hp = unit.current_hp();
            bus.push(BattleEvent::DamageDealt {
                attacker: owner,
                target,
                damage,
                absorbed: 0,
                is_crit: false,
                remaining_hp,
            });
            if remaining_hp == 0 {
                bus.push(BattleEvent::UnitDefeated { unit: target });
            }
            return;
        }
        _ => return,
    };

    if heal > 0 {
        let amount = unit.heal(heal);
        bus.push(BattleEvent::Healed {
            target,
            amount,
            new_hp: unit.current_hp(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::rng::ScriptedRng;
    use crate::battle::tests::common::{create_test_field, TestCombatantBuilder};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::StatusEffectKind;

    fn fire(
        field: &mut Battlefield,
        owner: UnitRef,
        kind: PassiveTrigger,
        context: TriggerContext,
    ) -> bool {
        let mut rng = ScriptedRng::midpoint();
        let mut bus = EventBus::new();
        trigger(field, owner, kind, context, &mut rng, &mut bus)
    }

    #[test]
    fn test_on_kill_attack_buff_lands_on_owner() {
        let passive = PassiveAbility::status(
            "Bloodlust",
            PassiveTrigger::OnKill,
            StatusEffectKind::AtkUp,
            0,
            0.4,
            2,
        );
        let mut field = create_test_field(
            vec![TestCombatantBuilder::new("p").atk(50).passive(passive).build()],
            vec![TestCombatantBuilder::new("e").build()],
        );

        assert!(fire(&mut field, UnitRef::player(0), PassiveTrigger::OnKill, TriggerContext::about(UnitRef::enemy(0))));
        assert_eq!(field.get(UnitRef::player(0)).unwrap().current_atk(), 70);
    }

    #[test]
    fn test_mismatched_trigger_does_nothing() {
        let passive = PassiveAbility::direct("Regrowth", PassiveTrigger::TurnStart, 10, 0.0);
        let mut field = create_test_field(
            vec![TestCombatantBuilder::new("p").passive(passive).build()],
            vec![],
        );
        field.get_mut(UnitRef::player(0)).unwrap().set_hp(50);

        assert!(!fire(&mut field, UnitRef::player(0), PassiveTrigger::OnKill, TriggerContext::none()));
        assert_eq!(field.get(UnitRef::player(0)).unwrap().current_hp(), 50);

        assert!(fire(&mut field, UnitRef::player(0), PassiveTrigger::TurnStart, TriggerContext::none()));
        assert_eq!(field.get(UnitRef::player(0)).unwrap().current_hp(), 60);
    }

    #[test]
    fn test_lifesteal_heals_by_fraction_of_damage_dealt() {
        let passive = PassiveAbility::direct("Vampiric", PassiveTrigger::OnDamageDealt, 0, 0.5);
        let mut field = create_test_field(
            vec![TestCombatantBuilder::new("p").passive(passive).build()],
            vec![TestCombatantBuilder::new("e").build()],
        );
        field.get_mut(UnitRef::player(0)).unwrap().set_hp(40);

        fire(
            &mut field,
            UnitRef::player(0),
            PassiveTrigger::OnDamageDealt,
            TriggerContext::damage_dealt(UnitRef::enemy(0), 25),
        );
        // round_half_even(12.5) == 12
        assert_eq!(field.get(UnitRef::player(0)).unwrap().current_hp(), 52);
    }

    #[test]
    fn test_thorns_damage_the_attacker_through_shields() {
        let passive = PassiveAbility::direct("Spikes", PassiveTrigger::OnDamageTaken, -7, 0.0)
            .with_target(PassiveTargetRule::ContextTarget);
        let mut field = create_test_field(
            vec![TestCombatantBuilder::new("p").build()],
            vec![TestCombatantBuilder::new("e").passive(passive).build()],
        );
        field
            .get_mut(UnitRef::player(0))
            .unwrap()
            .apply_status_effect(StatusEffectKind::Shield, 50, 0.0, 3);

        fire(
            &mut field,
            UnitRef::enemy(0),
            PassiveTrigger::OnDamageTaken,
            TriggerContext::about(UnitRef::player(0)),
        );
        let attacker = field.get(UnitRef::player(0)).unwrap();
        assert_eq!(attacker.current_hp(), 93);
        assert_eq!(attacker.shield_amount(), 50);
    }

    #[rstest]
    #[case("above threshold", 60, false)]
    #[case("exactly at threshold", 50, true)]
    #[case("below threshold", 20, true)]
    fn test_hp_threshold_gate(#[case] desc: &str, #[case] hp: i32, #[case] fires: bool) {
        let passive = PassiveAbility::status(
            "Last Stand",
            PassiveTrigger::OnHpThreshold,
            StatusEffectKind::DefUp,
            0,
            0.5,
            2,
        )
        .with_threshold(0.5);
        let mut field = create_test_field(
            vec![TestCombatantBuilder::new("p").passive(passive).build()],
            vec![],
        );
        field.get_mut(UnitRef::player(0)).unwrap().set_hp(hp);

        assert_eq!(
            fire(&mut field, UnitRef::player(0), PassiveTrigger::OnHpThreshold, TriggerContext::none()),
            fires,
            "{}",
            desc
        );
    }

    #[test]
    fn test_ally_low_hp_targets_the_damaged_ally() {
        let passive = PassiveAbility::status(
            "Guardian",
            PassiveTrigger::OnAllyLowHp,
            StatusEffectKind::Shield,
            30,
            0.0,
            2,
        )
        .with_threshold(0.3)
        .with_target(PassiveTargetRule::AllAllies);
        let mut field = create_test_field(
            vec![
                TestCombatantBuilder::new("guard").passive(passive).build(),
                TestCombatantBuilder::new("hurt").build(),
                TestCombatantBuilder::new("fine").build(),
            ],
            vec![],
        );
        field.get_mut(UnitRef::player(1)).unwrap().set_hp(25);

        assert!(fire(
            &mut field,
            UnitRef::player(0),
            PassiveTrigger::OnAllyLowHp,
            TriggerContext::about(UnitRef::player(1)),
        ));
        assert_eq!(field.get(UnitRef::player(1)).unwrap().shield_amount(), 30);
        assert_eq!(field.get(UnitRef::player(2)).unwrap().shield_amount(), 0);

        // the healthy ally does not qualify
        assert!(!fire(
            &mut field,
            UnitRef::player(0),
            PassiveTrigger::OnAllyLowHp,
            TriggerContext::about(UnitRef::player(2)),
        ));
    }

    #[test]
    fn test_random_ally_skips_owner_and_dead_allies() {
        let passive = PassiveAbility::direct("Mend", PassiveTrigger::TurnStart, 15, 0.0)
            .with_target(PassiveTargetRule::RandomAlly);
        let mut field = create_test_field(
            vec![
                TestCombatantBuilder::new("healer").passive(passive).build(),
                TestCombatantBuilder::new("dead").build(),
                TestCombatantBuilder::new("wounded").build(),
            ],
            vec![],
        );
        field.get_mut(UnitRef::player(1)).unwrap().set_hp(0);
        field.get_mut(UnitRef::player(2)).unwrap().set_hp(10);
        field.get_mut(UnitRef::player(0)).unwrap().set_hp(10);

        fire(&mut field, UnitRef::player(0), PassiveTrigger::TurnStart, TriggerContext::none());

        assert_eq!(field.get(UnitRef::player(0)).unwrap().current_hp(), 10);
        assert_eq!(field.get(UnitRef::player(1)).unwrap().current_hp(), 0);
        assert_eq!(field.get(UnitRef::player(2)).unwrap().current_hp(), 25);
    }

    #[test]
    fn test_dead_owner_never_fires() {
        let passive = PassiveAbility::direct("Regrowth", PassiveTrigger::TurnStart, 10, 0.0);
        let mut field = create_test_field(
            vec![TestCombatantBuilder::new("p").passive(passive).build()],
            vec![],
        );
        field.get_mut(UnitRef::player(0)).unwrap().set_hp(0);

        assert!(!fire(&mut field, UnitRef::player(0), PassiveTrigger::TurnStart, TriggerContext::none()));
        assert_eq!(field.get(UnitRef::player(0)).unwrap().current_hp(), 0);
    }
}
