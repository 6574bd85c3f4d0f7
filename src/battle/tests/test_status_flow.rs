#[cfg(test)]
mod tests {
    use crate::battle::state::{BattleEvent, BattleOutcome, SkipReason, UnitRef};
    use crate::battle::tests::common::{create_test_runner, TestCombatantBuilder};
    use crate::config::EnergyConfig;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{PassiveAbility, PassiveTargetRule, PassiveTrigger, StatusEffectKind};

    #[rstest]
    #[case("one-turn stun skips one action", 1, vec![100, 90])]
    #[case("two-turn stun skips two actions", 2, vec![100, 100])]
    #[case("three-turn stun outlasts the window", 3, vec![100, 100])]
    fn test_stun_skips_actions(
        #[case] desc: &str,
        #[case] duration: i32,
        #[case] expected_player_hp: Vec<i32>,
    ) {
        // Arrange
        let mut brute = TestCombatantBuilder::new("brute").hp(10_000).build();
        brute.apply_status_effect(StatusEffectKind::Stun, 0, 0.0, duration);
        let mut runner = create_test_runner(
            vec![TestCombatantBuilder::new("p").atk(1).build()],
            vec![brute],
            EnergyConfig::default(),
            10,
        );

        // Act
        let mut hp = Vec::new();
        for _ in 0..2 {
            runner.advance_turn();
            hp.push(runner.field().get(UnitRef::player(0)).unwrap().current_hp());
        }

        // Assert
        runner
            .events()
            .print_debug_with_message(&format!("Events for test_stun_skips_actions [{}]:", desc));
        assert_eq!(hp, expected_player_hp, "{}", desc);
    }

    #[test]
    fn test_one_turn_stun_from_a_passive_blocks_the_next_action() {
        // Arrange
        let concuss = PassiveAbility::status(
            "Concuss",
            PassiveTrigger::OnDamageDealt,
            StatusEffectKind::Stun,
            0,
            0.0,
            1,
        )
        .with_target(PassiveTargetRule::ContextTarget);
        let mut runner = create_test_runner(
            vec![TestCombatantBuilder::new("p").atk(1).spd(20).passive(concuss).build()],
            vec![TestCombatantBuilder::new("e").hp(10_000).build()],
            EnergyConfig::default(),
            10,
        );

        // Act
        let actions = runner.advance_turn();

        // Assert
        runner
            .events()
            .print_debug_with_message("Events for test_one_turn_stun_from_a_passive_blocks_the_next_action:");
        assert_eq!(actions.len(), 1);
        assert_eq!(runner.field().get(UnitRef::player(0)).unwrap().current_hp(), 100);
        assert!(runner.events().events().contains(&BattleEvent::ActionSkipped {
            actor: UnitRef::enemy(0),
            reason: SkipReason::Stunned,
        }));
    }

    #[test]
    fn test_stunned_actor_is_still_requeued() {
        let mut brute = TestCombatantBuilder::new("brute").spd(50).build();
        brute.apply_status_effect(StatusEffectKind::Stun, 0, 0.0, 2);
        let mut runner = create_test_runner(
            vec![TestCombatantBuilder::new("p").atk(1).build()],
            vec![brute],
            EnergyConfig::default(),
            10,
        );

        let actions = runner.advance_turn();

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].actor, UnitRef::player(0));
        assert_eq!(runner.timeline().order(), vec![UnitRef::enemy(0), UnitRef::player(0)]);
        assert!(runner.events().events().contains(&BattleEvent::ActionSkipped {
            actor: UnitRef::enemy(0),
            reason: SkipReason::Stunned,
        }));
    }

    #[test]
    fn test_burn_can_finish_the_battle_before_anyone_swings() {
        // Arrange
        let mut victim = TestCombatantBuilder::new("victim").hp(5).spd(50).build();
        victim.apply_status_effect(StatusEffectKind::Burn, 10, 0.0, 3);
        let mut runner = create_test_runner(
            vec![TestCombatantBuilder::new("p").build()],
            vec![victim],
            EnergyConfig::default(),
            10,
        );

        // Act
        let actions = runner.advance_turn();

        // Assert
        assert!(actions.is_empty());
        assert_eq!(runner.outcome(), BattleOutcome::Victory);
        assert_eq!(runner.turns_elapsed(), 1);
        assert_eq!(runner.field().get(UnitRef::player(0)).unwrap().current_hp(), 100);
        assert!(runner.events().events().contains(&BattleEvent::ActionSkipped {
            actor: UnitRef::enemy(0),
            reason: SkipReason::DiedToBurn,
        }));
    }

    #[test]
    fn test_burn_ticks_each_turn_through_shields() {
        let mut p = TestCombatantBuilder::new("p").atk(1).build();
        p.apply_status_effect(StatusEffectKind::Shield, 100, 0.0, 5);
        p.apply_status_effect(StatusEffectKind::Burn, 7, 0.0, 2);
        let mut runner = create_test_runner(
            vec![p],
            vec![TestCombatantBuilder::new("e").hp(10_000).atk(0).build()],
            EnergyConfig::default(),
            10,
        );

        let mut hp = Vec::new();
        for _ in 0..3 {
            runner.advance_turn();
            hp.push(runner.field().get(UnitRef::player(0)).unwrap().current_hp());
        }

        // burn lands at the start of turns 1 and 2, then expires; the
        // enemy's 1-damage hits are soaked by the shield
        assert_eq!(hp, vec![93, 86, 86]);
    }

    #[test]
    fn test_defense_down_raises_damage_taken() {
        let mut target = TestCombatantBuilder::new("e").hp(10_000).def(1000).atk(0).build();
        target.apply_status_effect(StatusEffectKind::DefDown, 0, 0.5, 3);
        let mut runner = create_test_runner(
            vec![TestCombatantBuilder::new("p").atk(300).spd(20).build()],
            vec![target],
            EnergyConfig::default(),
            10,
        );

        let actions = runner.advance_turn();

        // DEF 1000 * 0.5 = 500, so 300 * 1000 / 1500 = 200
        assert_eq!(actions[0].outcomes[0].amount, 200);
    }
}
