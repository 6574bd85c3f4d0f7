use crate::battle::rng::{ScriptedRng, SeededRng};
use crate::battle::runner::BattleRunner;
use crate::battle::state::Battlefield;
use crate::combatant::Combatant;
use crate::config::EnergyConfig;
use schema::{
    BaseStats, CombatantDefinition, PassiveAbility, Row, Side, TargetPattern, UltimateData,
};

/// A builder for creating test combatants with plain, predictable defaults:
/// 100 HP, 10 ATK, 0 DEF, 10 SPD, no crits, one single-enemy hit per basic.
///
/// # Example
/// ```
/// let knight = TestCombatantBuilder::new("knight")
///     .atk(50)
///     .hits(2, 3)
///     .passive(PassiveAbility::direct("Regrowth", PassiveTrigger::TurnStart, 5, 0.0))
///     .build();
/// ```
pub struct TestCombatantBuilder {
    definition: CombatantDefinition,
    side: Side,
    current_hp: Option<i32>,
}

impl TestCombatantBuilder {
    /// Creates a new builder; the id doubles as the display name.
    pub fn new(id: &str) -> Self {
        let mut definition = CombatantDefinition::new(
            id,
            id,
            BaseStats {
                hp: 100,
                atk: 10,
                def: 0,
                spd: 10,
            },
        );
        definition.crit_rate = 0.0;
        Self {
            definition,
            side: Side::Player,
            current_hp: None,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.definition.name = name.to_string();
        self
    }

    pub fn hp(mut self, hp: i32) -> Self {
        self.definition.stats.hp = hp;
        self
    }

    /// Starts the combatant below max HP.
    pub fn current_hp(mut self, hp: i32) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn atk(mut self, atk: i32) -> Self {
        self.definition.stats.atk = atk;
        self
    }

    pub fn def(mut self, def: i32) -> Self {
        self.definition.stats.def = def;
        self
    }

    pub fn spd(mut self, spd: i32) -> Self {
        self.definition.stats.spd = spd;
        self
    }

    pub fn crit(mut self, rate: f64, damage: f64) -> Self {
        self.definition.crit_rate = rate;
        self.definition.crit_damage = damage;
        self
    }

    pub fn hits(mut self, min: i32, max: i32) -> Self {
        self.definition.basic.hits_min = min;
        self.definition.basic.hits_max = max;
        self
    }

    pub fn basic_pattern(mut self, pattern: TargetPattern) -> Self {
        self.definition.basic.pattern = pattern;
        self
    }

    pub fn ultimate(mut self, energy_cost: i32, cooldown_turns: i32, pattern: TargetPattern) -> Self {
        self.definition.ultimate = UltimateData {
            energy_cost,
            cooldown_turns,
            pattern,
        };
        self
    }

    pub fn passive(mut self, passive: PassiveAbility) -> Self {
        self.definition.passive = Some(passive);
        self
    }

    pub fn row(mut self, row: Row) -> Self {
        self.definition.position.row = row;
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// The static definition, for tests that go through validation themselves.
    pub fn definition(self) -> CombatantDefinition {
        self.definition
    }

    /// Builds the runtime `Combatant`.
    pub fn build(self) -> Combatant {
        let mut combatant = match Combatant::from_definition(&self.definition, self.side) {
            Ok(c) => c,
            Err(err) => panic!(
                "Failed to build test combatant {}: {}",
                self.definition.id, err
            ),
        };
        if let Some(hp) = self.current_hp {
            combatant.set_hp(hp);
        }
        combatant
    }
}

/// Builds a battlefield, fixing each roster's side.
pub fn create_test_field(players: Vec<Combatant>, enemies: Vec<Combatant>) -> Battlefield {
    let mut field = Battlefield::new(players, enemies);
    for side in [Side::Player, Side::Enemy] {
        for unit in &mut field.teams[side.index()] {
            unit.side = side;
        }
    }
    field
}

/// A runner over `players` vs `enemies` with every roll at the midpoint.
pub fn create_test_runner(
    players: Vec<Combatant>,
    enemies: Vec<Combatant>,
    energy: EnergyConfig,
    turn_cap: u32,
) -> BattleRunner {
    match BattleRunner::new(players, enemies, energy, turn_cap, Box::new(ScriptedRng::midpoint())) {
        Ok(runner) => runner,
        Err(err) => panic!("Failed to set up test battle: {}", err),
    }
}

/// Same as `create_test_runner` but driven by a seeded RNG.
pub fn create_seeded_runner(
    players: Vec<Combatant>,
    enemies: Vec<Combatant>,
    turn_cap: u32,
    seed: u64,
) -> BattleRunner {
    match BattleRunner::new(
        players,
        enemies,
        EnergyConfig::default(),
        turn_cap,
        Box::new(SeededRng::new(seed)),
    ) {
        Ok(runner) => runner,
        Err(err) => panic!("Failed to set up test battle: {}", err),
    }
}
