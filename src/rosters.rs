use crate::config::BattleConfig;
use crate::errors::EngineResult;
use schema::{
    BaseStats, BasicAttackData, CombatantDefinition, PassiveAbility, PassiveTargetRule,
    PassiveTrigger, Position, Row, StatusEffectKind, TargetPattern, UltimateData, UnitKind,
};
use serde::{Deserialize, Serialize};

/// A predefined roster for demos and headless runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefabRoster {
    pub id: String,
    pub name: String,
    pub description: String,
    pub members: Vec<CombatantDefinition>,
}

#[allow(clippy::too_many_arguments)]
fn member(
    id: &str,
    name: &str,
    kind: UnitKind,
    stats: (i32, i32, i32, i32),
    crit: (f64, f64),
    slot: u8,
    row: Row,
    basic: BasicAttackData,
    ultimate: UltimateData,
    passive: Option<PassiveAbility>,
) -> CombatantDefinition {
    let (hp, atk, def, spd) = stats;
    let mut definition = CombatantDefinition::new(id, name, BaseStats { hp, atk, def, spd });
    definition.kind = kind;
    definition.crit_rate = crit.0;
    definition.crit_damage = crit.1;
    definition.position = Position {
        slot,
        row,
        column: slot % 3,
    };
    definition.basic = basic;
    definition.ultimate = ultimate;
    definition.passive = passive;
    definition
}

fn basic(hits_min: i32, hits_max: i32, pattern: TargetPattern) -> BasicAttackData {
    BasicAttackData {
        hits_min,
        hits_max,
        pattern,
    }
}

fn ultimate(energy_cost: i32, cooldown_turns: i32, pattern: TargetPattern) -> UltimateData {
    UltimateData {
        energy_cost,
        cooldown_turns,
        pattern,
    }
}

/// Get all available prefab rosters
pub fn get_prefab_rosters() -> Vec<PrefabRoster> {
    vec![
        PrefabRoster {
            id: "vanguard".to_string(),
            name: "Vanguard".to_string(),
            description: "Sturdy front line with a healer and a shield-caller".to_string(),
            members: vec![
                member(
                    "vanguard_knight",
                    "Knight",
                    UnitKind::Melee,
                    (420, 48, 60, 11),
                    (10.0, 150.0),
                    0,
                    Row::Front,
                    basic(1, 1, TargetPattern::FrontRowSingle),
                    ultimate(4, 3, TargetPattern::FrontRowAll),
                    Some(
                        PassiveAbility::status(
                            "Rally",
                            PassiveTrigger::BattleStart,
                            StatusEffectKind::Shield,
                            40,
                            0.0,
                            2,
                        )
                        .with_target(PassiveTargetRule::AllAllies),
                    ),
                ),
                member(
                    "vanguard_duelist",
                    "Duelist",
                    UnitKind::Melee,
                    (300, 62, 30, 15),
                    (25.0, 180.0),
                    1,
                    Row::Front,
                    basic(1, 3, TargetPattern::SingleEnemy),
                    ultimate(3, 2, TargetPattern::LowestHpEnemy),
                    Some(PassiveAbility::status(
                        "Bloodlust",
                        PassiveTrigger::OnKill,
                        StatusEffectKind::AtkUp,
                        0,
                        0.4,
                        2,
                    )),
                ),
                member(
                    "vanguard_cleric",
                    "Cleric",
                    UnitKind::Ranged,
                    (260, 40, 25, 12),
                    (5.0, 150.0),
                    2,
                    Row::Back,
                    basic(1, 1, TargetPattern::SingleEnemy),
                    ultimate(3, 3, TargetPattern::AllAllies),
                    Some(
                        PassiveAbility::direct("Mend", PassiveTrigger::TurnStart, 12, 0.0)
                            .with_target(PassiveTargetRule::RandomAlly),
                    ),
                ),
            ],
        },
        PrefabRoster {
            id: "raiders".to_string(),
            name: "Raiders".to_string(),
            description: "Fast hitters that burn, bleed and punish attackers".to_string(),
            members: vec![
                member(
                    "raider_brute",
                    "Brute",
                    UnitKind::Melee,
                    (380, 55, 45, 10),
                    (10.0, 160.0),
                    0,
                    Row::Front,
                    basic(1, 2, TargetPattern::FrontRowSingle),
                    ultimate(4, 3, TargetPattern::SingleEnemy),
                    Some(
                        PassiveAbility::direct("Spiked Hide", PassiveTrigger::OnDamageTaken, -6, 0.0)
                            .with_target(PassiveTargetRule::ContextTarget),
                    ),
                ),
                member(
                    "raider_stalker",
                    "Stalker",
                    UnitKind::Melee,
                    (240, 58, 20, 18),
                    (30.0, 200.0),
                    1,
                    Row::Front,
                    basic(2, 3, TargetPattern::BackRowSingle),
                    ultimate(3, 2, TargetPattern::HighestThreatEnemy),
                    Some(PassiveAbility::direct(
                        "Bloodthirst",
                        PassiveTrigger::OnDamageDealt,
                        0,
                        0.2,
                    )),
                ),
                member(
                    "raider_pyro",
                    "Pyromancer",
                    UnitKind::Ranged,
                    (220, 50, 18, 13),
                    (5.0, 150.0),
                    2,
                    Row::Back,
                    basic(1, 1, TargetPattern::SingleEnemy),
                    ultimate(5, 3, TargetPattern::AllEnemies),
                    Some(
                        PassiveAbility::status(
                            "Kindle",
                            PassiveTrigger::OnUltimate,
                            StatusEffectKind::AtkUp,
                            0,
                            0.3,
                            2,
                        ),
                    ),
                ),
            ],
        },
        PrefabRoster {
            id: "wardens".to_string(),
            name: "Wardens".to_string(),
            description: "Slow, heavily armored defenders that protect the wounded".to_string(),
            members: vec![
                member(
                    "warden_bulwark",
                    "Bulwark",
                    UnitKind::Melee,
                    (520, 35, 110, 7),
                    (0.0, 150.0),
                    0,
                    Row::Front,
                    basic(1, 1, TargetPattern::HighestThreatEnemy),
                    ultimate(4, 4, TargetPattern::SelfOnly),
                    Some(
                        PassiveAbility::status(
                            "Guardian",
                            PassiveTrigger::OnAllyLowHp,
                            StatusEffectKind::Shield,
                            60,
                            0.0,
                            2,
                        )
                        .with_threshold(0.35),
                    ),
                ),
                member(
                    "warden_sentinel",
                    "Sentinel",
                    UnitKind::Ranged,
                    (300, 45, 70, 9),
                    (10.0, 150.0),
                    1,
                    Row::Back,
                    basic(1, 2, TargetPattern::SingleEnemy),
                    ultimate(3, 3, TargetPattern::BackRowAll),
                    Some(
                        PassiveAbility::status(
                            "Last Stand",
                            PassiveTrigger::OnHpThreshold,
                            StatusEffectKind::DefUp,
                            0,
                            0.5,
                            2,
                        )
                        .with_threshold(0.3),
                    ),
                ),
            ],
        },
    ]
}

/// Get a specific prefab roster by ID
pub fn get_prefab_roster(roster_id: &str) -> Option<PrefabRoster> {
    get_prefab_rosters().into_iter().find(|r| r.id == roster_id)
}

pub fn get_prefab_roster_ids() -> Vec<String> {
    get_prefab_rosters().into_iter().map(|r| r.id).collect()
}

/// A default-settings battle between two prefab rosters.
pub fn prefab_battle(player_roster: &str, enemy_roster: &str, seed: u64) -> Option<BattleConfig> {
    let players = get_prefab_roster(player_roster)?;
    let enemies = get_prefab_roster(enemy_roster)?;
    let mut config = BattleConfig::new(players.members, enemies.members);
    config.seed = seed;
    Some(config)
}

/// Validate that every prefab roster builds and that rosters can face each other.
pub fn validate_prefab_rosters() -> EngineResult<()> {
    let rosters = get_prefab_rosters();
    for players in &rosters {
        for enemies in &rosters {
            if players.id == enemies.id {
                continue;
            }
            BattleConfig::new(players.members.clone(), enemies.members.clone()).validate()?;
        }
    }
    Ok(())
}
