use crate::passive_data::PassiveAbility;
use crate::target_types::TargetPattern;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

/// Which roster a combatant fights for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    /// Index into two-element per-team arrays.
    pub fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Enemy => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum UnitKind {
    Melee,
    Ranged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Row {
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub slot: u8,
    pub row: Row,
    pub column: u8,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            slot: 0,
            row: Row::Front,
            column: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spd: i32,
}

impl fmt::Display for BaseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HP:{} ATK:{} DEF:{} SPD:{}",
            self.hp, self.atk, self.def, self.spd
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAttackData {
    pub hits_min: i32,
    pub hits_max: i32,
    pub pattern: TargetPattern,
}

impl Default for BasicAttackData {
    fn default() -> Self {
        Self {
            hits_min: 1,
            hits_max: 1,
            pattern: TargetPattern::SingleEnemy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UltimateData {
    pub energy_cost: i32,
    pub cooldown_turns: i32,
    pub pattern: TargetPattern,
}

impl Default for UltimateData {
    fn default() -> Self {
        Self {
            energy_cost: 3,
            cooldown_turns: 3,
            pattern: TargetPattern::AllEnemies,
        }
    }
}

/// Static stat block for one fighter, as authored by the data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantDefinition {
    pub id: String,
    pub name: String,
    pub kind: UnitKind,
    pub stats: BaseStats,
    /// Percent chance in `[0, 100]`.
    #[serde(default = "default_crit_rate")]
    pub crit_rate: f64,
    /// Percent multiplier in `[100, 300]`.
    #[serde(default = "default_crit_damage")]
    pub crit_damage: f64,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub basic: BasicAttackData,
    #[serde(default)]
    pub ultimate: UltimateData,
    #[serde(default)]
    pub passive: Option<PassiveAbility>,
}

fn default_crit_rate() -> f64 {
    5.0
}

fn default_crit_damage() -> f64 {
    150.0
}

impl CombatantDefinition {
    /// A front-row melee fighter with default crit, attack and ultimate data.
    pub fn new(id: &str, name: &str, stats: BaseStats) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: UnitKind::Melee,
            stats,
            crit_rate: default_crit_rate(),
            crit_damage: default_crit_damage(),
            position: Position::default(),
            basic: BasicAttackData::default(),
            ultimate: UltimateData::default(),
            passive: None,
        }
    }
}
