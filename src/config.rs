//! RON battle configuration.

use crate::combatant::Combatant;
use crate::errors::{ConfigError, EngineResult, SetupError};
use schema::{CombatantDefinition, Side};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_ENERGY: i32 = 10;
pub const DEFAULT_TURN_CAP: u32 = 50;

/// Team energy settings, shared by both sides.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct EnergyConfig {
    #[serde(default = "default_max_energy")]
    pub max_energy: i32,
    #[serde(default)]
    pub start_energy: i32,
    /// Bar percentage credited per landed hit. 0 disables the bar.
    #[serde(default)]
    pub bar_percent_per_hit: f64,
}

fn default_max_energy() -> i32 {
    DEFAULT_MAX_ENERGY
}

fn default_turn_cap() -> u32 {
    DEFAULT_TURN_CAP
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            max_energy: DEFAULT_MAX_ENERGY,
            start_energy: 0,
            bar_percent_per_hit: 0.0,
        }
    }
}

impl EnergyConfig {
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.max_energy < 0 {
            return Err(SetupError::InvalidEnergyConfig(format!(
                "max_energy {} is negative",
                self.max_energy
            )));
        }
        if !(0..=self.max_energy).contains(&self.start_energy) {
            return Err(SetupError::InvalidEnergyConfig(format!(
                "start_energy {} outside [0, {}]",
                self.start_energy, self.max_energy
            )));
        }
        if !self.bar_percent_per_hit.is_finite() || self.bar_percent_per_hit < 0.0 {
            return Err(SetupError::InvalidEnergyConfig(format!(
                "bar_percent_per_hit {} must be a non-negative number",
                self.bar_percent_per_hit
            )));
        }
        Ok(())
    }
}

/// Everything needed to start one battle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleConfig {
    pub players: Vec<CombatantDefinition>,
    pub enemies: Vec<CombatantDefinition>,
    #[serde(default)]
    pub energy: EnergyConfig,
    #[serde(default = "default_turn_cap")]
    pub turn_cap: u32,
    #[serde(default)]
    pub seed: u64,
}

impl BattleConfig {
    pub fn new(players: Vec<CombatantDefinition>, enemies: Vec<CombatantDefinition>) -> Self {
        Self {
            players,
            enemies,
            energy: EnergyConfig::default(),
            turn_cap: DEFAULT_TURN_CAP,
            seed: 0,
        }
    }

    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        ron::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_ron_str(&source)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Checks energy settings, id uniqueness and every definition.
    pub fn validate(&self) -> EngineResult<()> {
        self.energy.validate()?;
        check_unique_ids(self.players.iter().chain(&self.enemies).map(|d| d.id.as_str()))?;
        for definition in &self.players {
            Combatant::from_definition(definition, Side::Player)?;
        }
        for definition in &self.enemies {
            Combatant::from_definition(definition, Side::Enemy)?;
        }
        Ok(())
    }
}

pub(crate) fn check_unique_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Result<(), SetupError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SetupError::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}
