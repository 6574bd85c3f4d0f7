//! Skirmish Battle Core
//!
//! Deterministic resolution for turn-based team combat: speed-ordered turns,
//! basic and ultimate actions, shields and timed status effects, data-driven
//! passives and a shared team energy pool. Every roll goes through an injected
//! RNG, so a seed replays a battle exactly.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod combatant;
pub mod config;
pub mod errors;
pub mod rosters;
pub mod status_effects;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, BasicAttackData, CombatantDefinition, ModifiedStat, PassiveAbility,
    PassiveTargetRule, PassiveTrigger, Position, Row, Side, StatusEffectKind, TargetPattern,
    UltimateData, UnitKind,
};

// --- From this crate's modules (`src/`) ---

// Battle loop and its snapshots.
pub use battle::actions::{ActionResult, PerTargetOutcome};
pub use battle::ai::{ActionChoice, AutoBehavior, Behavior};
pub use battle::energy::TeamEnergyLedger;
pub use battle::rng::{BattleRng, ScriptedRng, SeededRng};
pub use battle::runner::{BattleResult, BattleRunner, SurvivorSnapshot};
pub use battle::state::{BattleEvent, BattleOutcome, Battlefield, EventBus, UnitRef};

// Runtime combatant state.
pub use combatant::Combatant;
pub use status_effects::{StackOutcome, StatusEffect};

// Configuration.
pub use config::{BattleConfig, EnergyConfig};

// Crate-specific error and result types.
pub use errors::{
    ConfigError, DefinitionError, DefinitionResult, EngineError, EngineResult, SetupError,
};
