// Skirmish Schema - Shared definition types
// This crate contains the static, authored data a battle is set up from:
// stat blocks, targeting patterns, status effect kinds and passive rules.
// The engine crate turns these into mutable runtime combatants.

pub use combatant_data::*;
pub use effect_types::*;
pub use passive_data::*;
pub use target_types::*;

pub mod combatant_data;
pub mod effect_types;
pub mod passive_data;
pub mod target_types;
