pub mod actions;
pub mod ai;
pub mod calculators;
pub mod energy;
pub mod passives;
pub mod rng;
pub mod runner;
pub mod state;
pub mod targeting;
pub mod timeline;

#[cfg(test)]
mod tests;
