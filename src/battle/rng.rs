//! Deterministic randomness for battle resolution.
//!
//! Every roll in the core goes through an explicitly passed `BattleRng`; there
//! is no process-wide fallback. Two `SeededRng`s built from the same seed and
//! driven with the same call sequence produce identical values.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the three roll shapes the battle core needs.
pub trait BattleRng {
    /// Integer in `[min, max_exclusive)`. Returns `min` for an empty range.
    fn next_int(&mut self, min: i32, max_exclusive: i32) -> i32;

    /// Float in `[min, max]`, both ends inclusive.
    fn range(&mut self, min: f64, max: f64) -> f64;

    /// Float in `[0, 1)`.
    fn value(&mut self) -> f64;

    /// Uniform index into a slice of `len` items.
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let len = i32::try_from(len).unwrap_or(i32::MAX);
        self.next_int(0, len) as usize
    }
}

/// Production RNG: a seeded `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    inner: StdRng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BattleRng for SeededRng {
    fn next_int(&mut self, min: i32, max_exclusive: i32) -> i32 {
        if max_exclusive <= min {
            return min;
        }
        self.inner.random_range(min..max_exclusive)
    }

    fn range(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.inner.random_range(min..=max)
    }

    fn value(&mut self) -> f64 {
        self.inner.random::<f64>()
    }
}

/// Replays a fixed list of unit rolls in `[0, 1)`, cycling when it runs out.
///
/// Each call consumes one roll and maps it onto the requested range, so a test
/// can pin variance and crit outcomes exactly.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    rolls: Vec<f64>,
    index: usize,
}

impl ScriptedRng {
    pub fn new(rolls: Vec<f64>) -> Self {
        let rolls = if rolls.is_empty() { vec![0.5] } else { rolls };
        Self { rolls, index: 0 }
    }

    /// Every call returns the midpoint of its range: no variance, and no
    /// crit unless the crit rate is above 50.
    pub fn midpoint() -> Self {
        Self::new(vec![0.5])
    }

    /// How many rolls have been consumed so far.
    pub fn consumed(&self) -> usize {
        self.index
    }

    fn next_roll(&mut self) -> f64 {
        let roll = self.rolls[self.index % self.rolls.len()];
        self.index += 1;
        roll.clamp(0.0, 1.0)
    }
}

impl BattleRng for ScriptedRng {
    fn next_int(&mut self, min: i32, max_exclusive: i32) -> i32 {
        if max_exclusive <= min {
            return min;
        }
        let roll = self.next_roll();
        let span = (max_exclusive - min) as f64;
        let offset = (roll * span).floor() as i32;
        min + offset.min(max_exclusive - min - 1)
    }

    fn range(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        let roll = self.next_roll();
        min + roll * (max - min)
    }

    fn value(&mut self) -> f64 {
        let roll = self.next_roll();
        if roll >= 1.0 {
            1.0 - f64::EPSILON
        } else {
            roll
        }
    }
}
