//! Injected randomness.
//!
//! The engine never owns a random generator; every probabilistic roll goes
//! through a [`RandomSource`] supplied by the caller so a fixed seed replays
//! the exact same sequence of scores.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform draws in `[0, 1)`
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// Seeded `StdRng` wrapper for deterministic replays
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Access the underlying generator (piece and shop generators share it)
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// An empty script never lets a roll succeed.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    rolls: Vec<f64>,
    index: usize,
}

impl ScriptedRolls {
    pub fn new(rolls: Vec<f64>) -> Self {
        Self { rolls, index: 0 }
    }

    /// How many draws have been taken so far
    pub fn draws(&self) -> usize {
        self.index
    }
}

impl RandomSource for ScriptedRolls {
    fn next_f64(&mut self) -> f64 {
        let roll = if self.rolls.is_empty() {
            1.0 - f64::EPSILON
        } else {
            self.rolls[self.index % self.rolls.len()]
        };
        self.index += 1;
        roll
    }
}
