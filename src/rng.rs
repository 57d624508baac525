//! Uniform random source shared by all three games
//!
//! Every random draw (mine placement, bounce jitter, spin rotation) goes
//! through [`UniformSource`], so tests can swap in a scripted sequence.

use rand::{Rng, RngCore};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// A source of uniform values in [0, 1)
pub trait UniformSource {
    /// Next value in [0, 1)
    fn next_unit(&mut self) -> f64;

    /// Uniform value in [low, high)
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_unit()
    }

    /// Bernoulli trial with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }
}

impl<R: RngCore> UniformSource for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Replays a fixed list of unit values, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// A source that always returns the same value
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// RNG seed wrapper so a session can be reproduced from two numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Seed drawn from the thread-local generator
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    /// Same seed, different PCG stream
    pub fn with_stream(self, stream: u64) -> Self {
        Self { stream, ..self }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}
