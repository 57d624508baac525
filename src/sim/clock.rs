//! Fixed timestep accumulator
//!
//! Hosts call [`FixedStep::advance`] with their frame delta and run the
//! returned number of simulation ticks.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedStep {
    step: f32,
    accumulator: f32,
    max_substeps: u32,
}

impl FixedStep {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
            max_substeps: MAX_SUBSTEPS,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Accumulate a frame delta and return how many fixed steps are due
    ///
    /// Long frames are clamped and the backlog is dropped once
    /// `max_substeps` is reached, so a stall never snowballs.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        if substeps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        substeps
    }

    /// Drop any partial step
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
