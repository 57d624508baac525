//! Game tuning
//!
//! Every section falls back to the values in [`crate::consts`], so a settings
//! file only needs to name what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Mines board tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinesSettings {
    /// Rows and columns of the square grid
    pub grid_size: usize,
    /// Probability that any one cell holds a mine
    pub mine_chance: f64,
}

impl Default for MinesSettings {
    fn default() -> Self {
        Self {
            grid_size: MINES_GRID_SIZE,
            mine_chance: MINE_CHANCE,
        }
    }
}

/// Plinko board and physics tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlinkoSettings {
    pub rows: usize,
    /// Pegs per row, also the number of buckets
    pub columns: usize,
    pub peg_radius: f32,
    pub ball_radius: f32,
    /// Per-tick velocity increment
    pub gravity: f32,
    pub timestep: f32,
    pub max_ticks: u32,
    pub bounce_jitter: f32,
    pub bounce_damping: f32,
    pub wall_damping: f32,
}

impl Default for PlinkoSettings {
    fn default() -> Self {
        Self {
            rows: PEG_ROWS,
            columns: PEG_COLUMNS,
            peg_radius: PEG_RADIUS,
            ball_radius: BALL_RADIUS,
            gravity: GRAVITY,
            timestep: SIM_DT,
            max_ticks: MAX_DROP_TICKS,
            bounce_jitter: BOUNCE_JITTER,
            bounce_damping: BOUNCE_DAMPING,
            wall_damping: WALL_DAMPING,
        }
    }
}

/// Roulette table tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouletteSettings {
    pub starting_balance: u64,
    pub starting_bet: u64,
    pub min_bet: u64,
    pub bet_increase_step: u64,
    pub bet_decrease_step: u64,
    /// Seconds from spin start to result
    pub spin_duration: f64,
    pub min_turns: f64,
    pub max_turns: f64,
}

impl Default for RouletteSettings {
    fn default() -> Self {
        Self {
            starting_balance: STARTING_BALANCE,
            starting_bet: STARTING_BET,
            min_bet: MIN_BET,
            bet_increase_step: BET_INCREASE_STEP,
            bet_decrease_step: BET_DECREASE_STEP,
            spin_duration: SPIN_DURATION,
            min_turns: MIN_TURNS,
            max_turns: MAX_TURNS,
        }
    }
}

/// All game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mines: MinesSettings,
    pub plinko: PlinkoSettings,
    pub roulette: RouletteSettings,
}

impl Settings {
    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulators cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let m = &self.mines;
        if m.grid_size == 0 {
            return Err(SettingsError::invalid("mines.grid_size", "must be positive"));
        }
        if !(0.0..=1.0).contains(&m.mine_chance) {
            return Err(SettingsError::invalid(
                "mines.mine_chance",
                format!("{} is outside [0, 1]", m.mine_chance),
            ));
        }

        let p = &self.plinko;
        if p.rows == 0 || p.columns == 0 {
            return Err(SettingsError::invalid("plinko.rows/columns", "must be positive"));
        }
        // Written as negated comparisons so NaN fails them too
        if !(p.peg_radius > 0.0 && p.ball_radius > 0.0) {
            return Err(SettingsError::invalid("plinko.radius", "must be positive"));
        }
        if !(p.timestep > 0.0 && p.timestep.is_finite()) {
            return Err(SettingsError::invalid("plinko.timestep", "must be positive"));
        }
        let forces = [p.gravity, p.bounce_jitter, p.bounce_damping, p.wall_damping];
        if forces.iter().any(|v| !v.is_finite()) {
            return Err(SettingsError::invalid(
                "plinko.gravity/bounce/damping",
                "must be finite",
            ));
        }
        if p.max_ticks == 0 {
            return Err(SettingsError::invalid("plinko.max_ticks", "must be positive"));
        }

        let r = &self.roulette;
        if r.min_bet == 0 {
            return Err(SettingsError::invalid("roulette.min_bet", "must be positive"));
        }
        if r.starting_bet < r.min_bet {
            return Err(SettingsError::invalid(
                "roulette.starting_bet",
                format!("{} is below min_bet {}", r.starting_bet, r.min_bet),
            ));
        }
        if !(r.spin_duration > 0.0 && r.spin_duration.is_finite()) {
            return Err(SettingsError::invalid("roulette.spin_duration", "must be positive"));
        }
        if !(r.min_turns >= 0.0 && r.max_turns >= r.min_turns && r.max_turns.is_finite()) {
            return Err(SettingsError::invalid(
                "roulette.min_turns",
                "must be non-negative and not exceed max_turns",
            ));
        }

        Ok(())
    }
}
