//! Casino Core - headless simulation for three casino mini-games
//!
//! Core modules:
//! - `sim`: Mines board, Plinko physics, Roulette wheel
//! - `rng`: Injectable uniform random source
//! - `settings`: Data-driven tuning loaded from JSON
//! - `lobby`: Game selection shell owning one instance of each game

pub mod error;
pub mod lobby;
pub mod rng;
pub mod settings;
pub mod sim;

pub use error::SettingsError;
pub use lobby::{Casino, GameKind};
pub use rng::{RngState, ScriptedSource, UniformSource};
pub use settings::{MinesSettings, PlinkoSettings, RouletteSettings, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, display refresh rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta the clock will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Mines board
    pub const MINES_GRID_SIZE: usize = 5;
    pub const MINE_CHANCE: f64 = 0.2;

    /// Plinko peg field
    pub const PEG_ROWS: usize = 8;
    pub const PEG_COLUMNS: usize = 9;
    pub const PEG_RADIUS: f32 = 5.0;
    /// Vertical space reserved above and below the peg field
    pub const PEG_FIELD_MARGIN: f32 = 200.0;
    /// Y of the (virtual) row above the first peg row
    pub const PEG_FIELD_TOP: f32 = 100.0;

    /// Plinko buckets
    pub const BUCKET_SCORE_STEP: u32 = 10;
    /// Bucket centers sit this far above the bottom edge
    pub const BUCKET_OFFSET: f32 = 50.0;
    /// A ball whose bottom edge passes `height - FLOOR_OFFSET` has landed
    pub const FLOOR_OFFSET: f32 = 70.0;

    /// Plinko ball
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_START_Y: f32 = 50.0;
    pub const BALL_START_SPEED: f32 = 50.0;

    /// Added to velocity.y once per tick (not scaled by dt)
    pub const GRAVITY: f32 = 9.8;
    /// Horizontal kick added on every peg bounce, drawn from [-J, J]
    pub const BOUNCE_JITTER: f32 = 20.0;
    pub const BOUNCE_DAMPING: f32 = 0.8;
    pub const WALL_DAMPING: f32 = 0.8;
    /// Hard cap on ticks per drop (60 seconds of simulated time)
    pub const MAX_DROP_TICKS: u32 = 3600;

    /// Roulette wheel
    pub const ROULETTE_SLOTS: usize = 37;
    pub const STARTING_BALANCE: u64 = 100_000_000;
    pub const STARTING_BET: u64 = 10;
    pub const MIN_BET: u64 = 10;
    pub const BET_INCREASE_STEP: u64 = 1_000_000;
    pub const BET_DECREASE_STEP: u64 = 10;
    /// Seconds between spin start and settle
    pub const SPIN_DURATION: f64 = 5.0;
    /// Full turns per spin are drawn from [MIN_TURNS, MAX_TURNS]
    pub const MIN_TURNS: f64 = 5.0;
    pub const MAX_TURNS: f64 = 10.0;
    /// Payout multiplier on an even, non-zero number
    pub const EVEN_PAYOUT: u64 = 2;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees % 360.0;
    if wrapped < 0.0 { wrapped + 360.0 } else { wrapped }
}

/// Smooth ease-in-out curve on [0, 1]
#[inline]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
