//! Game selection shell
//!
//! Owns one instance of each game. The games never talk to each other;
//! each gets its own PCG stream derived from the session seed.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::rng::RngState;
use crate::settings::Settings;
use crate::sim::{MinesBoard, PlinkoSimulator, RouletteWheel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Plinko,
    Roulette,
    Mines,
}

impl GameKind {
    /// Menu order
    pub const ALL: [GameKind; 3] = [GameKind::Plinko, GameKind::Roulette, GameKind::Mines];

    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Plinko => "Plinko",
            GameKind::Roulette => "Roulette",
            GameKind::Mines => "Mines",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "plinko" => Some(GameKind::Plinko),
            "roulette" => Some(GameKind::Roulette),
            "mines" => Some(GameKind::Mines),
            _ => None,
        }
    }

    /// PCG stream reserved for this game
    fn stream(&self) -> u64 {
        match self {
            GameKind::Plinko => 1,
            GameKind::Roulette => 2,
            GameKind::Mines => 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Casino {
    pub rng_state: RngState,
    pub mines: MinesBoard<Pcg32>,
    pub plinko: PlinkoSimulator<Pcg32>,
    pub roulette: RouletteWheel<Pcg32>,
}

impl Casino {
    /// Build all three games for a viewport of `width` x `height`
    pub fn new(settings: &Settings, width: f32, height: f32, seed: u64) -> Self {
        let rng_state = RngState::new(seed);
        let rng_for = |kind: GameKind| rng_state.with_stream(kind.stream()).to_rng();

        log::info!("Casino session seed {}, viewport {}x{}", seed, width, height);

        Self {
            rng_state,
            mines: MinesBoard::with_rng(&settings.mines, rng_for(GameKind::Mines)),
            plinko: PlinkoSimulator::with_rng(
                width,
                height,
                &settings.plinko,
                rng_for(GameKind::Plinko),
            ),
            roulette: RouletteWheel::with_rng(&settings.roulette, rng_for(GameKind::Roulette)),
        }
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }
}
