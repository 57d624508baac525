//! Mines board
//!
//! A square grid where each cell hides a mine with fixed probability.
//! Revealing a safe cell scores a point; revealing a mine ends the round
//! and exposes every mine on the board.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::rng::{RngState, UniformSource};
use crate::settings::MinesSettings;

/// One grid cell. Mine placement never changes after initialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    mine: bool,
    revealed: bool,
}

impl Cell {
    pub fn is_mine(&self) -> bool {
        self.mine
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// What a player may see of this cell
    pub fn view(&self) -> CellView {
        match (self.revealed, self.mine) {
            (false, _) => CellView::Hidden,
            (true, false) => CellView::Safe,
            (true, true) => CellView::Mine,
        }
    }
}

/// Player-visible cell state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    /// Revealed, no mine
    Safe,
    /// Revealed mine (the one hit, or any mine after game over)
    Mine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinesPhase {
    Playing,
    GameOver,
}

/// Why a reveal changed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealRejection {
    GameOver,
    OutOfBounds,
    AlreadyRevealed,
}

/// Outcome of [`MinesBoard::reveal`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealResult {
    /// Safe cell revealed, carries the new score
    Safe { score: u32 },
    /// Mine hit, round over
    Detonated,
    Rejected(RevealRejection),
}

impl RevealResult {
    pub fn score_delta(&self) -> u32 {
        match self {
            RevealResult::Safe { .. } => 1,
            _ => 0,
        }
    }

    pub fn game_over_now(&self) -> bool {
        matches!(self, RevealResult::Detonated)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, RevealResult::Rejected(_))
    }
}

/// Serializable view of the board for presenters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinesSnapshot {
    pub cells: Vec<Vec<CellView>>,
    pub score: u32,
    pub phase: MinesPhase,
}

#[derive(Debug, Clone)]
pub struct MinesBoard<R = Pcg32> {
    size: usize,
    mine_chance: f64,
    /// Row-major
    cells: Vec<Cell>,
    score: u32,
    game_over: bool,
    rng: R,
}

impl MinesBoard<Pcg32> {
    /// New board seeded from entropy
    pub fn new(settings: &MinesSettings) -> Self {
        Self::with_rng(settings, RngState::from_entropy().to_rng())
    }
}

impl<R: UniformSource> MinesBoard<R> {
    pub fn with_rng(settings: &MinesSettings, rng: R) -> Self {
        let mut board = Self {
            size: settings.grid_size,
            mine_chance: settings.mine_chance,
            cells: vec![Cell::default(); settings.grid_size * settings.grid_size],
            score: 0,
            game_over: false,
            rng,
        };
        board.initialize();
        board
    }

    /// Roll every cell independently: mine with probability `mine_chance`
    pub fn initialize(&mut self) {
        let mine_chance = self.mine_chance;
        for cell in &mut self.cells {
            *cell = Cell {
                mine: self.rng.chance(mine_chance),
                revealed: false,
            };
        }
        log::debug!(
            "Mines board rolled: {} mines on {}x{}",
            self.mine_count(),
            self.size,
            self.size
        );
    }

    /// Reveal one cell
    pub fn reveal(&mut self, row: usize, col: usize) -> RevealResult {
        if self.game_over {
            return RevealResult::Rejected(RevealRejection::GameOver);
        }
        let Some(idx) = self.index(row, col) else {
            return RevealResult::Rejected(RevealRejection::OutOfBounds);
        };

        let cell = self.cells[idx];
        if cell.mine {
            self.game_over = true;
            self.reveal_all_mines();
            log::info!("Mine hit at ({}, {}), final score {}", row, col, self.score);
            return RevealResult::Detonated;
        }
        if cell.revealed {
            return RevealResult::Rejected(RevealRejection::AlreadyRevealed);
        }

        self.cells[idx].revealed = true;
        self.score += 1;
        RevealResult::Safe { score: self.score }
    }

    /// Start a new round on a freshly rolled board
    pub fn restart(&mut self) {
        self.score = 0;
        self.game_over = false;
        self.initialize();
        log::info!("Mines restarted");
    }

    fn reveal_all_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| c.mine) {
            cell.revealed = true;
        }
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.size && col < self.size).then(|| row * self.size + col)
    }
}

impl<R> MinesBoard<R> {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn phase(&self) -> MinesPhase {
        if self.game_over {
            MinesPhase::GameOver
        } else {
            MinesPhase::Playing
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        (row < self.size && col < self.size).then(|| self.cells[row * self.size + col])
    }

    pub fn mine_count(&self) -> usize {
        self.cells.iter().filter(|c| c.mine).count()
    }

    /// Safe cells not yet revealed
    pub fn safe_remaining(&self) -> usize {
        self.cells.iter().filter(|c| !c.mine && !c.revealed).count()
    }

    pub fn snapshot(&self) -> MinesSnapshot {
        MinesSnapshot {
            cells: self
                .cells
                .chunks(self.size.max(1))
                .map(|row| row.iter().map(Cell::view).collect())
                .collect(),
            score: self.score,
            phase: self.phase(),
        }
    }
}
