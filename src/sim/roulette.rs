//! Roulette wheel
//!
//! A single-zero wheel. The player stakes `bet` on every spin; the wheel
//! turns a random amount and the slot under the pointer decides the payout:
//! even numbers pay 2x the stake, odd numbers and zero pay nothing.
//!
//! Spins take a fixed time to settle. The host either feeds elapsed time
//! through [`RouletteWheel::advance`] or fires [`RouletteWheel::complete`]
//! from its own one-shot timer with the ticket returned by the spin.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{EVEN_PAYOUT, ROULETTE_SLOTS};
use crate::rng::{RngState, UniformSource};
use crate::settings::RouletteSettings;
use crate::{ease_in_out, normalize_degrees};

/// Slot numbers in physical wheel order, clockwise from the pointer
pub const WHEEL_NUMBERS: [u8; ROULETTE_SLOTS] = [
    0, 32, 15, 19, 4, 21, 2, 25, 17, 34, 6, 27, 13, 36, 11, 30, 8, 23, 10, 5, 24, 16, 33, 1, 20,
    14, 31, 9, 22, 18, 29, 7, 28, 12, 35, 3, 26,
];

pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Angular width of one slot in degrees
pub const SLOT_DEGREES: f64 = 360.0 / ROULETTE_SLOTS as f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotColor {
    Green,
    Red,
    Black,
}

impl SlotColor {
    pub fn of(number: u8) -> Self {
        if number == 0 {
            SlotColor::Green
        } else if RED_NUMBERS.contains(&number) {
            SlotColor::Red
        } else {
            SlotColor::Black
        }
    }
}

/// Angle of slot `index` on an unrotated wheel
#[inline]
pub fn slot_angle(index: usize) -> f64 {
    index as f64 * SLOT_DEGREES
}

/// Slot under the pointer for a wheel rotated by `degrees`
pub fn slot_index_for_rotation(degrees: f64) -> usize {
    let normalized = normalize_degrees(degrees);
    (normalized / SLOT_DEGREES).round() as usize % ROULETTE_SLOTS
}

pub fn number_for_rotation(degrees: f64) -> u8 {
    WHEEL_NUMBERS[slot_index_for_rotation(degrees)]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Zero came up
    HouseWins,
    /// Even number
    Win,
    /// Odd number
    Lose,
}

impl Verdict {
    pub fn for_number(number: u8) -> Self {
        if number == 0 {
            Verdict::HouseWins
        } else if number % 2 == 0 {
            Verdict::Win
        } else {
            Verdict::Lose
        }
    }
}

/// A settled spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub number: u8,
    pub color: SlotColor,
    pub verdict: Verdict,
    /// Amount debited when the spin started
    pub stake: u64,
    /// Amount credited at settle (0 unless the player won)
    pub payout: u64,
    /// Balance after the payout
    pub balance: u64,
}

impl SpinOutcome {
    pub fn message(&self) -> String {
        match self.verdict {
            Verdict::HouseWins => format!("House wins! The number is {}.", self.number),
            Verdict::Win => format!("You win! The number is {} (even).", self.number),
            Verdict::Lose => format!("You lose. The number is {} (odd).", self.number),
        }
    }
}

/// Handle for one spin; completing with a stale ticket does nothing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinTicket {
    pub generation: u64,
    /// Absolute wheel rotation the spin settles at
    pub target_rotation: f64,
    /// Seconds until the spin settles
    pub duration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinRejection {
    InsufficientBalance,
    AlreadySpinning,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpinResult {
    Started(SpinTicket),
    Rejected(SpinRejection),
}

impl SpinResult {
    pub fn is_started(&self) -> bool {
        matches!(self, SpinResult::Started(_))
    }

    pub fn ticket(&self) -> Option<SpinTicket> {
        match self {
            SpinResult::Started(ticket) => Some(*ticket),
            SpinResult::Rejected(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetRejection {
    AboveBalance,
    BelowMinimum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetChange {
    /// New bet
    Applied(u64),
    Rejected(BetRejection),
}

/// Serializable table state for presenters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouletteSnapshot {
    pub balance: u64,
    pub bet: u64,
    pub rotation_degrees: f64,
    pub is_spinning: bool,
    pub selected_number: Option<u8>,
}

#[derive(Debug, Clone)]
pub struct RouletteWheel<R = Pcg32> {
    tuning: RouletteSettings,
    balance: u64,
    bet: u64,
    /// Accumulated across spins, never wrapped. Each spin adds its turn to
    /// the previous rotation rather than replacing it, so the wheel always
    /// keeps turning the same way.
    rotation_degrees: f64,
    /// Rotation before the current spin began (for display interpolation)
    spin_from: f64,
    is_spinning: bool,
    elapsed: f64,
    generation: u64,
    stake: u64,
    selected_number: Option<u8>,
    last_outcome: Option<SpinOutcome>,
    rng: R,
}

impl RouletteWheel<Pcg32> {
    /// New table seeded from entropy
    pub fn new(settings: &RouletteSettings) -> Self {
        Self::with_rng(settings, RngState::from_entropy().to_rng())
    }
}

impl<R: UniformSource> RouletteWheel<R> {
    pub fn with_rng(settings: &RouletteSettings, rng: R) -> Self {
        Self {
            tuning: settings.clone(),
            balance: settings.starting_balance,
            bet: settings.starting_bet,
            rotation_degrees: 0.0,
            spin_from: 0.0,
            is_spinning: false,
            elapsed: 0.0,
            generation: 0,
            stake: 0,
            selected_number: None,
            last_outcome: None,
            rng,
        }
    }

    /// Debit the bet and start the wheel turning
    pub fn spin(&mut self) -> SpinResult {
        if self.is_spinning {
            return SpinResult::Rejected(SpinRejection::AlreadySpinning);
        }
        if self.balance < self.bet {
            return SpinResult::Rejected(SpinRejection::InsufficientBalance);
        }

        self.balance -= self.bet;
        self.stake = self.bet;
        self.generation += 1;

        let turns = self
            .rng
            .uniform(self.tuning.min_turns, self.tuning.max_turns);
        let total = 360.0 * turns + self.rng.uniform(0.0, 360.0);

        self.spin_from = self.rotation_degrees;
        self.rotation_degrees += total;
        self.is_spinning = true;
        self.elapsed = 0.0;

        log::info!(
            "Spin #{}: stake {}, rotating {:.1} degrees",
            self.generation,
            self.stake,
            total
        );

        SpinResult::Started(SpinTicket {
            generation: self.generation,
            target_rotation: self.rotation_degrees,
            duration: self.tuning.spin_duration,
        })
    }
}

impl<R> RouletteWheel<R> {
    /// Feed elapsed seconds; settles the spin once its duration has passed
    pub fn advance(&mut self, dt: f64) -> Option<SpinOutcome> {
        if !self.is_spinning {
            return None;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.tuning.spin_duration {
            Some(self.settle())
        } else {
            None
        }
    }

    /// Settle the spin a ticket refers to
    ///
    /// Returns `None` for a ticket whose spin already settled or was
    /// superseded.
    pub fn complete(&mut self, ticket: SpinTicket) -> Option<SpinOutcome> {
        if !self.is_spinning || ticket.generation != self.generation {
            log::debug!(
                "Ignoring stale spin completion #{} (current #{})",
                ticket.generation,
                self.generation
            );
            return None;
        }
        Some(self.settle())
    }

    fn settle(&mut self) -> SpinOutcome {
        self.is_spinning = false;
        self.elapsed = self.tuning.spin_duration;

        let number = number_for_rotation(self.rotation_degrees);
        let verdict = Verdict::for_number(number);
        let payout = match verdict {
            Verdict::Win => self.stake.saturating_mul(EVEN_PAYOUT),
            Verdict::HouseWins | Verdict::Lose => 0,
        };
        self.balance = self.balance.saturating_add(payout);
        self.selected_number = Some(number);

        let outcome = SpinOutcome {
            number,
            color: SlotColor::of(number),
            verdict,
            stake: self.stake,
            payout,
            balance: self.balance,
        };
        log::info!(
            "Spin #{} settled on {} ({:?}), balance {}",
            self.generation,
            number,
            verdict,
            self.balance
        );
        self.last_outcome = Some(outcome);
        outcome
    }

    /// Raise the bet by one step; the raised bet must stay below the balance
    pub fn increase_bet(&mut self) -> BetChange {
        match self.bet.checked_add(self.tuning.bet_increase_step) {
            Some(next) if next < self.balance => self.set_bet(next),
            _ => BetChange::Rejected(BetRejection::AboveBalance),
        }
    }

    /// Lower the bet by one step, down to the minimum
    pub fn decrease_bet(&mut self) -> BetChange {
        match self.bet.checked_sub(self.tuning.bet_decrease_step) {
            Some(next) => self.set_bet(next),
            None => BetChange::Rejected(BetRejection::BelowMinimum),
        }
    }

    /// Set the bet directly; it must stay within [min_bet, balance]
    pub fn set_bet(&mut self, amount: u64) -> BetChange {
        if amount < self.tuning.min_bet {
            return BetChange::Rejected(BetRejection::BelowMinimum);
        }
        if amount > self.balance {
            return BetChange::Rejected(BetRejection::AboveBalance);
        }
        self.bet = amount;
        BetChange::Applied(amount)
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    pub fn is_spinning(&self) -> bool {
        self.is_spinning
    }

    pub fn selected_number(&self) -> Option<u8> {
        self.selected_number
    }

    pub fn last_outcome(&self) -> Option<&SpinOutcome> {
        self.last_outcome.as_ref()
    }

    /// Fraction of the current spin elapsed, 1.0 when idle
    pub fn progress(&self) -> f64 {
        if self.is_spinning {
            (self.elapsed / self.tuning.spin_duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Eased rotation for drawing the wheel mid-spin
    pub fn displayed_rotation(&self) -> f64 {
        if !self.is_spinning {
            return self.rotation_degrees;
        }
        let t = ease_in_out(self.progress());
        self.spin_from + (self.rotation_degrees - self.spin_from) * t
    }

    pub fn snapshot(&self) -> RouletteSnapshot {
        RouletteSnapshot {
            balance: self.balance,
            bet: self.bet,
            rotation_degrees: self.rotation_degrees,
            is_spinning: self.is_spinning,
            selected_number: self.selected_number,
        }
    }
}
