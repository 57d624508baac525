//! Game simulations
//!
//! Each game is an independent state machine driven by explicit calls:
//! - No rendering or platform dependencies
//! - All randomness through an injected [`crate::rng::UniformSource`]
//! - Invalid input is reported as a `Rejected` result and changes nothing

pub mod clock;
pub mod collision;
pub mod mines;
pub mod plinko;
pub mod roulette;

pub use clock::FixedStep;
pub use collision::{CollisionResult, ball_peg_collision, reflect_velocity};
pub use mines::{
    Cell, CellView, MinesBoard, MinesPhase, MinesSnapshot, RevealRejection, RevealResult,
};
pub use plinko::{
    Ball, BoardLayout, Bucket, DropRejection, DropResult, Landing, Peg, PlinkoPhase,
    PlinkoSimulator, TickReport,
};
pub use roulette::{
    BetChange, BetRejection, RouletteSnapshot, RouletteWheel, SlotColor, SpinOutcome,
    SpinRejection, SpinResult, SpinTicket, Verdict, WHEEL_NUMBERS,
};
