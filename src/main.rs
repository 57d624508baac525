//! Casino Core headless driver
//!
//! Plays one round of each game without a UI and prints what happened.
//!
//! Usage: `casino-core [seed] [settings.json]`

use casino_core::consts::SIM_DT;
use casino_core::sim::RevealResult;
use casino_core::{Casino, GameKind, RngState, Settings};

/// A typical phone viewport in points
const VIEWPORT: (f32, f32) = (390.0, 844.0);

fn main() {
    env_logger::init();
    log::info!("Casino Core (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| RngState::from_entropy().seed);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let mut casino = Casino::new(&settings, VIEWPORT.0, VIEWPORT.1, seed);
    println!("Seed: {}", casino.seed());

    for kind in GameKind::ALL {
        println!("\n== {} ==", kind.title());
        match kind {
            GameKind::Plinko => play_plinko(&mut casino),
            GameKind::Roulette => play_roulette(&mut casino),
            GameKind::Mines => play_mines(&mut casino),
        }
    }
}

fn play_plinko(casino: &mut Casino) {
    let plinko = &mut casino.plinko;
    plinko.drop_ball();
    loop {
        if let Some(landing) = plinko.advance(SIM_DT) {
            println!(
                "Landed in bucket {} for {} points after {} ticks{}",
                landing.bucket,
                landing.awarded,
                landing.ticks,
                if landing.forced { " (forced)" } else { "" }
            );
            break;
        }
    }
    println!("Score: {}", plinko.score());
}

fn play_roulette(casino: &mut Casino) {
    let wheel = &mut casino.roulette;
    println!("Balance: ${}  Bet: ${}", wheel.balance(), wheel.bet());
    if let Some(ticket) = wheel.spin().ticket() {
        if let Some(outcome) = wheel.complete(ticket) {
            println!("{}", outcome.message());
        }
    }
    println!("Balance: ${}", wheel.balance());
}

fn play_mines(casino: &mut Casino) {
    let board = &mut casino.mines;
    let size = board.size();
    'sweep: for row in 0..size {
        for col in 0..size {
            if let RevealResult::Detonated = board.reveal(row, col) {
                println!("Mine at ({}, {})", row, col);
                break 'sweep;
            }
        }
    }
    println!(
        "Score: {}{}",
        board.score(),
        if board.is_game_over() { "  Game Over!" } else { "" }
    );
}
