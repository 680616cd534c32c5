//! Pachinko entry point
//!
//! Headless driver: loads settings, drops batches through the fixed timestep
//! loop and prints the session scoreboard.

use std::path::PathBuf;

use clap::Parser;

use pachinko::consts::BATCH_PRESETS;
use pachinko::sim::{
    ClockPhase, FixedStep, GameEvent, GameState, TickInput, run_frame, try_spawn_batch,
};
use pachinko::{Frame, Ledger, Settings, Wallet};

#[derive(Parser, Debug)]
#[command(name = "pachinko", about = "Drop balls through a peg board and settle payouts")]
struct Args {
    /// Settings JSON file; the classic 30-row board is used if omitted
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Seed for the bounce randomness
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Balls per batch
    #[arg(long, default_value_t = BATCH_PRESETS[0])]
    balls: u32,

    /// Number of batches to play
    #[arg(long, default_value_t = 1)]
    batches: u32,

    /// Pause the clock when the first ball of a batch crosses the auto-stop line
    #[arg(long)]
    auto_stop: bool,

    /// Simulated frame time fed to the accumulator (seconds)
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f32,

    /// Give up on a batch after this many frames
    #[arg(long, default_value_t = 100_000)]
    max_frames: u32,

    /// Write a snapshot of the final frame to this file
    #[arg(long)]
    frame_json: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Pachinko starting...");

    let mut settings = Settings::load_or_default(args.settings.as_deref())?;
    if args.auto_stop {
        settings.auto_stop_enabled = true;
    }
    if !BATCH_PRESETS.contains(&args.balls) {
        log::info!("Batch size {} is not one of the presets {:?}", args.balls, BATCH_PRESETS);
    }

    let mut wallet = Wallet::new(settings.starting_balance);
    let mut state = GameState::new(settings, args.seed)?;
    log::info!("Session ready with seed {}", args.seed);

    let played = play_session(&args, &mut state, &mut wallet);
    log::info!("Played {} of {} batches", played, args.batches);

    print_scoreboard(&state, &wallet);

    if let Some(path) = &args.frame_json {
        let json = Frame::capture(&state, wallet.balance()).to_json()?;
        std::fs::write(path, json)?;
        log::info!("Wrote final frame to {}", path.display());
    }

    Ok(())
}

/// How a batch's frame loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchEnd {
    /// No ball is falling any more
    Landed { frames: u32 },
    /// `max_frames` ran out with balls still in the air
    TimedOut { frames: u32 },
}

/// Play every requested batch; returns how many ran to completion
fn play_session(args: &Args, state: &mut GameState, wallet: &mut Wallet) -> u32 {
    let mut stepper = FixedStep::default();
    let mut played = 0;

    for batch in 1..=args.batches {
        match try_spawn_batch(state, wallet, args.balls) {
            Ok(ids) => log::info!("Batch {}: {} balls in flight", batch, ids.len()),
            Err(rejection) => {
                println!("Batch {} rejected: {}", batch, rejection);
                break;
            }
        }

        match play_batch(state, wallet, &mut stepper, args.frame_dt, args.max_frames) {
            BatchEnd::Landed { frames } => {
                log::debug!("Batch {} landed after {} frames", batch, frames);
                played += 1;
            }
            BatchEnd::TimedOut { frames } => {
                log::warn!(
                    "Batch {} still has {} balls falling after {} frames",
                    batch,
                    state.pool.falling_count(),
                    frames
                );
                break;
            }
        }
    }
    played
}

/// Run frames until every ball has landed. An empty batch lands at once.
fn play_batch(
    state: &mut GameState,
    wallet: &mut Wallet,
    stepper: &mut FixedStep,
    frame_dt: f32,
    max_frames: u32,
) -> BatchEnd {
    let mut frames = 0;
    while !state.pool.all_captured() {
        if frames >= max_frames {
            return BatchEnd::TimedOut { frames };
        }
        // Headless: nobody is watching, so resume right after an auto-stop
        let input = TickInput {
            pause: state.phase == ClockPhase::Paused,
            ..Default::default()
        };
        run_frame(state, wallet, stepper, &input, frame_dt);
        frames += 1;

        for event in &state.events {
            match event {
                GameEvent::AutoStopped => println!("Auto-stop at tick {}", state.time_ticks),
                GameEvent::SettlementRejected { ball, bin, delta } => {
                    println!("Ball {} in bin {}: payout {} refused", ball, bin, delta)
                }
                _ => {}
            }
        }
    }
    BatchEnd::Landed { frames }
}

fn print_scoreboard(state: &GameState, wallet: &Wallet) {
    let scoreboard = &state.scoreboard;
    println!(
        "{} batches, {} balls dropped, {} landed",
        scoreboard.batches(),
        scoreboard.balls_dropped(),
        scoreboard.balls_landed()
    );
    for (bin, count) in state.board.bins().iter().zip(scoreboard.bin_counts()) {
        println!("  bin {:>2}  x{:<7} {}", bin.index, bin.payout, count);
    }
    println!(
        "Staked {:.2}, returned {:.2}, net {:+.2}",
        scoreboard.total_staked(),
        scoreboard.total_returned(),
        scoreboard.net()
    );
    if let Some(bin) = scoreboard.busiest_bin() {
        println!("Busiest bin: {}", bin);
    }
    println!("Balance: {:.2}", wallet.balance());
}
