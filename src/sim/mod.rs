//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded bounce randomness only
//! - Stable iteration order (by ball ID, then peg order)
//! - No rendering or platform dependencies

pub mod board;
pub mod bounce;
pub mod clock;
pub mod collision;
pub mod payout;
pub mod pool;
pub mod spawner;
pub mod state;
pub mod tick;

pub use board::{Bin, Board, Peg, peg_count};
pub use bounce::{BounceSource, FixedBounce, ScriptedBounce, SeededBounce};
pub use clock::{FixedStep, run_frame};
pub use collision::{PegContact, bounce_velocity, capturing_bin, peg_contact, resolve_ball};
pub use payout::{apply_delta, resolve, settle_captures};
pub use pool::BallPool;
pub use spawner::try_spawn_batch;
pub use state::{Ball, BallId, BallState, ClockPhase, GameEvent, GameState};
pub use tick::{TickInput, advance, apply_input, tick};
