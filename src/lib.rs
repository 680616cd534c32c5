//! Pachinko - a ball-drop game of chance
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board, balls, collisions, payouts)
//! - `ledger`: Balance the engine debits on spawn and credits on capture
//! - `scoreboard`: Per-session bin counters and results
//! - `frame`: Read-only snapshots for renderers
//! - `settings`: Board, physics and session configuration

pub mod error;
pub mod frame;
pub mod ledger;
pub mod scoreboard;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, LedgerError, SettingsError, SpawnRejection};
pub use frame::Frame;
pub use ledger::{Ledger, Wallet};
pub use scoreboard::Scoreboard;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the accumulator will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Board layout
    pub const ROW_COUNT: u32 = 30;
    pub const ROW_SPACING_Y: f32 = 50.0;
    pub const PEG_SPACING_X: f32 = 50.0;
    pub const SPAWN_TOP_MARGIN: f32 = 50.0;
    pub const BOARD_WIDTH: f32 = 2000.0;
    pub const SPAWN_Y: f32 = 0.0;

    /// Peg and ball sizes
    pub const PEG_RADIUS: f32 = 8.0;
    pub const BALL_RADIUS: f32 = 10.0;

    /// Bins tile the capture line, so they are as wide as the peg pitch
    pub const BIN_WIDTH: f32 = PEG_SPACING_X;
    pub const BIN_HEIGHT: f32 = 50.0;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 1440.0;
    /// Velocity kept after a wall or floor bounce
    pub const RESTITUTION: f32 = 0.5;
    /// Speed of a ball leaving a peg (pixels/s)
    pub const BOUNCE_SPEED: f32 = 75.0;
    /// Total angular spread of the bounce perturbation (30°)
    pub const BOUNCE_ANGLE_SPREAD: f32 = std::f32::consts::PI / 6.0;

    /// Auto-stop line, two thirds of the way down the lattice
    pub const AUTO_STOP_LINE_Y: f32 = SPAWN_TOP_MARGIN + 20.0 * ROW_SPACING_Y;

    /// Session economics
    pub const COST_PER_BALL: f64 = 10.0;
    pub const STARTING_BALANCE: f64 = 10_000.0;

    /// Batch sizes offered to the player
    pub const BATCH_PRESETS: [u32; 4] = [1, 10, 100, 1000];

    /// Payout multipliers, edge bins pay the most
    pub const PAYOUT_TABLE: [f64; 29] = [
        1000.0, 250.0, 75.0, 10.0, 6.0, 4.0, 2.0, 1.5, 1.2, 1.0, 0.8, 0.5, 0.2, 0.0, -0.5, 0.0,
        0.2, 0.5, 0.8, 1.0, 1.2, 1.5, 2.0, 4.0, 6.0, 10.0, 75.0, 250.0, 1000.0,
    ];
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Angle of a vector, measured the way `atan2(dy, dx)` does
#[inline]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
