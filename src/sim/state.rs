//! Game state and core simulation types
//!
//! Everything a tick reads or mutates lives in [`GameState`]; the ledger is
//! the only outside collaborator and is passed in explicitly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::board::Board;
use super::bounce::{BounceSource, SeededBounce};
use super::pool::BallPool;
use crate::error::ConfigError;
use crate::scoreboard::Scoreboard;
use crate::settings::Settings;

/// Stable ball identifier, unique for the life of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u32);

impl std::fmt::Display for BallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Simulation clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClockPhase {
    /// Nothing spawned yet (or the session was reset)
    #[default]
    Idle,
    /// Balls are falling and ticks advance them
    Running,
    /// Suspended manually or by the auto-stop gate
    Paused,
    /// Every ball of the last batch has landed
    Stopped,
}

/// Ball state - falling through the lattice or resting in a bin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    Falling,
    /// Landed in the bin with the given index
    Captured { bin: usize },
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Amount debited for this ball at spawn; payouts multiply it
    pub stake: f64,
    pub state: BallState,
}

impl Ball {
    pub fn new(id: BallId, pos: Vec2, radius: f32, stake: f64) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            stake,
            state: BallState::Falling,
        }
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.state == BallState::Falling
    }

    /// Bin index if captured
    #[inline]
    pub fn captured_bin(&self) -> Option<usize> {
        match self.state {
            BallState::Captured { bin } => Some(bin),
            BallState::Falling => None,
        }
    }

    /// Lowest point of the ball (y grows downward)
    #[inline]
    pub fn lower_edge(&self) -> f32 {
        self.pos.y + self.radius
    }

    /// Pin the ball to `rest` in bin `bin`. Only the first capture counts.
    pub fn capture(&mut self, bin: usize, rest: Vec2) -> bool {
        if !self.is_falling() {
            return false;
        }
        self.state = BallState::Captured { bin };
        self.vel = Vec2::ZERO;
        self.pos = rest;
        true
    }
}

/// Something observers (renderer, sound, UI) may react to after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off the peg at this index in [`Board::pegs`]
    PegHit { ball: BallId, peg: usize },
    /// Ball bounced off a side wall
    WallBounce { ball: BallId },
    /// Ball bounced off the floor outside every bin
    FloorBounce { ball: BallId },
    /// Ball landed in a bin
    Captured { ball: BallId, bin: usize },
    /// Capture paid out; `delta` was applied to the ledger
    Settled { ball: BallId, bin: usize, delta: f64 },
    /// The ledger refused the payout for this capture
    SettlementRejected { ball: BallId, bin: usize, delta: f64 },
    /// Auto-stop gate paused the clock
    AutoStopped,
    /// Last falling ball landed
    BatchComplete,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState<S = SeededBounce> {
    pub settings: Settings,
    pub board: Board,
    pub pool: BallPool,
    pub phase: ClockPhase,
    /// Auto-stop feature enabled
    pub auto_stop_armed: bool,
    /// Gate already fired for the current batch
    pub auto_stop_triggered: bool,
    /// Ticks advanced while running
    pub time_ticks: u64,
    /// Events since the last tick (or frame) began
    pub events: Vec<GameEvent>,
    pub scoreboard: Scoreboard,
    /// Random source for bounce perturbation
    pub source: S,
}

impl GameState<SeededBounce> {
    /// Create a session on the board described by `settings`, with a seeded
    /// bounce source
    pub fn new(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        Self::with_source(settings, SeededBounce::new(seed))
    }
}

impl<S: BounceSource> GameState<S> {
    /// Create a session with a caller-supplied bounce source
    pub fn with_source(settings: Settings, source: S) -> Result<Self, ConfigError> {
        let board = Board::build(&settings)?;
        let scoreboard = Scoreboard::new(board.bins().len());
        log::info!(
            "Session ready: {} pegs, {} bins, {} per ball",
            board.pegs().len(),
            board.bins().len(),
            settings.cost_per_ball
        );
        Ok(Self {
            auto_stop_armed: settings.auto_stop_enabled,
            settings,
            board,
            pool: BallPool::new(),
            phase: ClockPhase::Idle,
            auto_stop_triggered: false,
            time_ticks: 0,
            events: Vec::new(),
            scoreboard,
            source,
        })
    }

    /// Manual pause/resume. Only meaningful while a batch is in flight.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            ClockPhase::Running => self.pause(),
            ClockPhase::Paused => self.resume(),
            ClockPhase::Idle | ClockPhase::Stopped => {}
        }
    }

    pub fn pause(&mut self) {
        if self.phase == ClockPhase::Running {
            self.phase = ClockPhase::Paused;
            log::debug!("Paused at tick {}", self.time_ticks);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == ClockPhase::Paused {
            self.phase = ClockPhase::Running;
            log::debug!("Resumed at tick {}", self.time_ticks);
        }
    }

    /// Enable or disable the auto-stop gate
    pub fn set_auto_stop(&mut self, armed: bool) {
        self.auto_stop_armed = armed;
    }

    /// Discard every ball and return to `Idle`. Captures not yet settled are
    /// dropped with the balls they belong to.
    pub fn reset(&mut self) {
        let discarded = self.pool.len();
        self.pool.clear();
        self.events.clear();
        self.scoreboard.reset();
        self.phase = ClockPhase::Idle;
        self.auto_stop_triggered = false;
        log::info!("Session reset, {} balls discarded", discarded);
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == ClockPhase::Running
    }
}
