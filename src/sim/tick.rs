//! Fixed timestep simulation tick
//!
//! Core loop that advances every falling ball deterministically, then settles
//! captures, then evaluates the auto-stop gate and the end of the batch.

use glam::Vec2;

use super::bounce::BounceSource;
use super::collision::resolve_ball;
use super::payout::settle_captures;
use super::state::{BallId, ClockPhase, GameEvent, GameState};
use crate::ledger::Ledger;

/// Control commands applied at the start of a tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pause/resume toggle
    pub pause: bool,
    /// Enable or disable the auto-stop gate
    pub auto_stop: Option<bool>,
    /// Discard every ball and go back to idle
    pub reset: bool,
}

impl TickInput {
    /// True if the input carries any command
    pub fn is_empty(&self) -> bool {
        !self.pause && self.auto_stop.is_none() && !self.reset
    }
}

/// Apply control commands without advancing time
pub fn apply_input<S: BounceSource>(state: &mut GameState<S>, input: &TickInput) {
    if input.reset {
        state.reset();
        return;
    }
    if let Some(armed) = input.auto_stop {
        state.set_auto_stop(armed);
    }
    if input.pause {
        state.toggle_pause();
    }
}

/// Apply `input`, then advance the game state by one fixed timestep
pub fn tick<S: BounceSource>(
    state: &mut GameState<S>,
    ledger: &mut dyn Ledger,
    input: &TickInput,
    dt: f32,
) {
    state.events.clear();
    apply_input(state, input);
    advance(state, ledger, dt);
}

/// Advance one timestep if the clock is running. Events are appended to
/// `state.events`.
pub fn advance<S: BounceSource>(state: &mut GameState<S>, ledger: &mut dyn Ledger, dt: f32) {
    if state.phase != ClockPhase::Running {
        return;
    }
    state.time_ticks += 1;
    let first_event = state.events.len();

    // Integrate and collide every falling ball, in id order
    {
        let GameState {
            settings,
            board,
            pool,
            source,
            events,
            ..
        } = state;
        let gravity = Vec2::new(0.0, settings.gravity);
        pool.for_each_falling(|ball| {
            ball.vel += gravity * dt;
            ball.pos += ball.vel * dt;
            resolve_ball(ball, board, settings, source, events);
        });
    }

    // Settle this tick's captures
    let captures: Vec<(BallId, usize)> = state.events[first_event..]
        .iter()
        .filter_map(|event| match *event {
            GameEvent::Captured { ball, bin } => Some((ball, bin)),
            _ => None,
        })
        .collect();
    if !captures.is_empty() {
        settle_captures(
            &captures,
            &state.pool,
            &state.board,
            ledger,
            &mut state.scoreboard,
            &mut state.events,
        );
    }

    // Auto-stop gate: one-shot per batch
    if state.auto_stop_armed && !state.auto_stop_triggered {
        let line = state.settings.auto_stop_line_y;
        if state.pool.falling().any(|b| b.lower_edge() >= line) {
            state.auto_stop_triggered = true;
            state.phase = ClockPhase::Paused;
            state.events.push(GameEvent::AutoStopped);
            log::info!("Auto-stop at tick {}: a ball crossed y={}", state.time_ticks, line);
            return;
        }
    }

    if state.pool.all_captured() {
        state.phase = ClockPhase::Stopped;
        state.events.push(GameEvent::BatchComplete);
        log::info!(
            "Batch complete at tick {}, balance {}",
            state.time_ticks,
            ledger.balance()
        );
    }
}
