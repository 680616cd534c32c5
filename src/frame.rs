//! Read-only snapshots for renderers
//!
//! A [`Frame`] is captured after a tick and carries everything needed to draw
//! the board. Renderers never hold a reference into the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{BallId, BounceSource, ClockPhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub payout: f64,
    /// Balls landed here this session
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub id: BallId,
    pub pos: Vec2,
    pub radius: f32,
    pub captured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub tick: u64,
    pub phase: ClockPhase,
    pub pegs: Vec<Vec2>,
    pub peg_radius: f32,
    pub bins: Vec<BinView>,
    pub balls: Vec<BallView>,
    /// Drawn only while the gate is armed
    pub auto_stop_line: Option<f32>,
    pub balance: f64,
}

impl Frame {
    pub fn capture<S: BounceSource>(state: &GameState<S>, balance: f64) -> Self {
        let counts = state.scoreboard.bin_counts();
        let bins = state
            .board
            .bins()
            .iter()
            .map(|bin| BinView {
                x: bin.x,
                y: bin.y,
                width: bin.width,
                height: bin.height,
                payout: bin.payout,
                count: counts.get(bin.index).copied().unwrap_or(0),
            })
            .collect();
        let balls = state
            .pool
            .iter()
            .map(|ball| BallView {
                id: ball.id,
                pos: ball.pos,
                radius: ball.radius,
                captured: !ball.is_falling(),
            })
            .collect();

        Self {
            tick: state.time_ticks,
            phase: state.phase,
            pegs: state.board.pegs().iter().map(|p| p.pos).collect(),
            peg_radius: state.board.peg_radius(),
            bins,
            balls,
            auto_stop_line: state
                .auto_stop_armed
                .then_some(state.settings.auto_stop_line_y),
            balance,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Balls still in the air
    pub fn falling(&self) -> impl Iterator<Item = &BallView> {
        self.balls.iter().filter(|b| !b.captured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::ledger::{Ledger, Wallet};
    use crate::settings::Settings;
    use crate::sim::{FixedBounce, TickInput, tick, try_spawn_batch};

    fn small_state() -> GameState<FixedBounce> {
        let mut settings = Settings::with_rows(5, vec![10.0, 1.0, 1.0, 10.0]);
        settings.board_width = 300.0;
        settings.cost_per_ball = 1.0;
        GameState::with_source(settings, FixedBounce(0.0)).unwrap()
    }

    #[test]
    fn test_idle_frame() {
        let state = small_state();
        let frame = Frame::capture(&state, 100.0);
        assert_eq!(frame.phase, ClockPhase::Idle);
        assert_eq!(frame.pegs.len(), 14);
        assert_eq!(frame.bins.len(), 4);
        assert!(frame.balls.is_empty());
        assert_eq!(frame.auto_stop_line, None);
    }

    #[test]
    fn test_frame_tracks_balls_and_counts() {
        let mut state = small_state();
        let mut wallet = Wallet::new(100.0);
        try_spawn_batch(&mut state, &mut wallet, 2).unwrap();

        let frame = Frame::capture(&state, wallet.balance());
        assert_eq!(frame.falling().count(), 2);
        assert_eq!(frame.balance, 98.0);

        for _ in 0..10_000 {
            tick(&mut state, &mut wallet, &TickInput::default(), SIM_DT);
            if state.phase == ClockPhase::Stopped {
                break;
            }
        }
        let frame = Frame::capture(&state, wallet.balance());
        assert_eq!(frame.falling().count(), 0);
        assert_eq!(frame.bins[0].count, 2);
        assert_eq!(frame.balance, 118.0);
        assert_eq!(frame.balls[0].pos, Vec2::new(75.0, 350.0));
    }

    #[test]
    fn test_auto_stop_line_shown_when_armed() {
        let mut state = small_state();
        state.set_auto_stop(true);
        let frame = Frame::capture(&state, 0.0);
        assert_eq!(frame.auto_stop_line, Some(state.settings.auto_stop_line_y));
    }

    #[test]
    fn test_json_snapshot() {
        let state = small_state();
        let json = Frame::capture(&state, 5.0).to_json().unwrap();
        let back: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Frame::capture(&state, 5.0));
    }
}
