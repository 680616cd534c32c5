//! Fixed timestep accumulator
//!
//! Converts variable frame times into a whole number of simulation ticks so a
//! session plays out the same regardless of frame rate.

use serde::{Deserialize, Serialize};

use super::bounce::BounceSource;
use super::state::GameState;
use super::tick::{TickInput, advance, apply_input};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::ledger::Ledger;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedStep {
    dt: f32,
    /// Frame times are clamped to this to avoid a spiral of death
    max_frame_dt: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl FixedStep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            max_frame_dt: MAX_FRAME_DT,
            max_substeps: MAX_SUBSTEPS,
            accumulator: 0.0,
        }
    }

    pub fn with_limits(mut self, max_frame_dt: f32, max_substeps: u32) -> Self {
        self.max_frame_dt = max_frame_dt;
        self.max_substeps = max_substeps;
        self
    }

    /// Length of one tick in seconds
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Feed one frame's elapsed time; returns how many ticks to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() {
            return 0;
        }
        self.accumulator += frame_dt.clamp(0.0, self.max_frame_dt);

        let mut steps = 0;
        while self.accumulator >= self.dt && steps < self.max_substeps {
            self.accumulator -= self.dt;
            steps += 1;
        }
        steps
    }

    /// Fraction of a tick left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }
}

/// Run one rendered frame: apply `input` once, then as many ticks as the
/// accumulator allows. Events from every tick of the frame are kept.
pub fn run_frame<S: BounceSource>(
    state: &mut GameState<S>,
    ledger: &mut dyn Ledger,
    stepper: &mut FixedStep,
    input: &TickInput,
    frame_dt: f32,
) -> u32 {
    state.events.clear();
    apply_input(state, input);

    let steps = stepper.advance(frame_dt);
    for _ in 0..steps {
        advance(state, ledger, stepper.dt());
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Wallet;
    use crate::settings::Settings;
    use crate::sim::spawner::try_spawn_batch;
    use crate::sim::state::{ClockPhase, GameEvent};

    #[test]
    fn test_accumulates_partial_frames() {
        let mut step = FixedStep::new(0.125).with_limits(1.0, 4);
        assert_eq!(step.advance(0.0), 0);
        assert_eq!(step.advance(0.3), 2);
        assert!((step.alpha() - 0.4).abs() < 1e-4);
        assert_eq!(step.advance(0.1), 1);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut step = FixedStep::new(0.125).with_limits(1.0, 4);
        // 5s is clamped to 1s, of which only four ticks run now
        assert_eq!(step.advance(5.0), 4);
        assert_eq!(step.advance(0.0), 4);
    }

    #[test]
    fn test_bad_frame_times_are_ignored() {
        let mut step = FixedStep::new(0.125);
        assert_eq!(step.advance(f32::NAN), 0);
        assert_eq!(step.advance(-1.0), 0);
        assert_eq!(step.alpha(), 0.0);
    }

    #[test]
    fn test_run_frame_matches_ticks() {
        let mut settings = Settings::with_rows(5, vec![10.0, 1.0, 1.0, 10.0]);
        settings.board_width = 300.0;
        settings.cost_per_ball = 1.0;

        let mut framed = GameState::new(settings.clone(), 17).unwrap();
        let mut ticked = GameState::new(settings, 17).unwrap();
        let mut wallet_a = Wallet::new(100.0);
        let mut wallet_b = Wallet::new(100.0);
        try_spawn_batch(&mut framed, &mut wallet_a, 4).unwrap();
        try_spawn_batch(&mut ticked, &mut wallet_b, 4).unwrap();

        let mut step = FixedStep::new(SIM_DT).with_limits(1.0, 64);
        let mut ticks = 0;
        let mut events = Vec::new();
        while framed.phase == ClockPhase::Running && ticks < 10_000 {
            ticks += run_frame(&mut framed, &mut wallet_a, &mut step, &TickInput::default(), 0.25);
            events.extend(framed.events.iter().cloned());
        }
        for _ in 0..ticks {
            advance(&mut ticked, &mut wallet_b, SIM_DT);
        }

        assert_eq!(framed.phase, ClockPhase::Stopped);
        assert_eq!(ticked.phase, ClockPhase::Stopped);
        assert_eq!(framed.time_ticks, ticked.time_ticks);
        assert_eq!(wallet_a.balance(), wallet_b.balance());
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::Settled { .. }))
                .count(),
            4
        );
    }

    #[test]
    fn test_run_frame_applies_input_without_ticks() {
        let mut state = GameState::new(Settings::default(), 1).unwrap();
        let mut wallet = Wallet::new(100.0);
        try_spawn_batch(&mut state, &mut wallet, 1).unwrap();

        let mut step = FixedStep::default();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        assert_eq!(run_frame(&mut state, &mut wallet, &mut step, &pause, 0.0), 0);
        assert_eq!(state.phase, ClockPhase::Paused);
    }
}
