//! Batch spawning: one play's cohort of balls, paid for up front

use super::bounce::BounceSource;
use super::state::{BallId, ClockPhase, GameState};
use crate::error::SpawnRejection;
use crate::ledger::Ledger;

/// Spawn `count` balls at the board's spawn point, debiting
/// `count × cost_per_ball` before any of them moves.
///
/// Rejected without touching any state while a ball of the previous batch is
/// still falling, or when the ledger cannot cover the cost.
pub fn try_spawn_batch<S: BounceSource>(
    state: &mut GameState<S>,
    ledger: &mut dyn Ledger,
    count: u32,
) -> Result<Vec<BallId>, SpawnRejection> {
    if !state.pool.all_captured() {
        log::debug!("Batch of {} rejected: previous batch still falling", count);
        return Err(SpawnRejection::BatchInFlight);
    }
    if count == 0 {
        return Ok(Vec::new());
    }

    let cost_per_ball = state.settings.cost_per_ball;
    let total_cost = f64::from(count) * cost_per_ball;
    if ledger.balance() < total_cost {
        log::debug!(
            "Batch of {} rejected: costs {}, balance {}",
            count,
            total_cost,
            ledger.balance()
        );
        return Err(SpawnRejection::InsufficientFunds);
    }
    if let Err(err) = ledger.debit(total_cost) {
        log::warn!("Ledger refused batch debit of {}: {}", total_cost, err);
        return Err(SpawnRejection::InsufficientFunds);
    }

    let spawn = state.board.spawn_point();
    let radius = state.settings.ball_radius;
    let ids: Vec<BallId> = (0..count)
        .map(|_| state.pool.spawn(spawn, radius, cost_per_ball))
        .collect();

    state.auto_stop_triggered = false;
    state.phase = ClockPhase::Running;
    state.scoreboard.record_batch(count, total_cost);
    log::info!(
        "Dropped {} balls for {} (balance {})",
        count,
        total_cost,
        ledger.balance()
    );

    Ok(ids)
}
