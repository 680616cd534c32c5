//! Payout resolution: turns captures into ledger deltas
//!
//! Each capture settles the instant it happens; nothing is batched to the end
//! of a round and a settled capture is never reversed.

use super::board::Board;
use super::pool::BallPool;
use super::state::{BallId, GameEvent};
use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::scoreboard::{BallResult, Scoreboard};

/// Ledger delta for a ball staked at `stake` landing in `bin_index`
pub fn resolve(bin_index: usize, stake: f64, payout_table: &[f64]) -> Option<f64> {
    payout_table.get(bin_index).map(|multiplier| stake * multiplier)
}

/// Apply a signed delta: gains are credited, losses debited, zero is a no-op
pub fn apply_delta(ledger: &mut dyn Ledger, delta: f64) -> Result<(), LedgerError> {
    if delta > 0.0 {
        ledger.credit(delta)
    } else if delta < 0.0 {
        ledger.debit(-delta)
    } else {
        Ok(())
    }
}

/// Settle this tick's captures in order. Captures whose ball is gone from the
/// pool (session reset) are dropped.
pub fn settle_captures(
    captures: &[(BallId, usize)],
    pool: &BallPool,
    board: &Board,
    ledger: &mut dyn Ledger,
    scoreboard: &mut Scoreboard,
    events: &mut Vec<GameEvent>,
) {
    for &(id, bin) in captures {
        let Some(ball) = pool.get(id) else {
            log::debug!("Dropping capture for discarded ball {}", id);
            continue;
        };
        if ball.captured_bin() != Some(bin) {
            continue;
        }
        let table = board.payout_table();
        let Some(delta) = resolve(bin, ball.stake, table) else {
            continue;
        };
        let multiplier = table[bin];

        match apply_delta(ledger, delta) {
            Ok(()) => {
                log::debug!("Ball {} landed in bin {} (x{}): {:+}", id, bin, multiplier, delta);
                scoreboard.record_result(BallResult {
                    ball: id,
                    bin,
                    multiplier,
                    stake: ball.stake,
                    delta,
                });
                events.push(GameEvent::Settled {
                    ball: id,
                    bin,
                    delta,
                });
            }
            Err(err) => {
                log::warn!("Ledger refused payout of {} for ball {}: {}", delta, id, err);
                scoreboard.record_capture(bin);
                events.push(GameEvent::SettlementRejected {
                    ball: id,
                    bin,
                    delta,
                });
            }
        }
    }
}
