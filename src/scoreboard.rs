//! Session scoreboard
//!
//! Per-bin capture counters, running totals and the most recent results.
//! Lives only as long as the session; a reset starts it over.

use serde::{Deserialize, Serialize};

use crate::sim::BallId;

/// Maximum number of recent results to keep
pub const MAX_RECENT_RESULTS: usize = 10;

/// Outcome of one settled ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallResult {
    pub ball: BallId,
    pub bin: usize,
    pub multiplier: f64,
    pub stake: f64,
    /// Amount applied to the ledger (`stake × multiplier`)
    pub delta: f64,
}

/// Counters a renderer can show next to the board
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Balls landed per bin, left to right
    bin_counts: Vec<u64>,
    /// Accepted batches
    batches: u64,
    /// Balls spawned across all batches
    balls_dropped: u64,
    /// Debited at spawn
    total_staked: f64,
    /// Sum of settled deltas
    total_returned: f64,
    /// Newest first
    recent: Vec<BallResult>,
}

impl Scoreboard {
    /// Create an empty scoreboard for `bin_count` bins
    pub fn new(bin_count: usize) -> Self {
        Self {
            bin_counts: vec![0; bin_count],
            ..Self::default()
        }
    }

    /// Count an accepted batch and what it cost
    pub fn record_batch(&mut self, count: u32, cost: f64) {
        self.batches += 1;
        self.balls_dropped += u64::from(count);
        self.total_staked += cost;
    }

    /// Count a landing that was not paid out
    pub fn record_capture(&mut self, bin: usize) {
        if let Some(count) = self.bin_counts.get_mut(bin) {
            *count += 1;
        }
    }

    /// Count a landing and remember its payout
    pub fn record_result(&mut self, result: BallResult) {
        self.record_capture(result.bin);
        self.total_returned += result.delta;
        self.recent.insert(0, result);
        self.recent.truncate(MAX_RECENT_RESULTS);
    }

    pub fn bin_counts(&self) -> &[u64] {
        &self.bin_counts
    }

    /// Balls that have landed in any bin
    pub fn balls_landed(&self) -> u64 {
        self.bin_counts.iter().sum()
    }

    pub fn batches(&self) -> u64 {
        self.batches
    }

    pub fn balls_dropped(&self) -> u64 {
        self.balls_dropped
    }

    pub fn total_staked(&self) -> f64 {
        self.total_staked
    }

    pub fn total_returned(&self) -> f64 {
        self.total_returned
    }

    /// Returned minus staked; positive when the player is ahead
    pub fn net(&self) -> f64 {
        self.total_returned - self.total_staked
    }

    /// Recent results, newest first
    pub fn recent(&self) -> &[BallResult] {
        &self.recent
    }

    pub fn last_result(&self) -> Option<&BallResult> {
        self.recent.first()
    }

    /// Index of the bin that has caught the most balls (leftmost on ties)
    pub fn busiest_bin(&self) -> Option<usize> {
        let max = *self.bin_counts.iter().max()?;
        if max == 0 {
            return None;
        }
        self.bin_counts.iter().position(|&c| c == max)
    }

    /// Start over, keeping the bin count
    pub fn reset(&mut self) {
        *self = Self::new(self.bin_counts.len());
    }
}
