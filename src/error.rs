//! Error types for board construction, batch spawning and the ledger.

use thiserror::Error;

/// Malformed board or session configuration. Fatal: the board cannot be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The payout table must carry exactly one multiplier per bin
    #[error("payout table has {actual} entries but the board has {expected} bins")]
    PayoutTableLength { expected: usize, actual: usize },

    /// At least two peg rows are needed to form a bin
    #[error("row count must be at least 2, got {0}")]
    TooFewRows(u32),

    /// A dimension or physics constant is zero, negative or not finite
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    /// Bins must tile the capture line without gaps or overlaps
    #[error("bin width {bin_width} does not match peg spacing {peg_spacing}")]
    BinsDoNotTile { bin_width: f32, peg_spacing: f32 },

    /// Restitution must damp, never amplify
    #[error("restitution must lie in [0, 1), got {0}")]
    Restitution(f32),

    /// Bounce spread must lie in [0, π)
    #[error("bounce angle spread must lie in [0, π), got {0}")]
    BounceSpread(f32),

    /// A payout multiplier is NaN or infinite
    #[error("payout multiplier for bin {index} is not finite")]
    PayoutNotFinite { index: usize },

    /// Money amounts must be finite and not negative
    #[error("{name} must be finite and not negative, got {value}")]
    NegativeAmount { name: &'static str, value: f64 },
}

impl ConfigError {
    /// Creates a non-positive value error.
    pub fn non_positive(name: &'static str, value: impl Into<f64>) -> Self {
        Self::NonPositive {
            name,
            value: value.into(),
        }
    }
}

/// Recoverable refusal of a batch spawn. Nothing was mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnRejection {
    /// Balance cannot cover `count × cost_per_ball`
    #[error("insufficient funds for this batch")]
    InsufficientFunds,

    /// A ball from the previous batch is still falling
    #[error("a batch is still in flight")]
    BatchInFlight,
}

/// Errors raised by a ledger implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Debit would take the balance below zero
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: f64, available: f64 },

    /// Amount is negative, NaN or infinite
    #[error("invalid amount: {0}")]
    InvalidAmount(f64),
}

/// Errors loading or saving a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading or writing the file failed
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents are not valid settings JSON
    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file parsed but describes an unusable board
    #[error("invalid settings: {0}")]
    Invalid(#[from] ConfigError),
}
