//! Balance the engine debits on spawn and credits on capture
//!
//! The engine only ever talks to a [`Ledger`]; [`Wallet`] is the in-memory
//! implementation used by the binary and the tests.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// External balance collaborator. Implementations reject invalid operations
/// themselves; the engine never assumes a debit succeeds.
pub trait Ledger {
    /// Current balance
    fn balance(&self) -> f64;

    /// Remove `amount` from the balance
    fn debit(&mut self, amount: f64) -> Result<(), LedgerError>;

    /// Add `amount` to the balance
    fn credit(&mut self, amount: f64) -> Result<(), LedgerError>;
}

/// Maximum number of balance samples kept for charting
pub const MAX_HISTORY: usize = 4096;

/// In-memory wallet that remembers how its balance evolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    balance: f64,
    /// Balance after every operation, oldest first (starts with the opening balance)
    history: VecDeque<f64>,
}

impl Wallet {
    pub fn new(balance: f64) -> Self {
        Self {
            balance,
            history: VecDeque::from([balance]),
        }
    }

    /// Balance samples for a wallet chart
    pub fn history(&self) -> &VecDeque<f64> {
        &self.history
    }

    fn record(&mut self) {
        self.history.push_back(self.balance);
        if self.history.len() > MAX_HISTORY {
            self.history.pop_front();
        }
    }

    fn check_amount(amount: f64) -> Result<(), LedgerError> {
        if amount.is_finite() && amount >= 0.0 {
            Ok(())
        } else {
            Err(LedgerError::InvalidAmount(amount))
        }
    }
}

impl Ledger for Wallet {
    fn balance(&self) -> f64 {
        self.balance
    }

    fn debit(&mut self, amount: f64) -> Result<(), LedgerError> {
        Self::check_amount(amount)?;
        if amount > self.balance {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        self.record();
        Ok(())
    }

    fn credit(&mut self, amount: f64) -> Result<(), LedgerError> {
        Self::check_amount(amount)?;
        self.balance += amount;
        self.record();
        Ok(())
    }
}
