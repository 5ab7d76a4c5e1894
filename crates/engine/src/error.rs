//! The module contains the errors the engine can throw.
//!
//! Every variant except [`Store`] is a rejection: the operation left the
//! [`Ledger`] untouched and the caller may retry with different input.
//! [`Store`] means the document could not be persisted.
//!
//!  [`Store`]: EngineError::Store
//!  [`Ledger`]: crate::Ledger
use thiserror::Error;

use crate::store::StoreError;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("No budget found. Create a budget first.")]
    NoBudget,
    #[error("Unknown category: \"{0}\"")]
    UnknownCategory(String),
    #[error("Expense of {amount:.2} exceeds remaining budget ({remaining:.2})")]
    ExceedsRemaining { amount: f64, remaining: f64 },
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Insufficient wallet balance. Balance: {balance:.2}, Required: {required:.2}")]
    InsufficientWalletBalance { balance: f64, required: f64 },
    #[error("No expenses recorded")]
    NoExpenses,
    #[error("Expense index {index} out of range (expenses: {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::NoBudget, Self::NoBudget) => true,
            (Self::UnknownCategory(a), Self::UnknownCategory(b)) => a == b,
            (
                Self::ExceedsRemaining {
                    amount: a1,
                    remaining: r1,
                },
                Self::ExceedsRemaining {
                    amount: a2,
                    remaining: r2,
                },
            ) => a1 == a2 && r1 == r2,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (
                Self::InsufficientWalletBalance {
                    balance: b1,
                    required: r1,
                },
                Self::InsufficientWalletBalance {
                    balance: b2,
                    required: r2,
                },
            ) => b1 == b2 && r1 == r2,
            (Self::NoExpenses, Self::NoExpenses) => true,
            (
                Self::IndexOutOfRange { index: i1, len: l1 },
                Self::IndexOutOfRange { index: i2, len: l2 },
            ) => i1 == i2 && l1 == l2,
            (Self::Store(a), Self::Store(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
