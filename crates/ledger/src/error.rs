//! The module contains the errors the ledger crate can raise.
//!
//! The store itself never fails: mutations are pure in-memory operations and
//! a `remove` with no matching movement is a silent no-op. The only fallible
//! surface is parsing user- or wire-provided values into domain types.

use thiserror::Error;

/// Ledger parse errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid movement kind: {0}")]
    InvalidKind(String),
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),
    #[error("Invalid alert level: {0}")]
    InvalidAlertLevel(String),
    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidKind(a), Self::InvalidKind(b)) => a == b,
            (Self::InvalidDateRange(a), Self::InvalidDateRange(b)) => a == b,
            (Self::InvalidAlertLevel(a), Self::InvalidAlertLevel(b)) => a == b,
            (Self::InvalidRecurrence(a), Self::InvalidRecurrence(b)) => a == b,
            _ => false,
        }
    }
}
