//! Park finances and expenditure ledger for the Parkworks action framework.
//!
//! The dispatcher posts the cost of every successfully executed action
//! here. Query results never reach the ledger.
//!
//! # Architecture
//!
//! - [`ledger`] -- The [`Ledger`]: cash balance plus an append-only log of
//!   [`ExpenditureEntry`] records, with per-category totals.
//!
//! # Reconciliation
//!
//! For every ledger:
//!
//! ```text
//! opening_cash - sum(entry amounts) == cash
//! ```
//!
//! [`Ledger::reconcile`] checks this and reports the discrepancy if it
//! ever fails. The ledger never panics; it returns errors.
//!
//! # Usage
//!
//! ```
//! use parkworks_ledger::Ledger;
//! use parkworks_types::{ExpenditureType, Money};
//!
//! let mut ledger = Ledger::new(Money(10_000));
//! ledger
//!     .record_expenditure(1, ExpenditureType::Landscaping, Money(50), "large_scenery_remove")
//!     .ok();
//!
//! assert_eq!(ledger.cash(), Money(9_950));
//! assert_eq!(ledger.total_for(ExpenditureType::Landscaping), Money(50));
//! assert!(ledger.reconcile().is_ok());
//! ```

pub mod ledger;

// Re-export primary types at crate root.
pub use ledger::{ExpenditureEntry, Ledger};

use parkworks_types::Money;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when recording or reconciling the ledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Expenditure amounts must be strictly positive.
    #[error("expenditure amount must be positive, got {amount}")]
    NonPositiveAmount {
        /// The rejected amount.
        amount: Money,
    },

    /// The running balance left the representable range.
    #[error("cash balance overflow")]
    Overflow,

    /// Cash does not match the opening balance minus recorded spending.
    #[error("ledger out of balance: expected cash {expected}, found {actual}")]
    OutOfBalance {
        /// Cash implied by the entries.
        expected: Money,
        /// Cash actually held.
        actual: Money,
    },
}
