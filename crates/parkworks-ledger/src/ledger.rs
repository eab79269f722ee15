//! The expenditure ledger: an append-only log of park spending.
//!
//! # Design
//!
//! - **Append-only**: entries are never modified or deleted.
//! - **Categorised**: every entry names an [`ExpenditureType`].
//! - **Reconcilable**: cash always equals the opening balance minus spending.
//! - **Precision**: all amounts are [`Money`] -- integer tenths, no floats.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use parkworks_types::{ExpenditureType, Money};

use crate::LedgerError;

/// One recorded payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenditureEntry {
    /// Simulation tick the payment was made in.
    pub tick: u64,
    /// What the money was spent on.
    pub category: ExpenditureType,
    /// Amount paid (always positive).
    pub amount: Money,
    /// Name of the action that caused the payment.
    pub reason: String,
}

/// Park cash and the record of how it was spent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Cash at ledger creation.
    opening_cash: Money,
    /// Current cash.
    cash: Money,
    /// All entries, in insertion order.
    entries: Vec<ExpenditureEntry>,
}

impl Ledger {
    /// Create a ledger with the given starting cash.
    pub const fn new(opening_cash: Money) -> Self {
        Self {
            opening_cash,
            cash: opening_cash,
            entries: Vec::new(),
        }
    }

    /// Current cash balance.
    pub const fn cash(&self) -> Money {
        self.cash
    }

    /// Return the number of entries in the ledger.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the ledger has no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[ExpenditureEntry] {
        &self.entries
    }

    /// Whether the park can pay `amount` from its current cash.
    pub fn can_afford(&self, amount: Money) -> bool {
        amount <= self.cash
    }

    /// Pay `amount` from park cash and record it.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NonPositiveAmount`] for zero or negative
    /// amounts, or [`LedgerError::Overflow`] if the balance would leave the
    /// representable range.
    pub fn record_expenditure(
        &mut self,
        tick: u64,
        category: ExpenditureType,
        amount: Money,
        reason: &str,
    ) -> Result<&ExpenditureEntry, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount { amount });
        }
        let cash = self.cash.checked_sub(amount).ok_or(LedgerError::Overflow)?;
        self.cash = cash;
        self.entries.push(ExpenditureEntry {
            tick,
            category,
            amount,
            reason: reason.to_owned(),
        });
        debug!(tick, ?category, %amount, %cash, reason, "expenditure recorded");

        self.entries.last().ok_or(LedgerError::Overflow)
    }

    /// Total spent in one category.
    pub fn total_for(&self, category: ExpenditureType) -> Money {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .fold(Money::ZERO, |total, entry| total.saturating_add(entry.amount))
    }

    /// Totals for every category that has at least one entry.
    pub fn totals_by_category(&self) -> BTreeMap<ExpenditureType, Money> {
        let mut totals = BTreeMap::new();
        for entry in &self.entries {
            let total = totals.entry(entry.category).or_insert(Money::ZERO);
            *total = total.saturating_add(entry.amount);
        }
        totals
    }

    /// Verify that cash equals the opening balance minus all spending.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::OutOfBalance`] on a mismatch, or
    /// [`LedgerError::Overflow`] if the sum cannot be computed.
    pub fn reconcile(&self) -> Result<(), LedgerError> {
        let mut expected = self.opening_cash;
        for entry in &self.entries {
            expected = expected
                .checked_sub(entry.amount)
                .ok_or(LedgerError::Overflow)?;
        }
        if expected == self.cash {
            Ok(())
        } else {
            Err(LedgerError::OutOfBalance {
                expected,
                actual: self.cash,
            })
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(Money::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ledger_is_empty() {
        let ledger = Ledger::new(Money(1_000));
        assert!(ledger.is_empty());
        assert_eq!(ledger.len(), 0);
        assert_eq!(ledger.cash(), Money(1_000));
    }

    #[test]
    fn expenditure_debits_cash() {
        let mut ledger = Ledger::new(Money(1_000));
        let result = ledger.record_expenditure(3, ExpenditureType::Landscaping, Money(50), "clear");
        assert!(result.is_ok());
        assert_eq!(ledger.cash(), Money(950));
        assert_eq!(ledger.entries().first().map(|e| e.tick), Some(3));
    }

    #[test]
    fn zero_and_negative_amounts_rejected() {
        let mut ledger = Ledger::new(Money(1_000));
        assert!(matches!(
            ledger.record_expenditure(1, ExpenditureType::Landscaping, Money::ZERO, "x"),
            Err(LedgerError::NonPositiveAmount { .. })
        ));
        assert!(ledger
            .record_expenditure(1, ExpenditureType::Landscaping, Money(-5), "x")
            .is_err());
        assert!(ledger.is_empty());
    }

    #[test]
    fn spending_may_go_into_debt() {
        let mut ledger = Ledger::new(Money(10));
        assert!(!ledger.can_afford(Money(50)));
        let _ = ledger.record_expenditure(1, ExpenditureType::Landscaping, Money(50), "x");
        assert_eq!(ledger.cash(), Money(-40));
    }

    #[test]
    fn totals_split_by_category() {
        let mut ledger = Ledger::new(Money(1_000));
        let _ = ledger.record_expenditure(1, ExpenditureType::Landscaping, Money(50), "a");
        let _ = ledger.record_expenditure(1, ExpenditureType::Landscaping, Money(20), "b");
        let _ = ledger.record_expenditure(2, ExpenditureType::LandPurchase, Money(5), "c");

        assert_eq!(ledger.total_for(ExpenditureType::Landscaping), Money(70));
        assert_eq!(ledger.total_for(ExpenditureType::Wages), Money::ZERO);
        let totals = ledger.totals_by_category();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals.get(&ExpenditureType::LandPurchase), Some(&Money(5)));
    }

    #[test]
    fn reconcile_detects_tampering() {
        let mut ledger = Ledger::new(Money(1_000));
        let _ = ledger.record_expenditure(1, ExpenditureType::Landscaping, Money(50), "a");
        assert!(ledger.reconcile().is_ok());

        ledger.cash = Money(999);
        assert!(matches!(
            ledger.reconcile(),
            Err(LedgerError::OutOfBalance { .. })
        ));
    }

    #[test]
    fn serde_roundtrip_preserves_entries() {
        let mut ledger = Ledger::new(Money(1_000));
        let _ = ledger.record_expenditure(1, ExpenditureType::Landscaping, Money(50), "a");
        let json = serde_json::to_string(&ledger).ok();
        let restored: Option<Ledger> = json.as_deref().and_then(|j| serde_json::from_str(j).ok());
        assert_eq!(restored, Some(ledger));
    }
}
