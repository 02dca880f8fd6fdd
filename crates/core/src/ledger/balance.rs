//! Running balance arithmetic and verification.
//!
//! An account's balance is carried forward on every posting:
//! `balance[i] = balance[i-1] + credit[i] - debit[i]`, starting from zero.
//! `replay` re-folds a stored posting history and reports the first row whose
//! stored balance drifts from the computed one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Computes the balance resulting from applying a posting to `previous`.
#[must_use]
pub fn next_balance(previous: Decimal, debit: Decimal, credit: Decimal) -> Decimal {
    previous + credit - debit
}

/// A stored posting row, as read back from the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingRow {
    /// Amount decreasing the balance.
    pub debit: Decimal,
    /// Amount increasing the balance.
    pub credit: Decimal,
    /// The running balance stored with this posting.
    pub balance: Decimal,
}

/// A stored balance that does not match the replayed fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("stored balance {stored} at posting index {index} does not match computed {computed}")]
pub struct BalanceDrift {
    /// Zero-based index of the drifting row in insertion order.
    pub index: usize,
    /// The balance stored on the row.
    pub stored: Decimal,
    /// The balance the fold computed for the row.
    pub computed: Decimal,
}

/// Replays posting rows in insertion order, verifying every stored balance.
///
/// Returns the trailing balance (zero for an empty history).
///
/// # Errors
///
/// Returns [`BalanceDrift`] for the first row whose stored balance differs
/// from the fold.
pub fn replay(rows: &[PostingRow]) -> Result<Decimal, BalanceDrift> {
    let mut balance = Decimal::ZERO;
    for (index, row) in rows.iter().enumerate() {
        let computed = next_balance(balance, row.debit, row.credit);
        if computed != row.balance {
            return Err(BalanceDrift {
                index,
                stored: row.balance,
                computed,
            });
        }
        balance = computed;
    }
    Ok(balance)
}
