//! Running-balance ledger logic.
//!
//! This module implements the core ledger functionality:
//! - Posting drafts (debit/credit plus the resulting running balance)
//! - The posting planner that turns financial mutations into drafts
//! - Balance replay and drift detection
//! - Category path resolution for posting descriptions
//! - Error types for posting validation

pub mod balance;
pub mod category;
pub mod error;
pub mod posting;

#[cfg(test)]
mod posting_props;

pub use balance::{BalanceDrift, PostingRow, next_balance, replay};
pub use category::CategoryTree;
pub use error::PostingError;
pub use posting::{PostingDraft, PostingPlanner};
