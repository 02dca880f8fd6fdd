//! Error types for posting validation.

use thiserror::Error;

/// Errors that can occur while planning postings.
///
/// These are validation failures caught before any database write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PostingError {
    /// Amount must be non-zero.
    #[error("Amount cannot be zero")]
    ZeroAmount,

    /// Amount must be positive.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// A transfer must reference two distinct accounts.
    #[error("Transfer source and destination accounts must differ")]
    SameAccount,
}
