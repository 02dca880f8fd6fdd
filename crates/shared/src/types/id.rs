//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing an `AccountId` where an
//! `ExpenseId` is expected. IDs wrap the store-generated `i64` identity;
//! insertion order follows identity order, which the running balance
//! invariant relies on.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Creates an ID from a raw database identity value.
            #[must_use]
            pub const fn from_raw(id: i64) -> Self {
                Self(id)
            }

            /// Returns the inner identity value.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(AccountId, "Unique identifier for an account.");
typed_id!(CategoryId, "Unique identifier for an expense category.");
typed_id!(IncomeId, "Unique identifier for an income.");
typed_id!(ExpenseId, "Unique identifier for an expense.");
typed_id!(TransferId, "Unique identifier for a transfer.");
typed_id!(PostingId, "Unique identifier for a ledger posting.");
