//! String-backed active enums shared by the entities.
//!
//! Stored as plain strings so the same schema runs on Postgres and on the
//! SQLite databases used by the integration tests.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum UserRole {
    /// Administrator.
    #[sea_orm(string_value = "Admin")]
    Admin,
    /// Regular user.
    #[sea_orm(string_value = "Basic")]
    Basic,
}

/// Kind of financial account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AccountKind {
    /// Bank account.
    #[sea_orm(string_value = "Bank")]
    Bank,
    /// Cash on hand.
    #[sea_orm(string_value = "Cash")]
    Cash,
    /// Credit card.
    #[sea_orm(string_value = "CreditCard")]
    CreditCard,
}

/// Lifecycle state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AccountState {
    /// Account is in use.
    #[sea_orm(string_value = "Active")]
    Active,
    /// Account is temporarily not in use.
    #[sea_orm(string_value = "Inactive")]
    Inactive,
    /// Account has been closed.
    #[sea_orm(string_value = "Closed")]
    Closed,
}

/// Source of an income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum IncomeSource {
    /// Salary payment.
    #[sea_orm(string_value = "Salary")]
    Salary,
    /// Interest earned.
    #[sea_orm(string_value = "Interest")]
    Interest,
    /// Business or investment profit.
    #[sea_orm(string_value = "Profit")]
    Profit,
    /// Any other source.
    #[sea_orm(string_value = "Other")]
    Other,
}

impl IncomeSource {
    /// Returns the canonical string form used in posting descriptions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Interest => "Interest",
            Self::Profit => "Profit",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for IncomeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
