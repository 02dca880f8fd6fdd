//! `SeaORM` entity definitions.
//!
//! Primary keys are store-generated `BIGINT` identities; insertion order
//! follows identity order, which the running balance invariant depends on.

pub mod accounts;
pub mod expense_categories;
pub mod expenses;
pub mod incomes;
pub mod postings;
pub mod sea_orm_active_enums;
pub mod transfers;
pub mod users;
