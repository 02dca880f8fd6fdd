//! `SeaORM` Entity for the postings table.
//!
//! Postings are append-only: business logic never updates or deletes a row.
//! Deleting an income, expense, or transfer appends a reversing posting
//! instead of removing the original.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single ledger posting carrying the running balance of its account.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "postings")]
pub struct Model {
    /// Store-generated identity; insertion order is identity order.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The account this posting belongs to.
    pub account_id: i64,
    /// Amount decreasing the balance.
    pub debit: Decimal,
    /// Amount increasing the balance.
    pub credit: Decimal,
    /// Running balance after this posting.
    pub balance: Decimal,
    /// Human-readable description.
    pub description: String,
    /// Timestamp the posting was appended.
    pub date: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The account this posting belongs to.
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
