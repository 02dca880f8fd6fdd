//! `SeaORM` Entity for the transfers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A transfer between two accounts owned by the same user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    /// Store-generated identity.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The debited account.
    pub from_account_id: i64,
    /// The credited account.
    pub to_account_id: i64,
    /// Positive amount.
    pub amount: Decimal,
    /// Date of the transfer.
    pub date: Date,
}

/// Entity relations.
///
/// Two foreign keys point at accounts, so no single `Related` impl exists;
/// repositories join explicitly where needed.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The debited account.
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::FromAccountId",
        to = "super::accounts::Column::Id"
    )]
    FromAccount,
    /// The credited account.
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::ToAccountId",
        to = "super::accounts::Column::Id"
    )]
    ToAccount,
}

impl ActiveModelBehavior for ActiveModel {}
