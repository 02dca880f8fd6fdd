//! `SeaORM` Entity for the incomes table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::IncomeSource;

/// An income recorded against an account.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    /// Store-generated identity.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The receiving account.
    pub account_id: i64,
    /// Positive amount.
    pub amount: Decimal,
    /// Date the income was received.
    pub date: Date,
    /// Where the income came from.
    pub source: IncomeSource,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The receiving account.
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
