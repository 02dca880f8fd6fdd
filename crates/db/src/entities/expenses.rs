//! `SeaORM` Entity for the expenses table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An expense recorded against an account, filed under a category.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Store-generated identity.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The paying account.
    pub account_id: i64,
    /// The expense category.
    pub category_id: i64,
    /// Positive amount.
    pub amount: Decimal,
    /// Date the expense occurred.
    pub date: Date,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The paying account.
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
    /// The category this expense is filed under.
    #[sea_orm(
        belongs_to = "super::expense_categories::Entity",
        from = "Column::CategoryId",
        to = "super::expense_categories::Column::Id"
    )]
    ExpenseCategories,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::expense_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
