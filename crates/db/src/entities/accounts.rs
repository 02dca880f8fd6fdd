//! `SeaORM` Entity for the accounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{AccountKind, AccountState};

/// A financial account belonging to exactly one user.
///
/// The current balance is not stored here; it is the `balance` of the
/// account's most recently inserted posting, zero when no posting exists.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Store-generated identity.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Display name.
    pub name: String,
    /// Kind of account.
    pub kind: AccountKind,
    /// Lifecycle state.
    pub state: AccountState,
    /// Signed amount established at creation.
    pub initial_amount: Decimal,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The owning user.
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    /// Incomes recorded against this account.
    #[sea_orm(has_many = "super::incomes::Entity")]
    Incomes,
    /// Expenses recorded against this account.
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
    /// Ledger postings of this account.
    #[sea_orm(has_many = "super::postings::Entity")]
    Postings,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::incomes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incomes.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::postings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Postings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
