//! `SeaORM` Entity for the expense_categories table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An expense category, optionally nested under a parent category.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_categories")]
pub struct Model {
    /// Store-generated identity.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Category name (one path segment).
    pub name: String,
    /// Parent category, `None` for roots.
    pub parent_id: Option<i64>,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The parent category.
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id"
    )]
    Parent,
    /// Expenses filed under this category.
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
