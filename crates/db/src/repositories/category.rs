//! Expense category repository and path-name resolution.
//!
//! Path names are resolved through the pure arena in `fintrack-core`; the
//! arena is loaded from the table inside whatever transaction the caller is
//! running, so descriptions reflect the categories visible to that operation.

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Set,
};

use fintrack_core::ledger::CategoryTree;
use fintrack_shared::AppError;
use fintrack_shared::types::CategoryId;

use crate::entities::expense_categories;

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Parent category does not exist.
    #[error("Parent category not found: {0}")]
    ParentNotFound(CategoryId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::ParentNotFound(_) => Self::NotFound(err.to_string()),
            CategoryError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Expense category repository.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a category, optionally nested under an existing parent.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent does not exist or the database
    /// operation fails.
    pub async fn create_category(
        &self,
        name: &str,
        parent_id: Option<CategoryId>,
    ) -> Result<expense_categories::Model, CategoryError> {
        if let Some(parent) = parent_id {
            let exists = expense_categories::Entity::find_by_id(parent.into_inner())
                .one(&self.db)
                .await?;
            if exists.is_none() {
                return Err(CategoryError::ParentNotFound(parent));
            }
        }

        let category = expense_categories::ActiveModel {
            name: Set(name.to_string()),
            parent_id: Set(parent_id.map(CategoryId::into_inner)),
            ..Default::default()
        };

        Ok(category.insert(&self.db).await?)
    }

    /// Gets a category by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_category(
        &self,
        id: CategoryId,
    ) -> Result<Option<expense_categories::Model>, CategoryError> {
        let category = expense_categories::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?;
        Ok(category)
    }

    /// Lists all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_categories(&self) -> Result<Vec<expense_categories::Model>, CategoryError> {
        Ok(expense_categories::Entity::find().all(&self.db).await?)
    }

    /// Loads the whole category table into a path-resolution arena.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn load_tree<C: ConnectionTrait>(conn: &C) -> Result<CategoryTree, DbErr> {
        let rows = expense_categories::Entity::find().all(conn).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    CategoryId::from_raw(row.id),
                    row.name,
                    row.parent_id.map(CategoryId::from_raw),
                )
            })
            .collect())
    }

    /// Resolves a category's full path name for posting descriptions.
    ///
    /// An unknown id resolves to `"Unknown"`; this never fails the owning
    /// financial operation.
    ///
    /// # Errors
    ///
    /// Returns an error only if the database query fails.
    pub async fn path_name<C: ConnectionTrait>(
        conn: &C,
        id: CategoryId,
    ) -> Result<String, DbErr> {
        let tree = Self::load_tree(conn).await?;
        Ok(tree.path_name(id))
    }
}
