//! User repository.
//!
//! Credential handling (salting, hashing, token issuance) is a transport
//! concern; this repository stores the opaque salt and hash it is given.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use fintrack_shared::AppError;
use fintrack_shared::types::UserId;

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email address is already registered.
    #[error("Email '{0}' is already registered")]
    DuplicateEmail(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DuplicateEmail(_) => Self::Conflict(err.to_string()),
            UserError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Role of the user.
    pub role: UserRole,
    /// Email address (unique).
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Credential salt, produced by the caller.
    pub salt: String,
    /// Credential hash, produced by the caller.
    pub hash: String,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already registered or the database
    /// operation fails.
    pub async fn create_user(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(&input.email))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let user = users::ActiveModel {
            role: Set(input.role),
            email: Set(input.email),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            salt: Set(input.salt),
            hash: Set(input.hash),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let user = user.insert(&self.db).await?;
        tracing::debug!(user_id = user.id, "created user");
        Ok(user)
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, UserError> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(user)
    }

    /// Finds a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<users::Model>, UserError> {
        let user = users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?;
        Ok(user)
    }
}
