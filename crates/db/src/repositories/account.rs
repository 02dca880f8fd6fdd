//! Account repository.
//!
//! Account creation and initial-amount updates are balance-affecting and run
//! inside a single transaction together with their ledger postings.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use fintrack_core::ledger::PostingPlanner;
use fintrack_shared::AppError;
use fintrack_shared::types::{AccountId, UserId};

use crate::entities::{
    accounts,
    sea_orm_active_enums::{AccountKind, AccountState},
};
use crate::repositories::balance;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// The account exists but belongs to another user.
    #[error("User {0} does not own account {1}")]
    Unauthorized(UserId, AccountId),

    /// Account does not exist.
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Unauthorized(..) => Self::Unauthorized(err.to_string()),
            AccountError::NotFound(_) => Self::NotFound(err.to_string()),
            AccountError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// An account together with its computed ledger balance.
#[derive(Debug, Clone)]
pub struct AccountWithBalance {
    /// The account row.
    pub account: accounts::Model,
    /// Balance of the most recent posting, zero if none.
    pub balance: Decimal,
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Display name.
    pub name: String,
    /// Kind of account.
    pub kind: AccountKind,
    /// Signed opening amount.
    pub initial_amount: Decimal,
}

/// Input for updating an account.
///
/// All fields are applied; callers pass the current value for fields they do
/// not intend to change.
#[derive(Debug, Clone)]
pub struct UpdateAccountInput {
    /// Account to update.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Kind of account.
    pub kind: AccountKind,
    /// Lifecycle state.
    pub state: AccountState,
    /// Signed opening amount.
    pub initial_amount: Decimal,
}

/// Account repository for CRUD operations and balance reads.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account and its opening posting.
    ///
    /// The opening posting credits the initial amount, which may be negative
    /// for accounts opened in debt.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_account(
        &self,
        user_id: UserId,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let txn = self.db.begin().await?;

        let account = accounts::ActiveModel {
            user_id: Set(user_id.into_inner()),
            name: Set(input.name),
            kind: Set(input.kind),
            state: Set(AccountState::Active),
            initial_amount: Set(input.initial_amount),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let account = account.insert(&txn).await?;

        let account_id = AccountId::from_raw(account.id);
        let current = balance::latest_balance(&txn, account_id).await?;
        let opening = PostingPlanner::account_created(account_id, current, input.initial_amount);
        balance::append(&txn, opening).await?;

        txn.commit().await?;
        tracing::debug!(account_id = account.id, user_id = %user_id, "created account");
        Ok(account)
    }

    /// Updates an account's attributes.
    ///
    /// When the initial amount changes, a compensating posting pair is
    /// appended so the running balance shifts by exactly the difference.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist, belongs to another
    /// user, or the database operation fails.
    pub async fn update_account(
        &self,
        user_id: UserId,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let txn = self.db.begin().await?;

        let existing = accounts::Entity::find_by_id(input.id.into_inner())
            .one(&txn)
            .await?
            .ok_or(AccountError::NotFound(input.id))?;
        if existing.user_id != user_id.into_inner() {
            return Err(AccountError::Unauthorized(user_id, input.id));
        }

        if existing.initial_amount != input.initial_amount {
            let current = balance::latest_balance(&txn, input.id).await?;
            let drafts = PostingPlanner::initial_amount_changed(
                input.id,
                current,
                existing.initial_amount,
                input.initial_amount,
            );
            for draft in drafts {
                balance::append(&txn, draft).await?;
            }
        }

        let mut account: accounts::ActiveModel = existing.into();
        account.name = Set(input.name);
        account.kind = Set(input.kind);
        account.state = Set(input.state);
        account.initial_amount = Set(input.initial_amount);
        let account = account.update(&txn).await?;

        txn.commit().await?;
        Ok(account)
    }

    /// Gets an account with its computed balance, scoped to the owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist, belongs to another
    /// user, or the database query fails.
    pub async fn get_account(
        &self,
        user_id: UserId,
        id: AccountId,
    ) -> Result<AccountWithBalance, AccountError> {
        let account = find_owned(&self.db, user_id, id).await?;
        let balance = balance::latest_balance(&self.db, id).await?;
        Ok(AccountWithBalance { account, balance })
    }

    /// Lists a user's accounts with their computed balances.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        user_id: UserId,
    ) -> Result<Vec<AccountWithBalance>, AccountError> {
        let accounts = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id.into_inner()))
            .order_by_asc(accounts::Column::Id)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(accounts.len());
        for account in accounts {
            let balance =
                balance::latest_balance(&self.db, AccountId::from_raw(account.id)).await?;
            result.push(AccountWithBalance { account, balance });
        }
        Ok(result)
    }

    /// Reads an account's current balance, scoped to the owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist, belongs to another
    /// user, or the database query fails.
    pub async fn current_balance(
        &self,
        user_id: UserId,
        id: AccountId,
    ) -> Result<Decimal, AccountError> {
        find_owned(&self.db, user_id, id).await?;
        Ok(balance::latest_balance(&self.db, id).await?)
    }
}

/// Loads an account and verifies ownership. Existence is checked before
/// ownership so a missing account is reported as not found rather than
/// unauthorized.
pub(crate) async fn find_owned<C: ConnectionTrait>(
    conn: &C,
    user_id: UserId,
    id: AccountId,
) -> Result<accounts::Model, AccountError> {
    let account = accounts::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or(AccountError::NotFound(id))?;
    if account.user_id != user_id.into_inner() {
        return Err(AccountError::Unauthorized(user_id, id));
    }
    Ok(account)
}
