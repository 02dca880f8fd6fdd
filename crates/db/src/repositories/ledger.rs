//! Ledger repository: expenses, incomes, transfers, and their postings.
//!
//! Every mutation here is balance-affecting. Each one runs inside a single
//! database transaction that reads the relevant balances, plans the posting
//! drafts, writes the domain row, and appends the postings, so concurrent
//! writers never interleave between the balance read and the append.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set, TransactionTrait,
};

use chrono::NaiveDate;
use fintrack_core::ledger::{BalanceDrift, PostingError, PostingPlanner, PostingRow, replay};
use fintrack_shared::AppError;
use fintrack_shared::types::{
    AccountId, CategoryId, ExpenseId, IncomeId, PageRequest, PageResponse, TransferId, UserId,
};

use crate::entities::{
    accounts, expenses, incomes, postings, sea_orm_active_enums::IncomeSource, transfers,
};
use crate::repositories::account::{AccountError, find_owned};
use crate::repositories::{CategoryRepository, balance};

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The account exists but belongs to another user.
    #[error("User {0} does not own account {1}")]
    Unauthorized(UserId, AccountId),

    /// Account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Expense does not exist.
    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    /// The planned posting is invalid.
    #[error(transparent)]
    Invalid(#[from] PostingError),

    /// A stored running balance disagrees with the replayed fold.
    #[error("Balance drift on account {account_id}: {drift}")]
    Drift {
        /// The account whose history drifted.
        account_id: AccountId,
        /// Where and by how much.
        drift: BalanceDrift,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for LedgerError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Unauthorized(user_id, account_id) => {
                Self::Unauthorized(user_id, account_id)
            }
            AccountError::NotFound(account_id) => Self::AccountNotFound(account_id),
            AccountError::Database(db) => Self::Database(db),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Unauthorized(..) => Self::Unauthorized(err.to_string()),
            LedgerError::AccountNotFound(_) | LedgerError::ExpenseNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            LedgerError::Invalid(_) => Self::Validation(err.to_string()),
            LedgerError::Drift { .. } => Self::Internal(err.to_string()),
            LedgerError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Input for recording an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Account the expense is paid from.
    pub account_id: AccountId,
    /// Category of the expense.
    pub category_id: CategoryId,
    /// Positive amount.
    pub amount: Decimal,
    /// Date of the expense.
    pub date: NaiveDate,
}

/// Input for updating an expense.
///
/// All fields are applied; the account may differ from the stored one, in
/// which case the reversal lands on the old account and the new posting on
/// the new account.
#[derive(Debug, Clone)]
pub struct UpdateExpenseInput {
    /// Expense to update.
    pub id: ExpenseId,
    /// Account the expense is paid from.
    pub account_id: AccountId,
    /// Category of the expense.
    pub category_id: CategoryId,
    /// Positive amount.
    pub amount: Decimal,
    /// Date of the expense.
    pub date: NaiveDate,
}

/// Input for recording an income.
#[derive(Debug, Clone)]
pub struct CreateIncomeInput {
    /// Account the income is deposited to.
    pub account_id: AccountId,
    /// Positive amount.
    pub amount: Decimal,
    /// Date of the income.
    pub date: NaiveDate,
    /// Source of the income.
    pub source: IncomeSource,
}

/// Input for recording a transfer between two accounts.
#[derive(Debug, Clone)]
pub struct CreateTransferInput {
    /// The debited account.
    pub from_account_id: AccountId,
    /// The credited account.
    pub to_account_id: AccountId,
    /// Positive amount.
    pub amount: Decimal,
    /// Date of the transfer.
    pub date: NaiveDate,
}

/// Ledger repository for financial mutations and posting reads.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an expense and its debit posting.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or not owned by the user,
    /// the amount is not positive, or the database operation fails.
    pub async fn create_expense(
        &self,
        user_id: UserId,
        input: CreateExpenseInput,
    ) -> Result<expenses::Model, LedgerError> {
        let txn = self.db.begin().await?;
        find_owned(&txn, user_id, input.account_id).await?;

        let path = CategoryRepository::path_name(&txn, input.category_id).await?;
        let current = balance::latest_balance(&txn, input.account_id).await?;
        let draft =
            PostingPlanner::expense_created(input.account_id, current, input.amount, &path)?;

        let expense = expenses::ActiveModel {
            account_id: Set(input.account_id.into_inner()),
            category_id: Set(input.category_id.into_inner()),
            amount: Set(input.amount),
            date: Set(input.date),
            ..Default::default()
        };
        let expense = expense.insert(&txn).await?;
        balance::append(&txn, draft).await?;

        txn.commit().await?;
        tracing::debug!(expense_id = expense.id, account_id = %input.account_id, "created expense");
        Ok(expense)
    }

    /// Updates an expense, reversing the old posting and appending a new one.
    ///
    /// When the account is unchanged the reversal and the new posting land
    /// sequentially on that account. When the account changes, the old
    /// account gets the reversal and the new account the fresh debit, each
    /// computed from its own balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the expense is missing, either account is not
    /// owned by the user, the new amount is not positive, or the database
    /// operation fails.
    pub async fn update_expense(
        &self,
        user_id: UserId,
        input: UpdateExpenseInput,
    ) -> Result<expenses::Model, LedgerError> {
        let txn = self.db.begin().await?;

        let existing = expenses::Entity::find_by_id(input.id.into_inner())
            .one(&txn)
            .await?
            .ok_or(LedgerError::ExpenseNotFound(input.id))?;
        let old_account = AccountId::from_raw(existing.account_id);
        find_owned(&txn, user_id, old_account).await?;

        let old_path =
            CategoryRepository::path_name(&txn, CategoryId::from_raw(existing.category_id)).await?;
        let new_path = CategoryRepository::path_name(&txn, input.category_id).await?;

        if old_account == input.account_id {
            let current = balance::latest_balance(&txn, old_account).await?;
            let drafts = PostingPlanner::expense_updated(
                old_account,
                current,
                existing.amount,
                &old_path,
                input.amount,
                &new_path,
            )?;
            for draft in drafts {
                balance::append(&txn, draft).await?;
            }
        } else {
            find_owned(&txn, user_id, input.account_id).await?;

            let old_balance = balance::latest_balance(&txn, old_account).await?;
            let reversal = PostingPlanner::expense_update_reversal(
                old_account,
                old_balance,
                existing.amount,
                &old_path,
            );
            balance::append(&txn, reversal).await?;

            let new_balance = balance::latest_balance(&txn, input.account_id).await?;
            let applied = PostingPlanner::expense_created(
                input.account_id,
                new_balance,
                input.amount,
                &new_path,
            )?;
            balance::append(&txn, applied).await?;
        }

        let mut expense: expenses::ActiveModel = existing.into();
        expense.account_id = Set(input.account_id.into_inner());
        expense.category_id = Set(input.category_id.into_inner());
        expense.amount = Set(input.amount);
        expense.date = Set(input.date);
        let expense = expense.update(&txn).await?;

        txn.commit().await?;
        Ok(expense)
    }

    /// Deletes an expense and appends the reversing credit posting.
    ///
    /// Returns `Ok(false)` without touching the ledger when the expense does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the expense's account is not owned by the user or
    /// the database operation fails.
    pub async fn delete_expense(
        &self,
        user_id: UserId,
        id: ExpenseId,
    ) -> Result<bool, LedgerError> {
        let txn = self.db.begin().await?;

        let Some(existing) = expenses::Entity::find_by_id(id.into_inner()).one(&txn).await? else {
            return Ok(false);
        };
        let account_id = AccountId::from_raw(existing.account_id);
        find_owned(&txn, user_id, account_id).await?;

        let path =
            CategoryRepository::path_name(&txn, CategoryId::from_raw(existing.category_id)).await?;
        let current = balance::latest_balance(&txn, account_id).await?;
        let draft = PostingPlanner::expense_deleted(account_id, current, existing.amount, &path);

        let amount = existing.amount;
        existing.delete(&txn).await?;
        balance::append(&txn, draft).await?;

        txn.commit().await?;
        tracing::debug!(expense_id = %id, %amount, "deleted expense");
        Ok(true)
    }

    /// Records an income and its credit posting.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or not owned by the user,
    /// the amount is not positive, or the database operation fails.
    pub async fn create_income(
        &self,
        user_id: UserId,
        input: CreateIncomeInput,
    ) -> Result<incomes::Model, LedgerError> {
        let txn = self.db.begin().await?;
        find_owned(&txn, user_id, input.account_id).await?;

        let current = balance::latest_balance(&txn, input.account_id).await?;
        let draft = PostingPlanner::income_created(
            input.account_id,
            current,
            input.amount,
            input.source.as_str(),
        )?;

        let income = incomes::ActiveModel {
            account_id: Set(input.account_id.into_inner()),
            amount: Set(input.amount),
            date: Set(input.date),
            source: Set(input.source),
            ..Default::default()
        };
        let income = income.insert(&txn).await?;
        balance::append(&txn, draft).await?;

        txn.commit().await?;
        tracing::debug!(income_id = income.id, account_id = %input.account_id, "created income");
        Ok(income)
    }

    /// Deletes an income and appends the reversing debit posting.
    ///
    /// Returns `Ok(false)` without touching the ledger when the income does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the income's account is not owned by the user or
    /// the database operation fails.
    pub async fn delete_income(&self, user_id: UserId, id: IncomeId) -> Result<bool, LedgerError> {
        let txn = self.db.begin().await?;

        let Some(existing) = incomes::Entity::find_by_id(id.into_inner()).one(&txn).await? else {
            return Ok(false);
        };
        let account_id = AccountId::from_raw(existing.account_id);
        find_owned(&txn, user_id, account_id).await?;

        let current = balance::latest_balance(&txn, account_id).await?;
        let draft = PostingPlanner::income_deleted(
            account_id,
            current,
            existing.amount,
            existing.source.as_str(),
        );

        existing.delete(&txn).await?;
        balance::append(&txn, draft).await?;

        txn.commit().await?;
        Ok(true)
    }

    /// Records a transfer and its paired postings, debit first.
    ///
    /// # Errors
    ///
    /// Returns an error if either account is missing or not owned by the
    /// user, both sides are the same account, the amount is not positive, or
    /// the database operation fails.
    pub async fn create_transfer(
        &self,
        user_id: UserId,
        input: CreateTransferInput,
    ) -> Result<transfers::Model, LedgerError> {
        if input.from_account_id == input.to_account_id {
            return Err(LedgerError::Invalid(PostingError::SameAccount));
        }

        let txn = self.db.begin().await?;
        find_owned(&txn, user_id, input.from_account_id).await?;
        find_owned(&txn, user_id, input.to_account_id).await?;

        let from_balance = balance::latest_balance(&txn, input.from_account_id).await?;
        let to_balance = balance::latest_balance(&txn, input.to_account_id).await?;
        let (outgoing, incoming) = PostingPlanner::transfer_created(
            input.amount,
            (input.from_account_id, from_balance),
            (input.to_account_id, to_balance),
        )?;

        let transfer = transfers::ActiveModel {
            from_account_id: Set(input.from_account_id.into_inner()),
            to_account_id: Set(input.to_account_id.into_inner()),
            amount: Set(input.amount),
            date: Set(input.date),
            ..Default::default()
        };
        let transfer = transfer.insert(&txn).await?;
        balance::append(&txn, outgoing).await?;
        balance::append(&txn, incoming).await?;

        txn.commit().await?;
        tracing::debug!(
            transfer_id = transfer.id,
            from = %input.from_account_id,
            to = %input.to_account_id,
            "created transfer"
        );
        Ok(transfer)
    }

    /// Deletes a transfer and appends the reversing pair, restoring the
    /// source account first.
    ///
    /// Returns `Ok(false)` without touching the ledger when the transfer does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn delete_transfer(
        &self,
        user_id: UserId,
        id: TransferId,
    ) -> Result<bool, LedgerError> {
        // Ownership of the transfer's accounts is not verified here; callers
        // must scope the transfer id to the user before invoking this.
        tracing::warn!(%user_id, transfer_id = %id, "deleting transfer without ownership check");

        let txn = self.db.begin().await?;

        let Some(existing) = transfers::Entity::find_by_id(id.into_inner()).one(&txn).await?
        else {
            return Ok(false);
        };
        let from_account = AccountId::from_raw(existing.from_account_id);
        let to_account = AccountId::from_raw(existing.to_account_id);

        let from_balance = balance::latest_balance(&txn, from_account).await?;
        let to_balance = balance::latest_balance(&txn, to_account).await?;
        let (restored, removed) = PostingPlanner::transfer_deleted(
            existing.amount,
            (from_account, from_balance),
            (to_account, to_balance),
        );

        existing.delete(&txn).await?;
        balance::append(&txn, restored).await?;
        balance::append(&txn, removed).await?;

        txn.commit().await?;
        Ok(true)
    }

    /// Gets an expense, scoped to the user through its account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_expense(
        &self,
        user_id: UserId,
        id: ExpenseId,
    ) -> Result<Option<expenses::Model>, LedgerError> {
        let expense = expenses::Entity::find_by_id(id.into_inner())
            .filter(expenses::Column::AccountId.in_subquery(owned_account_query(user_id)))
            .one(&self.db)
            .await?;
        Ok(expense)
    }

    /// Lists a user's expenses, most recent date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_expenses(&self, user_id: UserId) -> Result<Vec<expenses::Model>, LedgerError> {
        let expenses = expenses::Entity::find()
            .filter(expenses::Column::AccountId.in_subquery(owned_account_query(user_id)))
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::Id)
            .all(&self.db)
            .await?;
        Ok(expenses)
    }

    /// Gets an income, scoped to the user through its account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_income(
        &self,
        user_id: UserId,
        id: IncomeId,
    ) -> Result<Option<incomes::Model>, LedgerError> {
        let income = incomes::Entity::find_by_id(id.into_inner())
            .filter(incomes::Column::AccountId.in_subquery(owned_account_query(user_id)))
            .one(&self.db)
            .await?;
        Ok(income)
    }

    /// Lists a user's incomes, most recent date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_incomes(&self, user_id: UserId) -> Result<Vec<incomes::Model>, LedgerError> {
        let incomes = incomes::Entity::find()
            .filter(incomes::Column::AccountId.in_subquery(owned_account_query(user_id)))
            .order_by_desc(incomes::Column::Date)
            .order_by_desc(incomes::Column::Id)
            .all(&self.db)
            .await?;
        Ok(incomes)
    }

    /// Gets a transfer, scoped to the user through its source account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_transfer(
        &self,
        user_id: UserId,
        id: TransferId,
    ) -> Result<Option<transfers::Model>, LedgerError> {
        let transfer = transfers::Entity::find_by_id(id.into_inner())
            .filter(transfers::Column::FromAccountId.in_subquery(owned_account_query(user_id)))
            .one(&self.db)
            .await?;
        Ok(transfer)
    }

    /// Lists a user's transfers, most recent date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transfers(
        &self,
        user_id: UserId,
    ) -> Result<Vec<transfers::Model>, LedgerError> {
        let transfers = transfers::Entity::find()
            .filter(transfers::Column::FromAccountId.in_subquery(owned_account_query(user_id)))
            .order_by_desc(transfers::Column::Date)
            .order_by_desc(transfers::Column::Id)
            .all(&self.db)
            .await?;
        Ok(transfers)
    }

    /// Lists a user's postings across all accounts, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_postings(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<PageResponse<postings::Model>, LedgerError> {
        let query = postings::Entity::find()
            .filter(postings::Column::AccountId.in_subquery(owned_account_query(user_id)));

        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_desc(postings::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(items, page.page, page.per_page, total))
    }

    /// Loads an account's full posting history in insertion order, scoped to
    /// the owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or not owned by the user,
    /// or the database query fails.
    pub async fn history(
        &self,
        user_id: UserId,
        account_id: AccountId,
    ) -> Result<Vec<postings::Model>, LedgerError> {
        find_owned(&self.db, user_id, account_id).await?;
        Ok(balance::history(&self.db, account_id).await?)
    }

    /// Replays an account's posting history and checks every stored running
    /// balance against the fold. Returns the final balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Drift`] at the first posting whose stored
    /// balance disagrees with the computed one.
    pub async fn verify_account(
        &self,
        user_id: UserId,
        account_id: AccountId,
    ) -> Result<Decimal, LedgerError> {
        find_owned(&self.db, user_id, account_id).await?;
        let rows: Vec<PostingRow> = balance::history(&self.db, account_id)
            .await?
            .into_iter()
            .map(|posting| PostingRow {
                debit: posting.debit,
                credit: posting.credit,
                balance: posting.balance,
            })
            .collect();

        replay(&rows).map_err(|drift| LedgerError::Drift { account_id, drift })
    }
}

/// Subquery selecting the ids of all accounts owned by a user.
fn owned_account_query(user_id: UserId) -> sea_orm::sea_query::SelectStatement {
    accounts::Entity::find()
        .select_only()
        .column(accounts::Column::Id)
        .filter(accounts::Column::UserId.eq(user_id.into_inner()))
        .into_query()
}
