//! Posting planner for balance-affecting mutations.
//!
//! Every financial mutation (expense/income/transfer create, update, delete
//! and account initial-amount changes) is expressed as one or more posting
//! drafts: a debit or credit plus the running balance that results from it.
//! The planner is pure; the database layer reads the pre-operation balance
//! inside its transaction, asks the planner for the drafts, and appends them
//! in order.
//!
//! Two drafts on the *same* account are sequential: the second is computed
//! from the balance left by the first, never from the same snapshot. Drafts
//! on *different* accounts (transfers) each start from their own account's
//! balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fintrack_shared::types::AccountId;

use super::balance::next_balance;
use super::error::PostingError;

/// A posting to be appended to an account's ledger.
///
/// `balance` is the running balance after the posting is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingDraft {
    /// The account the posting belongs to.
    pub account_id: AccountId,
    /// Amount decreasing the balance.
    pub debit: Decimal,
    /// Amount increasing the balance.
    pub credit: Decimal,
    /// The resulting running balance.
    pub balance: Decimal,
    /// Human-readable description.
    pub description: String,
}

impl PostingDraft {
    fn debit(account_id: AccountId, previous: Decimal, amount: Decimal, description: String) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            balance: next_balance(previous, amount, Decimal::ZERO),
            description,
        }
    }

    fn credit(
        account_id: AccountId,
        previous: Decimal,
        amount: Decimal,
        description: String,
    ) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            balance: next_balance(previous, Decimal::ZERO, amount),
            description,
        }
    }
}

/// Pure planner turning financial mutations into ordered posting drafts.
pub struct PostingPlanner;

impl PostingPlanner {
    /// Plans the posting for a newly created expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is zero or negative.
    pub fn expense_created(
        account_id: AccountId,
        balance: Decimal,
        amount: Decimal,
        category_path: &str,
    ) -> Result<PostingDraft, PostingError> {
        require_positive(amount)?;
        Ok(PostingDraft::debit(
            account_id,
            balance,
            amount,
            format!("New Expense - {category_path}"),
        ))
    }

    /// Plans the sequential reversal + re-application pair for an expense
    /// update on one account.
    ///
    /// The reversal is computed from the pre-update balance and the new
    /// posting from the reversal's resulting balance, so the net effect is
    /// `old_amount - new_amount`.
    ///
    /// # Errors
    ///
    /// Returns an error if the new amount is zero or negative.
    pub fn expense_updated(
        account_id: AccountId,
        balance: Decimal,
        old_amount: Decimal,
        old_category_path: &str,
        new_amount: Decimal,
        new_category_path: &str,
    ) -> Result<[PostingDraft; 2], PostingError> {
        require_positive(new_amount)?;
        let reversal =
            Self::expense_update_reversal(account_id, balance, old_amount, old_category_path);
        let applied = PostingDraft::debit(
            account_id,
            reversal.balance,
            new_amount,
            format!("New Expense - {new_category_path}"),
        );
        Ok([reversal, applied])
    }

    /// Plans the reversal half of an expense update on its own, for updates
    /// that move the expense to a different account.
    ///
    /// Uses the update wording, so update reversals stay distinguishable
    /// from the postings of true deletions.
    #[must_use]
    pub fn expense_update_reversal(
        account_id: AccountId,
        balance: Decimal,
        amount: Decimal,
        category_path: &str,
    ) -> PostingDraft {
        PostingDraft::credit(
            account_id,
            balance,
            amount,
            format!("Delete Expense - {category_path}"),
        )
    }

    /// Plans the reversing posting for a deleted expense.
    ///
    /// Reverses a stored row, so the amount is not re-validated.
    #[must_use]
    pub fn expense_deleted(
        account_id: AccountId,
        balance: Decimal,
        amount: Decimal,
        category_path: &str,
    ) -> PostingDraft {
        PostingDraft::credit(
            account_id,
            balance,
            amount,
            format!("Deleted Expense - {category_path}"),
        )
    }

    /// Plans the posting for a newly created income.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is zero or negative.
    pub fn income_created(
        account_id: AccountId,
        balance: Decimal,
        amount: Decimal,
        source: &str,
    ) -> Result<PostingDraft, PostingError> {
        require_positive(amount)?;
        Ok(PostingDraft::credit(
            account_id,
            balance,
            amount,
            format!("New Income - {source} to account {account_id}"),
        ))
    }

    /// Plans the reversing posting for a deleted income.
    #[must_use]
    pub fn income_deleted(
        account_id: AccountId,
        balance: Decimal,
        amount: Decimal,
        source: &str,
    ) -> PostingDraft {
        PostingDraft::debit(
            account_id,
            balance,
            amount,
            format!("Delete Income - {source} to account {account_id}"),
        )
    }

    /// Plans the paired postings for a new transfer.
    ///
    /// The debit on the source and the credit on the destination are each
    /// computed from that account's own balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is zero or negative, or if both sides
    /// reference the same account.
    pub fn transfer_created(
        amount: Decimal,
        from: (AccountId, Decimal),
        to: (AccountId, Decimal),
    ) -> Result<(PostingDraft, PostingDraft), PostingError> {
        require_positive(amount)?;
        let (from_account, from_balance) = from;
        let (to_account, to_balance) = to;
        if from_account == to_account {
            return Err(PostingError::SameAccount);
        }

        let outgoing = PostingDraft::debit(
            from_account,
            from_balance,
            amount,
            format!("New Transfer - Transaction from account {from_account}"),
        );
        let incoming = PostingDraft::credit(
            to_account,
            to_balance,
            amount,
            format!("New Transfer - Transaction to account {to_account}"),
        );
        Ok((outgoing, incoming))
    }

    /// Plans the reversing pair for a deleted transfer.
    #[must_use]
    pub fn transfer_deleted(
        amount: Decimal,
        from: (AccountId, Decimal),
        to: (AccountId, Decimal),
    ) -> (PostingDraft, PostingDraft) {
        let (from_account, from_balance) = from;
        let (to_account, to_balance) = to;

        let restored = PostingDraft::credit(
            from_account,
            from_balance,
            amount,
            format!("Delete Transfer - Transaction from account {from_account}"),
        );
        let removed = PostingDraft::debit(
            to_account,
            to_balance,
            amount,
            format!("Delete Transfer - Transaction to account {to_account}"),
        );
        (restored, removed)
    }

    /// Plans the opening posting for a newly created account.
    ///
    /// The initial amount may be any sign (a credit card can open in debt).
    #[must_use]
    pub fn account_created(
        account_id: AccountId,
        balance: Decimal,
        initial_amount: Decimal,
    ) -> PostingDraft {
        PostingDraft::credit(
            account_id,
            balance,
            initial_amount,
            "Account Creation".to_string(),
        )
    }

    /// Plans the sequential pair compensating an initial-amount change.
    ///
    /// The old initial amount is debited from the current balance, then the
    /// new one credited onto the intermediate balance.
    #[must_use]
    pub fn initial_amount_changed(
        account_id: AccountId,
        balance: Decimal,
        old_initial: Decimal,
        new_initial: Decimal,
    ) -> [PostingDraft; 2] {
        let reversal = PostingDraft::debit(
            account_id,
            balance,
            old_initial,
            "Account Update".to_string(),
        );
        let applied = PostingDraft::credit(
            account_id,
            reversal.balance,
            new_initial,
            "Account Update".to_string(),
        );
        [reversal, applied]
    }
}

fn require_positive(amount: Decimal) -> Result<(), PostingError> {
    if amount.is_zero() {
        return Err(PostingError::ZeroAmount);
    }
    if amount.is_sign_negative() {
        return Err(PostingError::NegativeAmount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn acc(raw: i64) -> AccountId {
        AccountId::from_raw(raw)
    }

    #[test]
    fn test_expense_created() {
        let draft =
            PostingPlanner::expense_created(acc(1), dec!(500), dec!(120), "Food/Groceries")
                .unwrap();
        assert_eq!(draft.debit, dec!(120));
        assert_eq!(draft.credit, dec!(0));
        assert_eq!(draft.balance, dec!(380));
        assert_eq!(draft.description, "New Expense - Food/Groceries");
    }

    #[test]
    fn test_expense_created_rejects_zero() {
        let result = PostingPlanner::expense_created(acc(1), dec!(500), dec!(0), "Food");
        assert_eq!(result, Err(PostingError::ZeroAmount));
    }

    #[test]
    fn test_expense_created_rejects_negative() {
        let result = PostingPlanner::expense_created(acc(1), dec!(500), dec!(-5), "Food");
        assert_eq!(result, Err(PostingError::NegativeAmount));
    }

    #[test]
    fn test_expense_updated_is_sequential() {
        let [reversal, applied] =
            PostingPlanner::expense_updated(acc(1), dec!(500), dec!(100), "Food", dec!(60), "Fuel")
                .unwrap();

        assert_eq!(reversal.credit, dec!(100));
        assert_eq!(reversal.balance, dec!(600));
        assert_eq!(reversal.description, "Delete Expense - Food");

        // Second draft folds over the reversal's balance, not the snapshot.
        assert_eq!(applied.debit, dec!(60));
        assert_eq!(applied.balance, dec!(540));
        assert_eq!(applied.description, "New Expense - Fuel");

        // Net effect: B - E1 + E1 - E2 = B - E2 relative to the old expense
        // already applied, i.e. old - new here.
        assert_eq!(applied.balance, dec!(500) + dec!(100) - dec!(60));
    }

    #[test]
    fn test_expense_update_reversal_uses_update_wording() {
        let draft =
            PostingPlanner::expense_update_reversal(acc(1), dec!(400), dec!(100), "Food");
        assert_eq!(draft.credit, dec!(100));
        assert_eq!(draft.balance, dec!(500));
        assert_eq!(draft.description, "Delete Expense - Food");
    }

    #[test]
    fn test_expense_deleted_restores_balance() {
        let draft = PostingPlanner::expense_deleted(acc(1), dec!(380), dec!(120), "Food");
        assert_eq!(draft.credit, dec!(120));
        assert_eq!(draft.balance, dec!(500));
        assert_eq!(draft.description, "Deleted Expense - Food");
    }

    #[test]
    fn test_income_created() {
        let draft = PostingPlanner::income_created(acc(7), dec!(100), dec!(2500), "Salary").unwrap();
        assert_eq!(draft.credit, dec!(2500));
        assert_eq!(draft.balance, dec!(2600));
        assert_eq!(draft.description, "New Income - Salary to account 7");
    }

    #[test]
    fn test_income_deleted() {
        let draft = PostingPlanner::income_deleted(acc(7), dec!(2600), dec!(2500), "Salary");
        assert_eq!(draft.debit, dec!(2500));
        assert_eq!(draft.balance, dec!(100));
        assert_eq!(draft.description, "Delete Income - Salary to account 7");
    }

    #[test]
    fn test_transfer_created_pairs() {
        let (outgoing, incoming) =
            PostingPlanner::transfer_created(dec!(200), (acc(1), dec!(1000)), (acc(2), dec!(50)))
                .unwrap();

        assert_eq!(outgoing.account_id, acc(1));
        assert_eq!(outgoing.debit, dec!(200));
        assert_eq!(outgoing.balance, dec!(800));
        assert_eq!(
            outgoing.description,
            "New Transfer - Transaction from account 1"
        );

        assert_eq!(incoming.account_id, acc(2));
        assert_eq!(incoming.credit, dec!(200));
        assert_eq!(incoming.balance, dec!(250));
        assert_eq!(
            incoming.description,
            "New Transfer - Transaction to account 2"
        );
    }

    #[test]
    fn test_transfer_created_rejects_same_account() {
        let result =
            PostingPlanner::transfer_created(dec!(200), (acc(1), dec!(1000)), (acc(1), dec!(50)));
        assert_eq!(result, Err(PostingError::SameAccount));
    }

    #[test]
    fn test_transfer_deleted_restores_both() {
        let (restored, removed) =
            PostingPlanner::transfer_deleted(dec!(200), (acc(1), dec!(800)), (acc(2), dec!(250)));

        assert_eq!(restored.credit, dec!(200));
        assert_eq!(restored.balance, dec!(1000));
        assert_eq!(
            restored.description,
            "Delete Transfer - Transaction from account 1"
        );

        assert_eq!(removed.debit, dec!(200));
        assert_eq!(removed.balance, dec!(50));
        assert_eq!(
            removed.description,
            "Delete Transfer - Transaction to account 2"
        );
    }

    #[test]
    fn test_account_created() {
        let draft = PostingPlanner::account_created(acc(3), dec!(0), dec!(1500));
        assert_eq!(draft.credit, dec!(1500));
        assert_eq!(draft.balance, dec!(1500));
        assert_eq!(draft.description, "Account Creation");
    }

    #[test]
    fn test_account_created_negative_initial() {
        let draft = PostingPlanner::account_created(acc(3), dec!(0), dec!(-400));
        assert_eq!(draft.balance, dec!(-400));
    }

    #[test]
    fn test_initial_amount_changed_is_sequential() {
        let [reversal, applied] =
            PostingPlanner::initial_amount_changed(acc(3), dec!(900), dec!(1500), dec!(2000));

        assert_eq!(reversal.debit, dec!(1500));
        assert_eq!(reversal.balance, dec!(-600));
        assert_eq!(reversal.description, "Account Update");

        assert_eq!(applied.credit, dec!(2000));
        assert_eq!(applied.balance, dec!(1400));
        assert_eq!(applied.description, "Account Update");

        // Net effect: new_initial - old_initial.
        assert_eq!(applied.balance, dec!(900) - dec!(1500) + dec!(2000));
    }
}
