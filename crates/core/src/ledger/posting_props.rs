//! Property tests for the posting planner.
//!
//! These verify the balance-continuity guarantees: compensating postings
//! restore the pre-operation balance, sequential pairs chain their balances,
//! and every planned draft replays cleanly onto the history it extends.

use proptest::prelude::*;
use rust_decimal::Decimal;

use fintrack_shared::types::AccountId;

use super::balance::{PostingRow, replay};
use super::error::PostingError;
use super::posting::{PostingDraft, PostingPlanner};

/// Strategy for positive amounts with two decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for signed balances with two decimal places.
fn balance_strategy() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn as_row(draft: &PostingDraft) -> PostingRow {
    PostingRow {
        debit: draft.debit,
        credit: draft.credit,
        balance: draft.balance,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Creating then deleting an expense restores the starting balance.
    #[test]
    fn prop_expense_round_trip(balance in balance_strategy(), amount in amount_strategy()) {
        let account = AccountId::from_raw(1);
        let created =
            PostingPlanner::expense_created(account, balance, amount, "Food").unwrap();
        prop_assert_eq!(created.balance, balance - amount);

        let deleted =
            PostingPlanner::expense_deleted(account, created.balance, amount, "Food");
        prop_assert_eq!(deleted.balance, balance);
    }

    /// Creating then deleting an income restores the starting balance.
    #[test]
    fn prop_income_round_trip(balance in balance_strategy(), amount in amount_strategy()) {
        let account = AccountId::from_raw(1);
        let created =
            PostingPlanner::income_created(account, balance, amount, "Salary").unwrap();
        prop_assert_eq!(created.balance, balance + amount);

        let deleted =
            PostingPlanner::income_deleted(account, created.balance, amount, "Salary");
        prop_assert_eq!(deleted.balance, balance);
    }

    /// An expense update moves the balance by exactly `old - new`.
    #[test]
    fn prop_expense_update_net_effect(
        balance in balance_strategy(),
        old_amount in amount_strategy(),
        new_amount in amount_strategy(),
    ) {
        let account = AccountId::from_raw(1);
        let [reversal, applied] = PostingPlanner::expense_updated(
            account, balance, old_amount, "Old", new_amount, "New",
        )
        .unwrap();

        prop_assert_eq!(reversal.balance, balance + old_amount);
        prop_assert_eq!(applied.balance, balance + old_amount - new_amount);
    }

    /// Transfer create/delete restores both accounts' balances.
    #[test]
    fn prop_transfer_round_trip(
        from_balance in balance_strategy(),
        to_balance in balance_strategy(),
        amount in amount_strategy(),
    ) {
        let from = AccountId::from_raw(1);
        let to = AccountId::from_raw(2);

        let (outgoing, incoming) =
            PostingPlanner::transfer_created(amount, (from, from_balance), (to, to_balance))
                .unwrap();
        prop_assert_eq!(outgoing.balance, from_balance - amount);
        prop_assert_eq!(incoming.balance, to_balance + amount);

        let (restored, removed) = PostingPlanner::transfer_deleted(
            amount,
            (from, outgoing.balance),
            (to, incoming.balance),
        );
        prop_assert_eq!(restored.balance, from_balance);
        prop_assert_eq!(removed.balance, to_balance);
    }

    /// An initial-amount change moves the balance by `new - old`.
    #[test]
    fn prop_initial_amount_change_net_effect(
        balance in balance_strategy(),
        old_initial in balance_strategy(),
        new_initial in balance_strategy(),
    ) {
        let account = AccountId::from_raw(1);
        let [_, applied] = PostingPlanner::initial_amount_changed(
            account, balance, old_initial, new_initial,
        );
        prop_assert_eq!(applied.balance, balance - old_initial + new_initial);
    }

    /// Drafts appended to a consistent history keep `replay` consistent.
    #[test]
    fn prop_drafts_replay_cleanly(
        initial in balance_strategy(),
        amounts in proptest::collection::vec(amount_strategy(), 1..8),
    ) {
        let account = AccountId::from_raw(1);
        let mut rows = vec![PostingRow {
            debit: Decimal::ZERO,
            credit: initial,
            balance: initial,
        }];

        let mut balance = initial;
        for (i, amount) in amounts.iter().enumerate() {
            let draft = if i % 2 == 0 {
                PostingPlanner::expense_created(account, balance, *amount, "Misc").unwrap()
            } else {
                PostingPlanner::income_created(account, balance, *amount, "Other").unwrap()
            };
            balance = draft.balance;
            rows.push(as_row(&draft));
        }

        prop_assert_eq!(replay(&rows), Ok(balance));
    }

    /// Non-positive amounts are rejected before any draft is produced.
    #[test]
    fn prop_rejects_non_positive(balance in balance_strategy(), raw in -1_000_000i64..=0i64) {
        let account = AccountId::from_raw(1);
        let amount = Decimal::new(raw, 2);
        let expected = if amount.is_zero() {
            PostingError::ZeroAmount
        } else {
            PostingError::NegativeAmount
        };

        prop_assert_eq!(
            PostingPlanner::expense_created(account, balance, amount, "Food"),
            Err(expected)
        );
        prop_assert_eq!(
            PostingPlanner::income_created(account, balance, amount, "Salary"),
            Err(expected)
        );
        prop_assert_eq!(
            PostingPlanner::transfer_created(
                amount,
                (account, balance),
                (AccountId::from_raw(2), balance)
            ),
            Err(expected)
        );
    }
}
