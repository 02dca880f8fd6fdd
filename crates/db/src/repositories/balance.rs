//! Database side of the balance tracker.
//!
//! All balance reads and posting appends funnel through these functions. They
//! take any `ConnectionTrait` so callers can run them inside the transaction
//! that owns the surrounding mutation; reading the latest balance outside
//! that transaction would risk a stale read under concurrent writers.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use fintrack_core::ledger::PostingDraft;
use fintrack_shared::types::AccountId;

use crate::entities::postings;

/// Reads the current balance of an account: the `balance` of its most
/// recently inserted posting (identity order, not date order), zero when the
/// account has no postings yet.
pub async fn latest_balance<C: ConnectionTrait>(
    conn: &C,
    account_id: AccountId,
) -> Result<Decimal, DbErr> {
    let latest = postings::Entity::find()
        .filter(postings::Column::AccountId.eq(account_id.into_inner()))
        .order_by_desc(postings::Column::Id)
        .limit(1)
        .one(conn)
        .await?;

    Ok(latest.map_or(Decimal::ZERO, |posting| posting.balance))
}

/// Appends a planned posting to the ledger.
pub async fn append<C: ConnectionTrait>(
    conn: &C,
    draft: PostingDraft,
) -> Result<postings::Model, DbErr> {
    let posting = postings::ActiveModel {
        account_id: Set(draft.account_id.into_inner()),
        debit: Set(draft.debit),
        credit: Set(draft.credit),
        balance: Set(draft.balance),
        description: Set(draft.description),
        date: Set(Utc::now().into()),
        ..Default::default()
    };

    posting.insert(conn).await
}

/// Loads an account's full posting history in insertion order.
pub async fn history<C: ConnectionTrait>(
    conn: &C,
    account_id: AccountId,
) -> Result<Vec<postings::Model>, DbErr> {
    postings::Entity::find()
        .filter(postings::Column::AccountId.eq(account_id.into_inner()))
        .order_by_asc(postings::Column::Id)
        .all(conn)
        .await
}
