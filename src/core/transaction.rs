//! Transaction ledger - Lookups over committed sales and the reversal workflow.
//!
//! Transactions are immutable once written. The only way to change one is
//! [`reverse_transaction`], which deletes the record and can optionally put the
//! sold quantities back on the shelf. Restoring stock is a compensating action:
//! a product that cannot be restored is logged and skipped so the record itself
//! still gets removed. All reads accept an optional owner so operators can be
//! limited to their own sales.

use crate::{
    core::product as product_ledger,
    entities::{Transaction, transaction},
    errors::{Error, Result},
};
use chrono::{FixedOffset, NaiveDate, TimeZone};
use sea_orm::{QueryOrder, QuerySelect, Select, TransactionTrait, prelude::*};
use tracing::{info, warn};

/// What a reversal did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversalOutcome {
    /// ID of the deleted transaction
    pub transaction_id: String,
    /// Line items whose quantity was put back on a product
    pub restored: Vec<RestoredItem>,
    /// Names of line items that could not be restored
    pub skipped: Vec<String>,
}

/// One restored line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredItem {
    /// Product that received the stock
    pub product_id: String,
    /// Product name snapshot from the line item
    pub product_name: String,
    /// Units put back
    pub quantity: i64,
}

fn scoped(owner: Option<&str>) -> Select<Transaction> {
    let query = Transaction::find();
    match owner {
        Some(owner) => query.filter(transaction::Column::CreatedBy.eq(owner)),
        None => query,
    }
}

/// Retrieves a transaction by ID, or `None` if it does not exist or belongs to another owner.
pub async fn get_transaction_by_id<C>(
    db: &C,
    transaction_id: &str,
    owner: Option<&str>,
) -> Result<Option<transaction::Model>>
where
    C: ConnectionTrait,
{
    scoped(owner)
        .filter(transaction::Column::Id.eq(transaction_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Shortest id prefix accepted by [`resolve_transaction_id`].
pub const MIN_ID_PREFIX_LEN: usize = 4;

/// Resolves a full id or a unique id prefix (as shown in lists) to a full id.
///
/// # Errors
/// - [`Error::TransactionNotFound`] when nothing visible to `owner` matches
/// - [`Error::Validation`] when the prefix matches more than one transaction
pub async fn resolve_transaction_id<C>(db: &C, input: &str, owner: Option<&str>) -> Result<String>
where
    C: ConnectionTrait,
{
    let input = input.trim();
    let not_found = || Error::TransactionNotFound {
        id: input.to_string(),
    };

    if let Some(exact) = get_transaction_by_id(db, input, owner).await? {
        return Ok(exact.id);
    }

    // Ids are UUIDs, so anything else cannot be a prefix and must not reach LIKE
    let is_id_text = input.chars().all(|c| c.is_ascii_hexdigit() || c == '-');
    if input.len() < MIN_ID_PREFIX_LEN || !is_id_text {
        return Err(not_found());
    }

    let mut matches = scoped(owner)
        .filter(transaction::Column::Id.starts_with(input.to_lowercase()))
        .limit(2)
        .all(db)
        .await?;
    match matches.len() {
        0 => Err(not_found()),
        1 => Ok(matches.remove(0).id),
        _ => Err(Error::validation(
            "id",
            format!("'{input}' matches more than one transaction, type more of the id"),
        )),
    }
}

/// Retrieves all transactions, newest first.
pub async fn get_transactions<C>(db: &C, owner: Option<&str>) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    scoped(owner)
        .order_by_desc(transaction::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the `limit` most recent transactions, newest first.
pub async fn get_recent_transactions<C>(
    db: &C,
    owner: Option<&str>,
    limit: u64,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    scoped(owner)
        .order_by_desc(transaction::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the transactions whose timestamp falls on `date` in the shop's
/// timezone, newest first.
pub async fn get_transactions_for_day<C>(
    db: &C,
    owner: Option<&str>,
    date: NaiveDate,
    offset: FixedOffset,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    let (start, end) = day_bounds(date, offset)?;

    scoped(owner)
        .filter(transaction::Column::CreatedAt.gte(start))
        .filter(transaction::Column::CreatedAt.lt(end))
        .order_by_desc(transaction::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// UTC instants bounding the local calendar day `date` (start inclusive, end exclusive).
pub fn day_bounds(
    date: NaiveDate,
    offset: FixedOffset,
) -> Result<(chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>)> {
    let out_of_range = || Error::validation("date", format!("{date} is out of range"));

    let next = date.succ_opt().ok_or_else(out_of_range)?;
    let start = offset
        .from_local_datetime(&date.and_hms_opt(0, 0, 0).ok_or_else(out_of_range)?)
        .single()
        .ok_or_else(out_of_range)?;
    let end = offset
        .from_local_datetime(&next.and_hms_opt(0, 0, 0).ok_or_else(out_of_range)?)
        .single()
        .ok_or_else(out_of_range)?;

    Ok((start.to_utc(), end.to_utc()))
}

/// Deletes a transaction, optionally restoring its quantities to stock.
///
/// With `restore_stock`, each line item's quantity is added back onto the
/// product's current quantity. A line whose product is gone, or whose restore
/// fails, is logged and reported in [`ReversalOutcome::skipped`]; the deletion
/// still goes ahead.
///
/// # Errors
/// Returns [`Error::TransactionNotFound`] if the transaction does not exist (or
/// belongs to another owner), in which case nothing is changed.
pub async fn reverse_transaction(
    db: &DatabaseConnection,
    transaction_id: &str,
    owner: Option<&str>,
    restore_stock: bool,
) -> Result<ReversalOutcome> {
    let txn = db.begin().await?;

    let record = get_transaction_by_id(&txn, transaction_id, owner)
        .await?
        .ok_or_else(|| Error::TransactionNotFound {
            id: transaction_id.to_string(),
        })?;

    let mut restored = Vec::new();
    let mut skipped = Vec::new();

    if restore_stock {
        for item in record.items.iter() {
            match product_ledger::adjust_stock(&txn, &item.product_id, item.quantity).await {
                Ok(Some(_)) => restored.push(RestoredItem {
                    product_id: item.product_id.clone(),
                    product_name: item.product_name.clone(),
                    quantity: item.quantity,
                }),
                Ok(None) => {
                    warn!(
                        transaction_id,
                        product_id = %item.product_id,
                        "Product no longer exists, stock not restored"
                    );
                    skipped.push(item.product_name.clone());
                }
                Err(e) => {
                    warn!(
                        transaction_id,
                        product_id = %item.product_id,
                        error = %e,
                        "Failed to restore stock for line item"
                    );
                    skipped.push(item.product_name.clone());
                }
            }
        }
    }

    let deleted = Transaction::delete_by_id(record.id.clone()).exec(&txn).await?;
    if deleted.rows_affected == 0 {
        return Err(Error::TransactionNotFound {
            id: transaction_id.to_string(),
        });
    }

    txn.commit().await?;

    info!(
        transaction_id,
        restore_stock,
        restored = restored.len(),
        skipped = skipped.len(),
        "Transaction reversed"
    );

    Ok(ReversalOutcome {
        transaction_id: record.id,
        restored,
        skipped,
    })
}
