//! Plain-text formatting for ledger records.
//!
//! These helpers are framework-agnostic; the bot layer wraps their output in
//! embeds and messages.

use crate::{
    core::{category::Category, product::is_low_stock},
    entities::{LineItem, product, transaction},
};
use chrono::FixedOffset;

/// Length of the transaction id prefix shown in lists.
pub const SHORT_ID_LEN: usize = 8;

/// Formats an amount with the shop's currency symbol, two decimals.
#[must_use]
pub fn format_amount(amount: f64, symbol: &str) -> String {
    if amount < 0.0 {
        format!("-{symbol}{:.2}", amount.abs())
    } else {
        format!("{symbol}{amount:.2}")
    }
}

/// First [`SHORT_ID_LEN`] characters of an id.
#[must_use]
pub fn short_id(id: &str) -> &str {
    id.char_indices()
        .nth(SHORT_ID_LEN)
        .map_or(id, |(end, _)| &id[..end])
}

/// `Milk × 3 @ $1.50 = $4.50`
#[must_use]
pub fn format_line_item(item: &LineItem, symbol: &str) -> String {
    format!(
        "{} × {} @ {} = {}",
        item.product_name,
        item.quantity,
        format_amount(item.price, symbol),
        format_amount(item.subtotal(), symbol)
    )
}

/// One-line summary of a transaction, in the shop's local time.
///
/// `[1a2b3c4d] 2024-03-10 09:15 · 3 items · $12.00 · admin1 (Bat)`
#[must_use]
pub fn format_transaction_summary(
    record: &transaction::Model,
    offset: FixedOffset,
    symbol: &str,
) -> String {
    let units: i64 = record.items.iter().map(|item| item.quantity).sum();
    let when = record.created_at.with_timezone(&offset).format("%Y-%m-%d %H:%M");
    let mut line = format!(
        "[{}] {when} · {units} {} · {} · {}",
        short_id(&record.id),
        if units == 1 { "item" } else { "items" },
        format_amount(record.total_amount, symbol),
        record.created_by
    );
    if let Some(customer) = &record.customer_name {
        line.push_str(&format!(" ({customer})"));
    }
    line
}

/// `Milk · 3 on hand · Food ⚠️` (the marker appears at or below the threshold).
#[must_use]
pub fn format_stock_line(product: &product::Model) -> String {
    let mut line = format!(
        "{} · {} on hand · {}",
        product.name,
        product.quantity,
        Category::label_for_key(&product.category)
    );
    if let Some(barcode) = &product.barcode {
        line.push_str(&format!(" · #{barcode}"));
    }
    if is_low_stock(product) {
        line.push_str(" ⚠️");
    }
    line
}
