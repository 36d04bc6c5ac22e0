//! Cart text parsing for `/sell`.
//!
//! A cart is written as lines separated by `;` or newlines:
//!
//! ```text
//! Milk x2 @ 1.50; #4901234567 x1 @ 3; Bread @ 2
//! ```
//!
//! Each line names a product (or a barcode prefixed with `#`), an optional
//! quantity (`x2`, `×2` or `*2`, default 1) and a unit price after `@`.
//! Parsing only checks syntax; quantities and prices are validated by the
//! sale workflow.

use crate::{
    core::product,
    entities::LineItem,
    errors::{Error, Result},
};
use sea_orm::ConnectionTrait;

/// How a cart line refers to a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductRef {
    /// Product name, matched ignoring case and surrounding whitespace
    Name(String),
    /// Barcode, matched exactly
    Barcode(String),
}

/// One parsed cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartEntry {
    /// Referenced product
    pub product: ProductRef,
    /// Units
    pub quantity: i64,
    /// Unit price
    pub price: f64,
}

/// Parses cart text into entries. Blank lines are skipped.
///
/// # Errors
/// Returns [`Error::Validation`] naming `items[i]` (or `items[i].quantity` /
/// `items[i].price`) for the first line that cannot be read.
pub fn parse_cart(input: &str) -> Result<Vec<CartEntry>> {
    input
        .split([';', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| parse_line(index, line))
        .collect()
}

fn parse_line(index: usize, line: &str) -> Result<CartEntry> {
    let Some((head, price_text)) = line.rsplit_once('@') else {
        return Err(Error::validation(
            format!("items[{index}].price"),
            format!("missing `@ price` in \"{line}\""),
        ));
    };

    let price_text = price_text.trim();
    let price: f64 = price_text.parse().map_err(|_| {
        Error::validation(
            format!("items[{index}].price"),
            format!("\"{price_text}\" is not a number"),
        )
    })?;

    let head = head.trim();
    let (reference, marker) = match head.rsplit_once(char::is_whitespace) {
        Some((rest, last)) if quantity_token(last).is_some() => (rest.trim(), Some(last)),
        None if quantity_token(head).is_some() => ("", Some(head)),
        _ => (head, None),
    };
    let quantity = match marker.and_then(quantity_token) {
        Some(digits) => digits.parse().map_err(|_| {
            Error::validation(
                format!("items[{index}].quantity"),
                format!("\"{digits}\" is not a whole number"),
            )
        })?,
        None => 1,
    };

    let product = match reference.strip_prefix('#') {
        Some(barcode) => ProductRef::Barcode(barcode.trim().to_string()),
        None => ProductRef::Name(reference.to_string()),
    };
    let empty = match &product {
        ProductRef::Name(name) | ProductRef::Barcode(name) => name.is_empty(),
    };
    if empty {
        return Err(Error::validation(
            format!("items[{index}]"),
            format!("no product given in \"{line}\""),
        ));
    }

    Ok(CartEntry {
        product,
        quantity,
        price,
    })
}

/// Strips a quantity marker (`x`, `×` or `*`) from a token.
fn quantity_token(token: &str) -> Option<&str> {
    let digits = token
        .strip_prefix(['x', 'X', '*'])
        .or_else(|| token.strip_prefix('×'))?;
    (!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit() || c == '-')).then_some(digits)
}

/// Resolves parsed entries to line items.
///
/// Names are looked up within `owner` (all products when `None`); barcodes are
/// looked up across the whole shop.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] for the first entry that matches nothing.
pub async fn resolve_entries<C>(
    db: &C,
    entries: Vec<CartEntry>,
    owner: Option<&str>,
) -> Result<Vec<LineItem>>
where
    C: ConnectionTrait,
{
    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        let found = match &entry.product {
            ProductRef::Name(name) => product::get_product_by_name(db, name, owner).await?,
            ProductRef::Barcode(barcode) => product::get_product_by_barcode(db, barcode).await?,
        };
        let Some(found) = found else {
            let name = match entry.product {
                ProductRef::Name(name) => name,
                ProductRef::Barcode(barcode) => format!("#{barcode}"),
            };
            return Err(Error::ProductNotFound { name });
        };
        items.push(LineItem {
            product_id: found.id,
            product_name: found.name,
            quantity: entry.quantity,
            price: entry.price,
        });
    }
    Ok(items)
}
