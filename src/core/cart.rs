//! Cart validation - the pure half of the sale workflow.
//!
//! Nothing in this module touches storage. [`validate_cart`] checks the shape of a
//! proposed cart; [`check_stock`] compares it against a snapshot of on-hand
//! quantities. Both run to completion before the sale workflow mutates anything.

use crate::{
    entities::{LineItem, product},
    errors::{Error, Result},
};
use std::collections::HashMap;

/// Stock snapshot keyed by product ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockSnapshot {
    available: HashMap<String, i64>,
}

impl StockSnapshot {
    /// Builds a snapshot from freshly loaded products.
    #[must_use]
    pub fn from_products(products: &[product::Model]) -> Self {
        let available = products
            .iter()
            .map(|p| (p.id.clone(), p.quantity))
            .collect();
        Self { available }
    }

    /// Records the on-hand quantity of one product.
    pub fn insert(&mut self, product_id: impl Into<String>, quantity: i64) {
        self.available.insert(product_id.into(), quantity);
    }

    /// On-hand quantity, or `None` if the product was not found.
    #[must_use]
    pub fn available(&self, product_id: &str) -> Option<i64> {
        self.available.get(product_id).copied()
    }
}

/// Checks the shape of a cart: non-empty, every line referencing a product,
/// every quantity at least 1, every price a finite number of 0 or more.
///
/// # Errors
/// Returns [`Error::Validation`] naming the first offending field, e.g. `items[2].price`.
pub fn validate_cart(items: &[LineItem]) -> Result<()> {
    if items.is_empty() {
        return Err(Error::validation("items", "cart must contain at least one item"));
    }

    for (index, item) in items.iter().enumerate() {
        if item.product_id.trim().is_empty() {
            return Err(Error::validation(
                format!("items[{index}].product_id"),
                "product reference is missing",
            ));
        }
        if item.quantity < 1 {
            return Err(Error::validation(
                format!("items[{index}].quantity"),
                "must be at least 1",
            ));
        }
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(Error::validation(
                format!("items[{index}].price"),
                "must be a number of 0 or more",
            ));
        }
    }

    Ok(())
}

/// Units requested per product ID, in order of first appearance.
#[must_use]
pub fn requested_quantities(items: &[LineItem]) -> Vec<(&str, i64)> {
    let mut order: Vec<(&str, i64)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for item in items {
        if let Some(&position) = positions.get(item.product_id.as_str()) {
            if let Some(entry) = order.get_mut(position) {
                entry.1 = entry.1.saturating_add(item.quantity);
            }
        } else {
            positions.insert(item.product_id.as_str(), order.len());
            order.push((item.product_id.as_str(), item.quantity));
        }
    }

    order
}

/// Checks a validated cart against on-hand stock.
///
/// The first pass makes sure every referenced product exists. The second pass
/// adds up the quantity requested per product across all lines and compares it
/// with what is available, so two lines for the same product cannot each pass on
/// their own and then oversell together.
///
/// # Errors
/// - [`Error::ProductNotFound`] with the line's product name when a product is missing
/// - [`Error::InsufficientStock`] with the available and requested quantities otherwise
pub fn check_stock(items: &[LineItem], stock: &StockSnapshot) -> Result<()> {
    for item in items {
        if stock.available(&item.product_id).is_none() {
            return Err(Error::ProductNotFound {
                name: item.product_name.clone(),
            });
        }
    }

    for (product_id, requested) in requested_quantities(items) {
        let available = stock.available(product_id).unwrap_or_default();
        if requested > available {
            let name = items
                .iter()
                .find(|item| item.product_id == product_id)
                .map(|item| item.product_name.clone())
                .unwrap_or_else(|| product_id.to_string());
            return Err(Error::InsufficientStock {
                name,
                available,
                requested,
            });
        }
    }

    Ok(())
}

/// Sum of `quantity × price` over all lines.
#[must_use]
pub fn cart_total(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::subtotal).sum()
}

/// Trims a customer name; blank names become `None`.
#[must_use]
pub fn normalize_customer_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}
