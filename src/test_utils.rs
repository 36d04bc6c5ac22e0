//! Shared test utilities for `StockBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating products, cart lines and sale requests with sensible defaults.

use crate::{
    core::{
        category::Category,
        product::{self, NewProduct},
        sale::SaleRequest,
    },
    entities::{self, LineItem},
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Operator username used by the helpers below.
pub const TEST_OPERATOR: &str = "test_operator";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test product owned by [`TEST_OPERATOR`].
///
/// # Defaults
/// * `category`: other
/// * `low_stock_threshold`: 10
/// * `barcode`: none
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    quantity: i64,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        NewProduct {
            name: name.to_string(),
            quantity,
            ..NewProduct::default()
        },
        TEST_OPERATOR,
    )
    .await
}

/// Creates a test product with custom parameters.
/// Use this when you need a specific category, threshold, barcode or owner.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    quantity: i64,
    category: Category,
    barcode: Option<&str>,
    owner: &str,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        NewProduct {
            name: name.to_string(),
            quantity,
            category: Some(category),
            low_stock_threshold: None,
            barcode: barcode.map(str::to_string),
        },
        owner,
    )
    .await
}

/// Builds a cart line for `product`.
#[must_use]
pub fn cart_line(product: &entities::product::Model, quantity: i64, price: f64) -> LineItem {
    LineItem {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        quantity,
        price,
    }
}

/// Builds a sale request rung up by [`TEST_OPERATOR`] without a customer.
#[must_use]
pub fn sale_request(items: Vec<LineItem>) -> SaleRequest {
    SaleRequest {
        items,
        operator: TEST_OPERATOR.to_string(),
        customer_name: None,
    }
}
