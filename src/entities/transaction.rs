//! Transaction entity - An immutable sale record.
//!
//! Each transaction stores the ordered line items of the cart it was created from
//! (as a JSON column), the `total_amount` computed once at creation time, the
//! operator who rang it up and an optional customer name. Line items keep a
//! snapshot of the product name, so later renames do not rewrite history.
use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// A single line of a sale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Soft reference to the sold product
    pub product_id: String,
    /// Product name at the time of sale
    pub product_name: String,
    /// Units sold, at least 1
    pub quantity: i64,
    /// Unit price, never negative
    pub price: f64,
}

impl LineItem {
    /// Revenue contributed by this line (`quantity × price`).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn subtotal(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

/// Ordered line items, persisted as one JSON value.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize, FromJsonQueryResult)]
pub struct LineItems(pub Vec<LineItem>);

impl LineItems {
    /// Iterates over the line items in cart order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.0.iter()
    }
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Opaque unique identifier (UUID v4)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Line items in cart order
    #[sea_orm(column_type = "Json")]
    pub items: LineItems,
    /// Sum of `quantity × price` over `items`, fixed at creation
    pub total_amount: f64,
    /// When the sale was committed
    pub created_at: DateTimeUtc,
    /// Username of the operator who rang up the sale
    pub created_by: String,
    /// Optional customer name, never blank
    pub customer_name: Option<String>,
}

/// `Transaction` has no declared relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
