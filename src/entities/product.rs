//! Product entity - One row per stocked item in the shop's warehouse.
//!
//! Products hold the on-hand quantity that sales decrement and reversals restore.
//! Prices are not stored here; every sale line carries its own unit price.
//! Products are never hard-deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Opaque unique identifier (UUID v4)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name, unique per owner ignoring case and surrounding whitespace
    pub name: String,
    /// Units on hand, never negative
    pub quantity: i64,
    /// Category key from [`crate::core::category::Category`]
    pub category: String,
    /// Quantity at or below which the product counts as low-stock
    pub low_stock_threshold: i64,
    /// Optional barcode, globally unique when present
    #[sea_orm(unique)]
    pub barcode: Option<String>,
    /// Username of the operator who first stocked the product
    pub created_by: String,
    /// When the product was created
    pub created_at: DateTimeUtc,
    /// When the product was last modified
    pub updated_at: DateTimeUtc,
}

/// Products are referenced by transactions only through a soft id inside the
/// line-item snapshot, so there are no declared relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
