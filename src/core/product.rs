//! Product ledger - Handles stock intake, lookups, edits and quantity changes.
//!
//! Products carry the on-hand quantity that the sale and reversal workflows
//! mutate. Names are unique per owner, compared case- and whitespace-insensitively;
//! barcodes are unique across the whole shop. Quantity changes made on behalf of a
//! sale go through [`decrement_stock`], a single conditional `UPDATE` that refuses
//! to drive the quantity below zero.

use crate::{
    core::category::Category,
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, info};
use uuid::Uuid;

/// Default low-stock threshold for newly created products.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Input for creating a product or receiving stock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProduct {
    /// Product name
    pub name: String,
    /// Units received
    pub quantity: i64,
    /// Category; `None` means "other" on create and "keep" on merge
    pub category: Option<Category>,
    /// Low-stock threshold; `None` means the default on create and "keep" on merge
    pub low_stock_threshold: Option<i64>,
    /// Barcode; blank is treated as absent
    pub barcode: Option<String>,
}

/// Partial edit of a product. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    /// New name
    pub name: Option<String>,
    /// New category
    pub category: Option<Category>,
    /// New low-stock threshold
    pub low_stock_threshold: Option<i64>,
    /// New barcode; `Some("")` clears it
    pub barcode: Option<String>,
}

/// Result of [`receive_stock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockIntake {
    /// No product of that name existed for the owner, so one was created
    Created(product::Model),
    /// The quantity was added to an existing product of the same name
    Merged(product::Model),
}

impl StockIntake {
    /// The product after the intake.
    #[must_use]
    pub const fn product(&self) -> &product::Model {
        match self {
            Self::Created(p) | Self::Merged(p) => p,
        }
    }
}

/// Normalises a product name for uniqueness comparisons.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whether the product is at or below its low-stock threshold.
#[must_use]
pub const fn is_low_stock(product: &product::Model) -> bool {
    product.quantity <= product.low_stock_threshold
}

/// Retrieves all products, optionally restricted to one owner, ordered by name.
pub async fn get_all_products<C>(db: &C, owner: Option<&str>) -> Result<Vec<product::Model>>
where
    C: ConnectionTrait,
{
    let mut query = Product::find();
    if let Some(owner) = owner {
        query = query.filter(product::Column::CreatedBy.eq(owner));
    }

    query
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id<C>(db: &C, product_id: &str) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a product by name, ignoring case and surrounding whitespace.
///
/// With an owner, only that owner's products are considered.
pub async fn get_product_by_name<C>(
    db: &C,
    name: &str,
    owner: Option<&str>,
) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    let wanted = normalize_name(name);
    if wanted.is_empty() {
        return Ok(None);
    }

    let products = get_all_products(db, owner).await?;
    Ok(products
        .into_iter()
        .find(|p| normalize_name(&p.name) == wanted))
}

/// Finds a product by barcode across all owners.
pub async fn get_product_by_barcode<C>(db: &C, barcode: &str) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    let barcode = barcode.trim();
    if barcode.is_empty() {
        return Ok(None);
    }

    Product::find()
        .filter(product::Column::Barcode.eq(barcode))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves products at or below their low-stock threshold, ordered by name.
pub async fn get_low_stock_products<C>(db: &C, owner: Option<&str>) -> Result<Vec<product::Model>>
where
    C: ConnectionTrait,
{
    let mut query = Product::find().filter(
        Expr::col(product::Column::Quantity).lte(Expr::col(product::Column::LowStockThreshold)),
    );
    if let Some(owner) = owner {
        query = query.filter(product::Column::CreatedBy.eq(owner));
    }

    query
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

fn normalize_barcode(barcode: Option<&str>) -> Option<String> {
    barcode
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(ToString::to_string)
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("name", "product name cannot be empty"));
    }
    Ok(())
}

fn validate_quantity(field: &str, quantity: i64) -> Result<()> {
    if quantity < 0 {
        return Err(Error::validation(field, "must be 0 or greater"));
    }
    Ok(())
}

fn validate_new_product(input: &NewProduct) -> Result<()> {
    validate_name(&input.name)?;
    validate_quantity("quantity", input.quantity)?;
    if let Some(threshold) = input.low_stock_threshold {
        validate_quantity("low_stock_threshold", threshold)?;
    }
    Ok(())
}

/// Fails if `barcode` is already assigned to a product other than `except_id`.
async fn ensure_barcode_free<C>(db: &C, barcode: &str, except_id: Option<&str>) -> Result<()>
where
    C: ConnectionTrait,
{
    if let Some(holder) = get_product_by_barcode(db, barcode).await? {
        if Some(holder.id.as_str()) != except_id {
            return Err(Error::validation(
                "barcode",
                format!("barcode {barcode} is already assigned to '{}'", holder.name),
            ));
        }
    }
    Ok(())
}

/// Fails if `owner` already has a product called `name` other than `except_id`.
async fn ensure_name_free<C>(db: &C, name: &str, owner: &str, except_id: Option<&str>) -> Result<()>
where
    C: ConnectionTrait,
{
    if let Some(existing) = get_product_by_name(db, name, Some(owner)).await? {
        if Some(existing.id.as_str()) != except_id {
            return Err(Error::validation(
                "name",
                format!("a product named '{}' already exists", existing.name),
            ));
        }
    }
    Ok(())
}

async fn insert_product<C>(db: &C, input: NewProduct, owner: &str) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    let barcode = normalize_barcode(input.barcode.as_deref());
    if let Some(barcode) = &barcode {
        ensure_barcode_free(db, barcode, None).await?;
    }

    let now = chrono::Utc::now();
    let product = product::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(input.name.trim().to_string()),
        quantity: Set(input.quantity),
        category: Set(input.category.unwrap_or_default().key().to_string()),
        low_stock_threshold: Set(input
            .low_stock_threshold
            .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD)),
        barcode: Set(barcode),
        created_by: Set(owner.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    product.insert(db).await.map_err(Into::into)
}

/// Creates a new product owned by `owner`.
///
/// # Errors
/// Returns a validation error if:
/// - The name is empty, or `owner` already has a product with that name
/// - The quantity or threshold is negative
/// - The barcode is already assigned to another product
pub async fn create_product(
    db: &DatabaseConnection,
    input: NewProduct,
    owner: &str,
) -> Result<product::Model> {
    validate_new_product(&input)?;

    let txn = db.begin().await?;
    ensure_name_free(&txn, &input.name, owner, None).await?;
    let created = insert_product(&txn, input, owner).await?;
    txn.commit().await?;

    info!(product_id = %created.id, name = %created.name, owner, "Product created");
    Ok(created)
}

/// Records incoming stock.
///
/// If `owner` already has a product with the same name (ignoring case and
/// surrounding whitespace) the quantity is added to it; category, threshold and
/// barcode are replaced only when supplied. Otherwise a new product is created.
pub async fn receive_stock(
    db: &DatabaseConnection,
    input: NewProduct,
    owner: &str,
) -> Result<StockIntake> {
    validate_new_product(&input)?;

    let txn = db.begin().await?;

    let Some(existing) = get_product_by_name(&txn, &input.name, Some(owner)).await? else {
        let created = insert_product(&txn, input, owner).await?;
        txn.commit().await?;
        info!(product_id = %created.id, name = %created.name, owner, "Stock received for new product");
        return Ok(StockIntake::Created(created));
    };

    let new_quantity = existing
        .quantity
        .checked_add(input.quantity)
        .ok_or_else(|| Error::validation("quantity", "total quantity is too large"))?;

    let barcode = normalize_barcode(input.barcode.as_deref());
    if let Some(barcode) = &barcode {
        ensure_barcode_free(&txn, barcode, Some(existing.id.as_str())).await?;
    }

    let mut active: product::ActiveModel = existing.into();
    active.quantity = Set(new_quantity);
    if let Some(category) = input.category {
        active.category = Set(category.key().to_string());
    }
    if let Some(threshold) = input.low_stock_threshold {
        active.low_stock_threshold = Set(threshold);
    }
    if barcode.is_some() {
        active.barcode = Set(barcode);
    }
    active.updated_at = Set(chrono::Utc::now());

    let merged = active.update(&txn).await?;
    txn.commit().await?;

    info!(
        product_id = %merged.id,
        name = %merged.name,
        added = input.quantity,
        quantity = merged.quantity,
        "Stock merged into existing product"
    );
    Ok(StockIntake::Merged(merged))
}

/// Applies a partial edit (rename, category, threshold, barcode) to a product.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist
/// - The new name is empty or collides with another product of the same owner
/// - The new threshold is negative
/// - The new barcode is assigned to another product
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: &str,
    update: ProductUpdate,
) -> Result<product::Model> {
    if let Some(name) = &update.name {
        validate_name(name)?;
    }
    if let Some(threshold) = update.low_stock_threshold {
        validate_quantity("low_stock_threshold", threshold)?;
    }

    let txn = db.begin().await?;

    let existing = get_product_by_id(&txn, product_id)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: product_id.to_string(),
        })?;

    if let Some(name) = &update.name {
        ensure_name_free(&txn, name, &existing.created_by, Some(existing.id.as_str())).await?;
    }

    let barcode = update
        .barcode
        .as_deref()
        .map(|b| normalize_barcode(Some(b)));
    if let Some(Some(barcode)) = &barcode {
        ensure_barcode_free(&txn, barcode, Some(existing.id.as_str())).await?;
    }

    let mut active: product::ActiveModel = existing.into();
    if let Some(name) = update.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(category) = update.category {
        active.category = Set(category.key().to_string());
    }
    if let Some(threshold) = update.low_stock_threshold {
        active.low_stock_threshold = Set(threshold);
    }
    if let Some(barcode) = barcode {
        active.barcode = Set(barcode);
    }
    active.updated_at = Set(chrono::Utc::now());

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    debug!(product_id = %updated.id, "Product updated");
    Ok(updated)
}

/// Overwrites a product's on-hand quantity.
pub async fn set_product_quantity(
    db: &DatabaseConnection,
    product_id: &str,
    quantity: i64,
) -> Result<product::Model> {
    validate_quantity("quantity", quantity)?;

    let mut product: product::ActiveModel = get_product_by_id(db, product_id)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: product_id.to_string(),
        })?
        .into();

    product.quantity = Set(quantity);
    product.updated_at = Set(chrono::Utc::now());

    let updated = product.update(db).await?;
    info!(product_id = %updated.id, quantity, "Product quantity set");
    Ok(updated)
}

/// Atomically removes `amount` units from a product.
///
/// Runs as `UPDATE products SET quantity = quantity - amount WHERE id = ? AND quantity >= amount`,
/// so concurrent callers can never take the quantity below zero.
///
/// # Errors
/// Returns [`Error::InsufficientStock`] when fewer than `amount` units are on hand and
/// [`Error::ProductNotFound`] when the product does not exist.
pub async fn decrement_stock<C>(db: &C, product_id: &str, amount: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Product::update_many()
        .col_expr(
            product::Column::Quantity,
            Expr::col(product::Column::Quantity).sub(amount),
        )
        .col_expr(product::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(product::Column::Id.eq(product_id))
        .filter(product::Column::Quantity.gte(amount))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(match get_product_by_id(db, product_id).await? {
            Some(product) => Error::InsufficientStock {
                name: product.name,
                available: product.quantity,
                requested: amount,
            },
            None => Error::ProductNotFound {
                name: product_id.to_string(),
            },
        });
    }

    Ok(())
}

/// Atomically adds `delta` units to a product (negative deltas go through
/// [`decrement_stock`]).
///
/// Returns the updated product, or `None` if the product does not exist.
pub async fn adjust_stock<C>(db: &C, product_id: &str, delta: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    if delta < 0 {
        match decrement_stock(db, product_id, -delta).await {
            Err(Error::ProductNotFound { .. }) => return Ok(None),
            other => other?,
        }
    } else {
        let result = Product::update_many()
            .col_expr(
                product::Column::Quantity,
                Expr::col(product::Column::Quantity).add(delta),
            )
            .col_expr(product::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(product::Column::Id.eq(product_id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
    }

    get_product_by_id(db, product_id).await
}
