//! Sale workflow - turns a cart into a committed transaction.
//!
//! A sale is all-or-nothing. The cart is validated, every referenced product is
//! loaded and checked inside one database transaction, and only then is stock
//! decremented and the transaction record written. Any failure rolls the whole
//! sale back. Each decrement is a conditional update, so a concurrent sale that
//! slipped in between the check and the mutation still cannot oversell.

use crate::{
    core::{cart, product as product_ledger},
    entities::{LineItem, LineItems, Product, product, transaction},
    errors::Result,
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, info};
use uuid::Uuid;

/// A proposed sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRequest {
    /// Cart lines, in order
    pub items: Vec<LineItem>,
    /// Operator username supplied by the identity collaborator
    pub operator: String,
    /// Optional customer name; blank is stored as absent
    pub customer_name: Option<String>,
}

/// Commits a sale.
///
/// # Errors
/// - [`crate::errors::Error::Validation`] for a malformed cart (nothing is read)
/// - [`crate::errors::Error::ProductNotFound`] when a line references a missing product
/// - [`crate::errors::Error::InsufficientStock`] when the cart asks for more than is on hand
/// - [`crate::errors::Error::Database`] when storage fails
///
/// In every error case no product quantity changes and no transaction is created.
pub async fn complete_sale(
    db: &DatabaseConnection,
    request: SaleRequest,
) -> Result<transaction::Model> {
    let SaleRequest {
        items,
        operator,
        customer_name,
    } = request;

    cart::validate_cart(&items)?;

    let txn = db.begin().await?;

    let product_ids: Vec<String> = cart::requested_quantities(&items)
        .into_iter()
        .map(|(id, _)| id.to_string())
        .collect();
    let products = Product::find()
        .filter(product::Column::Id.is_in(product_ids))
        .all(&txn)
        .await?;
    let stock = cart::StockSnapshot::from_products(&products);
    debug!(lines = items.len(), products = products.len(), "Checking cart against stock");

    cart::check_stock(&items, &stock)?;

    for item in &items {
        product_ledger::decrement_stock(&txn, &item.product_id, item.quantity).await?;
    }

    let total_amount = cart::cart_total(&items);
    let record = transaction::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        items: Set(LineItems(items)),
        total_amount: Set(total_amount),
        created_at: Set(chrono::Utc::now()),
        created_by: Set(operator),
        customer_name: Set(cart::normalize_customer_name(customer_name)),
    };
    let created = record.insert(&txn).await?;

    txn.commit().await?;

    info!(
        transaction_id = %created.id,
        operator = %created.created_by,
        lines = created.items.0.len(),
        total = created.total_amount,
        "Sale committed"
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    #![allow(clippy::panic)]
    use super::*;
    use crate::{
        core::{product::get_product_by_id, transaction::get_transactions},
        errors::Error,
        test_utils::*,
    };
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_malformed_cart_never_reaches_storage() -> Result<()> {
        // A mock with no prepared results fails any query, so only validation may run
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = complete_sale(&db, sale_request(Vec::new())).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let bad_line = LineItem {
            product_id: "p1".to_string(),
            product_name: "Milk".to_string(),
            quantity: 0,
            price: 1.0,
        };
        let result = complete_sale(&db, sale_request(vec![bad_line])).await;
        assert!(
            matches!(result, Err(Error::Validation { ref field, .. }) if field == "items[0].quantity")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_sale_decrements_stock_and_records_total() -> Result<()> {
        let db = setup_test_db().await?;
        let milk = create_test_product(&db, "Milk", 5).await?;
        let bread = create_test_product(&db, "Bread", 10).await?;
        let untouched = create_test_product(&db, "Tea", 8).await?;

        let sale = complete_sale(
            &db,
            sale_request(vec![cart_line(&milk, 3, 100.0), cart_line(&bread, 2, 2.5)]),
        )
        .await?;

        assert_eq!(sale.total_amount, 305.0);
        assert_eq!(sale.items.0.len(), 2);
        assert_eq!(sale.items.0[0].product_name, "Milk");
        assert_eq!(sale.created_by, TEST_OPERATOR);
        assert_eq!(sale.customer_name, None);

        assert_eq!(get_product_by_id(&db, &milk.id).await?.unwrap().quantity, 2);
        assert_eq!(get_product_by_id(&db, &bread.id).await?.unwrap().quantity, 8);
        assert_eq!(get_product_by_id(&db, &untouched.id).await?.unwrap().quantity, 8);

        // Stored record round-trips, line items included
        let stored = get_transactions(&db, None).await?;
        assert_eq!(stored, vec![sale]);

        Ok(())
    }

    #[tokio::test]
    async fn test_oversell_is_rejected_without_side_effects() -> Result<()> {
        let db = setup_test_db().await?;
        let milk = create_test_product(&db, "Milk", 5).await?;
        let bread = create_test_product(&db, "Bread", 10).await?;

        complete_sale(&db, sale_request(vec![cart_line(&milk, 3, 100.0)])).await?;

        // Bread is fine, milk is short: nothing may change
        let result = complete_sale(
            &db,
            sale_request(vec![cart_line(&bread, 1, 2.0), cart_line(&milk, 3, 100.0)]),
        )
        .await;
        assert!(matches!(
            result,
            Err(Error::InsufficientStock {
                ref name,
                available: 2,
                requested: 3,
            }) if name == "Milk"
        ));

        assert_eq!(get_product_by_id(&db, &milk.id).await?.unwrap().quantity, 2);
        assert_eq!(get_product_by_id(&db, &bread.id).await?.unwrap().quantity, 10);
        assert_eq!(get_transactions(&db, None).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_lines_are_checked_together() -> Result<()> {
        let db = setup_test_db().await?;
        let milk = create_test_product(&db, "Milk", 5).await?;

        let result = complete_sale(
            &db,
            sale_request(vec![cart_line(&milk, 3, 1.0), cart_line(&milk, 3, 1.0)]),
        )
        .await;
        assert!(matches!(
            result,
            Err(Error::InsufficientStock {
                available: 5,
                requested: 6,
                ..
            })
        ));
        assert_eq!(get_product_by_id(&db, &milk.id).await?.unwrap().quantity, 5);
        assert!(get_transactions(&db, None).await?.is_empty());

        // Within stock, both decrements apply
        complete_sale(
            &db,
            sale_request(vec![cart_line(&milk, 3, 1.0), cart_line(&milk, 2, 1.0)]),
        )
        .await?;
        assert_eq!(get_product_by_id(&db, &milk.id).await?.unwrap().quantity, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_product_fails_whole_sale() -> Result<()> {
        let db = setup_test_db().await?;
        let milk = create_test_product(&db, "Milk", 5).await?;

        let ghost = LineItem {
            product_id: "no-such-product".to_string(),
            product_name: "Ghost Tea".to_string(),
            quantity: 1,
            price: 1.0,
        };
        let result = complete_sale(&db, sale_request(vec![cart_line(&milk, 1, 1.0), ghost])).await;
        assert!(matches!(result, Err(Error::ProductNotFound { ref name }) if name == "Ghost Tea"));

        assert_eq!(get_product_by_id(&db, &milk.id).await?.unwrap().quantity, 5);
        assert!(get_transactions(&db, None).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_name_is_trimmed() -> Result<()> {
        let db = setup_test_db().await?;
        let milk = create_test_product(&db, "Milk", 5).await?;

        let mut request = sale_request(vec![cart_line(&milk, 1, 1.0)]);
        request.customer_name = Some("  Bat-Erdene ".to_string());
        let sale = complete_sale(&db, request).await?;
        assert_eq!(sale.customer_name.as_deref(), Some("Bat-Erdene"));

        let mut request = sale_request(vec![cart_line(&milk, 1, 1.0)]);
        request.customer_name = Some("   ".to_string());
        let sale = complete_sale(&db, request).await?;
        assert_eq!(sale.customer_name, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_sale_example_from_the_shop_floor() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_product(&db, "A", 5).await?;

        let first = complete_sale(&db, sale_request(vec![cart_line(&a, 3, 100.0)])).await?;
        assert_eq!(first.total_amount, 300.0);
        assert_eq!(get_product_by_id(&db, &a.id).await?.unwrap().quantity, 2);

        let second = complete_sale(&db, sale_request(vec![cart_line(&a, 3, 100.0)])).await;
        assert!(matches!(
            second,
            Err(Error::InsufficientStock { available: 2, .. })
        ));

        crate::core::transaction::reverse_transaction(&db, &first.id, None, true).await?;
        assert_eq!(get_product_by_id(&db, &a.id).await?.unwrap().quantity, 5);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sales_never_oversell() -> Result<()> {
        const STOCK: i64 = 5;
        const PER_SALE: i64 = 2;
        const ATTEMPTS: usize = 8;

        let path = std::env::temp_dir().join(format!("stock_buddy_sales_{}.sqlite", Uuid::new_v4()));
        let db = sea_orm::Database::connect(format!("sqlite://{}?mode=rwc", path.display())).await?;
        crate::config::database::create_tables(&db).await?;
        let milk = create_test_product(&db, "Milk", STOCK).await?;

        let shared_db = std::sync::Arc::new(db);
        let mut handles = Vec::new();
        for _ in 0..ATTEMPTS {
            let db = shared_db.clone();
            let line = cart_line(&milk, PER_SALE, 1.0);
            handles.push(tokio::spawn(async move {
                // Lock contention surfaces as a storage error; retry those like a till would
                for _ in 0..100 {
                    match complete_sale(&db, sale_request(vec![line.clone()])).await {
                        Err(Error::Database(_)) => tokio::task::yield_now().await,
                        other => return other,
                    }
                }
                complete_sale(&db, sale_request(vec![line])).await
            }));
        }

        let mut committed = 0;
        let mut refused = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => committed += 1,
                Err(Error::InsufficientStock { .. }) => refused += 1,
                Err(e) => panic!("unexpected sale error: {e}"),
            }
        }
        let db = std::sync::Arc::try_unwrap(shared_db).expect("all sale tasks joined");

        let expected = usize::try_from(STOCK / PER_SALE).unwrap();
        assert_eq!(committed, expected);
        assert_eq!(refused, ATTEMPTS - expected);

        let remaining = get_product_by_id(&db, &milk.id).await?.unwrap().quantity;
        assert_eq!(remaining, STOCK - PER_SALE * i64::try_from(expected).unwrap());
        assert!(remaining >= 0);
        assert_eq!(get_transactions(&db, None).await?.len(), expected);

        db.close().await?;
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }

        Ok(())
    }
}
