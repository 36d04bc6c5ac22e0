//! Sales analytics.
//!
//! [`build_analytics`] is a pure fold over the transaction and product ledgers;
//! [`generate_analytics`] loads both and calls it. Nothing here writes.

use crate::{
    core::{category::Category, product as product_ledger, transaction as transaction_ledger},
    entities::{product, transaction},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Number of entries kept in [`Analytics::top_products`].
pub const TOP_PRODUCTS_LIMIT: usize = 10;

/// Number of most recent days kept in [`Analytics::sales_by_day`].
pub const SALES_BY_DAY_LIMIT: usize = 30;

/// Headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Sum of all transaction totals
    pub total_revenue: f64,
    /// Number of transactions
    pub total_transactions: usize,
    /// Number of products
    pub total_products: usize,
    /// Number of products at or below their threshold
    pub low_stock_count: usize,
}

/// Cumulative sales of one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    /// Product name as first seen in the ledger
    pub name: String,
    /// Units sold
    pub quantity: i64,
    /// Revenue from those units
    pub revenue: f64,
}

/// Revenue of one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySales {
    /// The day
    pub date: NaiveDate,
    /// Sum of the day's transaction totals
    pub amount: f64,
}

/// Revenue of one product category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySales {
    /// Display label of the category
    pub category: String,
    /// Sum of line-item revenue in the category
    pub amount: f64,
}

/// Everything the analytics view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    /// Headline numbers
    pub summary: Summary,
    /// Best sellers by revenue, at most [`TOP_PRODUCTS_LIMIT`]
    pub top_products: Vec<ProductSales>,
    /// Daily revenue, oldest first, at most [`SALES_BY_DAY_LIMIT`] most recent days
    pub sales_by_day: Vec<DailySales>,
    /// Revenue per category, highest first
    pub sales_by_category: Vec<CategorySales>,
}

/// Folds the ledgers into [`Analytics`].
///
/// `products` feeds the summary counts. `catalog` is the whole shop's product
/// list and is only used to resolve line-item categories, since a sale may sell
/// a product owned by someone else. Line items whose product is gone count as
/// "other".
///
/// Ties in `top_products` and `sales_by_category` keep the order in which the
/// product or category was first encountered.
#[must_use]
pub fn build_analytics(
    transactions: &[transaction::Model],
    products: &[product::Model],
    catalog: &[product::Model],
) -> Analytics {
    let summary = Summary {
        total_revenue: transactions.iter().map(|t| t.total_amount).sum(),
        total_transactions: transactions.len(),
        total_products: products.len(),
        low_stock_count: products
            .iter()
            .filter(|p| product_ledger::is_low_stock(p))
            .count(),
    };

    Analytics {
        summary,
        top_products: top_products(transactions),
        sales_by_day: sales_by_day(transactions),
        sales_by_category: sales_by_category(transactions, catalog),
    }
}

fn top_products(transactions: &[transaction::Model]) -> Vec<ProductSales> {
    let mut sales: Vec<ProductSales> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for item in transactions.iter().flat_map(|t| t.items.iter()) {
        let position = *positions
            .entry(item.product_id.as_str())
            .or_insert_with(|| {
                sales.push(ProductSales {
                    name: item.product_name.clone(),
                    quantity: 0,
                    revenue: 0.0,
                });
                sales.len() - 1
            });
        if let Some(entry) = sales.get_mut(position) {
            entry.quantity += item.quantity;
            entry.revenue += item.subtotal();
        }
    }

    // `sort_by` is stable, so ties stay in first-encountered order
    sales.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    sales.truncate(TOP_PRODUCTS_LIMIT);
    sales
}

fn sales_by_day(transactions: &[transaction::Model]) -> Vec<DailySales> {
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for t in transactions {
        *daily.entry(t.created_at.date_naive()).or_insert(0.0) += t.total_amount;
    }

    let skip = daily.len().saturating_sub(SALES_BY_DAY_LIMIT);
    daily
        .into_iter()
        .skip(skip)
        .map(|(date, amount)| DailySales { date, amount })
        .collect()
}

fn sales_by_category(
    transactions: &[transaction::Model],
    catalog: &[product::Model],
) -> Vec<CategorySales> {
    let categories: HashMap<&str, &str> = catalog
        .iter()
        .map(|p| (p.id.as_str(), p.category.as_str()))
        .collect();

    let mut totals: Vec<(&str, f64)> = Vec::new();
    for item in transactions.iter().flat_map(|t| t.items.iter()) {
        let key = categories
            .get(item.product_id.as_str())
            .copied()
            .unwrap_or(Category::Other.key());
        match totals.iter_mut().find(|(k, _)| *k == key) {
            Some((_, amount)) => *amount += item.subtotal(),
            None => totals.push((key, item.subtotal())),
        }
    }

    let mut sales: Vec<CategorySales> = totals
        .into_iter()
        .map(|(key, amount)| CategorySales {
            category: Category::label_for_key(key),
            amount,
        })
        .collect();
    sales.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    sales
}

/// Loads the ledgers (optionally limited to one owner) and builds [`Analytics`].
///
/// Categories are always resolved against every product in the shop.
pub async fn generate_analytics<C>(db: &C, owner: Option<&str>) -> Result<Analytics>
where
    C: ConnectionTrait,
{
    let transactions = transaction_ledger::get_transactions(db, owner).await?;
    let catalog = product_ledger::get_all_products(db, None).await?;
    let products: Vec<product::Model> = match owner {
        Some(owner) => catalog
            .iter()
            .filter(|p| p.created_by == owner)
            .cloned()
            .collect(),
        None => catalog.clone(),
    };
    Ok(build_analytics(&transactions, &products, &catalog))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::sale::complete_sale,
        entities::{LineItem, LineItems},
        test_utils::*,
    };
    use chrono::{TimeZone, Utc};

    fn product(id: &str, name: &str, quantity: i64, category: &str) -> product::Model {
        let now = Utc::now();
        product::Model {
            id: id.to_string(),
            name: name.to_string(),
            quantity,
            category: category.to_string(),
            low_stock_threshold: 10,
            barcode: None,
            created_by: "admin1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn sale(id: &str, day: u32, lines: &[(&str, &str, i64, f64)]) -> transaction::Model {
        let items: Vec<LineItem> = lines
            .iter()
            .map(|(product_id, name, quantity, price)| LineItem {
                product_id: (*product_id).to_string(),
                product_name: (*name).to_string(),
                quantity: *quantity,
                price: *price,
            })
            .collect();
        let total_amount = crate::core::cart::cart_total(&items);
        transaction::Model {
            id: id.to_string(),
            items: LineItems(items),
            total_amount,
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            created_by: "admin1".to_string(),
            customer_name: None,
        }
    }

    #[test]
    fn test_empty_ledgers() {
        let analytics = build_analytics(&[], &[], &[]);
        assert_eq!(analytics.summary.total_revenue, 0.0);
        assert_eq!(analytics.summary.total_transactions, 0);
        assert!(analytics.top_products.is_empty());
        assert!(analytics.sales_by_day.is_empty());
        assert!(analytics.sales_by_category.is_empty());
    }

    #[test]
    fn test_summary() {
        let products = vec![
            product("a", "Milk", 2, "food"),
            product("b", "Cola", 50, "beverage"),
        ];
        let transactions = vec![
            sale("t1", 1, &[("a", "Milk", 3, 100.0)]),
            sale("t2", 2, &[("b", "Cola", 1, 5.0)]),
        ];

        let summary = build_analytics(&transactions, &products, &products).summary;
        assert_eq!(summary.total_revenue, 305.0);
        assert_eq!(summary.total_transactions, 2);
        assert_eq!(summary.total_products, 2);
        assert_eq!(summary.low_stock_count, 1);
    }

    #[test]
    fn test_top_products_sorted_by_revenue_with_stable_ties() {
        let transactions = vec![
            sale("t1", 1, &[("a", "Milk", 1, 10.0), ("b", "Bread", 2, 10.0)]),
            sale("t2", 2, &[("c", "Cola", 1, 50.0), ("a", "Milk renamed", 1, 10.0)]),
        ];

        let top = build_analytics(&transactions, &[], &[]).top_products;
        let names: Vec<&str> = top.iter().map(|p| p.name.as_str()).collect();
        // Milk and Bread tie on 20 and stay in first-seen order; first snapshot name wins
        assert_eq!(names, vec!["Cola", "Milk", "Bread"]);
        assert_eq!(top[1].quantity, 2);
        assert_eq!(top[1].revenue, 20.0);
    }

    #[test]
    fn test_top_products_truncated() {
        let transactions: Vec<transaction::Model> = (0..12_u32)
            .map(|i| {
                let id = format!("p{i}");
                sale(&format!("t{i}"), 1, &[(id.as_str(), "Thing", 1, f64::from(i))])
            })
            .collect();

        let top = build_analytics(&transactions, &[], &[]).top_products;
        assert_eq!(top.len(), TOP_PRODUCTS_LIMIT);
        assert_eq!(top[0].revenue, 11.0);
    }

    #[test]
    fn test_sales_by_day_ascending_and_limited() {
        let mut transactions: Vec<transaction::Model> = (1..=31_u32)
            .rev()
            .map(|day| sale(&format!("t{day}"), day, &[("a", "Milk", 1, 1.0)]))
            .collect();
        transactions.push(sale("extra", 31, &[("a", "Milk", 2, 1.0)]));

        let days = build_analytics(&transactions, &[], &[]).sales_by_day;
        assert_eq!(days.len(), SALES_BY_DAY_LIMIT);
        assert!(days.windows(2).all(|w| w[0].date < w[1].date));
        // The oldest day was dropped
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(days[29].amount, 3.0);
    }

    #[test]
    fn test_sales_by_category_uses_current_products_and_labels() {
        let products = vec![
            product("a", "Milk", 5, "food"),
            product("b", "Cola", 5, "beverage"),
        ];
        let transactions = vec![sale(
            "t1",
            1,
            &[
                ("a", "Milk", 1, 10.0),
                ("b", "Cola", 2, 20.0),
                ("gone", "Old stock", 1, 5.0),
            ],
        )];

        let categories = build_analytics(&transactions, &products, &products).sales_by_category;
        assert_eq!(
            categories,
            vec![
                CategorySales {
                    category: "Beverages".to_string(),
                    amount: 40.0,
                },
                CategorySales {
                    category: "Food".to_string(),
                    amount: 10.0,
                },
                CategorySales {
                    category: "Other".to_string(),
                    amount: 5.0,
                },
            ]
        );
    }

    #[test]
    fn test_build_analytics_is_deterministic() {
        let products = vec![product("a", "Milk", 5, "food"), product("b", "Cola", 5, "beverage")];
        let transactions = vec![
            sale("t1", 3, &[("a", "Milk", 1, 10.0), ("b", "Cola", 1, 10.0)]),
            sale("t2", 1, &[("b", "Cola", 1, 10.0), ("a", "Milk", 1, 10.0)]),
        ];

        let first = build_analytics(&transactions, &products, &products);
        let second = build_analytics(&transactions, &products, &products);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_generate_analytics_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let milk = create_test_product(&db, "Milk", 5).await?;
        let cola = create_test_product(&db, "Cola", 30).await?;

        complete_sale(
            &db,
            sale_request(vec![cart_line(&milk, 3, 100.0), cart_line(&cola, 2, 5.0)]),
        )
        .await?;

        let analytics = generate_analytics(&db, None).await?;
        assert_eq!(analytics.summary.total_revenue, 310.0);
        assert_eq!(analytics.summary.total_transactions, 1);
        assert_eq!(analytics.summary.total_products, 2);
        // Milk now has 2 left against a threshold of 10
        assert_eq!(analytics.summary.low_stock_count, 1);
        assert_eq!(analytics.top_products[0].name, "Milk");
        assert_eq!(analytics.sales_by_day.len(), 1);

        // Another owner sees nothing
        let scoped = generate_analytics(&db, Some("admin2")).await?;
        assert_eq!(scoped.summary.total_transactions, 0);
        assert_eq!(scoped.summary.total_products, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_categories_resolve_products_owned_by_others() -> Result<()> {
        let db = setup_test_db().await?;
        let cola = create_custom_product(
            &db,
            "Cola",
            10,
            Category::Beverage,
            Some("111"),
            "admin2",
        )
        .await?;

        let mut request = sale_request(vec![cart_line(&cola, 2, 5.0)]);
        request.operator = "admin1".to_string();
        complete_sale(&db, request).await?;

        let analytics = generate_analytics(&db, Some("admin1")).await?;
        assert_eq!(analytics.summary.total_revenue, 10.0);
        assert_eq!(
            analytics.sales_by_category,
            vec![CategorySales {
                category: "Beverages".to_string(),
                amount: 10.0,
            }]
        );
        // Counts stay limited to admin1's own products
        assert_eq!(analytics.summary.total_products, 0);
        assert_eq!(analytics.summary.low_stock_count, 0);

        let owner_view = generate_analytics(&db, Some("admin2")).await?;
        assert_eq!(owner_view.summary.total_transactions, 0);
        assert_eq!(owner_view.summary.total_products, 1);

        Ok(())
    }
}
