/// Sales analytics built from the transaction and product ledgers
pub mod analytics;
/// Cart validation and stock checks, free of storage access
pub mod cart;
/// Fixed product categories
pub mod category;
/// Product ledger - stock intake, lookups and atomic quantity changes
pub mod product;
/// Plain-text formatting of ledger records
pub mod report;
/// Sale workflow
pub mod sale;
/// Transaction ledger and the reversal workflow
pub mod transaction;
