//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Analytics command
pub mod analytics;

/// General utility commands
pub mod general;

/// Sale command
pub mod sale;

/// Stock management commands
pub mod stock;

/// Transaction history and void commands
pub mod transaction;

// Export commands
pub use analytics::*;
pub use general::*;
pub use sale::*;
pub use stock::*;
pub use transaction::*;
