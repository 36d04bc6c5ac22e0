//! Unified error type for `StockBuddy`.
//!
//! Core ledger and workflow functions report every failure through [`Error`]; the
//! bot layer decides which variants are shown to staff verbatim (see
//! [`Error::is_user_error`]) and which are logged as internal failures.

use thiserror::Error;

/// All errors produced by the core, configuration and bot layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input; `field` names the offending field (e.g. `items[1].quantity`).
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Human-readable reason
        reason: String,
    },

    /// A referenced product does not exist.
    #[error("Product not found: {name}")]
    ProductNotFound {
        /// Product name (or id when no name is known)
        name: String,
    },

    /// A referenced transaction does not exist (or is not visible to the operator).
    #[error("Transaction not found: {id}")]
    TransactionNotFound {
        /// Transaction id as supplied by the caller
        id: String,
    },

    /// A sale asked for more units than are on hand.
    #[error("Insufficient stock for {name}: {available} available, {requested} requested")]
    InsufficientStock {
        /// Product name
        name: String,
        /// Units currently on hand
        available: i64,
        /// Units the cart asked for (aggregated across lines)
        requested: i64,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// The storage collaborator failed.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable is missing or not unicode.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error.
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error is caused by the caller's input or the current ledger state,
    /// as opposed to an internal failure. User errors are safe to show as-is.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::ProductNotFound { .. }
                | Self::TransactionNotFound { .. }
                | Self::InsufficientStock { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors_are_classified() {
        assert!(Error::validation("items", "cart is empty").is_user_error());
        assert!(
            Error::InsufficientStock {
                name: "Milk".to_string(),
                available: 2,
                requested: 3,
            }
            .is_user_error()
        );
        assert!(!Error::Config {
            message: "missing".to_string()
        }
        .is_user_error());
        assert!(!Error::Database(sea_orm::DbErr::Custom("boom".to_string())).is_user_error());
    }

    #[test]
    fn test_insufficient_stock_message_reports_available() {
        let err = Error::InsufficientStock {
            name: "Milk".to_string(),
            available: 2,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Milk: 2 available, 3 requested"
        );
    }
}
