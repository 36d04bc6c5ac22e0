//! Product categories.
//!
//! The category set is fixed. Products store the lowercase key; analytics and the
//! bot show the display label.

use crate::errors::{Error, Result};
use serde::Serialize;
use std::fmt;

/// One of the shop's fixed product categories.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Groceries and packaged food
    Food,
    /// Drinks
    Beverage,
    /// Electrical goods
    Electronics,
    /// Clothing
    Clothing,
    /// Household goods
    Household,
    /// Cosmetics and beauty products
    Cosmetics,
    /// Medicine
    Medicine,
    /// Stationery
    Stationery,
    /// Anything else
    #[default]
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 9] = [
        Self::Food,
        Self::Beverage,
        Self::Electronics,
        Self::Clothing,
        Self::Household,
        Self::Cosmetics,
        Self::Medicine,
        Self::Stationery,
        Self::Other,
    ];

    /// Storage key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Beverage => "beverage",
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Household => "household",
            Self::Cosmetics => "cosmetics",
            Self::Medicine => "medicine",
            Self::Stationery => "stationery",
            Self::Other => "other",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Beverage => "Beverages",
            Self::Electronics => "Electronics",
            Self::Clothing => "Clothing",
            Self::Household => "Household goods",
            Self::Cosmetics => "Cosmetics",
            Self::Medicine => "Medicine",
            Self::Stationery => "Stationery",
            Self::Other => "Other",
        }
    }

    /// Looks a category up by key, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.key().eq_ignore_ascii_case(key))
    }

    /// Parses user input into a category, reporting unknown keys as a validation error.
    pub fn parse(input: &str) -> Result<Self> {
        Self::from_key(input).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|c| c.key()).collect();
            Error::validation(
                "category",
                format!("unknown category '{}' (expected one of: {})", input.trim(), known.join(", ")),
            )
        })
    }

    /// Display label for a stored key; unknown keys are shown as-is.
    #[must_use]
    pub fn label_for_key(key: &str) -> String {
        Self::from_key(key).map_or_else(|| key.to_string(), |c| c.label().to_string())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_key(category.key()), Some(category));
        }
    }

    #[test]
    fn test_from_key_is_lenient() {
        assert_eq!(Category::from_key("  Beverage "), Some(Category::Beverage));
        assert_eq!(Category::from_key("toys"), None);
    }

    #[test]
    fn test_parse_unknown_is_validation_error() {
        let err = Category::parse("toys").unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "category"));
    }

    #[test]
    fn test_label_for_unknown_key_falls_back_to_key() {
        assert_eq!(Category::label_for_key("medicine"), "Medicine");
        assert_eq!(Category::label_for_key("legacy"), "legacy");
    }

    #[test]
    fn test_default_is_other() {
        assert_eq!(Category::default(), Category::Other);
    }
}
