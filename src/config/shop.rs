//! Shop configuration loading from config.toml
//!
//! The config file names the shop, its timezone offset (used to decide which
//! sales belong to "today"), whether staff share one inventory, and the staff
//! directory that maps Discord accounts to operator usernames.

use crate::config::staff::StaffMember;
use crate::errors::{Error, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// General shop settings
    #[serde(default)]
    pub shop: ShopSettings,
    /// Staff accounts allowed to use the ledger commands
    #[serde(default)]
    pub staff: Vec<StaffMember>,
}

/// Settings under the `[shop]` table
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ShopSettings {
    /// Display name used in embeds
    pub name: String,
    /// Offset from UTC, in whole hours, of the shop's local calendar day
    pub utc_offset_hours: i32,
    /// When false, each operator only sees the products and sales they created
    pub shared_inventory: bool,
    /// Symbol printed in front of amounts
    pub currency_symbol: String,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            name: "StockBuddy".to_string(),
            utc_offset_hours: 0,
            shared_inventory: false,
            currency_symbol: "$".to_string(),
        }
    }
}

impl ShopSettings {
    /// The shop's local offset as a `chrono` timezone.
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).ok_or_else(|| Error::Config {
            message: format!("utc_offset_hours out of range: {}", self.utc_offset_hours),
        })
    }

    /// Owner filter to apply to reads on behalf of `operator`.
    ///
    /// `None` means every operator sees the whole ledger.
    #[must_use]
    pub fn scope_for<'a>(&self, operator: &'a str) -> Option<&'a str> {
        if self.shared_inventory {
            None
        } else {
            Some(operator)
        }
    }
}

/// Loads the shop configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - The UTC offset is out of range
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses and checks configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.shop.utc_offset()?;
    Ok(config)
}

/// Loads the configuration from `STOCK_BUDDY_CONFIG`, or `./config.toml` when unset.
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var("STOCK_BUDDY_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_shop_config() {
        let toml_str = r#"
            [shop]
            name = "Corner Shop"
            utc_offset_hours = 8
            shared_inventory = true
            currency_symbol = "₮"

            [[staff]]
            discord_id = "1001"
            username = "admin1"

            [[staff]]
            discord_id = "1002"
            username = "admin2"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.shop.name, "Corner Shop");
        assert_eq!(config.shop.utc_offset_hours, 8);
        assert!(config.shop.shared_inventory);
        assert_eq!(config.staff.len(), 2);
        assert_eq!(config.staff[1].username, "admin2");
        assert_eq!(
            config.shop.utc_offset().unwrap(),
            FixedOffset::east_opt(8 * 3600).unwrap()
        );
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.shop.utc_offset_hours, 0);
        assert!(!config.shop.shared_inventory);
        assert!(config.staff.is_empty());
    }

    #[test]
    fn test_out_of_range_offset_is_rejected() {
        let result = parse_config("[shop]\nutc_offset_hours = 30\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_scope_for_follows_shared_inventory() {
        let mut shop = ShopSettings::default();
        assert_eq!(shop.scope_for("admin1"), Some("admin1"));
        shop.shared_inventory = true;
        assert_eq!(shop.scope_for("admin1"), None);
    }
}
