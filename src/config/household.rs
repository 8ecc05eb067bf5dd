//! Household configuration loading from config.toml
//!
//! The household is the fixed set of members who split expenses, plus the
//! expense categories offered when creating an expense. Both are seeded into the
//! database on startup. The optional `[rules]` table tunes the notification windows.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Members of the household
    pub members: Vec<MemberConfig>,
    /// Expense categories to seed
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    /// Notification windows
    #[serde(default)]
    pub rules: Rules,
}

/// Configuration for a single member
#[derive(Debug, Deserialize, Clone)]
pub struct MemberConfig {
    /// Discord user ID
    pub id: String,
    /// Name shown in reports
    pub display_name: String,
    /// Optional avatar URL
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Configuration for a single expense category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Category name
    pub name: String,
    /// Optional icon hint
    #[serde(default)]
    pub icon: Option<String>,
    /// Optional colour hint
    #[serde(default)]
    pub color: Option<String>,
}

/// Day windows used by the upcoming/new-expense views
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Rules {
    /// Installments due within this many days are "upcoming"
    pub upcoming_window_days: i64,
    /// Installments due within this many days are flagged urgent
    pub urgent_threshold_days: i64,
    /// Expenses created within this many days are "new"
    pub new_expense_window_days: i64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            upcoming_window_days: 7,
            urgent_threshold_days: 3,
            new_expense_window_days: 3,
        }
    }
}

/// Loads household configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses household configuration from TOML text and checks it is usable.
pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if config.members.is_empty() {
        return Err(Error::Config {
            message: "config.toml must list at least one member".to_string(),
        });
    }

    if config.rules.upcoming_window_days < 0
        || config.rules.urgent_threshold_days < 0
        || config.rules.new_expense_window_days < 0
    {
        return Err(Error::Config {
            message: "Rule windows cannot be negative".to_string(),
        });
    }

    Ok(config)
}

/// Loads household configuration from `CONFIG_PATH`, defaulting to ./config.toml
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_household_config() {
        let toml_str = r##"
            [[members]]
            id = "111"
            display_name = "Ana"

            [[members]]
            id = "222"
            display_name = "Bruno"
            photo_url = "https://example.com/b.png"

            [[categories]]
            name = "Housing"
            icon = "home"
            color = "#10b981"

            [[categories]]
            name = "Utilities"
        "##;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.members.len(), 2);
        assert_eq!(config.members[0].display_name, "Ana");
        assert!(config.members[0].photo_url.is_none());
        assert_eq!(
            config.members[1].photo_url.as_deref(),
            Some("https://example.com/b.png")
        );
        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.categories[0].icon.as_deref(), Some("home"));
        assert!(config.categories[1].color.is_none());
        assert_eq!(config.rules, Rules::default());
    }

    #[test]
    fn test_parse_rules_override() {
        let toml_str = r#"
            [[members]]
            id = "111"
            display_name = "Ana"

            [rules]
            upcoming_window_days = 14
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.rules.upcoming_window_days, 14);
        assert_eq!(config.rules.urgent_threshold_days, 3);
        assert_eq!(config.rules.new_expense_window_days, 3);
    }

    #[test]
    fn test_parse_requires_members() {
        let result = parse_config("members = []");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_parse_rejects_negative_windows() {
        let toml_str = r#"
            [[members]]
            id = "111"
            display_name = "Ana"

            [rules]
            urgent_threshold_days = -1
        "#;
        assert!(matches!(parse_config(toml_str), Err(Error::Config { .. })));
    }
}
