/// Database configuration and connection management
pub mod database;

/// Household configuration (members, categories, rules) loaded from config.toml
pub mod household;
