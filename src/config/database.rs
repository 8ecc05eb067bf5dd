//! Database configuration module for Expense Buddy.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::entities::{
    AuditLog, Category, Contribution, Expense, Installment, Member, NotificationView, Refund,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/expense_buddy.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file when the variable is unset.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(parent) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(parent)?;
    }
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Directory that must exist before `SQLite` can create the database file.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}

/// Creates all tables from the entity definitions, skipping tables that already exist.
///
/// Tables are created parents first so foreign keys resolve.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(Member),
        schema.create_table_from_entity(Category),
        schema.create_table_from_entity(Expense),
        schema.create_table_from_entity(Installment),
        schema.create_table_from_entity(Contribution),
        schema.create_table_from_entity(Refund),
        schema.create_table_from_entity(NotificationView),
        schema.create_table_from_entity(AuditLog),
    ];

    for statement in &mut statements {
        db.execute(builder.build(statement.if_not_exists())).await?;
    }

    info!("Database tables ensured.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        audit_log, category, contribution, expense, installment, member, notification_view,
        refund,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Every table is queryable
        let _: Vec<member::Model> = Member::find().limit(1).all(&db).await?;
        let _: Vec<category::Model> = Category::find().limit(1).all(&db).await?;
        let _: Vec<expense::Model> = Expense::find().limit(1).all(&db).await?;
        let _: Vec<installment::Model> = Installment::find().limit(1).all(&db).await?;
        let _: Vec<contribution::Model> = Contribution::find().limit(1).all(&db).await?;
        let _: Vec<refund::Model> = Refund::find().limit(1).all(&db).await?;
        let _: Vec<notification_view::Model> = NotificationView::find().limit(1).all(&db).await?;
        let _: Vec<audit_log::Model> = AuditLog::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[test]
    fn test_sqlite_parent_dir() {
        assert_eq!(
            sqlite_parent_dir("sqlite://data/expense_buddy.sqlite?mode=rwc"),
            Some(Path::new("data"))
        );
        assert_eq!(sqlite_parent_dir("sqlite://local.sqlite"), None);
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
