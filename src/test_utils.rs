//! Shared test utilities for `ExpenseBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating a small household with sensible defaults.

use crate::{
    core::{
        contribution::{self, NewContribution},
        expense::{self, NewExpense},
    },
    entities::{self, Priority},
    errors::Result,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// First household member
pub const MEMBER_A: &str = "100000000000000001";
/// Second household member
pub const MEMBER_B: &str = "100000000000000002";
/// Third member, seeded only by tests that need it
pub const MEMBER_C: &str = "100000000000000003";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Inserts members whose display name is derived from their id.
pub async fn seed_members(db: &DatabaseConnection, ids: &[&str]) -> Result<()> {
    for id in ids {
        let model = entities::member::ActiveModel {
            id: Set((*id).to_string()),
            display_name: Set(format!("Member {}", &id[id.len().saturating_sub(1)..])),
            photo_url: Set(None),
            created_at: Set(Utc::now()),
        };
        model.insert(db).await?;
    }
    Ok(())
}

/// Creates a category with the given name.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    let model = entities::category::ActiveModel {
        name: Set(name.to_string()),
        icon: Set(None),
        color: Set(None),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Sets up a two-member household with one category.
/// Returns (db, category).
pub async fn setup_household() -> Result<(DatabaseConnection, entities::category::Model)> {
    let db = setup_test_db().await?;
    seed_members(&db, &[MEMBER_A, MEMBER_B]).await?;
    let category = create_test_category(&db, "Housing").await?;
    Ok((db, category))
}

/// Creates a test expense with sensible defaults.
///
/// # Defaults
/// * `title`: "Test expense"
/// * `created_by`: `MEMBER_A`
/// * `priority`: medium
/// * `start_date`: 2025-01-10
/// * no downpayment
pub async fn create_test_expense(
    db: &DatabaseConnection,
    category_id: i64,
    total: Decimal,
    installments: i64,
) -> Result<(entities::expense::Model, Vec<entities::installment::Model>)> {
    expense::create_expense(
        db,
        NewExpense {
            title: "Test expense".to_string(),
            total_amount: total,
            category_id,
            created_by: MEMBER_A.to_string(),
            installments,
            is_fixed: false,
            priority: Priority::Medium,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap_or_default(),
            notes: None,
            down_payment: Decimal::ZERO,
            down_payment_installments: 0,
        },
    )
    .await
}

/// Sets up a complete test environment with an expense split into `installments`.
/// Returns (db, expense, installments) for common test scenarios.
pub async fn setup_with_expense(
    total: Decimal,
    installments: i64,
) -> Result<(
    DatabaseConnection,
    entities::expense::Model,
    Vec<entities::installment::Model>,
)> {
    let (db, category) = setup_household().await?;
    let (expense, installments) =
        create_test_expense(&db, category.id, total, installments).await?;
    Ok((db, expense, installments))
}

/// Records a contribution without notes.
pub async fn pay(
    db: &DatabaseConnection,
    installment_id: i64,
    user_id: &str,
    amount: Decimal,
) -> Result<entities::contribution::Model> {
    contribution::add_contribution(
        db,
        NewContribution {
            installment_id,
            user_id: user_id.to_string(),
            recorded_by: user_id.to_string(),
            amount,
            notes: None,
        },
    )
    .await
}
