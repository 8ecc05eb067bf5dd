//! Expense entity - A shared purchase or recurring obligation.
//!
//! Each expense is split into installments at creation time. Deleting an expense
//! only flags it (`deleted_at`, `deleted_by`, `deletion_reason`); flagged rows are
//! excluded from every active view and aggregation.

use crate::core::money;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Urgency attached to an expense, ordered from least to most urgent
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Priority {
    /// Can wait
    #[sea_orm(string_value = "low")]
    Low,
    /// Default priority
    #[sea_orm(string_value = "medium")]
    Medium,
    /// Should be handled soon
    #[sea_orm(string_value = "high")]
    High,
    /// Needs attention now
    #[sea_orm(string_value = "urgent")]
    Urgent,
}

impl Priority {
    /// Lowercase label as stored in the database
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// Lifecycle status of an expense
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ExpenseStatus {
    /// At least one installment is not fully paid
    #[sea_orm(string_value = "active")]
    Active,
    /// Every installment is paid
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Expense database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short title (e.g., "Air conditioner")
    pub title: String,
    /// Total amount in cents, downpayment included
    pub total_amount_cents: i64,
    /// Category this expense is reported under
    pub category_id: i64,
    /// Member who created the expense
    pub created_by: String,
    /// Number of regular (non-downpayment) installments
    pub installments: i32,
    /// Fixed/recurring obligation flag
    pub is_fixed: bool,
    /// Urgency
    pub priority: Priority,
    /// Due date of the first installment
    pub start_date: Date,
    /// Optional free-form notes
    pub notes: Option<String>,
    /// Lifecycle status
    pub status: ExpenseStatus,
    /// Downpayment in cents, zero when none
    pub down_payment_cents: i64,
    /// Number of downpayment installments, zero when none
    pub down_payment_installments: i32,
    /// When the expense was created
    pub created_at: DateTimeUtc,
    /// When the expense was last modified
    pub updated_at: DateTimeUtc,
    /// Soft delete timestamp
    pub deleted_at: Option<DateTimeUtc>,
    /// Member who deleted the expense
    pub deleted_by: Option<String>,
    /// Mandatory explanation recorded on delete
    pub deletion_reason: Option<String>,
}

impl Model {
    /// Total amount as an exact decimal
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        money::from_cents(self.total_amount_cents)
    }

    /// Downpayment as an exact decimal
    #[must_use]
    pub fn down_payment(&self) -> Decimal {
        money::from_cents(self.down_payment_cents)
    }

    /// Whether the expense has been soft-deleted
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One expense has many installments
    #[sea_orm(has_many = "super::installment::Entity")]
    Installments,
    /// Each expense belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::installment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Installments.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
