//! Installment entity - One scheduled slice of an expense.
//!
//! Status is derived from the installment's contributions and persisted so
//! list views can filter on it. Edit and reopen metadata are kept for audit.

use crate::core::money;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment status of an installment
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum InstallmentStatus {
    /// No contributions
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Contributions exist but sum below the amount
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Contributions cover the amount
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
        };
        f.write_str(label)
    }
}

/// Installment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "installment_payments")]
pub struct Model {
    /// Unique identifier for the installment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning expense
    pub expense_id: i64,
    /// 1-based sequence number, unique within the expense
    pub installment_number: i32,
    /// Amount due in cents
    pub amount_cents: i64,
    /// Calendar due date
    pub due_date: Date,
    /// Derived payment status
    pub status: InstallmentStatus,
    /// Whether this slice belongs to the downpayment
    pub is_down_payment: bool,
    /// Amount before the first manual edit
    pub original_amount_cents: Option<i64>,
    /// Due date before the first manual edit
    pub original_due_date: Option<Date>,
    /// Member who last edited the installment
    pub edited_by: Option<String>,
    /// When the installment was last edited
    pub edited_at: Option<DateTimeUtc>,
    /// How many times the installment was reopened
    pub times_reopened: i32,
    /// Member who last reopened the installment
    pub reopened_by: Option<String>,
    /// Reason given on the last reopen
    pub reopening_reason: Option<String>,
    /// When the installment was last reopened
    pub reopened_at: Option<DateTimeUtc>,
    /// When the installment was generated
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Amount due as an exact decimal
    #[must_use]
    pub fn amount(&self) -> Decimal {
        money::from_cents(self.amount_cents)
    }
}

/// Defines relationships between Installment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each installment belongs to one expense
    #[sea_orm(
        belongs_to = "super::expense::Entity",
        from = "Column::ExpenseId",
        to = "super::expense::Column::Id"
    )]
    Expense,
    /// One installment has many contributions
    #[sea_orm(has_many = "super::contribution::Entity")]
    Contributions,
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expense.def()
    }
}

impl Related<super::contribution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
