//! Contribution entity - A member paying (part of) one installment.
//!
//! Rows are removed by a refund or when their installment is reopened; the sum of
//! the remaining rows determines the installment status.

use crate::core::money;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contribution database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_contributions")]
pub struct Model {
    /// Unique identifier for the contribution
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Installment being paid
    pub installment_id: i64,
    /// Member who paid
    pub user_id: String,
    /// Amount paid in cents, always positive
    pub amount_cents: i64,
    /// Optional note (e.g., bulk settlement marker)
    pub notes: Option<String>,
    /// When the payment was recorded
    pub paid_at: DateTimeUtc,
}

impl Model {
    /// Amount paid as an exact decimal
    #[must_use]
    pub fn amount(&self) -> Decimal {
        money::from_cents(self.amount_cents)
    }
}

/// Defines relationships between Contribution and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each contribution belongs to one installment
    #[sea_orm(
        belongs_to = "super::installment::Entity",
        from = "Column::InstallmentId",
        to = "super::installment::Column::Id"
    )]
    Installment,
}

impl Related<super::installment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Installment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
