//! Refund entity - Log of contributions that were reverted.
//!
//! The refunded contribution row itself is deleted, so this table keeps plain
//! ids rather than foreign keys.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Refund database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_refunds")]
pub struct Model {
    /// Unique identifier for the refund
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Id of the deleted contribution
    pub contribution_id: i64,
    /// Installment the contribution was paid against
    pub installment_id: i64,
    /// Member whose payment was refunded
    pub contributor_id: String,
    /// Member who performed the refund
    pub refunded_by: String,
    /// Mandatory explanation
    pub refund_reason: String,
    /// Refunded amount in cents
    pub refund_amount_cents: i64,
    /// When the refund happened
    pub refunded_at: DateTimeUtc,
}

/// `Refund` has no enforced relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
