//! Notification view entity - A member's acknowledgment of a dashboard notice.
//!
//! Keyed by (user, kind, reference). Dismissing never touches the referenced
//! installment or expense.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of notice being dismissed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum NotificationKind {
    /// Installment due within the upcoming window; reference is an installment id
    #[sea_orm(string_value = "upcoming_payment")]
    UpcomingPayment,
    /// Recently created expense; reference is an expense id
    #[sea_orm(string_value = "new_expense")]
    NewExpense,
}

/// Notification view database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification_views")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Member who dismissed the notice
    pub user_id: String,
    /// Kind of notice
    pub kind: NotificationKind,
    /// Installment or expense id, depending on `kind`
    pub reference_id: i64,
    /// When the notice was dismissed
    pub viewed_at: DateTimeUtc,
}

/// `NotificationView` has no enforced relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
