//! Audit log entity - Append-only record of every mutation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of change was made
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum AuditAction {
    /// Rows were inserted
    #[sea_orm(string_value = "create")]
    Create,
    /// Rows were modified
    #[sea_orm(string_value = "update")]
    Update,
    /// Rows were removed or soft-deleted
    #[sea_orm(string_value = "delete")]
    Delete,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(label)
    }
}

/// Audit log database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Member who made the change
    pub user_id: String,
    /// Kind of change
    pub action: AuditAction,
    /// Table the change applies to (e.g., `"expense"`)
    pub entity_type: String,
    /// Id of the changed row
    pub entity_id: i64,
    /// Human-readable summary
    pub description: String,
    /// When the change was made
    pub created_at: DateTimeUtc,
}

/// `AuditLog` has no enforced relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
