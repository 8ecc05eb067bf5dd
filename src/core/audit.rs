//! Audit log business logic.
//!
//! Every mutation in `core` appends one entry through [`record`] on the same
//! connection or transaction as the change itself, so a rolled-back change leaves
//! no log behind.

use crate::{
    entities::{AuditAction, AuditLog, audit_log},
    errors::Result,
};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};

/// One audit entry to append
#[derive(Debug, Clone)]
pub struct AuditEntry<'a> {
    /// Member who made the change
    pub user_id: &'a str,
    /// Kind of change
    pub action: AuditAction,
    /// Table the change applies to
    pub entity_type: &'static str,
    /// Id of the changed row
    pub entity_id: i64,
    /// Human-readable summary
    pub description: String,
}

/// Appends an audit entry.
pub async fn record<C>(db: &C, entry: AuditEntry<'_>) -> Result<audit_log::Model>
where
    C: ConnectionTrait,
{
    let model = audit_log::ActiveModel {
        user_id: Set(entry.user_id.to_string()),
        action: Set(entry.action),
        entity_type: Set(entry.entity_type.to_string()),
        entity_id: Set(entry.entity_id),
        description: Set(entry.description),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Lists audit entries newest first, optionally restricted to one action.
pub async fn list_audit_logs(
    db: &DatabaseConnection,
    action: Option<AuditAction>,
    limit: u64,
) -> Result<Vec<audit_log::Model>> {
    let mut query = AuditLog::find();
    if let Some(action) = action {
        query = query.filter(audit_log::Column::Action.eq(action));
    }

    query
        .order_by_desc(audit_log::Column::CreatedAt)
        .order_by_desc(audit_log::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_record_and_list_newest_first() -> Result<()> {
        let db = setup_test_db().await?;

        for (action, id) in [
            (AuditAction::Create, 1),
            (AuditAction::Update, 1),
            (AuditAction::Delete, 1),
        ] {
            record(
                &db,
                AuditEntry {
                    user_id: "user1",
                    action,
                    entity_type: "expense",
                    entity_id: id,
                    description: format!("{action} expense"),
                },
            )
            .await?;
        }

        let all = list_audit_logs(&db, None, 10).await?;
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].action, AuditAction::Delete);
        assert_eq!(all[2].action, AuditAction::Create);

        let deletes = list_audit_logs(&db, Some(AuditAction::Delete), 10).await?;
        assert_eq!(deletes.len(), 1);
        assert_eq!(deletes[0].description, "delete expense");

        let limited = list_audit_logs(&db, None, 2).await?;
        assert_eq!(limited.len(), 2);

        Ok(())
    }
}
