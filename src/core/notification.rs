//! Per-member dismissal of dashboard notices.
//!
//! A dismissal only hides a notice for the member who dismissed it. It never
//! changes the underlying installment or expense.

use crate::{
    entities::{NotificationKind, NotificationView, notification_view},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use std::collections::HashSet;

/// Notices a member has dismissed, keyed by kind and reference id
pub type Dismissed = HashSet<(NotificationKind, i64)>;

/// Marks a notice as seen. Returns `false` if it was already dismissed.
pub async fn dismiss(
    db: &DatabaseConnection,
    user_id: &str,
    kind: NotificationKind,
    reference_id: i64,
) -> Result<bool> {
    let existing = NotificationView::find()
        .filter(notification_view::Column::UserId.eq(user_id))
        .filter(notification_view::Column::Kind.eq(kind))
        .filter(notification_view::Column::ReferenceId.eq(reference_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    let view = notification_view::ActiveModel {
        user_id: Set(user_id.to_string()),
        kind: Set(kind),
        reference_id: Set(reference_id),
        viewed_at: Set(Utc::now()),
        ..Default::default()
    };
    view.insert(db).await?;
    Ok(true)
}

/// Loads everything a member has dismissed.
pub async fn dismissed_for(db: &DatabaseConnection, user_id: &str) -> Result<Dismissed> {
    let views = NotificationView::find()
        .filter(notification_view::Column::UserId.eq(user_id))
        .all(db)
        .await?;

    Ok(views
        .into_iter()
        .map(|view| (view.kind, view.reference_id))
        .collect())
}
