//! Contribution business logic - recording payments toward installments and refunding them.
//!
//! Three ways to pay: a single member paying any amount, everyone paying an equal
//! share of one installment, and a bulk settlement that splits several
//! installments across a chosen set of payers. Every path inserts its rows,
//! re-derives the affected installment statuses from a fresh read and syncs the
//! owning expenses, all in one transaction.

use crate::{
    core::{
        audit::{self, AuditEntry},
        expense,
        installment::{self, find_live_installment},
        money,
    },
    entities::{
        AuditAction, Contribution, InstallmentStatus, Member, contribution, member, refund,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::{collections::BTreeSet, fmt::Write};
use tracing::{info, instrument};

/// Minimum reason length for a refund
pub const MIN_REFUND_REASON_LEN: usize = 1;

/// A single payment toward one installment
#[derive(Debug, Clone)]
pub struct NewContribution {
    /// Installment being paid
    pub installment_id: i64,
    /// Paying member
    pub user_id: String,
    /// Member registering the payment, usually the payer
    pub recorded_by: String,
    /// Amount paid, must be positive
    pub amount: Decimal,
    /// Optional note
    pub notes: Option<String>,
}

/// Several installments settled together by a set of payers
#[derive(Debug, Clone)]
pub struct BulkSettlement {
    /// Installments to settle
    pub installment_ids: Vec<i64>,
    /// Members sharing the cost
    pub payer_ids: Vec<String>,
    /// Member registering the settlement
    pub recorded_by: String,
}

fn clean_notes(notes: Option<String>) -> Option<String> {
    notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

async fn ensure_member<C>(db: &C, user_id: &str) -> Result<member::Model>
where
    C: ConnectionTrait,
{
    Member::find_by_id(user_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            id: user_id.to_string(),
        })
}

async fn insert_contribution<C>(
    db: &C,
    installment_id: i64,
    user_id: &str,
    amount_cents: i64,
    notes: Option<String>,
) -> Result<contribution::Model>
where
    C: ConnectionTrait,
{
    let model = contribution::ActiveModel {
        installment_id: Set(installment_id),
        user_id: Set(user_id.to_string()),
        amount_cents: Set(amount_cents),
        notes: Set(notes),
        paid_at: Set(Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Lists the contributions recorded against an installment, oldest first.
pub async fn get_contributions_for_installment(
    db: &DatabaseConnection,
    installment_id: i64,
) -> Result<Vec<contribution::Model>> {
    Contribution::find()
        .filter(contribution::Column::InstallmentId.eq(installment_id))
        .order_by_asc(contribution::Column::PaidAt)
        .order_by_asc(contribution::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Records one member's payment toward an installment.
///
/// Overpaying is allowed; the installment is simply `paid`. Any member may record a
/// payment made by another; the audit entry then names both.
#[instrument(skip(db, new_contribution), fields(installment_id = new_contribution.installment_id))]
pub async fn add_contribution(
    db: &DatabaseConnection,
    new_contribution: NewContribution,
) -> Result<contribution::Model> {
    let amount_cents = money::to_positive_cents(new_contribution.amount)?;

    let txn = db.begin().await?;

    let (installment, expense) =
        find_live_installment(&txn, new_contribution.installment_id).await?;
    let payer = ensure_member(&txn, &new_contribution.user_id).await?;
    if new_contribution.recorded_by != payer.id {
        ensure_member(&txn, &new_contribution.recorded_by).await?;
    }

    let created = insert_contribution(
        &txn,
        installment.id,
        &new_contribution.user_id,
        amount_cents,
        clean_notes(new_contribution.notes),
    )
    .await?;

    let updated = installment::recompute_status(&txn, installment.id).await?;
    expense::sync_expense_status(&txn, expense.id).await?;

    let mut description = format!(
        "Paid {} toward installment {} of '{}' (now {})",
        created.amount(),
        installment.installment_number,
        expense.title,
        updated.status
    );
    if payer.id != new_contribution.recorded_by {
        write!(&mut description, " on behalf of {}", payer.display_name)?;
    }

    audit::record(
        &txn,
        AuditEntry {
            user_id: &new_contribution.recorded_by,
            action: AuditAction::Create,
            entity_type: "contribution",
            entity_id: created.id,
            description,
        },
    )
    .await?;

    txn.commit().await?;
    Ok(created)
}

/// Records that every member paid an equal share of one installment.
///
/// The installment amount is split evenly across all members ordered by id, with
/// the cent remainder going to the last one. Zero-cent shares are skipped.
#[instrument(skip(db, notes))]
pub async fn pay_equally(
    db: &DatabaseConnection,
    installment_id: i64,
    recorded_by: &str,
    notes: Option<String>,
) -> Result<Vec<contribution::Model>> {
    let notes = clean_notes(notes);

    let txn = db.begin().await?;

    let (installment, expense) = find_live_installment(&txn, installment_id).await?;
    let members = Member::find()
        .order_by_asc(member::Column::Id)
        .all(&txn)
        .await?;
    if members.is_empty() {
        return Err(Error::NoMembers);
    }

    let shares = money::split_evenly(installment.amount_cents, members.len());
    let mut created = Vec::with_capacity(members.len());
    for (payer, share) in members.iter().zip(shares) {
        if share > 0 {
            created.push(
                insert_contribution(&txn, installment_id, &payer.id, share, notes.clone()).await?,
            );
        }
    }

    installment::recompute_status(&txn, installment_id).await?;
    expense::sync_expense_status(&txn, expense.id).await?;

    audit::record(
        &txn,
        AuditEntry {
            user_id: recorded_by,
            action: AuditAction::Create,
            entity_type: "installment",
            entity_id: installment_id,
            description: format!(
                "Everyone paid installment {} of '{}' together ({} each)",
                installment.installment_number,
                expense.title,
                (money::from_cents(installment.amount_cents) / Decimal::from(members.len()))
                    .round_dp(2)
            ),
        },
    )
    .await?;

    txn.commit().await?;
    Ok(created)
}

/// Settles several installments at once, splitting each evenly across the payers.
///
/// Duplicate ids are ignored. Only `pending` installments can be settled; a partial
/// or paid one in the selection rejects the whole request.
#[instrument(skip(db, settlement), fields(installments = settlement.installment_ids.len(), payers = settlement.payer_ids.len()))]
pub async fn bulk_settle(
    db: &DatabaseConnection,
    settlement: BulkSettlement,
) -> Result<Vec<contribution::Model>> {
    let installment_ids: BTreeSet<i64> = settlement.installment_ids.iter().copied().collect();
    let payer_ids: BTreeSet<String> = settlement.payer_ids.iter().cloned().collect();

    if installment_ids.is_empty() {
        return Err(Error::Validation {
            message: "Select at least one installment".to_string(),
        });
    }
    if payer_ids.is_empty() {
        return Err(Error::Validation {
            message: "Select at least one payer".to_string(),
        });
    }

    let note = format!("Bulk settlement - {} installment(s)", installment_ids.len());

    let txn = db.begin().await?;

    for payer in &payer_ids {
        ensure_member(&txn, payer).await?;
    }

    let mut created = Vec::new();
    let mut expense_ids = BTreeSet::new();
    for &installment_id in &installment_ids {
        let (installment, expense) = find_live_installment(&txn, installment_id).await?;
        if installment.status != InstallmentStatus::Pending {
            return Err(Error::Validation {
                message: format!(
                    "Installment {} of '{}' is already {}",
                    installment.installment_number, expense.title, installment.status
                ),
            });
        }

        let shares = money::split_evenly(installment.amount_cents, payer_ids.len());
        for (payer, share) in payer_ids.iter().zip(shares) {
            if share > 0 {
                created.push(
                    insert_contribution(&txn, installment_id, payer, share, Some(note.clone()))
                        .await?,
                );
            }
        }

        installment::recompute_status(&txn, installment_id).await?;
        expense_ids.insert(expense.id);
    }

    for expense_id in expense_ids {
        expense::sync_expense_status(&txn, expense_id).await?;
    }

    audit::record(
        &txn,
        AuditEntry {
            user_id: &settlement.recorded_by,
            action: AuditAction::Create,
            entity_type: "contribution",
            entity_id: created.first().map_or(0, |c| c.id),
            description: format!(
                "{note} settled by {} payer(s), {} contribution(s)",
                payer_ids.len(),
                created.len()
            ),
        },
    )
    .await?;

    txn.commit().await?;

    info!(contributions = created.len(), "Bulk settlement recorded");
    Ok(created)
}

/// Refunds a contribution.
///
/// Logs the refund, deletes the contribution and re-derives the installment and
/// expense status. A non-blank reason is required, and contributions under a
/// deleted expense are treated as missing.
#[instrument(skip(db, reason))]
pub async fn refund_contribution(
    db: &DatabaseConnection,
    contribution_id: i64,
    refunded_by: &str,
    reason: &str,
) -> Result<refund::Model> {
    let reason = installment::validate_reason(reason, MIN_REFUND_REASON_LEN)?;

    let txn = db.begin().await?;

    let existing = Contribution::find_by_id(contribution_id)
        .one(&txn)
        .await?
        .ok_or(Error::ContributionNotFound {
            id: contribution_id,
        })?;
    let installment_id = existing.installment_id;
    let (_, expense) = find_live_installment(&txn, installment_id)
        .await
        .map_err(|e| match e {
            Error::InstallmentNotFound { .. } => Error::ContributionNotFound {
                id: contribution_id,
            },
            other => other,
        })?;

    let refund_model = refund::ActiveModel {
        contribution_id: Set(existing.id),
        installment_id: Set(installment_id),
        contributor_id: Set(existing.user_id.clone()),
        refunded_by: Set(refunded_by.to_string()),
        refund_reason: Set(reason.clone()),
        refund_amount_cents: Set(existing.amount_cents),
        refunded_at: Set(Utc::now()),
        ..Default::default()
    };
    let refund = refund_model.insert(&txn).await?;

    let amount = existing.amount();
    let contributor = existing.user_id.clone();
    existing.delete(&txn).await?;

    let updated = installment::recompute_status(&txn, installment_id).await?;
    expense::sync_expense_status(&txn, expense.id).await?;

    audit::record(
        &txn,
        AuditEntry {
            user_id: refunded_by,
            action: AuditAction::Delete,
            entity_type: "contribution",
            entity_id: contribution_id,
            description: format!(
                "Refunded {amount} paid by {contributor} on installment {} (now {}): {reason}",
                updated.installment_number, updated.status
            ),
        },
    )
    .await?;

    txn.commit().await?;
    Ok(refund)
}
