//! Expense business logic - creation, lookup, soft delete and lifecycle status.
//!
//! Creating an expense writes the expense row and its generated installments in
//! one transaction. Expenses are never hard-deleted; a soft delete requires a
//! reason (longer when deleting someone else's expense) and hides the expense from
//! every active view.

use crate::{
    core::{
        audit::{self, AuditEntry},
        installment::{self, InstallmentPlanRequest},
        money,
    },
    entities::{
        AuditAction, Category, Expense, ExpenseStatus, Installment, InstallmentStatus, Member,
        Priority, expense, installment as installment_entity,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Minimum reason length when deleting one's own expense
pub const MIN_DELETE_REASON_LEN: usize = 10;
/// Minimum reason length when deleting another member's expense
pub const MIN_FOREIGN_DELETE_REASON_LEN: usize = 20;

/// Everything needed to create an expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// Short title
    pub title: String,
    /// Total amount, downpayment included
    pub total_amount: Decimal,
    /// Category id
    pub category_id: i64,
    /// Creating member
    pub created_by: String,
    /// Number of regular installments
    pub installments: i64,
    /// Fixed/recurring obligation flag
    pub is_fixed: bool,
    /// Urgency
    pub priority: Priority,
    /// Due date of the first installment
    pub start_date: NaiveDate,
    /// Optional notes
    pub notes: Option<String>,
    /// Downpayment, zero for none
    pub down_payment: Decimal,
    /// Number of downpayment installments
    pub down_payment_installments: i64,
}

/// Creates an expense together with its installment schedule.
///
/// All validation (title, amounts, counts, downpayment) happens before the
/// transaction starts; category and creator are checked inside it.
#[instrument(skip(db, new_expense), fields(title = %new_expense.title))]
pub async fn create_expense(
    db: &DatabaseConnection,
    new_expense: NewExpense,
) -> Result<(expense::Model, Vec<installment_entity::Model>)> {
    let title = new_expense.title.trim().to_string();
    if title.is_empty() {
        return Err(Error::Validation {
            message: "Expense title cannot be empty".to_string(),
        });
    }

    let plan = installment::plan_installments(&InstallmentPlanRequest {
        total: new_expense.total_amount,
        installments: new_expense.installments,
        down_payment: new_expense.down_payment,
        down_payment_installments: new_expense.down_payment_installments,
        start_date: new_expense.start_date,
    })?;

    let total_cents = money::to_positive_cents(new_expense.total_amount)?;
    let down_cents = money::to_cents(new_expense.down_payment)?;
    let has_down_payment = down_cents > 0;
    let installments = i32::try_from(new_expense.installments).map_err(|_| {
        Error::InvalidInstallmentCount {
            count: new_expense.installments,
        }
    })?;
    let down_payment_installments = if has_down_payment {
        i32::try_from(new_expense.down_payment_installments).map_err(|_| {
            Error::InvalidInstallmentCount {
                count: new_expense.down_payment_installments,
            }
        })?
    } else {
        0
    };
    let notes = new_expense
        .notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let txn = db.begin().await?;

    Category::find_by_id(new_expense.category_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: new_expense.category_id.to_string(),
        })?;

    Member::find_by_id(new_expense.created_by.clone())
        .one(&txn)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            id: new_expense.created_by.clone(),
        })?;

    let now = Utc::now();
    let expense_model = expense::ActiveModel {
        title: Set(title.clone()),
        total_amount_cents: Set(total_cents),
        category_id: Set(new_expense.category_id),
        created_by: Set(new_expense.created_by.clone()),
        installments: Set(installments),
        is_fixed: Set(new_expense.is_fixed),
        priority: Set(new_expense.priority),
        start_date: Set(new_expense.start_date),
        notes: Set(notes),
        status: Set(ExpenseStatus::Active),
        down_payment_cents: Set(down_cents),
        down_payment_installments: Set(down_payment_installments),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        deleted_by: Set(None),
        deletion_reason: Set(None),
        ..Default::default()
    };
    let created = expense_model.insert(&txn).await?;

    let mut rows = Vec::with_capacity(plan.len());
    for planned in &plan {
        let row = installment_entity::ActiveModel {
            expense_id: Set(created.id),
            installment_number: Set(planned.number),
            amount_cents: Set(planned.amount_cents),
            due_date: Set(planned.due_date),
            status: Set(InstallmentStatus::Pending),
            is_down_payment: Set(planned.is_down_payment),
            original_amount_cents: Set(None),
            original_due_date: Set(None),
            edited_by: Set(None),
            edited_at: Set(None),
            times_reopened: Set(0),
            reopened_by: Set(None),
            reopening_reason: Set(None),
            reopened_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        };
        rows.push(row.insert(&txn).await?);
    }

    audit::record(
        &txn,
        AuditEntry {
            user_id: &created.created_by,
            action: AuditAction::Create,
            entity_type: "expense",
            entity_id: created.id,
            description: format!(
                "Created expense '{}' of {} in {} installment(s)",
                title,
                created.total_amount(),
                rows.len()
            ),
        },
    )
    .await?;

    txn.commit().await?;

    info!(expense_id = created.id, installments = rows.len(), "Expense created");
    Ok((created, rows))
}

/// Finds an expense by id, including soft-deleted ones.
pub async fn get_expense_by_id(
    db: &DatabaseConnection,
    expense_id: i64,
) -> Result<Option<expense::Model>> {
    Expense::find_by_id(expense_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the most recent non-deleted expense with the given title.
pub async fn get_expense_by_title(
    db: &DatabaseConnection,
    title: &str,
) -> Result<Option<expense::Model>> {
    Expense::find()
        .filter(expense::Column::Title.eq(title.trim()))
        .filter(expense::Column::DeletedAt.is_null())
        .order_by_desc(expense::Column::CreatedAt)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists non-deleted expenses that still have open installments, newest first.
pub async fn get_open_expenses(db: &DatabaseConnection) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::DeletedAt.is_null())
        .filter(expense::Column::Status.eq(ExpenseStatus::Active))
        .order_by_desc(expense::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists every non-deleted expense, newest first.
pub async fn get_all_live_expenses(db: &DatabaseConnection) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::DeletedAt.is_null())
        .order_by_desc(expense::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists fully paid, non-deleted expenses, optionally limited to those last
/// updated within an inclusive date range.
pub async fn get_paid_expenses(
    db: &DatabaseConnection,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<expense::Model>> {
    let paid = Expense::find()
        .filter(expense::Column::DeletedAt.is_null())
        .filter(expense::Column::Status.eq(ExpenseStatus::Paid))
        .order_by_desc(expense::Column::UpdatedAt)
        .all(db)
        .await?;

    Ok(paid
        .into_iter()
        .filter(|e| {
            let day = e.updated_at.date_naive();
            from.is_none_or(|start| day >= start) && to.is_none_or(|end| day <= end)
        })
        .collect())
}

/// Soft-deletes an expense.
///
/// The trimmed reason must have at least [`MIN_DELETE_REASON_LEN`] characters, or
/// [`MIN_FOREIGN_DELETE_REASON_LEN`] when `user_id` is not the creator. Installments
/// and contributions stay in storage but drop out of every active view.
#[instrument(skip(db, reason))]
pub async fn soft_delete_expense(
    db: &DatabaseConnection,
    expense_id: i64,
    user_id: &str,
    reason: &str,
) -> Result<expense::Model> {
    let reason = installment::validate_reason(reason, MIN_DELETE_REASON_LEN)?;

    let txn = db.begin().await?;

    let expense = Expense::find_by_id(expense_id)
        .filter(expense::Column::DeletedAt.is_null())
        .one(&txn)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?;

    if expense.created_by != user_id {
        installment::validate_reason(&reason, MIN_FOREIGN_DELETE_REASON_LEN)?;
    }

    let title = expense.title.clone();
    let amount = expense.total_amount();
    let now = Utc::now();
    let mut active_model: expense::ActiveModel = expense.into();
    active_model.deleted_at = Set(Some(now));
    active_model.deleted_by = Set(Some(user_id.to_string()));
    active_model.deletion_reason = Set(Some(reason.clone()));
    active_model.updated_at = Set(now);
    let deleted = active_model.update(&txn).await?;

    audit::record(
        &txn,
        AuditEntry {
            user_id,
            action: AuditAction::Delete,
            entity_type: "expense",
            entity_id: expense_id,
            description: format!("Deleted expense '{title}' of {amount}: {reason}"),
        },
    )
    .await?;

    txn.commit().await?;

    info!(expense_id, "Expense soft-deleted");
    Ok(deleted)
}

/// Marks an expense `paid` when all its installments are paid, `active` otherwise.
///
/// Called inside every transaction that changes an installment's status.
pub(crate) async fn sync_expense_status<C>(db: &C, expense_id: i64) -> Result<ExpenseStatus>
where
    C: ConnectionTrait,
{
    let expense = Expense::find_by_id(expense_id)
        .one(db)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?;

    let installments = Installment::find()
        .filter(installment_entity::Column::ExpenseId.eq(expense_id))
        .all(db)
        .await?;

    let all_paid = !installments.is_empty()
        && installments
            .iter()
            .all(|i| i.status == InstallmentStatus::Paid);
    let status = if all_paid {
        ExpenseStatus::Paid
    } else {
        ExpenseStatus::Active
    };

    if status != expense.status {
        let mut active_model: expense::ActiveModel = expense.into();
        active_model.status = Set(status);
        active_model.updated_at = Set(Utc::now());
        active_model.update(db).await?;
    }

    Ok(status)
}
