//! Installment business logic - generation, status derivation, reopen and manual edit.
//!
//! Generation and status derivation are pure functions. The database operations
//! below always re-derive status from a fresh read of the installment's
//! contributions inside the same transaction as the write that changed them.

use crate::{
    core::{
        audit::{self, AuditEntry},
        expense, money,
    },
    entities::{
        AuditAction, Contribution, Expense, Installment, InstallmentStatus, contribution,
        expense as expense_entity, installment,
    },
    errors::{Error, Result},
};
use chrono::{Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Minimum reason length for reopening a paid installment
pub const MIN_REOPEN_REASON_LEN: usize = 10;

/// Inputs for generating the installments of a new expense
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallmentPlanRequest {
    /// Expense total, downpayment included
    pub total: Decimal,
    /// Number of regular installments
    pub installments: i64,
    /// Downpayment amount, zero for none
    pub down_payment: Decimal,
    /// Number of downpayment installments, only checked when a downpayment is set
    pub down_payment_installments: i64,
    /// Due date of the first installment
    pub start_date: NaiveDate,
}

/// One installment to be created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedInstallment {
    /// 1-based sequence number
    pub number: i32,
    /// Amount in cents
    pub amount_cents: i64,
    /// Calendar due date
    pub due_date: NaiveDate,
    /// Whether this slice belongs to the downpayment
    pub is_down_payment: bool,
}

impl PlannedInstallment {
    /// Amount as an exact decimal
    #[must_use]
    pub fn amount(&self) -> Decimal {
        money::from_cents(self.amount_cents)
    }
}

fn checked_count(count: i64) -> Result<usize> {
    if count < 1 {
        return Err(Error::InvalidInstallmentCount { count });
    }
    // Sequence numbers are stored as i32
    i32::try_from(count)
        .ok()
        .and_then(|c| usize::try_from(c).ok())
        .ok_or(Error::InvalidInstallmentCount { count })
}

/// Generates the installment schedule for a new expense.
///
/// Downpayment slices come first. Due dates run one calendar month apart from
/// `start_date` across the whole schedule (month ends clamp, e.g. Jan 31 -> Feb 28).
/// The amounts always sum exactly to `total`. When the downpayment covers the
/// whole total no zero-amount remaining installments are produced.
///
/// # Errors
/// Returns a validation error, before anything is written, if:
/// - `total` is not a positive cent amount
/// - `installments` is below one
/// - a downpayment is set and `down_payment_installments` is below one
/// - the downpayment is negative or exceeds `total`
pub fn plan_installments(request: &InstallmentPlanRequest) -> Result<Vec<PlannedInstallment>> {
    let total_cents = money::to_positive_cents(request.total)?;
    let regular_count = checked_count(request.installments)?;

    let down_cents = money::to_cents(request.down_payment)?;
    if down_cents < 0 {
        return Err(Error::InvalidAmount {
            amount: request.down_payment,
        });
    }
    if down_cents > total_cents {
        return Err(Error::DownpaymentExceedsTotal {
            downpayment: request.down_payment,
            total: request.total,
        });
    }

    let mut slices: Vec<(i64, bool)> = Vec::new();
    if down_cents > 0 {
        let down_count = checked_count(request.down_payment_installments)?;
        slices.extend(
            money::split_evenly(down_cents, down_count)
                .into_iter()
                .map(|cents| (cents, true)),
        );
    }

    let remaining_cents = total_cents - down_cents;
    if remaining_cents > 0 {
        slices.extend(
            money::split_evenly(remaining_cents, regular_count)
                .into_iter()
                .map(|cents| (cents, false)),
        );
    }

    slices
        .into_iter()
        .enumerate()
        .map(|(index, (amount_cents, is_down_payment))| {
            let offset = u32::try_from(index).map_err(|_| Error::InvalidInstallmentCount {
                count: request.installments,
            })?;
            let due_date = request
                .start_date
                .checked_add_months(Months::new(offset))
                .ok_or_else(|| Error::Validation {
                    message: format!("Due date out of range for installment {}", index + 1),
                })?;
            let number = i32::try_from(index + 1).map_err(|_| Error::InvalidInstallmentCount {
                count: request.installments,
            })?;

            Ok(PlannedInstallment {
                number,
                amount_cents,
                due_date,
                is_down_payment,
            })
        })
        .collect()
}

/// Derives an installment's status from the amounts of its remaining contributions.
///
/// Overpaying still counts as paid.
pub fn derive_status<I>(amount: Decimal, contributions: I) -> InstallmentStatus
where
    I: IntoIterator<Item = Decimal>,
{
    let paid: Decimal = contributions.into_iter().sum();

    if paid.is_zero() {
        InstallmentStatus::Pending
    } else if paid < amount {
        InstallmentStatus::Partial
    } else {
        InstallmentStatus::Paid
    }
}

/// Trims a reason and checks it has at least `min` characters.
///
/// # Errors
/// Returns `ReasonTooShort` with the trimmed length otherwise.
pub fn validate_reason(reason: &str, min: usize) -> Result<String> {
    let trimmed = reason.trim();
    let actual = trimmed.chars().count();
    if actual < min {
        return Err(Error::ReasonTooShort { min, actual });
    }
    Ok(trimmed.to_string())
}

/// Checks that an installment may be reopened with the given reason.
///
/// Only `paid` installments can be reopened; partial payments are reverted with a
/// refund instead. Returns the trimmed reason.
pub fn check_reopen(installment: &installment::Model, reason: &str) -> Result<String> {
    let reason = validate_reason(reason, MIN_REOPEN_REASON_LEN)?;

    if installment.status != InstallmentStatus::Paid {
        return Err(Error::InstallmentNotPaid {
            id: installment.id,
            status: installment.status.to_string(),
        });
    }

    Ok(reason)
}

/// Finds an installment by id, regardless of its expense's state.
pub async fn get_installment_by_id(
    db: &DatabaseConnection,
    installment_id: i64,
) -> Result<Option<installment::Model>> {
    Installment::find_by_id(installment_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists an expense's installments in sequence order.
pub async fn get_installments_for_expense(
    db: &DatabaseConnection,
    expense_id: i64,
) -> Result<Vec<installment::Model>> {
    Installment::find()
        .filter(installment::Column::ExpenseId.eq(expense_id))
        .order_by_asc(installment::Column::InstallmentNumber)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Loads an installment together with its expense, treating installments of
/// missing or soft-deleted expenses as not found.
pub(crate) async fn find_live_installment<C>(
    db: &C,
    installment_id: i64,
) -> Result<(installment::Model, expense_entity::Model)>
where
    C: ConnectionTrait,
{
    let (installment, expense) = Installment::find_by_id(installment_id)
        .find_also_related(Expense)
        .one(db)
        .await?
        .ok_or(Error::InstallmentNotFound { id: installment_id })?;

    match expense {
        Some(expense) if !expense.is_deleted() => Ok((installment, expense)),
        _ => Err(Error::InstallmentNotFound { id: installment_id }),
    }
}

/// Re-derives and persists an installment's status from its current contributions.
pub(crate) async fn recompute_status<C>(db: &C, installment_id: i64) -> Result<installment::Model>
where
    C: ConnectionTrait,
{
    let current = Installment::find_by_id(installment_id)
        .one(db)
        .await?
        .ok_or(Error::InstallmentNotFound { id: installment_id })?;

    let contributions = Contribution::find()
        .filter(contribution::Column::InstallmentId.eq(installment_id))
        .all(db)
        .await?;

    let status = derive_status(
        current.amount(),
        contributions.iter().map(contribution::Model::amount),
    );

    if status == current.status {
        return Ok(current);
    }

    let mut active_model: installment::ActiveModel = current.into();
    active_model.status = Set(status);
    active_model.update(db).await.map_err(Into::into)
}

/// Reopens a paid installment.
///
/// Deletes all of its contributions, sets it back to `pending`, bumps the reopen
/// counter and records who reopened it and why. The owning expense returns to
/// `active`. All of this happens in one transaction.
#[instrument(skip(db, reason))]
pub async fn reopen_installment(
    db: &DatabaseConnection,
    installment_id: i64,
    user_id: &str,
    reason: &str,
) -> Result<installment::Model> {
    let txn = db.begin().await?;

    let (installment, expense) = find_live_installment(&txn, installment_id).await?;
    let reason = check_reopen(&installment, reason)?;

    let removed = Contribution::delete_many()
        .filter(contribution::Column::InstallmentId.eq(installment_id))
        .exec(&txn)
        .await?;

    let times_reopened = installment.times_reopened + 1;
    let number = installment.installment_number;
    let mut active_model: installment::ActiveModel = installment.into();
    active_model.status = Set(InstallmentStatus::Pending);
    active_model.times_reopened = Set(times_reopened);
    active_model.reopened_by = Set(Some(user_id.to_string()));
    active_model.reopening_reason = Set(Some(reason.clone()));
    active_model.reopened_at = Set(Some(Utc::now()));
    let updated = active_model.update(&txn).await?;

    expense::sync_expense_status(&txn, expense.id).await?;

    audit::record(
        &txn,
        AuditEntry {
            user_id,
            action: AuditAction::Update,
            entity_type: "installment",
            entity_id: installment_id,
            description: format!(
                "Reopened installment {number} of '{}' ({} contribution(s) removed): {reason}",
                expense.title, removed.rows_affected
            ),
        },
    )
    .await?;

    txn.commit().await?;

    info!(
        installment_id,
        times_reopened, "Installment reopened, contributions removed"
    );
    Ok(updated)
}

/// Changes an installment's amount and/or due date.
///
/// The values before the first edit are preserved in `original_amount_cents` and
/// `original_due_date`; later edits leave them untouched. A changed amount shifts
/// the expense total by the same delta and the status is re-derived against it.
#[instrument(skip(db))]
pub async fn edit_installment(
    db: &DatabaseConnection,
    installment_id: i64,
    editor_id: &str,
    new_amount: Option<Decimal>,
    new_due_date: Option<NaiveDate>,
) -> Result<installment::Model> {
    if new_amount.is_none() && new_due_date.is_none() {
        return Err(Error::Validation {
            message: "Nothing to change: give a new amount or due date".to_string(),
        });
    }
    let new_amount_cents = new_amount.map(money::to_positive_cents).transpose()?;

    let txn = db.begin().await?;

    let (installment, expense) = find_live_installment(&txn, installment_id).await?;

    let old_amount_cents = installment.amount_cents;
    let old_due_date = installment.due_date;
    let first_edit = installment.edited_at.is_none();
    let amount_cents = new_amount_cents.unwrap_or(old_amount_cents);
    let due_date = new_due_date.unwrap_or(old_due_date);

    let mut active_model: installment::ActiveModel = installment.into();
    if first_edit {
        active_model.original_amount_cents = Set(Some(old_amount_cents));
        active_model.original_due_date = Set(Some(old_due_date));
    }
    active_model.amount_cents = Set(amount_cents);
    active_model.due_date = Set(due_date);
    active_model.edited_by = Set(Some(editor_id.to_string()));
    active_model.edited_at = Set(Some(Utc::now()));
    active_model.update(&txn).await?;

    let delta = amount_cents - old_amount_cents;
    if delta != 0 {
        let total = expense.total_amount_cents + delta;
        let mut expense_model: expense_entity::ActiveModel = expense.clone().into();
        expense_model.total_amount_cents = Set(total);
        expense_model.updated_at = Set(Utc::now());
        expense_model.update(&txn).await?;
    }

    let updated = recompute_status(&txn, installment_id).await?;
    expense::sync_expense_status(&txn, expense.id).await?;

    audit::record(
        &txn,
        AuditEntry {
            user_id: editor_id,
            action: AuditAction::Update,
            entity_type: "installment",
            entity_id: installment_id,
            description: format!(
                "Edited installment {} of '{}': {} -> {}, due {} -> {}",
                updated.installment_number,
                expense.title,
                money::from_cents(old_amount_cents),
                money::from_cents(amount_cents),
                old_due_date,
                due_date
            ),
        },
    )
    .await?;

    txn.commit().await?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::contribution::{self, NewContribution},
        entities::ExpenseStatus,
        test_utils::*,
    };
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(total: Decimal, installments: i64) -> InstallmentPlanRequest {
        InstallmentPlanRequest {
            total,
            installments,
            down_payment: Decimal::ZERO,
            down_payment_installments: 0,
            start_date: date(2025, 1, 15),
        }
    }

    #[test]
    fn test_plan_without_downpayment() {
        let plan = plan_installments(&request(dec!(100.00), 3)).unwrap();

        let amounts: Vec<Decimal> = plan.iter().map(PlannedInstallment::amount).collect();
        assert_eq!(amounts, vec![dec!(33.33), dec!(33.33), dec!(33.34)]);
        assert_eq!(amounts.iter().copied().sum::<Decimal>(), dec!(100.00));

        let numbers: Vec<i32> = plan.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        let dates: Vec<NaiveDate> = plan.iter().map(|p| p.due_date).collect();
        assert_eq!(
            dates,
            vec![date(2025, 1, 15), date(2025, 2, 15), date(2025, 3, 15)]
        );
        assert!(plan.iter().all(|p| !p.is_down_payment));
    }

    #[test]
    fn test_plan_with_downpayment() {
        let plan = plan_installments(&InstallmentPlanRequest {
            total: dec!(1000.00),
            installments: 3,
            down_payment: dec!(250.00),
            down_payment_installments: 2,
            start_date: date(2025, 3, 1),
        })
        .unwrap();

        assert_eq!(plan.len(), 5);
        assert!(plan[0].is_down_payment && plan[1].is_down_payment);
        assert!(plan[2..].iter().all(|p| !p.is_down_payment));
        assert_eq!(plan[0].amount(), dec!(125.00));
        assert_eq!(plan[1].amount(), dec!(125.00));
        assert_eq!(plan[2].amount(), dec!(250.00));
        assert_eq!(plan[0].due_date, date(2025, 3, 1));
        assert_eq!(plan[4].due_date, date(2025, 7, 1));
        assert_eq!(plan[4].number, 5);

        let sum: Decimal = plan.iter().map(PlannedInstallment::amount).sum();
        assert_eq!(sum, dec!(1000.00));
    }

    #[test]
    fn test_plan_sums_exactly_for_awkward_splits() {
        for (total, n, down, nd) in [
            (dec!(0.01), 1, dec!(0), 0),
            (dec!(99.99), 7, dec!(0), 0),
            (dec!(1234.56), 11, dec!(100.01), 3),
            (dec!(500.00), 12, dec!(499.99), 5),
        ] {
            let plan = plan_installments(&InstallmentPlanRequest {
                total,
                installments: n,
                down_payment: down,
                down_payment_installments: nd,
                start_date: date(2025, 1, 1),
            })
            .unwrap();
            let sum: Decimal = plan.iter().map(PlannedInstallment::amount).sum();
            assert_eq!(sum, total);
        }
    }

    #[test]
    fn test_plan_downpayment_covering_total() {
        let plan = plan_installments(&InstallmentPlanRequest {
            total: dec!(300.00),
            installments: 4,
            down_payment: dec!(300.00),
            down_payment_installments: 3,
            start_date: date(2025, 1, 1),
        })
        .unwrap();

        assert_eq!(plan.len(), 3);
        assert!(plan.iter().all(|p| p.is_down_payment));
    }

    #[test]
    fn test_plan_clamps_month_end() {
        let mut req = request(dec!(30.00), 3);
        req.start_date = date(2025, 1, 31);
        let plan = plan_installments(&req).unwrap();
        assert_eq!(plan[1].due_date, date(2025, 2, 28));
        assert_eq!(plan[2].due_date, date(2025, 3, 31));
    }

    #[test]
    fn test_plan_validation_errors() {
        assert!(matches!(
            plan_installments(&request(dec!(100), 0)),
            Err(Error::InvalidInstallmentCount { count: 0 })
        ));
        assert!(matches!(
            plan_installments(&request(dec!(0), 1)),
            Err(Error::InvalidAmount { .. })
        ));

        let mut too_much_down = request(dec!(100), 2);
        too_much_down.down_payment = dec!(150);
        too_much_down.down_payment_installments = 1;
        assert!(matches!(
            plan_installments(&too_much_down),
            Err(Error::DownpaymentExceedsTotal { .. })
        ));

        let mut no_down_count = request(dec!(100), 2);
        no_down_count.down_payment = dec!(50);
        assert!(matches!(
            plan_installments(&no_down_count),
            Err(Error::InvalidInstallmentCount { count: 0 })
        ));
    }

    #[test]
    fn test_derive_status() {
        let amount = dec!(90.00);
        assert_eq!(derive_status(amount, []), InstallmentStatus::Pending);
        assert_eq!(
            derive_status(amount, [dec!(30.00)]),
            InstallmentStatus::Partial
        );
        assert_eq!(
            derive_status(amount, [dec!(30.00), dec!(60.00)]),
            InstallmentStatus::Paid
        );
        assert_eq!(
            derive_status(amount, [dec!(100.00)]),
            InstallmentStatus::Paid
        );
    }

    #[test]
    fn test_validate_reason_trims() {
        assert_eq!(
            validate_reason("   duplicate entry   ", 10).unwrap(),
            "duplicate entry"
        );
        assert!(matches!(
            validate_reason("  short  ", 10),
            Err(Error::ReasonTooShort { min: 10, actual: 5 })
        ));
    }

    #[tokio::test]
    async fn test_reopen_rejects_short_reason_before_writing() -> Result<()> {
        let (db, expense, installments) = setup_with_expense(dec!(90.00), 1).await?;
        let target = &installments[0];
        contribution::add_contribution(
            &db,
            NewContribution {
                installment_id: target.id,
                user_id: MEMBER_A.to_string(),
                recorded_by: MEMBER_A.to_string(),
                amount: dec!(90.00),
                notes: None,
            },
        )
        .await?;

        let result = reopen_installment(&db, target.id, MEMBER_A, "oops!").await;
        assert!(matches!(
            result,
            Err(Error::ReasonTooShort { min: 10, actual: 5 })
        ));

        // Nothing was touched
        let still_paid = get_installment_by_id(&db, target.id).await?.unwrap();
        assert_eq!(still_paid.status, InstallmentStatus::Paid);
        assert_eq!(
            contribution::get_contributions_for_installment(&db, target.id)
                .await?
                .len(),
            1
        );
        let expense = crate::core::expense::get_expense_by_id(&db, expense.id)
            .await?
            .unwrap();
        assert_eq!(expense.status, ExpenseStatus::Paid);

        Ok(())
    }

    #[tokio::test]
    async fn test_reopen_paid_installment() -> Result<()> {
        let (db, expense, installments) = setup_with_expense(dec!(90.00), 1).await?;
        let target = &installments[0];
        for (user, amount) in [(MEMBER_A, dec!(30.00)), (MEMBER_B, dec!(60.00))] {
            contribution::add_contribution(
                &db,
                NewContribution {
                    installment_id: target.id,
                    user_id: user.to_string(),
                    recorded_by: user.to_string(),
                    amount,
                    notes: None,
                },
            )
            .await?;
        }

        let reopened =
            reopen_installment(&db, target.id, MEMBER_B, "Paid with the wrong card").await?;

        assert_eq!(reopened.status, InstallmentStatus::Pending);
        assert_eq!(reopened.times_reopened, 1);
        assert_eq!(reopened.reopened_by.as_deref(), Some(MEMBER_B));
        assert_eq!(
            reopened.reopening_reason.as_deref(),
            Some("Paid with the wrong card")
        );
        assert!(reopened.reopened_at.is_some());
        assert!(
            contribution::get_contributions_for_installment(&db, target.id)
                .await?
                .is_empty()
        );

        let expense = crate::core::expense::get_expense_by_id(&db, expense.id)
            .await?
            .unwrap();
        assert_eq!(expense.status, ExpenseStatus::Active);

        Ok(())
    }

    #[tokio::test]
    async fn test_reopen_requires_paid_status() -> Result<()> {
        let (db, _expense, installments) = setup_with_expense(dec!(90.00), 1).await?;
        let target = &installments[0];

        let result =
            reopen_installment(&db, target.id, MEMBER_A, "Nothing was paid yet").await;
        assert!(matches!(result, Err(Error::InstallmentNotPaid { .. })));

        contribution::add_contribution(
            &db,
            NewContribution {
                installment_id: target.id,
                user_id: MEMBER_A.to_string(),
                recorded_by: MEMBER_A.to_string(),
                amount: dec!(10.00),
                notes: None,
            },
        )
        .await?;
        let result =
            reopen_installment(&db, target.id, MEMBER_A, "Only partially paid so far").await;
        assert!(matches!(result, Err(Error::InstallmentNotPaid { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_reopen_counter_increments_each_time() -> Result<()> {
        let (db, _expense, installments) = setup_with_expense(dec!(50.00), 1).await?;
        let target = &installments[0];

        for round in 1..=2 {
            contribution::add_contribution(
                &db,
                NewContribution {
                    installment_id: target.id,
                    user_id: MEMBER_A.to_string(),
                    recorded_by: MEMBER_A.to_string(),
                    amount: dec!(50.00),
                    notes: None,
                },
            )
            .await?;
            let reopened =
                reopen_installment(&db, target.id, MEMBER_A, "Bank reversed the payment")
                    .await?;
            assert_eq!(reopened.times_reopened, round);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_reopen_missing_installment() -> Result<()> {
        let db = setup_test_db().await?;
        let result = reopen_installment(&db, 999, MEMBER_A, "Does not exist at all").await;
        assert!(matches!(result, Err(Error::InstallmentNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_preserves_first_original() -> Result<()> {
        let (db, expense, installments) = setup_with_expense(dec!(200.00), 2).await?;
        let target = &installments[0];

        let first = edit_installment(
            &db,
            target.id,
            MEMBER_A,
            Some(dec!(120.00)),
            Some(date(2025, 2, 20)),
        )
        .await?;
        assert_eq!(first.amount(), dec!(120.00));
        assert_eq!(first.original_amount_cents, Some(10000));
        assert_eq!(first.original_due_date, Some(target.due_date));
        assert_eq!(first.edited_by.as_deref(), Some(MEMBER_A));

        let second = edit_installment(&db, target.id, MEMBER_B, Some(dec!(80.00)), None).await?;
        assert_eq!(second.amount(), dec!(80.00));
        assert_eq!(second.due_date, date(2025, 2, 20));
        assert_eq!(second.original_amount_cents, Some(10000));
        assert_eq!(second.original_due_date, Some(target.due_date));
        assert_eq!(second.edited_by.as_deref(), Some(MEMBER_B));

        // Total follows the installments
        let expense = crate::core::expense::get_expense_by_id(&db, expense.id)
            .await?
            .unwrap();
        assert_eq!(expense.total_amount(), dec!(180.00));

        Ok(())
    }

    #[tokio::test]
    async fn test_edit_rederives_status() -> Result<()> {
        let (db, _expense, installments) = setup_with_expense(dec!(100.00), 1).await?;
        let target = &installments[0];
        contribution::add_contribution(
            &db,
            NewContribution {
                installment_id: target.id,
                user_id: MEMBER_A.to_string(),
                recorded_by: MEMBER_A.to_string(),
                amount: dec!(60.00),
                notes: None,
            },
        )
        .await?;

        let lowered = edit_installment(&db, target.id, MEMBER_A, Some(dec!(60.00)), None).await?;
        assert_eq!(lowered.status, InstallmentStatus::Paid);

        let raised = edit_installment(&db, target.id, MEMBER_A, Some(dec!(75.00)), None).await?;
        assert_eq!(raised.status, InstallmentStatus::Partial);

        Ok(())
    }

    #[tokio::test]
    async fn test_edit_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = edit_installment(&db, 1, MEMBER_A, None, None).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = edit_installment(&db, 1, MEMBER_A, Some(dec!(-1)), None).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        Ok(())
    }
}
