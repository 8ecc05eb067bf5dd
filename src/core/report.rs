//! Report formatting helpers.
//!
//! Turns the structured results of [`crate::core::settlement`] into short text lines.
//! Nothing here touches the database; the bot layer decides how lines are grouped
//! into messages.

use crate::{
    core::settlement::{Ledger, MemberDebt, MemberPaymentStatus, MemberTotals, PendingInstallment},
    entities::{InstallmentStatus, installment},
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::fmt::Write;

/// Formats an amount as currency with two decimals, e.g. `$1234.50` or `-$3.00`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded.abs())
    }
}

/// Formats an amount with an explicit sign, e.g. "+$50.00" or "-$25.50"
#[must_use]
pub fn format_signed_amount(amount: Decimal) -> String {
    if amount >= Decimal::ZERO {
        format!("+{}", format_amount(amount))
    } else {
        format_amount(amount)
    }
}

/// Calculates `part / whole` as a percentage, 0 when `whole` is zero.
#[must_use]
pub fn calculate_progress(part: Decimal, whole: Decimal) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }

    (part / whole * Decimal::ONE_HUNDRED).to_f64().unwrap_or(0.0)
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // clamped_progress is in [0, 100] and length is small, so the result is in [0, length]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!(
        "[{}{}] {progress_percent:.1}%",
        "█".repeat(filled),
        "░".repeat(empty)
    )
}

/// Share of installments a member has covered, as a percentage.
#[must_use]
pub fn payment_rate(status: &MemberPaymentStatus) -> f64 {
    calculate_progress(
        Decimal::from(status.covered),
        Decimal::from(status.total_installments),
    )
}

const fn status_icon(status: InstallmentStatus) -> &'static str {
    match status {
        InstallmentStatus::Pending => "⏳",
        InstallmentStatus::Partial => "🟡",
        InstallmentStatus::Paid => "✅",
    }
}

/// One line for an installment, e.g. `✅ #2 (down payment) $50.00 due 2025-02-15 [paid]`
#[must_use]
pub fn format_installment_line(
    installment: &installment::Model,
    status: InstallmentStatus,
    paid: Decimal,
) -> String {
    let mut line = format!("{} #{}", status_icon(status), installment.installment_number);
    if installment.is_down_payment {
        line.push_str(" (down payment)");
    }
    let _ = write!(
        line,
        " {} due {} [{status}]",
        format_amount(installment.amount()),
        installment.due_date
    );
    if status == InstallmentStatus::Partial {
        let _ = write!(line, " {} paid", format_amount(paid));
    }
    if installment.times_reopened > 0 {
        let _ = write!(line, " (reopened {}x)", installment.times_reopened);
    }
    line
}

/// One line for an upcoming or overdue installment.
#[must_use]
pub fn format_pending_line(pending: &PendingInstallment<'_>) -> String {
    let when = match pending.days_until_due {
        0 => "due today".to_string(),
        1 => "due tomorrow".to_string(),
        d if d > 1 => format!("due in {d} days"),
        -1 => "1 day late".to_string(),
        d => format!("{} days late", -d),
    };
    let flag = if pending.urgent { "🔴 " } else { "" };
    let awaiting = pending
        .awaiting
        .iter()
        .map(|m| m.display_name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{flag}**{}** #{} {} ({when}, {}) - waiting on {}",
        pending.expense.title,
        pending.installment.installment_number,
        format_amount(pending.installment.amount()),
        pending.installment.due_date,
        if awaiting.is_empty() { "nobody" } else { awaiting.as_str() }
    )
}

/// One line for a member's balance, e.g. `Ana: +$25.00 (helped more than spent)`
#[must_use]
pub fn format_balance_line(totals: &MemberTotals) -> String {
    let verdict = if totals.helped_more_than_spent() {
        "helped more than spent"
    } else {
        "spent more than helped"
    };
    format!(
        "**{}**: {} ({verdict}) | paid {} ({}%) | created {}",
        totals.display_name,
        format_signed_amount(totals.balance),
        format_amount(totals.total_contributed),
        totals.contribution_percent.round_dp(1),
        format_amount(totals.total_expenses_created)
    )
}

/// Summary of a member's debt, e.g. `Bruno owes $50.00 to Ana`
#[must_use]
pub fn format_debt_summary(debt: &MemberDebt, ledger: &Ledger) -> String {
    let debtor = ledger.member_name(&debt.member_id);
    if debt.total_owed.is_zero() {
        return format!("{debtor} owes nothing");
    }

    let owed_to = debt
        .creditors
        .iter()
        .map(|c| {
            format!(
                "{} to {}",
                format_amount(c.amount),
                ledger.member_name(&c.member_id)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("{debtor} owes {owed_to}")
}
