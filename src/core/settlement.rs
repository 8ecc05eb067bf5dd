//! Settlement aggregation - balances, equal-split debts, pending views and grouped totals.
//!
//! [`load_ledger`] reads every relation once, in parallel, and [`Ledger::new`] joins
//! them into typed indices. Everything after that is a pure, in-memory reduction.
//! Soft-deleted expenses are dropped when the ledger is built, together with their
//! installments and contributions, so no view can count them.
//!
//! Installment status is always derived from the contributions in the ledger
//! rather than read from the stored column.

use crate::{
    config::household::Rules,
    core::{installment::derive_status, notification::Dismissed},
    entities::{
        Category, Contribution, Expense, ExpenseStatus, Installment, InstallmentStatus, Member,
        NotificationKind, category, contribution, expense, installment, member,
    },
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

/// Name used for expenses whose category row is missing
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Contribution and spending totals for one member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberTotals {
    /// Member id
    pub member_id: String,
    /// Display name
    pub display_name: String,
    /// Sum of the member's contributions
    pub total_contributed: Decimal,
    /// Sum of the totals of expenses the member created
    pub total_expenses_created: Decimal,
    /// `total_contributed - total_expenses_created`
    pub balance: Decimal,
    /// Share of all contributions, 0-100
    pub contribution_percent: Decimal,
}

impl MemberTotals {
    /// True when the member has paid in at least as much as they created.
    pub fn helped_more_than_spent(&self) -> bool {
        self.balance >= Decimal::ZERO
    }
}

/// Part of a debt owed to one member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creditor {
    /// Member owed
    pub member_id: String,
    /// Amount owed to them
    pub amount: Decimal,
}

/// What a member owes on one installment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtItem {
    /// Installment id
    pub installment_id: i64,
    /// Owning expense id
    pub expense_id: i64,
    /// Owning expense title
    pub expense_title: String,
    /// Installment number within the expense
    pub installment_number: i32,
    /// Equal share of the installment
    pub share: Decimal,
    /// What the member paid toward it
    pub contributed: Decimal,
    /// `max(0, share - contributed)`
    pub owed: Decimal,
    /// How `owed` splits across the members who paid
    pub creditors: Vec<Creditor>,
}

/// A member's equal-split debt across all installments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDebt {
    /// Debtor id
    pub member_id: String,
    /// Sum of `owed` over all items
    pub total_owed: Decimal,
    /// Totals per creditor, largest first
    pub creditors: Vec<Creditor>,
    /// Per-installment breakdown
    pub items: Vec<DebtItem>,
}

/// A pending installment shown in the upcoming or overdue view
#[derive(Debug, Clone)]
pub struct PendingInstallment<'a> {
    /// The installment
    pub installment: &'a installment::Model,
    /// Its expense
    pub expense: &'a expense::Model,
    /// Negative when overdue
    pub days_until_due: i64,
    /// Due within the urgent threshold
    pub urgent: bool,
    /// Members with no contribution on the installment
    pub awaiting: Vec<&'a member::Model>,
}

/// Grouped total for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    /// Category name
    pub name: String,
    /// Sum of expense totals
    pub total: Decimal,
    /// Number of expenses
    pub count: usize,
    /// Share of the grand total, 0-100
    pub percent: Decimal,
}

/// Grouped total for one calendar month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyTotal {
    /// `YYYY-MM` of the expense start date
    pub month: String,
    /// Sum of expense totals
    pub total: Decimal,
    /// Number of expenses
    pub count: usize,
}

/// How far a member has covered their share of every installment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberPaymentStatus {
    /// Member id
    pub member_id: String,
    /// Display name
    pub display_name: String,
    /// Installments of live expenses
    pub total_installments: usize,
    /// Installments where the member paid at least their share
    pub covered: usize,
    /// Unpaid installments where the member still owes part of their share
    pub pending: usize,
    /// Sum of the member's contributions
    pub paid: Decimal,
    /// Share still missing on unpaid installments
    pub outstanding: Decimal,
}

/// Dashboard headline numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overview {
    /// Sum of all live expense totals
    pub total_expenses: Decimal,
    /// Number of live expenses
    pub expense_count: usize,
    /// What the viewer has contributed
    pub viewer_contributed: Decimal,
    /// Installments with no contribution
    pub pending_installments: usize,
    /// Fully paid installments
    pub paid_installments: usize,
}

/// All settlement inputs joined into typed indices
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    members: Vec<member::Model>,
    categories: HashMap<i64, category::Model>,
    expenses: Vec<expense::Model>,
    installments: Vec<installment::Model>,
    contributions: Vec<contribution::Model>,
    expense_index: HashMap<i64, usize>,
    contributions_by_installment: HashMap<i64, Vec<usize>>,
}

impl Ledger {
    /// Joins the raw relations, dropping soft-deleted expenses and everything under them.
    pub fn new(
        mut members: Vec<member::Model>,
        categories: Vec<category::Model>,
        expenses: Vec<expense::Model>,
        installments: Vec<installment::Model>,
        contributions: Vec<contribution::Model>,
    ) -> Self {
        members.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut expenses: Vec<expense::Model> =
            expenses.into_iter().filter(|e| !e.is_deleted()).collect();
        expenses.sort_by_key(|e| e.id);
        let expense_index: HashMap<i64, usize> = expenses
            .iter()
            .enumerate()
            .map(|(idx, e)| (e.id, idx))
            .collect();

        let mut installments: Vec<installment::Model> = installments
            .into_iter()
            .filter(|i| expense_index.contains_key(&i.expense_id))
            .collect();
        installments.sort_by_key(|i| i.id);
        let live_installments: HashSet<i64> = installments.iter().map(|i| i.id).collect();

        let mut contributions: Vec<contribution::Model> = contributions
            .into_iter()
            .filter(|c| live_installments.contains(&c.installment_id))
            .collect();
        contributions.sort_by_key(|c| c.id);

        let mut contributions_by_installment: HashMap<i64, Vec<usize>> = HashMap::new();
        for (idx, c) in contributions.iter().enumerate() {
            contributions_by_installment
                .entry(c.installment_id)
                .or_default()
                .push(idx);
        }

        Self {
            members,
            categories: categories.into_iter().map(|c| (c.id, c)).collect(),
            expenses,
            installments,
            contributions,
            expense_index,
            contributions_by_installment,
        }
    }

    /// Members ordered by display name.
    pub fn members(&self) -> &[member::Model] {
        &self.members
    }

    /// Display name for a member id, falling back to the id itself.
    pub fn member_name<'a>(&'a self, member_id: &'a str) -> &'a str {
        self.members
            .iter()
            .find(|m| m.id == member_id)
            .map_or(member_id, |m| m.display_name.as_str())
    }

    /// Live expenses ordered by id.
    pub fn expenses(&self) -> &[expense::Model] {
        &self.expenses
    }

    /// A live expense by id.
    pub fn expense(&self, expense_id: i64) -> Option<&expense::Model> {
        self.expense_index
            .get(&expense_id)
            .map(|&idx| &self.expenses[idx])
    }

    /// Category name of an expense.
    pub fn category_name(&self, expense: &expense::Model) -> &str {
        self.categories
            .get(&expense.category_id)
            .map_or(UNCATEGORIZED, |c| c.name.as_str())
    }

    /// Installments of a live expense ordered by number.
    pub fn installments_for(&self, expense_id: i64) -> Vec<&installment::Model> {
        let mut found: Vec<&installment::Model> = self
            .installments
            .iter()
            .filter(|i| i.expense_id == expense_id)
            .collect();
        found.sort_by_key(|i| i.installment_number);
        found
    }

    /// Contributions on an installment, oldest first.
    pub fn contributions_for(
        &self,
        installment_id: i64,
    ) -> impl Iterator<Item = &contribution::Model> + '_ {
        self.contributions_by_installment
            .get(&installment_id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.contributions[idx])
    }

    /// Total contributed toward an installment.
    pub fn paid_amount(&self, installment_id: i64) -> Decimal {
        self.contributions_for(installment_id)
            .map(contribution::Model::amount)
            .sum()
    }

    /// What one member contributed toward an installment.
    pub fn contributed_by(&self, installment_id: i64, member_id: &str) -> Decimal {
        self.contributions_for(installment_id)
            .filter(|c| c.user_id == member_id)
            .map(contribution::Model::amount)
            .sum()
    }

    /// Status derived from the installment's contributions.
    pub fn status_of(&self, installment: &installment::Model) -> InstallmentStatus {
        derive_status(
            installment.amount(),
            self.contributions_for(installment.id)
                .map(contribution::Model::amount),
        )
    }

    /// Equal share of an installment, or zero when there are no members.
    pub fn share_of(&self, installment: &installment::Model) -> Decimal {
        if self.members.is_empty() {
            return Decimal::ZERO;
        }
        installment.amount() / Decimal::from(self.members.len())
    }

    fn all_contributions_total(&self) -> Decimal {
        self.contributions
            .iter()
            .map(contribution::Model::amount)
            .sum()
    }

    fn member_contributed(&self, member_id: &str) -> Decimal {
        self.contributions
            .iter()
            .filter(|c| c.user_id == member_id)
            .map(contribution::Model::amount)
            .sum()
    }

    /// Contribution and spending totals for every member.
    pub fn member_totals(&self) -> Vec<MemberTotals> {
        let grand_total = self.all_contributions_total();

        self.members
            .iter()
            .map(|m| {
                let total_contributed = self.member_contributed(&m.id);
                let total_expenses_created: Decimal = self
                    .expenses
                    .iter()
                    .filter(|e| e.created_by == m.id)
                    .map(expense::Model::total_amount)
                    .sum();

                MemberTotals {
                    member_id: m.id.clone(),
                    display_name: m.display_name.clone(),
                    total_contributed,
                    total_expenses_created,
                    balance: total_contributed - total_expenses_created,
                    contribution_percent: percent_of(total_contributed, grand_total),
                }
            })
            .collect()
    }

    /// Equal-split debt of one member.
    ///
    /// For every installment that others have paid toward, the member owes
    /// `max(0, amount / M - own contribution)`, attributed to the other payers in
    /// proportion to what each of them paid.
    pub fn debt_for_member(&self, member_id: &str) -> MemberDebt {
        let mut items = Vec::new();
        let mut per_creditor: BTreeMap<String, Decimal> = BTreeMap::new();

        for inst in &self.installments {
            if self.status_of(inst) == InstallmentStatus::Pending {
                continue;
            }

            let mut others: BTreeMap<&str, Decimal> = BTreeMap::new();
            for c in self.contributions_for(inst.id) {
                if c.user_id != member_id {
                    *others.entry(c.user_id.as_str()).or_default() += c.amount();
                }
            }
            let others_total: Decimal = others.values().copied().sum();
            if others_total <= Decimal::ZERO {
                continue;
            }

            let share = self.share_of(inst);
            let contributed = self.contributed_by(inst.id, member_id);
            let owed = (share - contributed).max(Decimal::ZERO).round_dp(2);
            if owed.is_zero() {
                continue;
            }

            let mut remaining = owed;
            let last = others.len() - 1;
            let mut creditors = Vec::with_capacity(others.len());
            for (idx, (creditor_id, paid)) in others.into_iter().enumerate() {
                let part = if idx == last {
                    remaining
                } else {
                    (owed * paid / others_total).round_dp(2)
                };
                remaining -= part;
                *per_creditor.entry(creditor_id.to_string()).or_default() += part;
                creditors.push(Creditor {
                    member_id: creditor_id.to_string(),
                    amount: part,
                });
            }

            let expense_title = self
                .expense(inst.expense_id)
                .map(|e| e.title.clone())
                .unwrap_or_default();
            items.push(DebtItem {
                installment_id: inst.id,
                expense_id: inst.expense_id,
                expense_title,
                installment_number: inst.installment_number,
                share: share.round_dp(2),
                contributed,
                owed,
                creditors,
            });
        }

        let mut creditors: Vec<Creditor> = per_creditor
            .into_iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(member_id, amount)| Creditor { member_id, amount })
            .collect();
        creditors.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.member_id.cmp(&b.member_id))
        });

        MemberDebt {
            member_id: member_id.to_string(),
            total_owed: items.iter().map(|i| i.owed).sum(),
            creditors,
            items,
        }
    }

    /// Equal-split debt of every member, in member order.
    pub fn member_debts(&self) -> Vec<MemberDebt> {
        self.members
            .iter()
            .map(|m| self.debt_for_member(&m.id))
            .collect()
    }

    fn pending_view<F>(&self, today: NaiveDate, rules: &Rules, keep: F) -> Vec<PendingInstallment<'_>>
    where
        F: Fn(&installment::Model, i64) -> bool,
    {
        let mut view: Vec<PendingInstallment<'_>> = self
            .installments
            .iter()
            .filter(|inst| self.status_of(inst) == InstallmentStatus::Pending)
            .filter_map(|inst| {
                let days_until_due = (inst.due_date - today).num_days();
                if !keep(inst, days_until_due) {
                    return None;
                }
                let expense = self.expense(inst.expense_id)?;
                let contributors: HashSet<&str> = self
                    .contributions_for(inst.id)
                    .map(|c| c.user_id.as_str())
                    .collect();
                let awaiting = self
                    .members
                    .iter()
                    .filter(|m| !contributors.contains(m.id.as_str()))
                    .collect();

                Some(PendingInstallment {
                    installment: inst,
                    expense,
                    days_until_due,
                    urgent: days_until_due <= rules.urgent_threshold_days,
                    awaiting,
                })
            })
            .collect();

        view.sort_by(|a, b| {
            a.installment
                .due_date
                .cmp(&b.installment.due_date)
                .then_with(|| a.installment.id.cmp(&b.installment.id))
        });
        view
    }

    /// Pending installments due within the upcoming window that the viewer has not dismissed.
    pub fn upcoming(
        &self,
        today: NaiveDate,
        dismissed: &Dismissed,
        rules: &Rules,
    ) -> Vec<PendingInstallment<'_>> {
        self.pending_view(today, rules, |inst, days| {
            (0..=rules.upcoming_window_days).contains(&days)
                && !dismissed.contains(&(NotificationKind::UpcomingPayment, inst.id))
        })
    }

    /// Pending installments whose due date has passed.
    pub fn overdue(&self, today: NaiveDate, rules: &Rules) -> Vec<PendingInstallment<'_>> {
        self.pending_view(today, rules, |_, days| days < 0)
    }

    /// Active expenses created within the new-expense window, newest first.
    pub fn new_expenses(
        &self,
        now: DateTime<Utc>,
        dismissed: &Dismissed,
        rules: &Rules,
    ) -> Vec<&expense::Model> {
        let cutoff = now - Duration::days(rules.new_expense_window_days);
        let mut found: Vec<&expense::Model> = self
            .expenses
            .iter()
            .filter(|e| e.status == ExpenseStatus::Active)
            .filter(|e| e.created_at >= cutoff)
            .filter(|e| !dismissed.contains(&(NotificationKind::NewExpense, e.id)))
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        found
    }

    /// Expense totals grouped by category, largest first.
    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        let mut grouped: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();
        for e in &self.expenses {
            let entry = grouped.entry(self.category_name(e)).or_default();
            entry.0 += e.total_amount();
            entry.1 += 1;
        }

        let grand_total: Decimal = grouped.values().map(|(total, _)| *total).sum();
        let mut totals: Vec<CategoryTotal> = grouped
            .into_iter()
            .map(|(name, (total, count))| CategoryTotal {
                name: name.to_string(),
                total,
                count,
                percent: percent_of(total, grand_total),
            })
            .collect();
        totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
        totals
    }

    /// Expense totals grouped by start month, oldest first.
    pub fn monthly_totals(&self) -> Vec<MonthlyTotal> {
        let mut grouped: BTreeMap<String, (Decimal, usize)> = BTreeMap::new();
        for e in &self.expenses {
            let entry = grouped
                .entry(e.start_date.format("%Y-%m").to_string())
                .or_default();
            entry.0 += e.total_amount();
            entry.1 += 1;
        }

        grouped
            .into_iter()
            .map(|(month, (total, count))| MonthlyTotal {
                month,
                total,
                count,
            })
            .collect()
    }

    /// Per-member coverage of their equal share across all installments.
    pub fn member_payment_status(&self) -> Vec<MemberPaymentStatus> {
        self.members
            .iter()
            .map(|m| {
                let mut status = MemberPaymentStatus {
                    member_id: m.id.clone(),
                    display_name: m.display_name.clone(),
                    total_installments: self.installments.len(),
                    covered: 0,
                    pending: 0,
                    paid: self.member_contributed(&m.id),
                    outstanding: Decimal::ZERO,
                };

                for inst in &self.installments {
                    let share = self.share_of(inst);
                    let own = self.contributed_by(inst.id, &m.id);
                    if own >= share {
                        status.covered += 1;
                    } else if self.status_of(inst) != InstallmentStatus::Paid {
                        status.pending += 1;
                        status.outstanding += share - own;
                    }
                }
                status.outstanding = status.outstanding.round_dp(2);
                status
            })
            .collect()
    }

    /// Headline numbers for one viewer.
    pub fn overview(&self, viewer_id: &str) -> Overview {
        let mut pending_installments = 0;
        let mut paid_installments = 0;
        for inst in &self.installments {
            match self.status_of(inst) {
                InstallmentStatus::Pending => pending_installments += 1,
                InstallmentStatus::Paid => paid_installments += 1,
                InstallmentStatus::Partial => {}
            }
        }

        Overview {
            total_expenses: self.expenses.iter().map(expense::Model::total_amount).sum(),
            expense_count: self.expenses.len(),
            viewer_contributed: self.member_contributed(viewer_id),
            pending_installments,
            paid_installments,
        }
    }
}

/// `part / whole * 100` rounded to cents, zero when `whole` is zero.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part / whole * Decimal::ONE_HUNDRED).round_dp(2)
}

fn or_empty<T>(relation: &str, result: Result<Vec<T>, DbErr>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!(relation, error = %e, "Failed to load relation, treating it as empty");
        Vec::new()
    })
}

/// Reads every relation the aggregations need, in parallel.
///
/// A relation that fails to load is logged and treated as empty so the views
/// still render.
pub async fn load_ledger(db: &DatabaseConnection) -> Ledger {
    let (members, categories, expenses, installments, contributions) = tokio::join!(
        Member::find().all(db),
        Category::find().all(db),
        Expense::find().all(db),
        Installment::find().all(db),
        Contribution::find().all(db),
    );

    let ledger = Ledger::new(
        or_empty("members", members),
        or_empty("categories", categories),
        or_empty("expenses", expenses),
        or_empty("installments", installments),
        or_empty("contributions", contributions),
    );
    debug!(
        members = ledger.members.len(),
        expenses = ledger.expenses.len(),
        installments = ledger.installments.len(),
        "Ledger loaded"
    );
    ledger
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::Priority;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn member(id: &str, name: &str) -> member::Model {
        member::Model {
            id: id.to_string(),
            display_name: name.to_string(),
            photo_url: None,
            created_at: Utc::now(),
        }
    }

    fn trio() -> Vec<member::Model> {
        vec![member("a", "Ana"), member("b", "Bruno"), member("c", "Clara")]
    }

    fn category(id: i64, name: &str) -> category::Model {
        category::Model {
            id,
            name: name.to_string(),
            icon: None,
            color: None,
        }
    }

    fn expense(id: i64, created_by: &str, total_cents: i64) -> expense::Model {
        let now = Utc::now();
        expense::Model {
            id,
            title: format!("Expense {id}"),
            total_amount_cents: total_cents,
            category_id: 1,
            created_by: created_by.to_string(),
            installments: 1,
            is_fixed: false,
            priority: Priority::Medium,
            start_date: date(2025, 1, 15),
            notes: None,
            status: ExpenseStatus::Active,
            down_payment_cents: 0,
            down_payment_installments: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            deleted_by: None,
            deletion_reason: None,
        }
    }

    fn installment(id: i64, expense_id: i64, amount_cents: i64, due: NaiveDate) -> installment::Model {
        installment::Model {
            id,
            expense_id,
            installment_number: 1,
            amount_cents,
            due_date: due,
            status: InstallmentStatus::Pending,
            is_down_payment: false,
            original_amount_cents: None,
            original_due_date: None,
            edited_by: None,
            edited_at: None,
            times_reopened: 0,
            reopened_by: None,
            reopening_reason: None,
            reopened_at: None,
            created_at: Utc::now(),
        }
    }

    fn contribution(id: i64, installment_id: i64, user: &str, amount_cents: i64) -> contribution::Model {
        contribution::Model {
            id,
            installment_id,
            user_id: user.to_string(),
            amount_cents,
            notes: None,
            paid_at: Utc::now(),
        }
    }

    fn ledger(
        expenses: Vec<expense::Model>,
        installments: Vec<installment::Model>,
        contributions: Vec<contribution::Model>,
    ) -> Ledger {
        Ledger::new(
            trio(),
            vec![category(1, "Housing"), category(2, "Utilities")],
            expenses,
            installments,
            contributions,
        )
    }

    #[test]
    fn test_debt_excludes_self_paid_share() {
        let ledger = ledger(
            vec![expense(1, "a", 9000)],
            vec![installment(10, 1, 9000, date(2025, 1, 15))],
            vec![contribution(100, 10, "a", 9000)],
        );

        let a = ledger.debt_for_member("a");
        assert_eq!(a.total_owed, Decimal::ZERO);
        assert!(a.items.is_empty());

        for debtor in ["b", "c"] {
            let debt = ledger.debt_for_member(debtor);
            assert_eq!(debt.total_owed, dec!(30.00));
            assert_eq!(
                debt.creditors,
                vec![Creditor {
                    member_id: "a".to_string(),
                    amount: dec!(30.00)
                }]
            );
        }
    }

    #[test]
    fn test_debt_counts_partial_payments_by_others() {
        let ledger = ledger(
            vec![expense(1, "a", 9000)],
            vec![installment(10, 1, 9000, date(2025, 1, 15))],
            vec![contribution(100, 10, "a", 3000)],
        );

        assert_eq!(ledger.debt_for_member("a").total_owed, Decimal::ZERO);
        assert_eq!(ledger.debt_for_member("b").total_owed, dec!(30.00));
    }

    #[test]
    fn test_debt_splits_across_creditors_and_credits_own_share() {
        let ledger = ledger(
            vec![expense(1, "a", 9000)],
            vec![installment(10, 1, 9000, date(2025, 1, 15))],
            vec![
                contribution(100, 10, "a", 6000),
                contribution(101, 10, "b", 3000),
            ],
        );

        // Bruno paid exactly his share
        assert_eq!(ledger.debt_for_member("b").total_owed, Decimal::ZERO);

        let clara = ledger.debt_for_member("c");
        assert_eq!(clara.total_owed, dec!(30.00));
        assert_eq!(
            clara.creditors,
            vec![
                Creditor {
                    member_id: "a".to_string(),
                    amount: dec!(20.00)
                },
                Creditor {
                    member_id: "b".to_string(),
                    amount: dec!(10.00)
                },
            ]
        );
    }

    #[test]
    fn test_soft_deleted_expense_is_excluded_everywhere() {
        let mut deleted = expense(2, "b", 50000);
        deleted.deleted_at = Some(Utc::now());
        deleted.category_id = 2;

        let ledger = ledger(
            vec![expense(1, "a", 9000), deleted],
            vec![
                installment(10, 1, 9000, date(2025, 1, 15)),
                installment(20, 2, 50000, date(2025, 1, 15)),
            ],
            vec![
                contribution(100, 10, "a", 9000),
                contribution(200, 20, "b", 50000),
            ],
        );

        assert_eq!(ledger.expenses().len(), 1);
        assert!(ledger.expense(2).is_none());

        let totals = ledger.member_totals();
        let bruno = totals.iter().find(|t| t.member_id == "b").unwrap();
        assert_eq!(bruno.total_expenses_created, Decimal::ZERO);
        assert_eq!(bruno.total_contributed, Decimal::ZERO);

        let categories = ledger.category_totals();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Housing");

        // Only the live installment paid by Ana creates debt
        assert_eq!(ledger.debt_for_member("a").total_owed, Decimal::ZERO);
        assert_eq!(ledger.debt_for_member("c").total_owed, dec!(30.00));
    }

    #[test]
    fn test_member_totals_and_percentages() {
        let ledger = ledger(
            vec![expense(1, "a", 10000), expense(2, "b", 5000)],
            vec![
                installment(10, 1, 10000, date(2025, 1, 15)),
                installment(20, 2, 5000, date(2025, 2, 15)),
            ],
            vec![
                contribution(100, 10, "b", 7500),
                contribution(101, 20, "c", 2500),
            ],
        );

        let totals = ledger.member_totals();
        assert_eq!(totals.len(), 3);

        let ana = &totals[0];
        assert_eq!(ana.display_name, "Ana");
        assert_eq!(ana.balance, dec!(-100.00));
        assert!(!ana.helped_more_than_spent());
        assert_eq!(ana.contribution_percent, Decimal::ZERO);

        let bruno = &totals[1];
        assert_eq!(bruno.total_contributed, dec!(75.00));
        assert_eq!(bruno.balance, dec!(25.00));
        assert!(bruno.helped_more_than_spent());
        assert_eq!(bruno.contribution_percent, dec!(75.00));

        assert_eq!(totals[2].contribution_percent, dec!(25.00));
    }

    #[test]
    fn test_upcoming_window_urgency_and_sorting() {
        let today = date(2025, 3, 1);
        let rules = Rules::default();
        let ledger = ledger(
            vec![expense(1, "a", 40000)],
            vec![
                installment(10, 1, 10000, date(2025, 3, 6)),
                installment(11, 1, 10000, date(2025, 3, 2)),
                installment(12, 1, 10000, date(2025, 3, 2)),
                installment(13, 1, 10000, date(2025, 3, 9)),
                installment(14, 1, 10000, date(2025, 3, 3)),
                installment(15, 1, 10000, date(2025, 2, 20)),
            ],
            vec![contribution(100, 14, "a", 10000)],
        );

        let upcoming = ledger.upcoming(today, &Dismissed::new(), &rules);
        let ids: Vec<i64> = upcoming.iter().map(|p| p.installment.id).collect();
        // 13 is beyond the window, 14 is paid and 15 is overdue
        assert_eq!(ids, vec![11, 12, 10]);
        assert_eq!(upcoming[0].days_until_due, 1);
        assert!(upcoming[0].urgent);
        assert_eq!(upcoming[2].days_until_due, 5);
        assert!(!upcoming[2].urgent);
        assert_eq!(upcoming[0].awaiting.len(), 3);

        let dismissed: Dismissed = [(NotificationKind::UpcomingPayment, 11)].into_iter().collect();
        let ids: Vec<i64> = ledger
            .upcoming(today, &dismissed, &rules)
            .iter()
            .map(|p| p.installment.id)
            .collect();
        assert_eq!(ids, vec![12, 10]);

        let overdue = ledger.overdue(today, &rules);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].installment.id, 15);
        assert_eq!(overdue[0].days_until_due, -9);
    }

    #[test]
    fn test_upcoming_window_includes_both_ends() {
        let today = date(2025, 3, 1);
        let rules = Rules::default();
        let ledger = ledger(
            vec![expense(1, "a", 40000)],
            vec![
                installment(20, 1, 10000, date(2025, 3, 8)),
                installment(21, 1, 10000, date(2025, 3, 1)),
                installment(22, 1, 10000, date(2025, 3, 9)),
                installment(23, 1, 10000, date(2025, 2, 28)),
            ],
            vec![],
        );

        let upcoming = ledger.upcoming(today, &Dismissed::new(), &rules);
        let days: Vec<(i64, i64)> = upcoming
            .iter()
            .map(|p| (p.installment.id, p.days_until_due))
            .collect();
        assert_eq!(days, vec![(21, 0), (20, 7)]);
        assert!(upcoming[0].urgent);
        assert!(!upcoming[1].urgent);

        let overdue = ledger.overdue(today, &rules);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].installment.id, 23);
        assert_eq!(overdue[0].days_until_due, -1);
    }

    #[test]
    fn test_new_expenses_respects_window_and_dismissal() {
        let now = Utc::now();
        let recent = expense(1, "a", 1000);
        let mut old = expense(2, "a", 1000);
        old.created_at = now - Duration::days(5);
        let mut settled = expense(3, "a", 1000);
        settled.status = ExpenseStatus::Paid;

        let ledger = ledger(vec![recent, old, settled], vec![], vec![]);
        let rules = Rules::default();

        let fresh = ledger.new_expenses(now, &Dismissed::new(), &rules);
        assert_eq!(fresh.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1]);

        let dismissed: Dismissed = [(NotificationKind::NewExpense, 1)].into_iter().collect();
        assert!(ledger.new_expenses(now, &dismissed, &rules).is_empty());
    }

    #[test]
    fn test_category_and_monthly_totals() {
        let mut utilities = expense(2, "b", 2500);
        utilities.category_id = 2;
        utilities.start_date = date(2025, 2, 1);
        let mut orphan = expense(3, "b", 2500);
        orphan.category_id = 99;

        let ledger = ledger(vec![expense(1, "a", 5000), utilities, orphan], vec![], vec![]);

        let categories = ledger.category_totals();
        assert_eq!(categories[0].name, "Housing");
        assert_eq!(categories[0].total, dec!(50.00));
        assert_eq!(categories[0].percent, dec!(50.00));
        assert_eq!(categories[1].name, UNCATEGORIZED);
        assert_eq!(categories[2].name, "Utilities");

        let months = ledger.monthly_totals();
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2025-01");
        assert_eq!(months[0].total, dec!(75.00));
        assert_eq!(months[0].count, 2);
        assert_eq!(months[1].month, "2025-02");
    }

    #[test]
    fn test_member_payment_status_and_overview() {
        let ledger = ledger(
            vec![expense(1, "a", 18000)],
            vec![
                installment(10, 1, 9000, date(2025, 1, 15)),
                installment(11, 1, 9000, date(2025, 2, 15)),
            ],
            vec![
                contribution(100, 10, "a", 9000),
                contribution(101, 11, "b", 3000),
            ],
        );

        let status = ledger.member_payment_status();
        let ana = &status[0];
        assert_eq!(ana.total_installments, 2);
        assert_eq!(ana.covered, 1);
        assert_eq!(ana.pending, 1);
        assert_eq!(ana.outstanding, dec!(30.00));

        let bruno = &status[1];
        assert_eq!(bruno.covered, 1);
        assert_eq!(bruno.pending, 0);
        assert_eq!(bruno.paid, dec!(30.00));

        let overview = ledger.overview("a");
        assert_eq!(overview.total_expenses, dec!(180.00));
        assert_eq!(overview.viewer_contributed, dec!(90.00));
        assert_eq!(overview.paid_installments, 1);
        assert_eq!(overview.pending_installments, 0);
    }

    #[tokio::test]
    async fn test_load_ledger_degrades_to_empty() {
        use sea_orm::{DatabaseBackend, MockDatabase};

        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let ledger = load_ledger(&db).await;

        assert!(ledger.members().is_empty());
        assert!(ledger.expenses().is_empty());
        assert!(ledger.member_debts().is_empty());
    }

    #[tokio::test]
    async fn test_two_member_household_end_to_end() -> crate::errors::Result<()> {
        use crate::test_utils::{MEMBER_A, MEMBER_B, pay, setup_with_expense};

        let (db, expense, installments) = setup_with_expense(dec!(200.00), 2).await?;
        assert_eq!(installments.len(), 2);
        assert!(installments.iter().all(|i| i.amount() == dec!(100.00)));
        assert_eq!(
            installments[1].due_date,
            installments[0]
                .due_date
                .checked_add_months(chrono::Months::new(1))
                .unwrap()
        );

        pay(&db, installments[0].id, MEMBER_A, dec!(100.00)).await?;

        let ledger = load_ledger(&db).await;
        assert_eq!(ledger.status_of(ledger.installments_for(expense.id)[0]), InstallmentStatus::Paid);

        let debt = ledger.debt_for_member(MEMBER_B);
        assert_eq!(debt.total_owed, dec!(50.00));
        assert_eq!(debt.items.len(), 1);
        assert_eq!(debt.items[0].installment_id, installments[0].id);
        assert_eq!(debt.creditors[0].member_id, MEMBER_A);
        assert_eq!(ledger.debt_for_member(MEMBER_A).total_owed, Decimal::ZERO);

        Ok(())
    }
}
