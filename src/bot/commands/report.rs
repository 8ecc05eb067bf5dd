//! Report Discord commands - balances, debts, pending views, grouped totals and the audit log.
//!
//! Everything except `/dismiss` and `/logs` is computed from a freshly loaded
//! settlement ledger; nothing is cached between invocations.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, say_lines},
        core::{
            audit, notification,
            report::{
                format_amount, format_balance_line, format_debt_summary, format_pending_line,
                format_progress_bar, payment_rate,
            },
            settlement::{self, percent_of},
        },
        entities::{AuditAction, NotificationKind},
        errors::{Error, Result},
    };
    use rust_decimal::prelude::ToPrimitive;
    use std::fmt::Write;
    use tracing::warn;

    /// Months shown by `/categories_report`
    const REPORT_MONTHS: usize = 6;

    /// Notice kinds that can be dismissed
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum NoticeChoice {
        #[name = "upcoming payment"]
        UpcomingPayment,
        #[name = "new expense"]
        NewExpense,
    }

    impl From<NoticeChoice> for NotificationKind {
        fn from(choice: NoticeChoice) -> Self {
            match choice {
                NoticeChoice::UpcomingPayment => Self::UpcomingPayment,
                NoticeChoice::NewExpense => Self::NewExpense,
            }
        }
    }

    /// Audit actions to filter by
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum ActionChoice {
        Create,
        Update,
        Delete,
    }

    impl From<ActionChoice> for AuditAction {
        fn from(choice: ActionChoice) -> Self {
            match choice {
                ActionChoice::Create => Self::Create,
                ActionChoice::Update => Self::Update,
                ActionChoice::Delete => Self::Delete,
            }
        }
    }

    async fn load_dismissed(ctx: poise::Context<'_, BotData, Error>) -> notification::Dismissed {
        let viewer = ctx.author().id.to_string();
        notification::dismissed_for(&ctx.data().database, &viewer)
            .await
            .unwrap_or_else(|e| {
                warn!(viewer = %viewer, error = %e, "Failed to load dismissed notices, showing all");
                notification::Dismissed::new()
            })
    }

    /// Shows each member's contributions against the expenses they created.
    #[poise::command(slash_command, prefix_command)]
    pub async fn balances(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let ledger = settlement::load_ledger(&ctx.data().database).await;
        let overview = ledger.overview(&ctx.author().id.to_string());

        let mut header = String::new();
        writeln!(
            &mut header,
            "📊 **Balances** - {} across {} expense(s)",
            format_amount(overview.total_expenses),
            overview.expense_count
        )?;
        write!(
            &mut header,
            "You contributed {} | {} installment(s) pending, {} paid",
            format_amount(overview.viewer_contributed),
            overview.pending_installments,
            overview.paid_installments
        )?;

        let lines: Vec<String> = ledger
            .member_totals()
            .iter()
            .map(format_balance_line)
            .collect();
        say_lines(ctx, &header, &lines).await
    }

    /// Shows what each member owes for installments others already paid.
    #[poise::command(slash_command, prefix_command)]
    pub async fn debts(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let ledger = settlement::load_ledger(&ctx.data().database).await;
        if ledger.members().is_empty() {
            ctx.say("👥 No members configured.").await?;
            return Ok(());
        }

        let mut lines = Vec::new();
        for debt in ledger.member_debts() {
            lines.push(format!("💸 {}", format_debt_summary(&debt, &ledger)));
            for item in &debt.items {
                lines.push(format!(
                    "   • {} #{}: share {} - paid {} = {}",
                    item.expense_title,
                    item.installment_number,
                    format_amount(item.share),
                    format_amount(item.contributed),
                    format_amount(item.owed)
                ));
            }
        }
        say_lines(ctx, "⚖️ **Debts** (equal split)", &lines).await
    }

    /// Lists pending installments due soon that you have not dismissed.
    #[poise::command(slash_command, prefix_command)]
    pub async fn upcoming(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let rules = ctx.data().rules;
        let dismissed = load_dismissed(ctx).await;
        let ledger = settlement::load_ledger(db).await;

        let today = chrono::Local::now().date_naive();
        let pending = ledger.upcoming(today, &dismissed, &rules);
        if pending.is_empty() {
            ctx.say(format!(
                "📅 Nothing due in the next {} days.",
                rules.upcoming_window_days
            ))
            .await?;
            return Ok(());
        }

        let lines: Vec<String> = pending
            .iter()
            .map(|p| format!("{} (`/dismiss` id {})", format_pending_line(p), p.installment.id))
            .collect();
        say_lines(ctx, "📅 **Upcoming payments**", &lines).await
    }

    /// Lists pending installments past their due date.
    #[poise::command(slash_command, prefix_command)]
    pub async fn overdue(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let ledger = settlement::load_ledger(&ctx.data().database).await;

        let today = chrono::Local::now().date_naive();
        let late = ledger.overdue(today, &ctx.data().rules);
        if late.is_empty() {
            ctx.say("🎉 Nothing is overdue.").await?;
            return Ok(());
        }

        let lines: Vec<String> = late.iter().map(format_pending_line).collect();
        say_lines(ctx, "⏰ **Overdue payments**", &lines).await
    }

    /// Lists recently created expenses that you have not dismissed.
    #[poise::command(slash_command, prefix_command)]
    pub async fn new_expenses(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let rules = ctx.data().rules;
        let dismissed = load_dismissed(ctx).await;
        let ledger = settlement::load_ledger(db).await;

        let fresh = ledger.new_expenses(chrono::Utc::now(), &dismissed, &rules);
        if fresh.is_empty() {
            ctx.say("🆕 No new expenses.").await?;
            return Ok(());
        }

        let lines: Vec<String> = fresh
            .iter()
            .map(|e| {
                format!(
                    "🆕 **{}** {} by {} (`/dismiss` id {})",
                    e.title,
                    format_amount(e.total_amount()),
                    ledger.member_name(&e.created_by),
                    e.id
                )
            })
            .collect();
        say_lines(ctx, "🆕 **New expenses**", &lines).await
    }

    /// Hides an upcoming payment or new expense notice for you only.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dismiss(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Kind of notice"] kind: NoticeChoice,
        #[description = "Installment id (upcoming) or expense id (new)"] id: i64,
    ) -> Result<()> {
        let newly = notification::dismiss(
            &ctx.data().database,
            &ctx.author().id.to_string(),
            kind.into(),
            id,
        )
        .await?;

        let reply = if newly {
            "👍 Dismissed."
        } else {
            "👍 Already dismissed."
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Shows expense totals by category and by month.
    #[poise::command(slash_command, prefix_command)]
    pub async fn categories_report(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let ledger = settlement::load_ledger(&ctx.data().database).await;

        let categories = ledger.category_totals();
        if categories.is_empty() {
            ctx.say("📊 No expenses yet.").await?;
            return Ok(());
        }

        let mut lines: Vec<String> = categories
            .iter()
            .map(|c| {
                format!(
                    "**{}** {} ({} expense(s)) {}",
                    c.name,
                    format_amount(c.total),
                    c.count,
                    format_progress_bar(c.percent.to_f64().unwrap_or(0.0), Some(10))
                )
            })
            .collect();

        let months = ledger.monthly_totals();
        let peak = months
            .iter()
            .map(|m| m.total)
            .max()
            .unwrap_or_default();
        lines.push(String::new());
        lines.push("🗓️ **By month**".to_string());
        for month in months.iter().rev().take(REPORT_MONTHS).rev() {
            let relative = percent_of(month.total, peak).to_f64().unwrap_or(0.0);
            lines.push(format!(
                "`{}` {} {}",
                month.month,
                format_amount(month.total),
                format_progress_bar(relative, Some(10))
            ));
        }

        say_lines(ctx, "📊 **Expenses by category**", &lines).await
    }

    /// Shows how far each member has covered their share of every installment.
    #[poise::command(slash_command, prefix_command)]
    pub async fn payment_status(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let ledger = settlement::load_ledger(&ctx.data().database).await;

        let lines: Vec<String> = ledger
            .member_payment_status()
            .iter()
            .map(|s| {
                format!(
                    "**{}** {}/{} covered {} | paid {} | still owes {} on {} installment(s)",
                    s.display_name,
                    s.covered,
                    s.total_installments,
                    format_progress_bar(payment_rate(s), Some(10)),
                    format_amount(s.paid),
                    format_amount(s.outstanding),
                    s.pending
                )
            })
            .collect();
        say_lines(ctx, "📈 **Payment status**", &lines).await
    }

    /// Shows the most recent audit log entries.
    #[poise::command(slash_command, prefix_command)]
    pub async fn logs(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only this kind of change"] action: Option<ActionChoice>,
        #[description = "How many entries (default 15, max 50)"] limit: Option<u64>,
    ) -> Result<()> {
        let limit = limit.unwrap_or(15).clamp(1, 50);
        let entries =
            audit::list_audit_logs(&ctx.data().database, action.map(AuditAction::from), limit)
                .await?;
        if entries.is_empty() {
            ctx.say("📜 The audit log is empty.").await?;
            return Ok(());
        }

        let ledger = settlement::load_ledger(&ctx.data().database).await;
        let lines: Vec<String> = entries
            .iter()
            .map(|entry| {
                format!(
                    "`{}` **{}** {} {} #{}: {}",
                    entry.created_at.format("%Y-%m-%d %H:%M"),
                    ledger.member_name(&entry.user_id),
                    entry.action,
                    entry.entity_type,
                    entry.entity_id,
                    entry.description
                )
            })
            .collect();
        say_lines(ctx, "📜 **Audit log**", &lines).await
    }
}

// Re-export all commands
pub use inner::*;
