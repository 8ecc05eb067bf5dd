//! Expense Discord commands - creating, listing, inspecting and deleting expenses.
//!
//! This module contains commands that go through `core::expense` for writes and the
//! settlement ledger for anything that shows payment progress.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, find_expense, handlers::autocomplete, parse_date, say_lines},
        core::{
            expense::{self, NewExpense},
            member, money,
            report::{calculate_progress, format_amount, format_installment_line, format_progress_bar},
            settlement,
        },
        entities::Priority,
        errors::{Error, Result},
    };
    use rust_decimal::Decimal;
    use std::fmt::Write;

    /// Priority offered as a slash command choice
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum PriorityChoice {
        Low,
        Medium,
        High,
        Urgent,
    }

    impl From<PriorityChoice> for Priority {
        fn from(choice: PriorityChoice) -> Self {
            match choice {
                PriorityChoice::Low => Self::Low,
                PriorityChoice::Medium => Self::Medium,
                PriorityChoice::High => Self::High,
                PriorityChoice::Urgent => Self::Urgent,
            }
        }
    }

    /// Creates a shared expense and generates its installments.
    ///
    /// The amount is the full total, downpayment included. Installments are due
    /// monthly from the start date (today if omitted).
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, prefix_command)]
    pub async fn expense_new(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Short title, e.g. Rent March"] title: String,
        #[description = "Total amount, e.g. 1200.00"] amount: String,
        #[description = "Category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: String,
        #[description = "Number of installments after the downpayment (default 1)"]
        installments: Option<i64>,
        #[description = "First due date, YYYY-MM-DD (default today)"] start: Option<String>,
        #[description = "Priority (default medium)"] priority: Option<PriorityChoice>,
        #[description = "Downpayment amount"] down_payment: Option<String>,
        #[description = "Installments for the downpayment (default 1)"]
        down_payment_installments: Option<i64>,
        #[description = "Fixed monthly obligation"] fixed: Option<bool>,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let total_amount = money::parse_amount(&amount)?;
        let down_payment = down_payment
            .as_deref()
            .map(money::parse_amount)
            .transpose()?
            .unwrap_or(Decimal::ZERO);
        let down_payment_installments = match down_payment_installments {
            Some(count) => count,
            None if down_payment > Decimal::ZERO => 1,
            None => 0,
        };
        let start_date = match start.as_deref() {
            Some(text) => parse_date(text)?,
            None => chrono::Local::now().date_naive(),
        };

        let Some(category) = member::get_category_by_name(db, &category).await? else {
            return Err(Error::CategoryNotFound { name: category });
        };

        let (created, rows) = expense::create_expense(
            db,
            NewExpense {
                title,
                total_amount,
                category_id: category.id,
                created_by: ctx.author().id.to_string(),
                installments: installments.unwrap_or(1),
                is_fixed: fixed.unwrap_or(false),
                priority: priority.map_or(Priority::Medium, Priority::from),
                start_date,
                notes,
                down_payment,
                down_payment_installments,
            },
        )
        .await?;

        let header = format!(
            "✅ Created **{}** ({}) in {} with {} installment(s):",
            created.title,
            format_amount(created.total_amount()),
            category.name,
            rows.len()
        );
        let lines: Vec<String> = rows
            .iter()
            .map(|row| format_installment_line(row, row.status, Decimal::ZERO))
            .collect();
        say_lines(ctx, &header, &lines).await
    }

    /// Lists open expenses with their payment progress.
    #[poise::command(slash_command, prefix_command)]
    pub async fn expenses(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let ledger = settlement::load_ledger(&ctx.data().database).await;

        let mut open: Vec<_> = ledger
            .expenses()
            .iter()
            .filter(|e| e.status == crate::entities::ExpenseStatus::Active)
            .collect();
        if open.is_empty() {
            ctx.say("📋 No open expenses. Create one with `/expense_new`.")
                .await?;
            return Ok(());
        }
        open.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));

        let lines: Vec<String> = open
            .iter()
            .map(|e| {
                let paid: Decimal = ledger
                    .installments_for(e.id)
                    .iter()
                    .map(|i| ledger.paid_amount(i.id).min(i.amount()))
                    .sum();
                let progress = calculate_progress(paid, e.total_amount());
                format!(
                    "**{}** [{}] {} | {} | {} paid {}",
                    e.title,
                    ledger.category_name(e),
                    format_amount(e.total_amount()),
                    e.priority.as_str(),
                    format_amount(paid),
                    format_progress_bar(progress, Some(10))
                )
            })
            .collect();

        say_lines(ctx, "📋 **Open expenses**", &lines).await
    }

    /// Shows an expense with every installment and contribution.
    #[poise::command(slash_command, prefix_command)]
    pub async fn expense_info(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Expense title"]
        #[autocomplete = "autocomplete::autocomplete_any_expense_title"]
        #[rename = "expense"]
        title: String,
    ) -> Result<()> {
        let found = find_expense(&ctx.data().database, &title).await?;
        let ledger = settlement::load_ledger(&ctx.data().database).await;

        let mut header = String::new();
        writeln!(
            &mut header,
            "🧾 **{}** - {} | {} | {} | {}",
            found.title,
            format_amount(found.total_amount()),
            ledger.category_name(&found),
            found.priority.as_str(),
            if found.is_fixed { "fixed" } else { "one-off" }
        )?;
        write!(
            &mut header,
            "Created by {} on {}",
            ledger.member_name(&found.created_by),
            found.created_at.date_naive()
        )?;
        if found.down_payment_cents > 0 {
            write!(
                &mut header,
                " | downpayment {} in {}",
                format_amount(found.down_payment()),
                found.down_payment_installments
            )?;
        }
        if let Some(notes) = &found.notes {
            write!(&mut header, "\n> {notes}")?;
        }

        let mut lines = Vec::new();
        for inst in ledger.installments_for(found.id) {
            let paid = ledger.paid_amount(inst.id);
            lines.push(format_installment_line(inst, ledger.status_of(inst), paid));
            for c in ledger.contributions_for(inst.id) {
                lines.push(format!(
                    "   • `#{}` {} paid {} on {}",
                    c.id,
                    ledger.member_name(&c.user_id),
                    format_amount(c.amount()),
                    c.paid_at.date_naive()
                ));
            }
        }

        say_lines(ctx, &header, &lines).await
    }

    /// Deletes an expense. Its history stays in storage but leaves every report.
    #[poise::command(slash_command, prefix_command)]
    pub async fn expense_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Expense title"]
        #[autocomplete = "autocomplete::autocomplete_any_expense_title"]
        #[rename = "expense"]
        title: String,
        #[description = "Why it is being deleted (10+ characters, 20+ for others' expenses)"]
        reason: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let found = find_expense(db, &title).await?;

        let deleted =
            expense::soft_delete_expense(db, found.id, &ctx.author().id.to_string(), &reason)
                .await?;

        ctx.say(format!(
            "🗑️ Deleted **{}** ({}).",
            deleted.title,
            format_amount(deleted.total_amount())
        ))
        .await?;
        Ok(())
    }

    /// Lists fully paid expenses, optionally within a date range.
    #[poise::command(slash_command, prefix_command)]
    pub async fn paid_expenses(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "From, YYYY-MM-DD"] from: Option<String>,
        #[description = "To, YYYY-MM-DD"] to: Option<String>,
    ) -> Result<()> {
        let from = from.as_deref().map(parse_date).transpose()?;
        let to = to.as_deref().map(parse_date).transpose()?;

        let paid = expense::get_paid_expenses(&ctx.data().database, from, to).await?;
        if paid.is_empty() {
            ctx.say("✅ No paid expenses in that range.").await?;
            return Ok(());
        }

        let total: Decimal = paid.iter().map(crate::entities::ExpenseModel::total_amount).sum();
        let lines: Vec<String> = paid
            .iter()
            .map(|e| {
                format!(
                    "✅ **{}** {} (settled {})",
                    e.title,
                    format_amount(e.total_amount()),
                    e.updated_at.date_naive()
                )
            })
            .collect();

        say_lines(
            ctx,
            &format!("💰 **Paid expenses** - {} in total", format_amount(total)),
            &lines,
        )
        .await
    }
}

// Re-export all commands
pub use inner::*;
