//! Payment Discord commands - paying, settling, refunding, reopening and editing installments.
//!
//! Installments are addressed by expense title plus installment number; the
//! acting member is always the command author.

use crate::errors::{Error, Result};

/// Parses installment numbers such as `1 2 5` or `1,2,5`.
fn parse_numbers(input: &str) -> Result<Vec<i64>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.trim_start_matches('#')
                .parse::<i64>()
                .map_err(|_| Error::Validation {
                    message: format!("'{part}' is not an installment number"),
                })
        })
        .collect()
}

/// Resolves the optional payer option to a single member id, defaulting to the author.
fn resolve_payer(payer: Option<&str>, author_id: String) -> Result<String> {
    let Some(text) = payer else {
        return Ok(author_id);
    };
    let mut ids = parse_member_ids(text);
    if ids.len() != 1 {
        return Err(Error::Validation {
            message: format!("'{text}' must name exactly one member"),
        });
    }
    Ok(ids.remove(0))
}

/// Extracts user ids from mentions (`<@123>`, `<@!123>`) or bare ids.
fn parse_member_ids(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|part| {
            part.trim_start_matches("<@")
                .trim_start_matches('!')
                .trim_end_matches('>')
        })
        .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{parse_member_ids, parse_numbers, resolve_payer};
    use crate::{
        bot::{BotData, find_expense, find_installment, handlers::autocomplete, parse_date},
        core::{
            contribution::{self, BulkSettlement, NewContribution},
            installment, member, money,
            report::format_amount,
        },
        entities::InstallmentStatus,
        errors::{Error, Result},
    };

    /// Records a payment toward an installment, by you or by another member.
    #[poise::command(slash_command, prefix_command)]
    pub async fn pay(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Expense title"]
        #[autocomplete = "autocomplete::autocomplete_expense_title"]
        expense: String,
        #[description = "Installment number"]
        #[rename = "installment"]
        number: i64,
        #[description = "Amount paid, e.g. 50.00"] amount: String,
        #[description = "Optional note"] notes: Option<String>,
        #[description = "Who paid, as a mention or id (default you)"] payer: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let amount = money::parse_amount(&amount)?;
        let author_id = ctx.author().id.to_string();
        let payer_id = resolve_payer(payer.as_deref(), author_id.clone())?;
        let (found, target) = find_installment(db, &expense, number).await?;

        let created = contribution::add_contribution(
            db,
            NewContribution {
                installment_id: target.id,
                user_id: payer_id,
                recorded_by: author_id,
                amount,
                notes,
            },
        )
        .await?;

        let status = installment::get_installment_by_id(db, target.id)
            .await?
            .map_or(InstallmentStatus::Pending, |i| i.status);
        let payer_name = member::get_member(db, &created.user_id)
            .await?
            .map_or_else(|| created.user_id.clone(), |m| m.display_name);
        ctx.say(format!(
            "✅ {payer_name} paid {} toward **{}** #{} - now {status} (contribution `#{}`)",
            format_amount(created.amount()),
            found.title,
            target.installment_number,
            created.id
        ))
        .await?;
        Ok(())
    }

    /// Records that every member paid an equal share of an installment.
    #[poise::command(slash_command, prefix_command)]
    pub async fn pay_equally(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Expense title"]
        #[autocomplete = "autocomplete::autocomplete_expense_title"]
        expense: String,
        #[description = "Installment number"]
        #[rename = "installment"]
        number: i64,
        #[description = "Optional note"] notes: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let (found, target) = find_installment(db, &expense, number).await?;

        let created =
            contribution::pay_equally(db, target.id, &ctx.author().id.to_string(), notes).await?;

        let members = member::list_members(db).await?;
        let shares: Vec<String> = created
            .iter()
            .map(|c| {
                let name = members
                    .iter()
                    .find(|m| m.id == c.user_id)
                    .map_or(c.user_id.as_str(), |m| m.display_name.as_str());
                format!("{name} {}", format_amount(c.amount()))
            })
            .collect();
        ctx.say(format!(
            "✅ **{}** #{} paid together: {}",
            found.title,
            target.installment_number,
            shares.join(", ")
        ))
        .await?;
        Ok(())
    }

    /// Splits several installments of one expense evenly between payers.
    #[poise::command(slash_command, prefix_command)]
    pub async fn settle(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Expense title"]
        #[autocomplete = "autocomplete::autocomplete_expense_title"]
        expense: String,
        #[description = "Installment numbers, e.g. 1 2 3"] installments: String,
        #[description = "Payers as mentions or ids (default everyone)"] payers: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let found = find_expense(db, &expense).await?;
        let numbers = parse_numbers(&installments)?;

        let all = installment::get_installments_for_expense(db, found.id).await?;
        let mut installment_ids = Vec::with_capacity(numbers.len());
        for number in &numbers {
            let target = all
                .iter()
                .find(|i| i64::from(i.installment_number) == *number)
                .ok_or_else(|| Error::Validation {
                    message: format!("'{}' has no installment #{number}", found.title),
                })?;
            installment_ids.push(target.id);
        }

        let payer_ids = match payers.as_deref() {
            Some(text) => parse_member_ids(text),
            None => member::list_members(db)
                .await?
                .into_iter()
                .map(|m| m.id)
                .collect(),
        };

        let created = contribution::bulk_settle(
            db,
            BulkSettlement {
                installment_ids,
                payer_ids,
                recorded_by: ctx.author().id.to_string(),
            },
        )
        .await?;

        let total: rust_decimal::Decimal = created
            .iter()
            .map(crate::entities::ContributionModel::amount)
            .sum();
        ctx.say(format!(
            "✅ Settled {} installment(s) of **{}**: {} contribution(s), {} in total",
            numbers.len(),
            found.title,
            created.len(),
            format_amount(total)
        ))
        .await?;
        Ok(())
    }

    /// Refunds a contribution. The id is shown by `/expense_info`.
    #[poise::command(slash_command, prefix_command)]
    pub async fn refund(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Contribution id"]
        #[rename = "contribution"]
        contribution_id: i64,
        #[description = "Why the payment is refunded"] reason: String,
    ) -> Result<()> {
        let refunded = contribution::refund_contribution(
            &ctx.data().database,
            contribution_id,
            &ctx.author().id.to_string(),
            &reason,
        )
        .await?;

        ctx.say(format!(
            "↩️ Refunded {} (contribution `#{}`).",
            format_amount(money::from_cents(refunded.refund_amount_cents)),
            refunded.contribution_id
        ))
        .await?;
        Ok(())
    }

    /// Reopens a paid installment, discarding its contributions.
    #[poise::command(slash_command, prefix_command)]
    pub async fn reopen(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Expense title"]
        #[autocomplete = "autocomplete::autocomplete_any_expense_title"]
        expense: String,
        #[description = "Installment number"]
        #[rename = "installment"]
        number: i64,
        #[description = "Why it is reopened (10+ characters)"] reason: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let (found, target) = find_installment(db, &expense, number).await?;

        let reopened =
            installment::reopen_installment(db, target.id, &ctx.author().id.to_string(), &reason)
                .await?;

        ctx.say(format!(
            "🔄 **{}** #{} is pending again (reopened {}x).",
            found.title, reopened.installment_number, reopened.times_reopened
        ))
        .await?;
        Ok(())
    }

    /// Changes an installment's amount and/or due date.
    #[poise::command(slash_command, prefix_command)]
    pub async fn edit_installment(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Expense title"]
        #[autocomplete = "autocomplete::autocomplete_any_expense_title"]
        expense: String,
        #[description = "Installment number"]
        #[rename = "installment"]
        number: i64,
        #[description = "New amount"] amount: Option<String>,
        #[description = "New due date, YYYY-MM-DD"] due: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let amount = amount.as_deref().map(money::parse_amount).transpose()?;
        let due = due.as_deref().map(parse_date).transpose()?;
        let (found, target) = find_installment(db, &expense, number).await?;

        let edited = installment::edit_installment(
            db,
            target.id,
            &ctx.author().id.to_string(),
            amount,
            due,
        )
        .await?;

        ctx.say(format!(
            "✏️ **{}** #{} is now {} due {} ({}).",
            found.title,
            edited.installment_number,
            format_amount(edited.amount()),
            edited.due_date,
            edited.status
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
