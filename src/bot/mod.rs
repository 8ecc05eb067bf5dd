//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the ExpenseBuddy application,
//! including all slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (expense, payment, report, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::household::Rules,
    core::expense,
    entities::{expense as expense_entity, installment},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument, warn};

/// Discord rejects messages longer than 2000 characters
const MESSAGE_LIMIT: usize = 1900;

/// Shared data available to all bot commands.
/// This structure holds the database connection and the household rules
/// that commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Notification windows from config.toml
    pub rules: Rules,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection and rules.
    #[must_use]
    pub const fn new(database: DatabaseConnection, rules: Rules) -> Self {
        Self { database, rules }
    }
}

/// Finds a live expense by its exact title.
pub(crate) async fn find_expense(
    db: &DatabaseConnection,
    title: &str,
) -> Result<expense_entity::Model> {
    expense::get_expense_by_title(db, title)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("Expense '{title}' not found. Use `/expenses` to list them."),
        })
}

/// Finds installment `number` of the live expense titled `title`.
pub(crate) async fn find_installment(
    db: &DatabaseConnection,
    title: &str,
    number: i64,
) -> Result<(expense_entity::Model, installment::Model)> {
    let expense = find_expense(db, title).await?;
    let installments = crate::core::installment::get_installments_for_expense(db, expense.id).await?;
    let found = installments
        .into_iter()
        .find(|i| i64::from(i.installment_number) == number)
        .ok_or_else(|| Error::Validation {
            message: format!(
                "'{}' has no installment #{number} (it has {})",
                expense.title, expense.installments + expense.down_payment_installments
            ),
        })?;
    Ok((expense, found))
}

/// Parses a `YYYY-MM-DD` date typed by a member.
pub(crate) fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| Error::Validation {
        message: format!("'{input}' is not a date, use YYYY-MM-DD"),
    })
}

/// Sends a header followed by lines, split across as many messages as needed.
pub(crate) async fn say_lines(
    ctx: poise::Context<'_, BotData, Error>,
    header: &str,
    lines: &[String],
) -> Result<()> {
    let mut message = header.to_string();
    for line in lines {
        if message.len() + line.len() + 1 > MESSAGE_LIMIT {
            ctx.say(std::mem::take(&mut message)).await?;
        }
        if !message.is_empty() {
            message.push('\n');
        }
        message.push_str(line);
    }
    if !message.is_empty() {
        ctx.say(message).await?;
    }
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = if error.is_validation() {
                format!("❌ {error}")
            } else {
                error!("Error in command `{}`: {error:?}", ctx.command().name);
                "⚠️ Something went wrong while talking to the database. Please try again.".to_string()
            };
            if let Err(e) = ctx.say(reply).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the poise framework and runs the Discord client until it stops.
#[instrument(skip(token, database))]
pub async fn run_bot(token: String, database: DatabaseConnection, rules: Rules) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::expense_new(),
                commands::expenses(),
                commands::expense_info(),
                commands::expense_delete(),
                commands::paid_expenses(),
                commands::pay(),
                commands::pay_equally(),
                commands::settle(),
                commands::refund(),
                commands::reopen(),
                commands::edit_installment(),
                commands::balances(),
                commands::debts(),
                commands::upcoming(),
                commands::overdue(),
                commands::new_expenses(),
                commands::dismiss(),
                commands::categories_report(),
                commands::payment_status(),
                commands::logs(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                let dev_guild = std::env::var("DEV_GUILD_ID")
                    .ok()
                    .and_then(|id| id.parse::<u64>().ok());
                if let Some(guild_id) = dev_guild {
                    let guild_id = serenity::GuildId::new(guild_id);
                    poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                        .await?;
                    info!("Registered commands in guild {guild_id}");
                } else {
                    info!("Registering commands globally...");
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                }
                Ok(BotData::new(database, rules))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    if let Err(why) = client.start().await {
        warn!("Client stopped: {why:?}");
        return Err(why.into());
    }
    Ok(())
}

pub use commands::*;
pub use handlers::*;
