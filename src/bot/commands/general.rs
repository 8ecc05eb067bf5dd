//! General Discord commands - ping and help.
//! This module contains simple commands that don't require database operations.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**ExpenseBuddy Help**\n\
        Shared household expenses, split into installments and settled between members.\n\n\
        **Expenses**\n\
        • `/expense_new <title> <amount> <category> [installments] [start] [priority] [down_payment] [down_payment_installments] [fixed] [notes]` - Creates an expense and its installments.\n\
        • `/expenses` - Lists open expenses.\n\
        • `/expense_info <expense>` - Shows installments and who paid them.\n\
        • `/expense_delete <expense> <reason>` - Deletes an expense (keeps its history).\n\
        • `/paid_expenses [from] [to]` - Lists fully paid expenses.\n\n\
        **Payments**\n\
        • `/pay <expense> <installment> <amount> [notes] [payer]` - Records a payment (yours by default).\n\
        • `/pay_equally <expense> <installment>` - Everyone paid an equal share.\n\
        • `/settle <expense> <installments> [payers]` - Splits several installments between payers (default everyone).\n\
        • `/refund <contribution> <reason>` - Reverts a payment.\n\
        • `/reopen <expense> <installment> <reason>` - Marks a paid installment as pending again.\n\
        • `/edit_installment <expense> <installment> [amount] [due]` - Changes amount or due date.\n\n\
        **Reports**\n\
        • `/balances`, `/debts`, `/payment_status`, `/categories_report`\n\
        • `/upcoming`, `/overdue`, `/new_expenses`, `/dismiss <kind> <id>`\n\
        • `/logs [action] [limit]` - Shows the audit log.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
