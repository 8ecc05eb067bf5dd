//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are capped at 25, the Discord autocomplete limit.

use crate::{
    bot::BotData,
    core::{expense, member},
    errors::Error,
};

const AUTOCOMPLETE_LIMIT: usize = 25;

fn matching(names: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();

    let mut found: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .collect();
    found.sort();
    found.dedup();
    found.truncate(AUTOCOMPLETE_LIMIT);
    found
}

/// Suggests titles of live expenses that still have open installments.
pub async fn autocomplete_expense_title(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(expenses) = expense::get_open_expenses(&ctx.data().database).await else {
        return Vec::new();
    };

    matching(expenses.into_iter().map(|e| e.title), partial)
}

/// Suggests titles of every live expense, paid ones included.
pub async fn autocomplete_any_expense_title(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(expenses) = expense::get_all_live_expenses(&ctx.data().database).await else {
        return Vec::new();
    };

    matching(expenses.into_iter().map(|e| e.title), partial)
}

/// Suggests configured category names.
pub async fn autocomplete_category(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(categories) = member::list_categories(&ctx.data().database).await else {
        return Vec::new();
    };

    matching(categories.into_iter().map(|c| c.name), partial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_is_case_insensitive_sorted_and_unique() {
        let names = ["Rent", "Internet", "rent deposit", "Rent"].map(String::from);
        assert_eq!(matching(names, "REN"), vec!["Rent", "rent deposit"]);
    }

    #[test]
    fn test_matching_caps_suggestions() {
        let names = (0..40).map(|i| format!("Expense {i:02}"));
        let found = matching(names, "");
        assert_eq!(found.len(), AUTOCOMPLETE_LIMIT);
        assert_eq!(found[0], "Expense 00");
    }
}
