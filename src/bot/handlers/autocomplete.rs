//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions respect the same owner scope as the commands they feed, so staff
//! are only offered products and transactions they could act on.

use crate::{
    bot::BotData,
    core::{category::Category, product, transaction},
    errors::Error,
};

/// Discord shows at most this many suggestions.
const MAX_SUGGESTIONS: usize = 25;

/// Transactions scanned for id suggestions.
const RECENT_TRANSACTIONS: u64 = 50;

/// Resolves the owner scope for the invoking user, or `None` if unregistered.
fn invoker_scope(ctx: &poise::Context<'_, BotData, Error>) -> Option<Option<String>> {
    let discord_id = ctx.author().id.to_string();
    let data = ctx.data();
    let operator = data.operator_for(&discord_id)?;
    Some(data.shop.scope_for(operator).map(str::to_string))
}

/// Names containing `partial` (case-insensitive), sorted, capped at the Discord limit.
#[must_use]
pub fn matching_names<I>(names: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let partial_lower = partial.trim().to_lowercase();
    let mut matching: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .collect();
    matching.sort();
    matching.truncate(MAX_SUGGESTIONS);
    matching
}

/// Category keys whose key or label contains `partial`.
#[must_use]
pub fn matching_categories(partial: &str) -> Vec<String> {
    let partial_lower = partial.trim().to_lowercase();
    Category::ALL
        .iter()
        .filter(|c| {
            c.key().contains(&partial_lower) || c.label().to_lowercase().contains(&partial_lower)
        })
        .map(|c| c.key().to_string())
        .collect()
}

/// Provides autocomplete suggestions for product names.
pub async fn autocomplete_product_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Some(scope) = invoker_scope(&ctx) else {
        return Vec::new();
    };
    let Ok(products) = product::get_all_products(&ctx.data().database, scope.as_deref()).await
    else {
        return Vec::new();
    };

    matching_names(products.into_iter().map(|p| p.name), partial)
}

/// Provides autocomplete suggestions for category keys.
#[allow(clippy::unused_async)]
pub async fn autocomplete_category(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching_categories(partial)
}

/// Provides autocomplete suggestions for recent transaction ids (newest first).
pub async fn autocomplete_transaction_id(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Some(scope) = invoker_scope(&ctx) else {
        return Vec::new();
    };
    let Ok(recent) = transaction::get_recent_transactions(
        &ctx.data().database,
        scope.as_deref(),
        RECENT_TRANSACTIONS,
    )
    .await
    else {
        return Vec::new();
    };

    let partial = partial.trim();
    recent
        .into_iter()
        .map(|t| t.id)
        .filter(|id| id.starts_with(partial))
        .take(MAX_SUGGESTIONS)
        .collect()
}
