//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are filtered case-insensitively and capped at Discord's limit
//! of 25 entries.

use crate::{
    bot::BotData,
    core::{catalog, client, project},
    errors::Error,
};

const DISCORD_CHOICE_LIMIT: usize = 25;

/// Returns `names` containing `partial`, sorted, at most 25.
#[must_use]
pub fn filter_suggestions(names: Vec<String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .collect();
    matching.sort();
    matching.dedup();
    matching.truncate(DISCORD_CHOICE_LIMIT);
    matching
}

/// Suggests project names.
pub async fn autocomplete_project_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(projects) = project::get_all_projects(&ctx.data().database).await else {
        return Vec::new();
    };
    filter_suggestions(projects.into_iter().map(|p| p.name).collect(), partial)
}

/// Suggests client names.
pub async fn autocomplete_client_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(clients) = client::get_all_clients(&ctx.data().database).await else {
        return Vec::new();
    };
    filter_suggestions(clients.into_iter().map(|c| c.name).collect(), partial)
}

/// Suggests catalog codes, matching the typed text against code or description.
///
/// The suggestion value is the bare code so it can be passed straight to
/// [`crate::core::item::add_catalog_item`].
pub async fn autocomplete_catalog_code(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(entries) = catalog::search_catalog(&ctx.data().database, partial).await else {
        return Vec::new();
    };
    entries
        .into_iter()
        .map(|entry| entry.code)
        .take(DISCORD_CHOICE_LIMIT)
        .collect()
}

/// Realized-cost categories offered as suggestions
pub const COST_CATEGORIES: [&str; 6] = [
    "Material",
    "Mão de obra",
    "Equipamentos",
    "Serviços terceirizados",
    "Administração",
    "Outros",
];

/// Cost categories containing `partial`, in their listed order.
#[must_use]
pub fn matching_cost_categories(partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    COST_CATEGORIES
        .iter()
        .filter(|cat| cat.to_lowercase().contains(&partial_lower))
        .map(|&cat| cat.to_string())
        .collect()
}

/// Suggests common realized-cost categories.
pub async fn autocomplete_cost_category(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching_cost_categories(partial)
}
