//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for `OrçaAI`: slash commands,
//! autocomplete handlers, the shared bot context and the framework setup.

/// Discord command implementations (projects, budgets, costs, consultant, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, lookups, replies)
pub mod handlers;

use crate::{
    ai::Advisor,
    core::{consultant::ConsultantSessions, reference::TableSource},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
pub struct BotData {
    /// Session store
    pub database: DatabaseConnection,
    /// AI collaborator used by the consultant
    pub advisor: Arc<dyn Advisor>,
    /// Consultant conversations per channel
    pub sessions: ConsultantSessions,
    /// Reads uploaded reference tables
    pub table_source: Arc<dyn TableSource>,
    /// Region stamped on imported tables
    pub import_region: String,
}

impl BotData {
    /// Creates the bot context with no conversations yet.
    #[must_use]
    pub fn new(
        database: DatabaseConnection,
        advisor: Arc<dyn Advisor>,
        table_source: Arc<dyn TableSource>,
        import_region: String,
    ) -> Self {
        Self {
            database,
            advisor,
            sessions: ConsultantSessions::new(),
            table_source,
            import_region,
        }
    }
}

/// Every command registered with Discord.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::project(),
        commands::client(),
        commands::budget(),
        commands::catalog(),
        commands::cost(),
        commands::table(),
        commands::ask(),
        commands::consultant_history(),
        commands::consultant_reset(),
        commands::budget_ask(),
        commands::analyze_plan(),
    ]
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx
                .say(format!("❌ Não foi possível concluir o comando: {error}"))
                .await
            {
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

/// Registers the commands globally and runs the Discord client until it stops.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("!".to_string()),
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names_are_unique() {
        let commands = all_commands();
        let mut names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_subcommands_are_registered() {
        let commands = all_commands();
        let budget = commands.iter().find(|c| c.name == "budget");
        let subcommands: Vec<&str> = budget
            .map(|c| c.subcommands.iter().map(|s| s.name.as_str()).collect())
            .unwrap_or_default();
        assert!(subcommands.contains(&"add_item"));
        assert!(subcommands.contains(&"revise"));
    }
}
