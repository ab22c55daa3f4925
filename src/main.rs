use dotenvy::dotenv;
use orca_ai::{
    ai::GeminiAdvisor,
    bot::{self, BotData},
    config::{self, database},
    core::{reference::FileNameSource, seed},
    errors::{Error, Result},
};
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()?;
    info!(
        database_url = %app_config.database_url,
        model = %app_config.ai.model,
        "Configuration loaded"
    );

    // 4. Open the session store and create its tables
    let db = database::create_connection(&app_config.database_url)
        .await
        .inspect_err(|e| error!("Failed to open the store: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. Seed sample data into an empty store
    seed::seed_store(&db, &app_config.seed)
        .await
        .inspect_err(|e| error!("Failed to seed the store: {e}"))?;

    // 6. Build the AI collaborator
    let advisor = GeminiAdvisor::new(app_config.ai.clone())?;

    // 7. Run the bot
    // DISCORD_BOT_TOKEN is read here, directly before use, and never stored in AppConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    let data = BotData::new(
        db,
        Arc::new(advisor),
        Arc::new(FileNameSource),
        app_config.seed.import.default_region.clone(),
    );
    bot::run_bot(token, data).await
}
