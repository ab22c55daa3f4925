//! Configuration for `OrçaAI`: store connection, seed data and the AI collaborator.

/// Gemini credentials and request settings from environment variables
pub mod ai;

/// Session store connection and table creation
pub mod database;

/// Seed data loading from config.toml
pub mod seed;

use crate::errors::Result;
use tracing::{info, warn};

/// Everything the binary needs to start, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `SeaORM` connection URL
    pub database_url: String,
    /// Initial store contents and import defaults
    pub seed: seed::SeedConfig,
    /// AI collaborator settings
    pub ai: ai::AiConfig,
}

/// Resolves the application configuration from the environment and `config.toml`.
///
/// A missing seed file is not an error: the built-in sample data is used instead.
/// A seed file that exists but does not parse is reported as [`crate::errors::Error::Config`].
pub fn load_app_configuration() -> Result<AppConfig> {
    let database_url = database::get_database_url();
    let seed_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());

    let seed = if std::path::Path::new(&seed_path).exists() {
        info!("Loading seed data from {seed_path}");
        seed::load_seed_config(&seed_path)?
    } else {
        warn!("{seed_path} not found, using built-in sample data");
        seed::SeedConfig::builtin()
    };

    let ai = ai::AiConfig::from_env();
    if ai.api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; consultant replies will fall back to error messages");
    }

    Ok(AppConfig {
        database_url,
        seed,
        ai,
    })
}
