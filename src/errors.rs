//! Unified error type for `OrçaAI`.
//!
//! Every fallible operation in the crate returns [`Result`]. Variants carry
//! enough context to produce a readable message in the bot layer.

use thiserror::Error;

/// All errors produced by the store, the consultant and the bot layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Underlying `SeaORM` / `SQLite` failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A required text field was empty or whitespace-only
    #[error("Field '{field}' cannot be empty")]
    EmptyField {
        /// Name of the offending field
        field: &'static str,
    },

    /// A monetary amount was zero, negative or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected value
        amount: f64,
    },

    /// A line-item quantity was negative or not finite
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected value
        quantity: f64,
    },

    /// A BDI percentage was negative or not finite
    #[error("Invalid BDI percentage: {bdi}")]
    InvalidBdi {
        /// The rejected value
        bdi: f64,
    },

    /// A completion percentage outside 0..=100
    #[error("Invalid completion percentage: {percentage}")]
    InvalidPercentage {
        /// The rejected value
        percentage: i32,
    },

    /// Project lookup failed
    #[error("Project not found: {name}")]
    ProjectNotFound {
        /// Name or id used for the lookup
        name: String,
    },

    /// A project with this name already exists
    #[error("Project already exists: {name}")]
    DuplicateProject {
        /// The name that is taken
        name: String,
    },

    /// Client lookup failed
    #[error("Client not found: {name}")]
    ClientNotFound {
        /// Name or id used for the lookup
        name: String,
    },

    /// Budget lookup failed
    #[error("Budget not found: {id}")]
    BudgetNotFound {
        /// Budget id or project reference
        id: String,
    },

    /// Budget line item lookup failed
    #[error("Budget item not found: {id}")]
    ItemNotFound {
        /// Item id
        id: i64,
    },

    /// Reference catalog lookup failed
    #[error("Catalog item not found: {code}")]
    CatalogItemNotFound {
        /// Composition code, e.g. `SINAPI-87301`
        code: String,
    },

    /// Realized cost lookup failed
    #[error("Realized cost not found: {id}")]
    CostNotFound {
        /// Cost id
        id: i64,
    },

    /// The external completion service failed
    #[error("AI request failed: {message}")]
    Ai {
        /// Description of the failure
        message: String,
    },

    /// A consultant request is already in flight for this conversation
    #[error("A consultant request is already in progress")]
    ConsultantBusy,

    /// A consultant submission had neither text nor image
    #[error("Nothing to send to the consultant")]
    EmptySubmission,

    /// I/O failure (config file, attachments)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable lookup failed
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// String formatting failed while building a reply
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// HTTP client failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serenity/Poise framework failure
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
