//! Session store configuration for `OrçaAI`.
//!
//! The store is a `SQLite` database reached through `SeaORM`. By default it is an
//! in-memory database, so its contents live exactly as long as the process.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust structs.

use crate::entities::{
    Budget, BudgetItem, CatalogItem, Client, Project, RealizedCost, ReferenceTable,
};
use crate::errors::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::time::Duration;

/// Default store: private in-memory database
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

// An in-memory SQLite database disappears with its connection.
const SESSION_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Gets the database URL from the `DATABASE_URL` environment variable or returns
/// the in-memory default.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Returns true when `url` points at an in-memory `SQLite` database.
#[must_use]
pub fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Opens the store.
///
/// In-memory URLs get a pool of exactly one connection that is never recycled,
/// so every query sees the same database for the whole session.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_string());
    if is_memory_url(database_url) {
        options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(SESSION_LIFETIME)
            .max_lifetime(SESSION_LIFETIME);
    }
    options.sqlx_logging(false);

    Database::connect(options).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions.
///
/// Parents are created before children so the generated foreign keys resolve.
/// Existing tables are left alone, so a file-backed store can be reopened.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = [
        schema.create_table_from_entity(Project),
        schema.create_table_from_entity(Client),
        schema.create_table_from_entity(Budget),
        schema.create_table_from_entity(BudgetItem),
        schema.create_table_from_entity(RealizedCost),
        schema.create_table_from_entity(ReferenceTable),
        schema.create_table_from_entity(CatalogItem),
    ];

    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(&*statement)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::seed::SeedConfig;
    use crate::entities::{BudgetItemModel, BudgetModel, CatalogItemModel, ProjectModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[test]
    fn test_is_memory_url() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite:file:orca?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite://data/orca.sqlite"));
    }

    #[tokio::test]
    async fn test_create_connection_in_memory() -> Result<()> {
        let db = create_connection(DEFAULT_DATABASE_URL).await?;
        create_tables(&db).await?;

        let _: Vec<ProjectModel> = Project::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_survives_restart() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("orca.sqlite").display());
        assert!(!is_memory_url(&url));

        let db = create_connection(&url).await?;
        create_tables(&db).await?;
        let first = crate::core::seed::seed_store(&db, &SeedConfig::builtin()).await?;
        assert!(first.is_some());
        db.close().await?;

        let reopened = create_connection(&url).await?;
        create_tables(&reopened).await?;
        let second = crate::core::seed::seed_store(&reopened, &SeedConfig::builtin()).await?;
        assert_eq!(second, None);
        assert_eq!(Project::find().all(&reopened).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection(DEFAULT_DATABASE_URL).await?;
        create_tables(&db).await?;

        let _: Vec<BudgetModel> = Budget::find().limit(1).all(&db).await?;
        let _: Vec<BudgetItemModel> = BudgetItem::find().limit(1).all(&db).await?;
        let _: Vec<CatalogItemModel> = CatalogItem::find().limit(1).all(&db).await?;
        let _ = Client::find().limit(1).all(&db).await?;
        let _ = RealizedCost::find().limit(1).all(&db).await?;
        let _ = ReferenceTable::find().limit(1).all(&db).await?;
        Ok(())
    }
}
