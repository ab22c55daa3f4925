//! Shared test utilities for `OrçaAI`.
//!
//! Helpers for building an in-memory store and filling it with projects,
//! budget lines and catalog compositions.

use crate::{
    config::{self, seed::SeedConfig},
    core::{
        catalog::{self, NewCatalogItem},
        project::{self, NewProject},
    },
    entities::{ItemSource, budget, budget_item, project as project_entity},
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` store with all tables initialized.
/// This is the standard setup for all store tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = config::database::create_connection("sqlite::memory:").await?;
    config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a project with defaults for everything but the name.
/// Returns the project and its version-1 budget (BDI 20, no items).
pub async fn create_test_project(
    db: &DatabaseConnection,
    name: &str,
) -> Result<(project_entity::Model, budget::Model)> {
    project::create_project(
        db,
        NewProject {
            name: name.to_string(),
            ..NewProject::default()
        },
    )
    .await
}

/// Sets up a store with one project named "Obra Teste".
pub async fn setup_with_project() -> Result<(
    DatabaseConnection,
    project_entity::Model,
    budget::Model,
)> {
    let db = setup_test_db().await?;
    let (project, budget) = create_test_project(&db, "Obra Teste").await?;
    Ok((db, project, budget))
}

/// Appends an own-source line with `total_price = quantity * unit_price`.
///
/// Position follows the number of lines already present; the code and
/// description are derived from it ("OWN-<n>", "Item <n>").
pub async fn add_test_item(
    db: &DatabaseConnection,
    budget_id: i64,
    quantity: f64,
    unit_price: f64,
) -> Result<budget_item::Model> {
    let existing = crate::core::budget::get_budget_items(db, budget_id).await?;
    let position = i32::try_from(existing.len()).unwrap_or(i32::MAX);

    let item = budget_item::ActiveModel {
        budget_id: Set(budget_id),
        position: Set(position),
        code: Set(format!("OWN-{position}")),
        description: Set(format!("Item {position}")),
        unit: Set("UN".to_string()),
        quantity: Set(quantity),
        unit_price: Set(unit_price),
        total_price: Set(quantity * unit_price),
        category: Set("GERAL".to_string()),
        source: Set(ItemSource::Own),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(item)
}

/// Inserts the four built-in catalog compositions.
pub async fn seed_test_catalog(db: &DatabaseConnection) -> Result<()> {
    for entry in SeedConfig::builtin().catalog {
        catalog::create_catalog_item(
            db,
            NewCatalogItem {
                code: entry.code,
                description: entry.description,
                unit: entry.unit,
                unit_price: entry.unit_price,
                category: entry.category,
                source: entry.source,
            },
        )
        .await?;
    }
    Ok(())
}
