//! Populates a fresh store from [`SeedConfig`].

use crate::{
    config::seed::SeedConfig,
    core::{budget, catalog, client, reference},
    entities::{Project, budget_item, project},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::info;

/// Summary of what [`seed_store`] inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Catalog compositions
    pub catalog_items: usize,
    /// Clients
    pub clients: usize,
    /// Projects
    pub projects: usize,
    /// Budget versions
    pub budgets: usize,
    /// Budget lines
    pub items: usize,
    /// Reference tables
    pub reference_tables: usize,
}

/// Loads the seed records into an empty store inside one transaction.
///
/// Returns `None` without writing anything if the store already holds projects.
///
/// # Errors
/// Returns [`Error::Config`] when a budget names a project that is not part of
/// the seed, [`Error::DuplicateProject`] when two seeded projects share a name,
/// and any store error. Either way nothing is written.
pub async fn seed_store(db: &DatabaseConnection, seed: &SeedConfig) -> Result<Option<SeedSummary>> {
    if Project::find().count(db).await? > 0 {
        info!("Store already populated, skipping seed");
        return Ok(None);
    }

    let txn = db.begin().await?;
    let mut summary = SeedSummary::default();

    for entry in &seed.catalog {
        catalog::create_catalog_item(
            &txn,
            catalog::NewCatalogItem {
                code: entry.code.clone(),
                description: entry.description.clone(),
                unit: entry.unit.clone(),
                unit_price: entry.unit_price,
                category: entry.category.clone(),
                source: entry.source,
            },
        )
        .await?;
        summary.catalog_items += 1;
    }

    for entry in &seed.clients {
        client::create_client(
            &txn,
            client::NewClient {
                name: entry.name.clone(),
                email: entry.email.clone(),
                phone: entry.phone.clone(),
                company: entry.company.clone(),
            },
        )
        .await?;
        summary.clients += 1;
    }

    let mut project_ids = HashMap::new();
    for entry in &seed.projects {
        if project_ids.contains_key(entry.name.as_str()) {
            return Err(Error::DuplicateProject {
                name: entry.name.clone(),
            });
        }
        let project = project::ActiveModel {
            name: Set(entry.name.clone()),
            client: Set(entry.client.clone()),
            address: Set(entry.address.clone()),
            status: Set(entry.status),
            total_budget: Set(entry.total_budget),
            start_date: Set(entry.start_date),
            completion_percentage: Set(entry.completion_percentage),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        project_ids.insert(entry.name.as_str(), project.id);
        summary.projects += 1;
    }

    for entry in &seed.budgets {
        let project_id = *project_ids
            .get(entry.project.as_str())
            .ok_or_else(|| Error::Config {
                message: format!("Budget refers to unknown project '{}'", entry.project),
            })?;

        let created =
            budget::create_budget(&txn, project_id, entry.version, entry.bdi, entry.status).await?;
        summary.budgets += 1;

        for (position, item) in (0_i32..).zip(&entry.items) {
            budget_item::ActiveModel {
                budget_id: Set(created.id),
                position: Set(position),
                code: Set(item.code.clone()),
                description: Set(item.description.clone()),
                unit: Set(item.unit.clone()),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                total_price: Set(item.line_total()),
                category: Set(item.category.clone()),
                source: Set(item.source),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            summary.items += 1;
        }
    }

    for entry in &seed.reference_tables {
        reference::insert_reference_table(
            &txn,
            entry.name.clone(),
            entry.kind,
            entry.region.clone(),
            entry.date,
        )
        .await?;
        summary.reference_tables += 1;
    }

    txn.commit().await?;

    info!(
        projects = summary.projects,
        budgets = summary.budgets,
        items = summary.items,
        catalog = summary.catalog_items,
        "Store seeded"
    );
    Ok(Some(summary))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::config::seed::parse_seed_config;
    use crate::core::{budget::load_active_sheet, project::get_project_by_name};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_builtin_seed_matches_sample_data() -> Result<()> {
        let db = setup_test_db().await?;

        let summary = seed_store(&db, &SeedConfig::builtin()).await?;
        assert_eq!(
            summary,
            Some(SeedSummary {
                catalog_items: 4,
                clients: 2,
                projects: 2,
                budgets: 2,
                items: 2,
                reference_tables: 1,
            })
        );

        let alpha = get_project_by_name(&db, "Residencial Alpha")
            .await?
            .ok_or(Error::ProjectNotFound {
                name: "Residencial Alpha".to_string(),
            })?;
        let sheet = load_active_sheet(&db, alpha.id)
            .await?
            .ok_or(Error::BudgetNotFound {
                id: "active".to_string(),
            })?;
        let totals = sheet.totals();
        assert_eq!(totals.direct_cost, 18_944.0);
        assert_eq!(totals.markup_amount, 4_736.0);
        assert_eq!(totals.sell_price, 23_680.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_is_skipped_when_populated() -> Result<()> {
        let db = setup_test_db().await?;
        seed_store(&db, &SeedConfig::builtin()).await?;
        assert_eq!(seed_store(&db, &SeedConfig::builtin()).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_project_rolls_back() -> Result<()> {
        let db = setup_test_db().await?;
        let seed = parse_seed_config(
            r#"
            [[clients]]
            name = "Maria"

            [[budgets]]
            project = "Inexistente"
            bdi = 10.0
            "#,
        )?;

        let result = seed_store(&db, &seed).await;
        assert!(matches!(result, Err(Error::Config { .. })));
        assert!(crate::core::client::get_all_clients(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_seed_project_rolls_back() -> Result<()> {
        let db = setup_test_db().await?;
        let seed = parse_seed_config(
            r#"
            [[projects]]
            name = "Obra"
            client = "Maria"
            address = "Rua A"
            status = "planning"
            start_date = "2024-01-10"

            [[projects]]
            name = "Obra"
            client = "João"
            address = "Rua B"
            status = "active"
            start_date = "2024-02-10"
            "#,
        )?;

        let result = seed_store(&db, &seed).await;
        assert!(matches!(result, Err(Error::DuplicateProject { .. })));
        assert!(crate::core::project::get_all_projects(&db).await?.is_empty());
        Ok(())
    }
}
