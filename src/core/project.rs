//! Project business logic - Creating and tracking construction jobs.
//!
//! Creating a project also opens its first budget version so the budget editor
//! always has something to work on.

use crate::{
    core::budget,
    entities::{BudgetStatus, Project, ProjectStatus, budget as budget_entity, project},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};

/// Client recorded when the form leaves it blank
pub const DEFAULT_CLIENT_NAME: &str = "Cliente Padrão";
/// Address recorded when the form leaves it blank
pub const DEFAULT_ADDRESS: &str = "Endereço não informado";
/// BDI of the first budget version of a new project
pub const INITIAL_BDI: f64 = 20.0;

/// Input for [`create_project`]. Only the name is required.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    /// Project name
    pub name: String,
    /// Client name, free text
    pub client: Option<String>,
    /// Site address
    pub address: Option<String>,
    /// Start date; today when omitted
    pub start_date: Option<NaiveDate>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Creates a project in the planning stage together with its version-1 budget.
///
/// Both rows are written in one transaction. The budget starts empty, as a
/// draft, with a BDI of [`INITIAL_BDI`].
///
/// Project names are unique because every command addresses projects by name.
///
/// # Errors
/// Returns [`Error::EmptyField`] if the name is blank and
/// [`Error::DuplicateProject`] if another project already uses it.
pub async fn create_project(
    db: &DatabaseConnection,
    new: NewProject,
) -> Result<(project::Model, budget_entity::Model)> {
    let name = new.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::EmptyField { field: "name" });
    }

    let start_date = new
        .start_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let txn = db.begin().await?;

    if get_project_by_name(&txn, &name).await?.is_some() {
        return Err(Error::DuplicateProject { name });
    }

    let project = project::ActiveModel {
        name: Set(name),
        client: Set(non_blank(new.client).unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_string())),
        address: Set(non_blank(new.address).unwrap_or_else(|| DEFAULT_ADDRESS.to_string())),
        status: Set(ProjectStatus::Planning),
        total_budget: Set(0.0),
        start_date: Set(start_date),
        completion_percentage: Set(0),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let budget = budget::create_budget(&txn, project.id, 1, INITIAL_BDI, BudgetStatus::Draft).await?;

    txn.commit().await?;

    tracing::info!(project_id = project.id, name = %project.name, "Project created");
    Ok((project, budget))
}

/// Lists all projects in creation order.
pub async fn get_all_projects(db: &DatabaseConnection) -> Result<Vec<project::Model>> {
    Project::find()
        .order_by_asc(project::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a project by id.
pub async fn get_project_by_id(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<Option<project::Model>> {
    Project::find_by_id(project_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a project by its exact name.
pub async fn get_project_by_name<C>(db: &C, name: &str) -> Result<Option<project::Model>>
where
    C: ConnectionTrait,
{
    Project::find()
        .filter(project::Column::Name.eq(name.trim()))
        .order_by_asc(project::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists projects whose free-text client equals `client_name`.
pub async fn get_projects_for_client(
    db: &DatabaseConnection,
    client_name: &str,
) -> Result<Vec<project::Model>> {
    Project::find()
        .filter(project::Column::Client.eq(client_name.trim()))
        .order_by_asc(project::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn require_project(db: &DatabaseConnection, project_id: i64) -> Result<project::Model> {
    get_project_by_id(db, project_id)
        .await?
        .ok_or_else(|| Error::ProjectNotFound {
            name: project_id.to_string(),
        })
}

/// Moves a project to any lifecycle stage.
pub async fn set_project_status(
    db: &DatabaseConnection,
    project_id: i64,
    status: ProjectStatus,
) -> Result<project::Model> {
    let project = require_project(db, project_id).await?;
    let mut active: project::ActiveModel = project.into();
    active.status = Set(status);
    active.update(db).await.map_err(Into::into)
}

/// Records physical progress.
///
/// # Errors
/// Returns [`Error::InvalidPercentage`] outside `0..=100`.
pub async fn set_completion_percentage(
    db: &DatabaseConnection,
    project_id: i64,
    percentage: i32,
) -> Result<project::Model> {
    if !(0..=100).contains(&percentage) {
        return Err(Error::InvalidPercentage { percentage });
    }
    let project = require_project(db, project_id).await?;
    let mut active: project::ActiveModel = project.into();
    active.completion_percentage = Set(percentage);
    active.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::budget::{get_budgets_for_project, load_sheet};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_project_defaults() -> Result<()> {
        let db = setup_test_db().await?;

        let (project, budget) = create_project(
            &db,
            NewProject {
                name: "  Residencial Flores ".to_string(),
                client: Some("   ".to_string()),
                address: None,
                start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            },
        )
        .await?;

        assert_eq!(project.name, "Residencial Flores");
        assert_eq!(project.client, DEFAULT_CLIENT_NAME);
        assert_eq!(project.address, DEFAULT_ADDRESS);
        assert_eq!(project.status, ProjectStatus::Planning);
        assert_eq!(project.total_budget, 0.0);
        assert_eq!(project.completion_percentage, 0);

        assert_eq!(budget.project_id, project.id);
        assert_eq!(budget.version, 1);
        assert_eq!(budget.bdi, INITIAL_BDI);
        assert_eq!(budget.status, BudgetStatus::Draft);
        assert!(load_sheet(&db, budget.id).await?.items.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_project_requires_name() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_project(&db, NewProject::default()).await;
        assert!(matches!(result, Err(Error::EmptyField { field: "name" })));
        assert!(get_all_projects(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_project_name_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let (first, _) = create_test_project(&db, "Obra").await?;

        let result = create_test_project(&db, " Obra ").await;
        assert!(matches!(result, Err(Error::DuplicateProject { ref name }) if name == "Obra"));

        let projects = get_all_projects(&db).await?;
        assert_eq!(projects.len(), 1);
        assert_eq!(get_budgets_for_project(&db, first.id).await?.len(), 1);
        let found = get_project_by_name(&db, "Obra").await?;
        assert_eq!(found.map(|p| p.id), Some(first.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_each_project_gets_its_own_budget() -> Result<()> {
        let db = setup_test_db().await?;
        let (a, _) = create_test_project(&db, "Obra A").await?;
        let (b, _) = create_test_project(&db, "Obra B").await?;

        assert_eq!(get_budgets_for_project(&db, a.id).await?.len(), 1);
        assert_eq!(get_budgets_for_project(&db, b.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_status_transitions_are_unconstrained() -> Result<()> {
        let (db, project, _budget) = setup_with_project().await?;

        let done = set_project_status(&db, project.id, ProjectStatus::Completed).await?;
        assert_eq!(done.status, ProjectStatus::Completed);

        let back = set_project_status(&db, project.id, ProjectStatus::Planning).await?;
        assert_eq!(back.status, ProjectStatus::Planning);
        Ok(())
    }

    #[tokio::test]
    async fn test_completion_percentage_bounds() -> Result<()> {
        let (db, project, _budget) = setup_with_project().await?;

        let updated = set_completion_percentage(&db, project.id, 100).await?;
        assert_eq!(updated.completion_percentage, 100);

        let result = set_completion_percentage(&db, project.id, 101).await;
        assert!(matches!(result, Err(Error::InvalidPercentage { percentage: 101 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_by_name_and_client() -> Result<()> {
        let db = setup_test_db().await?;
        let (project, _) = create_project(
            &db,
            NewProject {
                name: "Galpão Norte".to_string(),
                client: Some("Tech Solutions".to_string()),
                ..NewProject::default()
            },
        )
        .await?;

        let found = get_project_by_name(&db, "Galpão Norte").await?;
        assert_eq!(found.map(|p| p.id), Some(project.id));

        let for_client = get_projects_for_client(&db, "Tech Solutions").await?;
        assert_eq!(for_client.len(), 1);
        assert!(get_projects_for_client(&db, "Outro").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_project() -> Result<()> {
        let db = setup_test_db().await?;
        let result = set_project_status(&db, 9, ProjectStatus::Active).await;
        assert!(matches!(result, Err(Error::ProjectNotFound { .. })));
        Ok(())
    }
}
