//! Name and version resolution shared by the commands.
//!
//! Each helper answers the user itself when nothing matches and returns `None`,
//! so commands can simply bail out.

use crate::{
    bot::BotData,
    core::{budget, project},
    entities::{budget as budget_entity, project as project_entity},
    errors::{Error, Result},
};

/// Picks one of a project's budgets.
///
/// A budget id selects that exact budget, which is how an older sibling of a
/// branched version is reached. Otherwise the newest id among the matching
/// version wins, and without a version the active budget is chosen.
#[must_use]
pub fn pick_budget(
    budgets: &[budget_entity::Model],
    version: Option<i32>,
    budget_id: Option<i64>,
) -> Option<&budget_entity::Model> {
    budgets
        .iter()
        .filter(|b| budget_id.is_none_or(|id| b.id == id))
        .filter(|b| version.is_none_or(|v| b.version == v))
        .max_by_key(|b| (b.version, b.id))
}

/// Finds a project by name, telling the user when it does not exist.
pub async fn find_project(
    ctx: poise::Context<'_, BotData, Error>,
    name: &str,
) -> Result<Option<project_entity::Model>> {
    let found = project::get_project_by_name(&ctx.data().database, name).await?;
    if found.is_none() {
        ctx.say(format!("❌ Projeto '{name}' não encontrado.")).await?;
    }
    Ok(found)
}

/// Finds a project and one of its budgets, see [`pick_budget`].
pub async fn find_budget(
    ctx: poise::Context<'_, BotData, Error>,
    project_name: &str,
    version: Option<i32>,
    budget_id: Option<i64>,
) -> Result<Option<(project_entity::Model, budget_entity::Model)>> {
    let Some(project) = find_project(ctx, project_name).await? else {
        return Ok(None);
    };

    let budgets = budget::get_budgets_for_project(&ctx.data().database, project.id).await?;
    let Some(selected) = pick_budget(&budgets, version, budget_id).cloned() else {
        let message = match (budget_id, version) {
            (Some(id), _) => format!("❌ O orçamento #{id} não pertence a '{}'.", project.name),
            (None, Some(v)) => format!("❌ O projeto '{}' não tem a versão {v}.", project.name),
            (None, None) => format!("❌ O projeto '{}' não tem orçamento.", project.name),
        };
        ctx.say(message).await?;
        return Ok(None);
    };

    Ok(Some((project, selected)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::BudgetStatus;

    fn budget(id: i64, version: i32) -> budget_entity::Model {
        budget_entity::Model {
            id,
            project_id: 1,
            version,
            bdi: 20.0,
            created_at: chrono::Utc::now(),
            status: BudgetStatus::Draft,
        }
    }

    #[test]
    fn test_pick_budget_by_version() {
        let budgets = vec![budget(1, 1), budget(2, 2), budget(3, 2), budget(4, 1)];

        assert_eq!(pick_budget(&budgets, None, None).map(|b| b.id), Some(3));
        assert_eq!(pick_budget(&budgets, Some(1), None).map(|b| b.id), Some(4));
        assert!(pick_budget(&budgets, Some(9), None).is_none());
        assert!(pick_budget(&[], None, None).is_none());
    }

    #[test]
    fn test_pick_budget_reaches_older_branch() {
        let budgets = vec![budget(1, 1), budget(2, 2), budget(3, 2)];

        assert_eq!(pick_budget(&budgets, None, Some(2)).map(|b| b.id), Some(2));
        assert_eq!(pick_budget(&budgets, Some(2), Some(2)).map(|b| b.id), Some(2));
        assert!(pick_budget(&budgets, Some(1), Some(2)).is_none());
        assert!(pick_budget(&budgets, None, Some(99)).is_none());
    }
}
