//! Realized cost business logic - Budgeted vs. actual tracking.
//!
//! Costs hang off the project, not a budget version. The budgeted figure used
//! for comparison is the sell price of the project's active budget, computed
//! from its items at the moment of the comparison.

use crate::{
    core::{budget, project},
    entities::{RealizedCost, realized_cost},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Category used when none is given
pub const DEFAULT_COST_CATEGORY: &str = "Material";

/// Input for [`add_realized_cost`]
#[derive(Debug, Clone)]
pub struct NewRealizedCost {
    /// Project the money was spent on
    pub project_id: i64,
    /// What was paid
    pub description: String,
    /// Amount, must be positive
    pub amount: f64,
    /// Category; [`DEFAULT_COST_CATEGORY`] when omitted
    pub category: Option<String>,
    /// Date; today when omitted
    pub date: Option<NaiveDate>,
}

/// Budgeted vs. realized figures for a project.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostComparison {
    /// Sell price of the active budget
    pub budgeted: f64,
    /// Sum of realized costs
    pub realized: f64,
    /// `(realized - budgeted) / budgeted * 100`, or 0 when nothing is budgeted
    pub variance_percent: f64,
}

impl CostComparison {
    /// True when more has been spent than budgeted
    #[must_use]
    pub fn is_over_budget(&self) -> bool {
        self.variance_percent > 0.0
    }
}

/// Compares a budgeted total with a list of realized costs.
#[must_use]
pub fn compare(budgeted: f64, costs: &[realized_cost::Model]) -> CostComparison {
    let realized: f64 = costs.iter().map(|cost| cost.amount).sum();
    let variance_percent = if budgeted > 0.0 {
        (realized - budgeted) / budgeted * 100.0
    } else {
        0.0
    };

    CostComparison {
        budgeted,
        realized,
        variance_percent,
    }
}

/// Records money spent on a project.
///
/// # Errors
/// Returns an error if the description is blank, the amount is not a positive
/// finite number, or the project does not exist.
pub async fn add_realized_cost(
    db: &DatabaseConnection,
    new: NewRealizedCost,
) -> Result<realized_cost::Model> {
    let description = new.description.trim().to_string();
    if description.is_empty() {
        return Err(Error::EmptyField {
            field: "description",
        });
    }
    if !new.amount.is_finite() || new.amount <= 0.0 {
        return Err(Error::InvalidAmount { amount: new.amount });
    }
    if project::get_project_by_id(db, new.project_id).await?.is_none() {
        return Err(Error::ProjectNotFound {
            name: new.project_id.to_string(),
        });
    }

    let category = new
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_COST_CATEGORY.to_string());

    let cost = realized_cost::ActiveModel {
        project_id: Set(new.project_id),
        description: Set(description),
        amount: Set(new.amount),
        date: Set(new
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive())),
        category: Set(category),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::debug!(cost_id = cost.id, project_id = cost.project_id, "Realized cost recorded");
    Ok(cost)
}

/// Lists a project's costs, oldest first.
pub async fn get_costs_for_project(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<Vec<realized_cost::Model>> {
    RealizedCost::find()
        .filter(realized_cost::Column::ProjectId.eq(project_id))
        .order_by_asc(realized_cost::Column::Date)
        .order_by_asc(realized_cost::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Removes a realized cost.
///
/// # Errors
/// Returns [`Error::CostNotFound`] if no cost has this id.
pub async fn delete_realized_cost(db: &DatabaseConnection, cost_id: i64) -> Result<()> {
    let result = RealizedCost::delete_by_id(cost_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::CostNotFound { id: cost_id });
    }
    Ok(())
}

/// Compares the active budget's sell price with everything spent so far.
/// A project without any budget compares against zero.
pub async fn compare_budget_to_actual(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<CostComparison> {
    let budgeted = budget::load_active_sheet(db, project_id)
        .await?
        .map_or(0.0, |sheet| sheet.totals().sell_price);
    let costs = get_costs_for_project(db, project_id).await?;
    Ok(compare(budgeted, &costs))
}
