//! Budget business logic - Totals, version lineage and revisions.
//!
//! Totals are always derived from the current items and BDI when they are read;
//! nothing here stores a computed total. Revisions copy a budget and its items
//! into a new version and never touch the source.

use crate::{
    entities::{Budget, BudgetItem, BudgetStatus, budget, budget_item},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};

/// Derived money figures for a budget version.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetTotals {
    /// Sum of all line totals
    pub direct_cost: f64,
    /// `direct_cost * bdi / 100`
    pub markup_amount: f64,
    /// `direct_cost * (1 + bdi / 100)`
    pub sell_price: f64,
}

/// Computes direct cost, markup amount and sell price from line items and a BDI percentage.
///
/// An empty item list yields zero for every figure.
#[must_use]
pub fn compute_totals(items: &[budget_item::Model], bdi: f64) -> BudgetTotals {
    let direct_cost: f64 = items.iter().map(|item| item.total_price).sum();

    BudgetTotals {
        direct_cost,
        markup_amount: direct_cost * bdi / 100.0,
        sell_price: direct_cost * (1.0 + bdi / 100.0),
    }
}

/// A budget version together with its ordered line items.
#[derive(Debug, Clone)]
pub struct BudgetSheet {
    /// The budget record
    pub budget: budget::Model,
    /// Items in display order
    pub items: Vec<budget_item::Model>,
}

impl BudgetSheet {
    /// Totals for the current items and BDI
    #[must_use]
    pub fn totals(&self) -> BudgetTotals {
        compute_totals(&self.items, self.budget.bdi)
    }
}

/// Rejects BDI values that are negative or not finite.
pub fn validate_bdi(bdi: f64) -> Result<()> {
    if !bdi.is_finite() || bdi < 0.0 {
        return Err(Error::InvalidBdi { bdi });
    }
    Ok(())
}

/// Retrieves a budget version by id.
pub async fn get_budget_by_id<C>(db: &C, budget_id: i64) -> Result<Option<budget::Model>>
where
    C: ConnectionTrait,
{
    Budget::find_by_id(budget_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every budget version of a project, oldest version first.
pub async fn get_budgets_for_project(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<Vec<budget::Model>> {
    Budget::find()
        .filter(budget::Column::ProjectId.eq(project_id))
        .order_by_asc(budget::Column::Version)
        .order_by_asc(budget::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the version a project is currently edited in: the highest version,
/// and among branched revisions with the same number, the newest one.
pub async fn get_active_budget(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<Option<budget::Model>> {
    Budget::find()
        .filter(budget::Column::ProjectId.eq(project_id))
        .order_by_desc(budget::Column::Version)
        .order_by_desc(budget::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the items of a budget in display order.
pub async fn get_budget_items<C>(db: &C, budget_id: i64) -> Result<Vec<budget_item::Model>>
where
    C: ConnectionTrait,
{
    BudgetItem::find()
        .filter(budget_item::Column::BudgetId.eq(budget_id))
        .order_by_asc(budget_item::Column::Position)
        .order_by_asc(budget_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Loads a budget and its items.
///
/// # Errors
/// Returns [`Error::BudgetNotFound`] if no budget has this id.
pub async fn load_sheet(db: &DatabaseConnection, budget_id: i64) -> Result<BudgetSheet> {
    let budget = get_budget_by_id(db, budget_id)
        .await?
        .ok_or_else(|| Error::BudgetNotFound {
            id: budget_id.to_string(),
        })?;
    let items = get_budget_items(db, budget_id).await?;
    Ok(BudgetSheet { budget, items })
}

/// Loads the active budget of a project, if it has any.
pub async fn load_active_sheet(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<Option<BudgetSheet>> {
    let Some(budget) = get_active_budget(db, project_id).await? else {
        return Ok(None);
    };
    let items = get_budget_items(db, budget.id).await?;
    Ok(Some(BudgetSheet { budget, items }))
}

/// Inserts an empty budget version for a project.
pub async fn create_budget<C>(
    db: &C,
    project_id: i64,
    version: i32,
    bdi: f64,
    status: BudgetStatus,
) -> Result<budget::Model>
where
    C: ConnectionTrait,
{
    validate_bdi(bdi)?;

    let budget = budget::ActiveModel {
        project_id: Set(project_id),
        version: Set(version),
        bdi: Set(bdi),
        created_at: Set(chrono::Utc::now()),
        status: Set(status),
        ..Default::default()
    };
    budget.insert(db).await.map_err(Into::into)
}

/// Changes the BDI percentage of a budget version.
///
/// # Errors
/// Returns [`Error::InvalidBdi`] for negative or non-finite values and
/// [`Error::BudgetNotFound`] if the budget does not exist.
pub async fn set_bdi(db: &DatabaseConnection, budget_id: i64, bdi: f64) -> Result<budget::Model> {
    validate_bdi(bdi)?;

    let budget = get_budget_by_id(db, budget_id)
        .await?
        .ok_or_else(|| Error::BudgetNotFound {
            id: budget_id.to_string(),
        })?;

    let mut active: budget::ActiveModel = budget.into();
    active.bdi = Set(bdi);
    let updated = active.update(db).await?;
    tracing::debug!(budget_id, bdi, "BDI updated");
    Ok(updated)
}

/// Changes the approval state of a budget version.
pub async fn set_status(
    db: &DatabaseConnection,
    budget_id: i64,
    status: BudgetStatus,
) -> Result<budget::Model> {
    let budget = get_budget_by_id(db, budget_id)
        .await?
        .ok_or_else(|| Error::BudgetNotFound {
            id: budget_id.to_string(),
        })?;

    let mut active: budget::ActiveModel = budget.into();
    active.status = Set(status);
    active.update(db).await.map_err(Into::into)
}

/// Creates a new revision of a budget.
///
/// The revision gets `version = source.version + 1`, a new id and a new creation
/// time; the project, BDI, status and a copy of every item are carried over in
/// the same order. The source budget and its items are left as they were.
/// Revising an older version is allowed and starts a branch.
///
/// # Errors
/// Returns [`Error::BudgetNotFound`] if the source does not exist.
pub async fn create_revision(db: &DatabaseConnection, source_id: i64) -> Result<budget::Model> {
    let txn = db.begin().await?;

    let source = get_budget_by_id(&txn, source_id)
        .await?
        .ok_or_else(|| Error::BudgetNotFound {
            id: source_id.to_string(),
        })?;
    let items = get_budget_items(&txn, source.id).await?;

    let revision = budget::ActiveModel {
        project_id: Set(source.project_id),
        version: Set(source.version + 1),
        bdi: Set(source.bdi),
        created_at: Set(chrono::Utc::now()),
        status: Set(source.status),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for item in items {
        budget_item::ActiveModel {
            budget_id: Set(revision.id),
            position: Set(item.position),
            code: Set(item.code),
            description: Set(item.description),
            unit: Set(item.unit),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            total_price: Set(item.total_price),
            category: Set(item.category),
            source: Set(item.source),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    tracing::info!(
        source_id,
        revision_id = revision.id,
        version = revision.version,
        "Budget revision created"
    );
    Ok(revision)
}
