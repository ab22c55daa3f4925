//! Budget entity - One version of a project's cost estimate.
//!
//! Budgets form a version lineage per project. Totals are never stored here:
//! they are derived from the current items every time they are read.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Approval state of a budget version
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// Being edited
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Accepted by the client
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Superseded
    #[sea_orm(string_value = "obsolete")]
    Obsolete,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::Obsolete => "obsolete",
        };
        f.write_str(label)
    }
}

/// Budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget version
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning project
    pub project_id: i64,
    /// Version number within the lineage, starting at 1
    pub version: i32,
    /// Markup ("Benefícios e Despesas Indiretas") as a percentage
    pub bdi: f64,
    /// When this version was created
    pub created_at: DateTimeUtc,
    /// Approval state
    pub status: BudgetStatus,
}

/// Defines relationships between Budget and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each budget belongs to one project
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
    /// One budget owns many line items
    #[sea_orm(has_many = "super::budget_item::Entity")]
    Items,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::budget_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
