//! Project entity - A construction job ("obra") being budgeted.
//!
//! The client is stored as free text rather than a foreign key to `clients`.
//! A project owns a lineage of budgets and any number of realized costs.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle stage of a project. Any transition is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Not started yet
    #[sea_orm(string_value = "planning")]
    Planning,
    /// Under construction
    #[sea_orm(string_value = "active")]
    Active,
    /// Delivered
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Planning => "planning",
            Self::Active => "active",
            Self::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Project database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    /// Unique identifier for the project
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Residencial Alpha")
    pub name: String,
    /// Client name as typed by the user
    pub client: String,
    /// Site address
    pub address: String,
    /// Current lifecycle stage
    pub status: ProjectStatus,
    /// Contracted total, entered by hand
    pub total_budget: f64,
    /// Planned start date
    pub start_date: Date,
    /// Physical progress, 0 to 100
    pub completion_percentage: i32,
}

/// Defines relationships between Project and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One project has many budget versions
    #[sea_orm(has_many = "super::budget::Entity")]
    Budgets,
    /// One project has many realized costs
    #[sea_orm(has_many = "super::realized_cost::Entity")]
    RealizedCosts,
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl Related<super::realized_cost::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RealizedCosts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
