//! Realized cost entity - Money actually spent on a project.
//!
//! Costs are attached to the project, not to a specific budget version.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Realized cost database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "realized_costs")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Project the money was spent on
    pub project_id: i64,
    /// What was bought or paid
    pub description: String,
    /// Amount spent, always positive
    pub amount: f64,
    /// When it was spent
    pub date: Date,
    /// Cost category (Material, Mão de Obra, Equipamentos...)
    pub category: String,
}

/// Defines relationships between RealizedCost and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each cost belongs to one project
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
