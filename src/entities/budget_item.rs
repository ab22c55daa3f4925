//! Budget item entity - A priced line in a budget version.
//!
//! Items are ordered by `position` within their budget. `total_price` is kept
//! equal to `quantity * unit_price` by the item operations in `core::item`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a composition's price comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemSource {
    /// Caixa's national construction cost index
    #[sea_orm(string_value = "SINAPI")]
    Sinapi,
    /// Pini's cost composition tables
    #[sea_orm(string_value = "TCPO")]
    Tcpo,
    /// Company's own compositions
    #[sea_orm(string_value = "OWN")]
    Own,
    /// Suggested by the consultant
    #[sea_orm(string_value = "AI")]
    Ai,
}

impl fmt::Display for ItemSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Sinapi => "SINAPI",
            Self::Tcpo => "TCPO",
            Self::Own => "OWN",
            Self::Ai => "AI",
        };
        f.write_str(label)
    }
}

/// Budget item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_items")]
pub struct Model {
    /// Unique identifier for the line item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning budget version
    pub budget_id: i64,
    /// Ordering within the budget
    pub position: i32,
    /// Composition code (e.g., `SINAPI-87301`)
    pub code: String,
    /// Composition description
    pub description: String,
    /// Unit of measure (m², m³, KG, UN...)
    pub unit: String,
    /// Quantity in `unit`
    pub quantity: f64,
    /// Price per unit
    pub unit_price: f64,
    /// `quantity * unit_price` as of the last quantity edit
    pub total_price: f64,
    /// Work category (PAREDES, PISOS...)
    pub category: String,
    /// Price source
    pub source: ItemSource,
}

/// Defines relationships between BudgetItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one budget
    #[sea_orm(
        belongs_to = "super::budget::Entity",
        from = "Column::BudgetId",
        to = "super::budget::Column::Id"
    )]
    Budget,
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
