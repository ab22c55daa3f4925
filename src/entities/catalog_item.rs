//! Catalog item entity - Reference compositions that can be added to a budget.

use super::budget_item::ItemSource;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "catalog_items")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Composition code, unique across the catalog
    #[sea_orm(unique)]
    pub code: String,
    /// Composition description
    pub description: String,
    /// Unit of measure
    pub unit: String,
    /// Reference price per unit
    pub unit_price: f64,
    /// Work category
    pub category: String,
    /// Price source
    pub source: ItemSource,
}

/// Catalog entries are standalone
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
