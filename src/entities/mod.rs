//! Entity module - Contains all SeaORM entity definitions for the session store.
//! These entities represent the in-memory tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod budget;
pub mod budget_item;
pub mod catalog_item;
pub mod client;
pub mod project;
pub mod realized_cost;
pub mod reference_table;

// Re-export specific types to avoid conflicts
pub use budget::{BudgetStatus, Column as BudgetColumn, Entity as Budget, Model as BudgetModel};
pub use budget_item::{
    Column as BudgetItemColumn, Entity as BudgetItem, ItemSource, Model as BudgetItemModel,
};
pub use catalog_item::{
    Column as CatalogItemColumn, Entity as CatalogItem, Model as CatalogItemModel,
};
pub use client::{Column as ClientColumn, Entity as Client, Model as ClientModel};
pub use project::{
    Column as ProjectColumn, Entity as Project, Model as ProjectModel, ProjectStatus,
};
pub use realized_cost::{
    Column as RealizedCostColumn, Entity as RealizedCost, Model as RealizedCostModel,
};
pub use reference_table::{
    Column as ReferenceTableColumn, Entity as ReferenceTable, Model as ReferenceTableModel,
    TableKind,
};
