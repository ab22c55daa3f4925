//! Reference catalog business logic - The compositions offered by "add item".

use crate::{
    entities::{CatalogItem, ItemSource, catalog_item},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, Set, prelude::*};

/// Fields of a new catalog composition
#[derive(Debug, Clone)]
pub struct NewCatalogItem {
    /// Unique composition code
    pub code: String,
    /// Description
    pub description: String,
    /// Unit of measure
    pub unit: String,
    /// Reference unit price
    pub unit_price: f64,
    /// Work category
    pub category: String,
    /// Price source
    pub source: ItemSource,
}

/// Lists the whole catalog ordered by code.
pub async fn get_all_catalog_items(db: &DatabaseConnection) -> Result<Vec<catalog_item::Model>> {
    CatalogItem::find()
        .order_by_asc(catalog_item::Column::Code)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a composition by its exact code.
pub async fn get_catalog_item_by_code<C>(db: &C, code: &str) -> Result<Option<catalog_item::Model>>
where
    C: ConnectionTrait,
{
    CatalogItem::find()
        .filter(catalog_item::Column::Code.eq(code.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns true when `entry` matches a search term on description or code.
/// Matching is a case-insensitive substring test; an empty term matches everything.
#[must_use]
pub fn matches_term(entry: &catalog_item::Model, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    entry.description.to_lowercase().contains(&term) || entry.code.to_lowercase().contains(&term)
}

/// Searches the catalog by description or code.
///
/// Filtering happens in Rust rather than with `LIKE` because `SQLite` only folds
/// ASCII case and descriptions are full of accented capitals.
pub async fn search_catalog(
    db: &DatabaseConnection,
    term: &str,
) -> Result<Vec<catalog_item::Model>> {
    let entries = get_all_catalog_items(db).await?;
    Ok(entries
        .into_iter()
        .filter(|entry| matches_term(entry, term))
        .collect())
}

/// Adds a composition to the catalog.
///
/// # Errors
/// Returns an error if the code or description is blank, the price is negative or
/// not finite, or the code already exists.
pub async fn create_catalog_item<C>(db: &C, new: NewCatalogItem) -> Result<catalog_item::Model>
where
    C: ConnectionTrait,
{
    if new.code.trim().is_empty() {
        return Err(Error::EmptyField { field: "code" });
    }
    if new.description.trim().is_empty() {
        return Err(Error::EmptyField {
            field: "description",
        });
    }
    if !new.unit_price.is_finite() || new.unit_price < 0.0 {
        return Err(Error::InvalidAmount {
            amount: new.unit_price,
        });
    }

    catalog_item::ActiveModel {
        code: Set(new.code.trim().to_string()),
        description: Set(new.description.trim().to_string()),
        unit: Set(new.unit),
        unit_price: Set(new.unit_price),
        category: Set(new.category),
        source: Set(new.source),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
