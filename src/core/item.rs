//! Line-item business logic - Adding, re-quantifying and removing budget lines.
//!
//! Every operation writes straight through to the store, so the owning budget
//! always reflects the latest edit. `total_price` is recomputed whenever an item
//! is created or its quantity changes.

use crate::{
    core::budget,
    entities::{BudgetItem, budget_item, catalog_item},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, Set, prelude::*};

/// Rejects quantities that are negative or not finite.
pub fn validate_quantity(quantity: f64) -> Result<()> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(Error::InvalidQuantity { quantity });
    }
    Ok(())
}

/// Builds a new line from a catalog composition: quantity 1, total equal to the unit price.
#[must_use]
pub fn item_from_catalog(
    entry: &catalog_item::Model,
    budget_id: i64,
    position: i32,
) -> budget_item::ActiveModel {
    budget_item::ActiveModel {
        budget_id: Set(budget_id),
        position: Set(position),
        code: Set(entry.code.clone()),
        description: Set(entry.description.clone()),
        unit: Set(entry.unit.clone()),
        quantity: Set(1.0),
        unit_price: Set(entry.unit_price),
        total_price: Set(entry.unit_price),
        category: Set(entry.category.clone()),
        source: Set(entry.source),
        ..Default::default()
    }
}

/// Retrieves a line item by id.
pub async fn get_item_by_id(
    db: &DatabaseConnection,
    item_id: i64,
) -> Result<Option<budget_item::Model>> {
    BudgetItem::find_by_id(item_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Position for an item appended at the end of a budget
async fn next_position<C>(db: &C, budget_id: i64) -> Result<i32>
where
    C: ConnectionTrait,
{
    let items = budget::get_budget_items(db, budget_id).await?;
    Ok(items.iter().map(|item| item.position).max().map_or(0, |p| p + 1))
}

/// Appends a catalog composition to a budget, looked up by its code.
///
/// # Errors
/// Returns [`Error::BudgetNotFound`] or [`Error::CatalogItemNotFound`] when either
/// side of the operation does not exist.
pub async fn add_catalog_item(
    db: &DatabaseConnection,
    budget_id: i64,
    code: &str,
) -> Result<budget_item::Model> {
    if budget::get_budget_by_id(db, budget_id).await?.is_none() {
        return Err(Error::BudgetNotFound {
            id: budget_id.to_string(),
        });
    }

    let entry = crate::core::catalog::get_catalog_item_by_code(db, code)
        .await?
        .ok_or_else(|| Error::CatalogItemNotFound {
            code: code.to_string(),
        })?;

    let position = next_position(db, budget_id).await?;
    let item = item_from_catalog(&entry, budget_id, position)
        .insert(db)
        .await?;

    tracing::debug!(budget_id, item_id = item.id, code, "Catalog item added to budget");
    Ok(item)
}

/// Sets a line's quantity and recomputes `total_price = quantity * unit_price`.
///
/// # Errors
/// Returns [`Error::InvalidQuantity`] for negative or non-finite quantities and
/// [`Error::ItemNotFound`] if the item does not exist.
pub async fn update_item_quantity(
    db: &DatabaseConnection,
    item_id: i64,
    quantity: f64,
) -> Result<budget_item::Model> {
    validate_quantity(quantity)?;

    let item = get_item_by_id(db, item_id)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;

    let total_price = quantity * item.unit_price;
    let mut active: budget_item::ActiveModel = item.into();
    active.quantity = Set(quantity);
    active.total_price = Set(total_price);

    active.update(db).await.map_err(Into::into)
}

/// Removes a single line from its budget. Other lines are not touched.
///
/// # Errors
/// Returns [`Error::ItemNotFound`] if the item does not exist.
pub async fn delete_item(db: &DatabaseConnection, item_id: i64) -> Result<()> {
    let result = BudgetItem::delete_by_id(item_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ItemNotFound { id: item_id });
    }
    tracing::debug!(item_id, "Budget item deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::budget::load_sheet;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_add_catalog_item_to_empty_budget() -> Result<()> {
        let (db, _project, budget) = setup_with_project().await?;
        seed_test_catalog(&db).await?;

        let item = add_catalog_item(&db, budget.id, "SINAPI-87301").await?;

        let sheet = load_sheet(&db, budget.id).await?;
        assert_eq!(sheet.items.len(), 1);
        assert_eq!(sheet.items[0].id, item.id);
        assert_eq!(item.quantity, 1.0);
        assert_eq!(item.unit_price, 650.0);
        assert_eq!(item.total_price, 650.0);
        assert_eq!(item.code, "SINAPI-87301");
        Ok(())
    }

    #[tokio::test]
    async fn test_add_same_catalog_item_twice_gets_distinct_ids() -> Result<()> {
        let (db, _project, budget) = setup_with_project().await?;
        seed_test_catalog(&db).await?;

        let first = add_catalog_item(&db, budget.id, "TCPO-14.202").await?;
        let second = add_catalog_item(&db, budget.id, "TCPO-14.202").await?;

        assert_ne!(first.id, second.id);
        assert!(second.position > first.position);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_unknown_catalog_code() -> Result<()> {
        let (db, _project, budget) = setup_with_project().await?;
        seed_test_catalog(&db).await?;

        let result = add_catalog_item(&db, budget.id, "SINAPI-00000").await;
        assert!(matches!(result, Err(Error::CatalogItemNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_to_missing_budget() -> Result<()> {
        let db = setup_test_db().await?;
        seed_test_catalog(&db).await?;

        let result = add_catalog_item(&db, 42, "SINAPI-87301").await;
        assert!(matches!(result, Err(Error::BudgetNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_quantity_recomputes_total() -> Result<()> {
        let (db, _project, budget) = setup_with_project().await?;
        let item = add_test_item(&db, budget.id, 1.0, 85.5).await?;

        let updated = update_item_quantity(&db, item.id, 150.0).await?;

        assert_eq!(updated.quantity, 150.0);
        assert_eq!(updated.total_price, 150.0 * 85.5);
        assert_eq!(updated.unit_price, 85.5);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_quantity_to_zero() -> Result<()> {
        let (db, _project, budget) = setup_with_project().await?;
        let item = add_test_item(&db, budget.id, 5.0, 10.0).await?;

        let updated = update_item_quantity(&db, item.id, 0.0).await?;
        assert_eq!(updated.total_price, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_quantity_rejects_invalid_values() -> Result<()> {
        let (db, _project, budget) = setup_with_project().await?;
        let item = add_test_item(&db, budget.id, 5.0, 10.0).await?;

        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let result = update_item_quantity(&db, item.id, bad).await;
            assert!(matches!(result, Err(Error::InvalidQuantity { .. })));
        }

        let unchanged = get_item_by_id(&db, item.id).await?;
        assert_eq!(unchanged.map(|i| i.total_price), Some(50.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_quantity_missing_item() -> Result<()> {
        let db = setup_test_db().await?;
        let result = update_item_quantity(&db, 7, 2.0).await;
        assert!(matches!(result, Err(Error::ItemNotFound { id: 7 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_item_leaves_others_unchanged() -> Result<()> {
        let (db, _project, budget) = setup_with_project().await?;
        let keep_a = add_test_item(&db, budget.id, 2.0, 10.0).await?;
        let doomed = add_test_item(&db, budget.id, 3.0, 20.0).await?;
        let keep_b = add_test_item(&db, budget.id, 4.0, 30.0).await?;

        delete_item(&db, doomed.id).await?;

        let sheet = load_sheet(&db, budget.id).await?;
        assert_eq!(sheet.items, vec![keep_a, keep_b]);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_item() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_item(&db, 1).await;
        assert!(matches!(result, Err(Error::ItemNotFound { id: 1 })));
        Ok(())
    }
}
