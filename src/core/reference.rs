//! Reference price tables - Registering SINAPI, TCPO and company tables.
//!
//! Reading an uploaded table goes through the [`TableSource`] trait. The only
//! implementation shipped, [`FileNameSource`], looks at the file name alone and
//! does not parse any rows.

use crate::{
    entities::{ReferenceTable, TableKind, reference_table},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, QueryOrder, Set, prelude::*};

/// What a [`TableSource`] learned about an uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    /// Display name of the table
    pub name: String,
    /// Region found in the file, if any
    pub region: Option<String>,
    /// Reference date found in the file, if any
    pub date: Option<NaiveDate>,
}

/// Reads an uploaded price table.
pub trait TableSource: Send + Sync {
    /// Describes the table contained in `file_name`.
    fn describe(&self, file_name: &str) -> Result<TableDescriptor>;
}

/// Names the table after its file and reports nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileNameSource;

impl TableSource for FileNameSource {
    fn describe(&self, file_name: &str) -> Result<TableDescriptor> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(Error::EmptyField { field: "file_name" });
        }
        Ok(TableDescriptor {
            name: table_name_from_file(file_name),
            region: None,
            date: None,
        })
    }
}

/// Part of the file name before the first `.`; the whole name when that part is empty.
#[must_use]
pub fn table_name_from_file(file_name: &str) -> String {
    match file_name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}

/// Registers an uploaded table.
///
/// Region and date come from the source when it reports them, otherwise
/// `default_region` and today's date are used.
pub async fn import_reference_table(
    db: &DatabaseConnection,
    source: &dyn TableSource,
    file_name: &str,
    kind: TableKind,
    default_region: &str,
) -> Result<reference_table::Model> {
    let descriptor = source.describe(file_name)?;

    let table = insert_reference_table(
        db,
        descriptor.name,
        kind,
        descriptor
            .region
            .unwrap_or_else(|| default_region.to_string()),
        descriptor
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
    )
    .await?;

    tracing::info!(table_id = table.id, name = %table.name, %kind, "Reference table imported");
    Ok(table)
}

/// Inserts a reference table record.
pub async fn insert_reference_table<C>(
    db: &C,
    name: String,
    kind: TableKind,
    region: String,
    date: NaiveDate,
) -> Result<reference_table::Model>
where
    C: ConnectionTrait,
{
    reference_table::ActiveModel {
        name: Set(name),
        kind: Set(kind),
        region: Set(region),
        date: Set(date),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Lists all registered tables in import order.
pub async fn get_all_reference_tables(
    db: &DatabaseConnection,
) -> Result<Vec<reference_table::Model>> {
    ReferenceTable::find()
        .order_by_asc(reference_table::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
