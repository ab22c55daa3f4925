//! Reference table entity - An imported price table (SINAPI, TCPO or own).
//!
//! Only the table's metadata is kept; row-level compositions are not imported.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Family of a reference price table
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "UPPERCASE")]
pub enum TableKind {
    /// SINAPI monthly table
    #[sea_orm(string_value = "SINAPI")]
    Sinapi,
    /// TCPO edition
    #[sea_orm(string_value = "TCPO")]
    Tcpo,
    /// Company spreadsheet
    #[sea_orm(string_value = "OWN")]
    Own,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Sinapi => "SINAPI",
            Self::Tcpo => "TCPO",
            Self::Own => "OWN",
        };
        f.write_str(label)
    }
}

/// Reference table database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reference_tables")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, usually taken from the uploaded file name
    pub name: String,
    /// Table family
    pub kind: TableKind,
    /// Region the prices refer to
    pub region: String,
    /// Reference date of the prices
    pub date: Date,
}

/// Reference tables are standalone
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
