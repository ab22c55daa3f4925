//! Client entity - Contact records for the people and companies being served.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Unique identifier for the client
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Contact name; projects refer to clients by this value
    pub name: String,
    /// E-mail address
    pub email: String,
    /// Phone number, free format
    pub phone: String,
    /// Company or "Pessoa Física"
    pub company: String,
}

/// Clients have no enforced relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
