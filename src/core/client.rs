//! Client business logic - Contact records.
//!
//! Projects refer to clients by name only; see
//! [`crate::core::project::get_projects_for_client`] for the reverse lookup.

use crate::{
    entities::{Client, client},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, Set, prelude::*};

/// Input for [`create_client`]. Only the name is required.
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    /// Contact name
    pub name: String,
    /// E-mail
    pub email: String,
    /// Phone
    pub phone: String,
    /// Company
    pub company: String,
}

/// Adds a client.
///
/// # Errors
/// Returns [`Error::EmptyField`] if the name is blank.
pub async fn create_client<C>(db: &C, new: NewClient) -> Result<client::Model>
where
    C: ConnectionTrait,
{
    let name = new.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::EmptyField { field: "name" });
    }

    let client = client::ActiveModel {
        name: Set(name),
        email: Set(new.email.trim().to_string()),
        phone: Set(new.phone.trim().to_string()),
        company: Set(new.company.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::debug!(client_id = client.id, "Client created");
    Ok(client)
}

/// Lists all clients alphabetically.
pub async fn get_all_clients(db: &DatabaseConnection) -> Result<Vec<client::Model>> {
    Client::find()
        .order_by_asc(client::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a client by exact name.
///
/// # Errors
/// Returns [`Error::ClientNotFound`] when no client has that name.
pub async fn get_client_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<client::Model> {
    Client::find()
        .filter(client::Column::Name.eq(name.trim()))
        .one(db)
        .await?
        .ok_or_else(|| Error::ClientNotFound {
            name: name.trim().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_and_list_clients() -> Result<()> {
        let db = setup_test_db().await?;

        create_client(
            &db,
            NewClient {
                name: "Tech Solutions".to_string(),
                email: "contato@tech.com".to_string(),
                phone: "1133334444".to_string(),
                company: "Tech Soluções Ltda".to_string(),
            },
        )
        .await?;
        create_client(
            &db,
            NewClient {
                name: "Ana Souza".to_string(),
                ..NewClient::default()
            },
        )
        .await?;

        let names: Vec<String> = get_all_clients(&db)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Ana Souza", "Tech Solutions"]);

        let found = get_client_by_name(&db, "Tech Solutions").await?;
        assert_eq!(found.company, "Tech Soluções Ltda");

        let missing = get_client_by_name(&db, "Ninguém").await;
        assert!(matches!(missing, Err(Error::ClientNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_client_name_is_required() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_client(&db, NewClient::default()).await;
        assert!(matches!(result, Err(Error::EmptyField { field: "name" })));
        Ok(())
    }
}
