//! Client repository: buyer records and co-ownership shares.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{clients, co_ownerships};

/// Fields for creating or updating a client.
#[derive(Debug, Default)]
pub struct UpsertClientInput {
    /// Client name.
    pub name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for registering a fractional ownership share.
#[derive(Debug)]
pub struct CoOwnershipInput {
    /// Owning client.
    pub client_id: Uuid,
    /// Ownership fraction in [0, 1].
    pub share: Decimal,
}

/// Client repository.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists clients alphabetically.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<clients::Model>, DbErr> {
        clients::Entity::find()
            .order_by_asc(clients::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a client by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<clients::Model>, DbErr> {
        clients::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: UpsertClientInput) -> Result<clients::Model, DbErr> {
        let name = input
            .name
            .ok_or_else(|| DbErr::Custom("name required".to_string()))?;
        let client = clients::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            notes: Set(input.notes),
            created_at: Set(chrono::Utc::now().into()),
        };
        client.insert(&self.db).await
    }

    /// Updates a client. Returns `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpsertClientInput,
    ) -> Result<Option<clients::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut client: clients::ActiveModel = existing.into();
        if let Some(name) = input.name {
            client.name = Set(name);
        }
        if let Some(email) = input.email {
            client.email = Set(Some(email));
        }
        if let Some(phone) = input.phone {
            client.phone = Set(Some(phone));
        }
        if let Some(address) = input.address {
            client.address = Set(Some(address));
        }
        if let Some(notes) = input.notes {
            client.notes = Set(Some(notes));
        }
        client.update(&self.db).await.map(Some)
    }

    /// Deletes a client and their co-ownership shares in one transaction.
    ///
    /// Returns the deleted row for the audit snapshot. Fails when deals
    /// still reference the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub async fn delete(&self, id: Uuid) -> Result<Option<clients::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let txn = self.db.begin().await?;
        co_ownerships::Entity::delete_many()
            .filter(co_ownerships::Column::ClientId.eq(id))
            .exec(&txn)
            .await?;
        clients::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(Some(existing))
    }

    /// Lists a property's co-ownership shares with the owning clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_co_owners(
        &self,
        property_id: Uuid,
    ) -> Result<Vec<(co_ownerships::Model, Option<clients::Model>)>, DbErr> {
        co_ownerships::Entity::find()
            .filter(co_ownerships::Column::PropertyId.eq(property_id))
            .find_also_related(clients::Entity)
            .order_by_desc(co_ownerships::Column::Share)
            .all(&self.db)
            .await
    }

    /// Registers a co-ownership share on a property.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn add_co_owner(
        &self,
        property_id: Uuid,
        input: CoOwnershipInput,
    ) -> Result<co_ownerships::Model, DbErr> {
        let share = co_ownerships::ActiveModel {
            id: Set(Uuid::new_v4()),
            property_id: Set(property_id),
            client_id: Set(input.client_id),
            share: Set(input.share),
        };
        share.insert(&self.db).await
    }

    /// Removes a co-ownership share.
    ///
    /// Returns the deleted row for the audit snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_co_owner(&self, id: Uuid) -> Result<Option<co_ownerships::Model>, DbErr> {
        let Some(existing) = co_ownerships::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        co_ownerships::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(Some(existing))
    }
}
