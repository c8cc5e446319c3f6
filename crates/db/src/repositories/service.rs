//! Service repository for the storefront service catalog.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::services;

/// Fields for creating or updating a service.
#[derive(Debug, Default)]
pub struct UpsertServiceInput {
    /// Service name.
    pub name: Option<String>,
    /// Display title.
    pub title: Option<String>,
    /// Short description.
    pub description: Option<String>,
    /// Long-form content.
    pub content: Option<String>,
    /// Icon path.
    pub icon: Option<String>,
    /// URL slug.
    pub slug: Option<String>,
}

/// Service repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    db: DatabaseConnection,
}

impl ServiceRepository {
    /// Creates a new service repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all services, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<services::Model>, DbErr> {
        services::Entity::find()
            .order_by_asc(services::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Finds a service by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<services::Model>, DbErr> {
        services::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a service. `name` falls back to the title when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: UpsertServiceInput) -> Result<services::Model, DbErr> {
        let name = input
            .name
            .or_else(|| input.title.clone())
            .unwrap_or_else(|| "Service".to_string());
        let service = services::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            title: Set(input.title),
            description: Set(input.description),
            content: Set(input.content),
            icon: Set(input.icon),
            slug: Set(input.slug),
            created_at: Set(chrono::Utc::now().into()),
        };
        service.insert(&self.db).await
    }

    /// Updates a service. Returns `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpsertServiceInput,
    ) -> Result<Option<services::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut service: services::ActiveModel = existing.into();
        if let Some(name) = input.name {
            service.name = Set(name);
        }
        if let Some(title) = input.title {
            service.title = Set(Some(title));
        }
        if let Some(description) = input.description {
            service.description = Set(Some(description));
        }
        if let Some(content) = input.content {
            service.content = Set(Some(content));
        }
        if let Some(icon) = input.icon {
            service.icon = Set(Some(icon));
        }
        if let Some(slug) = input.slug {
            service.slug = Set(Some(slug));
        }

        service.update(&self.db).await.map(Some)
    }

    /// Deletes a service.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = services::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
