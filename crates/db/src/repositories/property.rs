//! Property repository: listings, image collections, filtered search.

use rust_decimal::Decimal;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{properties, property_images};

/// Filters for the property list endpoint.
///
/// `q` is matched as a case-insensitive substring (ILIKE) against title,
/// location, and description. `status` must already be a normalized code;
/// an unrecognized input means the caller omits the filter entirely.
#[derive(Debug, Default, Clone)]
pub struct PropertyFilter {
    /// Free-text search term.
    pub q: Option<String>,
    /// Normalized status code.
    pub status: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
}

impl PropertyFilter {
    fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            let pattern = format!("%{q}%");
            cond = cond.add(
                Condition::any()
                    .add(
                        Expr::col((properties::Entity, properties::Column::Title))
                            .ilike(pattern.clone()),
                    )
                    .add(
                        Expr::col((properties::Entity, properties::Column::Location))
                            .ilike(pattern.clone()),
                    )
                    .add(
                        Expr::col((properties::Entity, properties::Column::Description))
                            .ilike(pattern),
                    ),
            );
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            cond = cond.add(properties::Column::Status.eq(status));
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            cond = cond.add(properties::Column::Category.eq(category));
        }
        cond
    }
}

/// Fields for creating or updating a property.
#[derive(Debug, Default)]
pub struct UpsertPropertyInput {
    /// URL slug, unique.
    pub slug: Option<String>,
    /// Listing title.
    pub title: Option<String>,
    /// Location text.
    pub location: Option<String>,
    /// Asking price.
    pub price: Option<Decimal>,
    /// Status, already passed through normalization (raw kept on miss).
    pub status: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Lot area.
    pub area: Option<Decimal>,
    /// Bedroom count.
    pub bedrooms: Option<i32>,
    /// Bathroom count.
    pub bathrooms: Option<i32>,
    /// Cover image URL.
    pub cover_image: Option<String>,
}

/// Input for attaching an image to a property.
#[derive(Debug)]
pub struct ImageInput {
    /// Image URL.
    pub url: String,
    /// Alt text.
    pub alt: Option<String>,
    /// Position in the ordered collection.
    pub sort_order: i32,
}

/// Property repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct PropertyRepository {
    db: DatabaseConnection,
}

impl PropertyRepository {
    /// Creates a new property repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists properties with their ordered images, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &PropertyFilter,
    ) -> Result<Vec<(properties::Model, Vec<property_images::Model>)>, DbErr> {
        properties::Entity::find()
            .filter(filter.condition())
            .order_by_desc(properties::Column::CreatedAt)
            .order_by_desc(properties::Column::Id)
            .find_with_related(property_images::Entity)
            .order_by_asc(property_images::Column::SortOrder)
            .all(&self.db)
            .await
    }

    /// Finds a property by slug with its ordered images.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<(properties::Model, Vec<property_images::Model>)>, DbErr> {
        let Some(property) = properties::Entity::find()
            .filter(properties::Column::Slug.eq(slug))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let images = property
            .find_related(property_images::Entity)
            .order_by_asc(property_images::Column::SortOrder)
            .all(&self.db)
            .await?;
        Ok(Some((property, images)))
    }

    /// Finds a property by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<properties::Model>, DbErr> {
        properties::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a property.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including on a duplicate slug.
    pub async fn create(&self, input: UpsertPropertyInput) -> Result<properties::Model, DbErr> {
        let slug = input
            .slug
            .ok_or_else(|| DbErr::Custom("slug required".to_string()))?;
        let title = input
            .title
            .ok_or_else(|| DbErr::Custom("title required".to_string()))?;
        let property = properties::ActiveModel {
            id: Set(Uuid::new_v4()),
            slug: Set(slug),
            title: Set(title),
            location: Set(input.location),
            price: Set(input.price),
            status: Set(input.status),
            category: Set(input.category),
            description: Set(input.description),
            area: Set(input.area),
            bedrooms: Set(input.bedrooms),
            bathrooms: Set(input.bathrooms),
            cover_image: Set(input.cover_image),
            created_at: Set(chrono::Utc::now().into()),
        };
        property.insert(&self.db).await
    }

    /// Updates a property. Returns `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpsertPropertyInput,
    ) -> Result<Option<properties::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut property: properties::ActiveModel = existing.into();
        if let Some(slug) = input.slug {
            property.slug = Set(slug);
        }
        if let Some(title) = input.title {
            property.title = Set(title);
        }
        if let Some(location) = input.location {
            property.location = Set(Some(location));
        }
        if let Some(price) = input.price {
            property.price = Set(Some(price));
        }
        if let Some(status) = input.status {
            property.status = Set(Some(status));
        }
        if let Some(category) = input.category {
            property.category = Set(Some(category));
        }
        if let Some(description) = input.description {
            property.description = Set(Some(description));
        }
        if let Some(area) = input.area {
            property.area = Set(Some(area));
        }
        if let Some(bedrooms) = input.bedrooms {
            property.bedrooms = Set(Some(bedrooms));
        }
        if let Some(bathrooms) = input.bathrooms {
            property.bathrooms = Set(Some(bathrooms));
        }
        if let Some(cover_image) = input.cover_image {
            property.cover_image = Set(Some(cover_image));
        }

        property.update(&self.db).await.map(Some)
    }

    /// Deletes a property and its images in one transaction.
    ///
    /// Returns the deleted row for the audit snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub async fn delete(&self, id: Uuid) -> Result<Option<properties::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let txn = self.db.begin().await?;
        property_images::Entity::delete_many()
            .filter(property_images::Column::PropertyId.eq(id))
            .exec(&txn)
            .await?;
        properties::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(Some(existing))
    }

    /// Lists a property's images in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_images(
        &self,
        property_id: Uuid,
    ) -> Result<Vec<property_images::Model>, DbErr> {
        property_images::Entity::find()
            .filter(property_images::Column::PropertyId.eq(property_id))
            .order_by_asc(property_images::Column::SortOrder)
            .all(&self.db)
            .await
    }

    /// Attaches an image to a property.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn add_image(
        &self,
        property_id: Uuid,
        input: ImageInput,
    ) -> Result<property_images::Model, DbErr> {
        let image = property_images::ActiveModel {
            id: Set(Uuid::new_v4()),
            property_id: Set(property_id),
            url: Set(input.url),
            alt: Set(input.alt),
            sort_order: Set(input.sort_order),
        };
        image.insert(&self.db).await
    }

    /// Deletes an image. Returns the deleted row for the audit snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_image(
        &self,
        image_id: Uuid,
    ) -> Result<Option<property_images::Model>, DbErr> {
        let Some(existing) = property_images::Entity::find_by_id(image_id)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        property_images::Entity::delete_by_id(image_id)
            .exec(&self.db)
            .await?;
        Ok(Some(existing))
    }
}
