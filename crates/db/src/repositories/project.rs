//! Project repository: development projects and their media galleries.

use rust_decimal::Decimal;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{project_media, projects};

/// Filters for the project list endpoint.
#[derive(Debug, Default, Clone)]
pub struct ProjectFilter {
    /// Free-text search term over title, location, and description.
    pub q: Option<String>,
    /// Normalized phase code.
    pub status: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
}

impl ProjectFilter {
    fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            let pattern = format!("%{q}%");
            cond = cond.add(
                Condition::any()
                    .add(
                        Expr::col((projects::Entity, projects::Column::Title))
                            .ilike(pattern.clone()),
                    )
                    .add(
                        Expr::col((projects::Entity, projects::Column::Location))
                            .ilike(pattern.clone()),
                    )
                    .add(
                        Expr::col((projects::Entity, projects::Column::Description)).ilike(pattern),
                    ),
            );
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            cond = cond.add(projects::Column::Status.eq(status));
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            cond = cond.add(projects::Column::Category.eq(category));
        }
        cond
    }
}

/// Fields for creating or updating a project.
#[derive(Debug, Default)]
pub struct UpsertProjectInput {
    /// URL slug, unique.
    pub slug: Option<String>,
    /// Project title.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Phase code, already passed through normalization (raw kept on miss).
    pub status: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Location text.
    pub location: Option<String>,
    /// Developed surface in square meters.
    pub surface: Option<Decimal>,
    /// Unit count.
    pub units: Option<i32>,
    /// Cover image URL.
    pub cover_image: Option<String>,
    /// Construction start date.
    pub started_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    /// Delivery date.
    pub delivered_at: Option<chrono::DateTime<chrono::FixedOffset>>,
}

/// Input for attaching a media item to a project.
#[derive(Debug)]
pub struct MediaInput {
    /// Media kind, e.g. "image" or "video".
    pub kind: String,
    /// Media URL.
    pub url: String,
    /// Alt text.
    pub alt: Option<String>,
    /// Position in the ordered gallery.
    pub sort_order: i32,
}

/// Project repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
}

impl ProjectRepository {
    /// Creates a new project repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists projects with their ordered media, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &ProjectFilter,
    ) -> Result<Vec<(projects::Model, Vec<project_media::Model>)>, DbErr> {
        projects::Entity::find()
            .filter(filter.condition())
            .order_by_desc(projects::Column::CreatedAt)
            .order_by_desc(projects::Column::Id)
            .find_with_related(project_media::Entity)
            .order_by_asc(project_media::Column::SortOrder)
            .all(&self.db)
            .await
    }

    /// Finds a project by slug with its ordered media.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<(projects::Model, Vec<project_media::Model>)>, DbErr> {
        let Some(project) = projects::Entity::find()
            .filter(projects::Column::Slug.eq(slug))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let media = project
            .find_related(project_media::Entity)
            .order_by_asc(project_media::Column::SortOrder)
            .all(&self.db)
            .await?;
        Ok(Some((project, media)))
    }

    /// Finds a project by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<projects::Model>, DbErr> {
        projects::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including on a duplicate slug.
    pub async fn create(&self, input: UpsertProjectInput) -> Result<projects::Model, DbErr> {
        let slug = input
            .slug
            .ok_or_else(|| DbErr::Custom("slug required".to_string()))?;
        let title = input
            .title
            .ok_or_else(|| DbErr::Custom("title required".to_string()))?;
        let project = projects::ActiveModel {
            id: Set(Uuid::new_v4()),
            slug: Set(slug),
            title: Set(title),
            description: Set(input.description),
            status: Set(input.status),
            category: Set(input.category),
            location: Set(input.location),
            surface: Set(input.surface),
            units: Set(input.units),
            cover_image: Set(input.cover_image),
            started_at: Set(input.started_at),
            delivered_at: Set(input.delivered_at),
            created_at: Set(chrono::Utc::now().into()),
        };
        project.insert(&self.db).await
    }

    /// Updates a project. Returns `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpsertProjectInput,
    ) -> Result<Option<projects::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut project: projects::ActiveModel = existing.into();
        if let Some(slug) = input.slug {
            project.slug = Set(slug);
        }
        if let Some(title) = input.title {
            project.title = Set(title);
        }
        if let Some(description) = input.description {
            project.description = Set(Some(description));
        }
        if let Some(status) = input.status {
            project.status = Set(Some(status));
        }
        if let Some(category) = input.category {
            project.category = Set(Some(category));
        }
        if let Some(location) = input.location {
            project.location = Set(Some(location));
        }
        if let Some(surface) = input.surface {
            project.surface = Set(Some(surface));
        }
        if let Some(units) = input.units {
            project.units = Set(Some(units));
        }
        if let Some(cover_image) = input.cover_image {
            project.cover_image = Set(Some(cover_image));
        }
        if let Some(started_at) = input.started_at {
            project.started_at = Set(Some(started_at));
        }
        if let Some(delivered_at) = input.delivered_at {
            project.delivered_at = Set(Some(delivered_at));
        }

        project.update(&self.db).await.map(Some)
    }

    /// Deletes a project and its media in one transaction.
    ///
    /// Returns the deleted row for the audit snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub async fn delete(&self, id: Uuid) -> Result<Option<projects::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let txn = self.db.begin().await?;
        project_media::Entity::delete_many()
            .filter(project_media::Column::ProjectId.eq(id))
            .exec(&txn)
            .await?;
        projects::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(Some(existing))
    }

    /// Lists a project's media in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_media(&self, project_id: Uuid) -> Result<Vec<project_media::Model>, DbErr> {
        project_media::Entity::find()
            .filter(project_media::Column::ProjectId.eq(project_id))
            .order_by_asc(project_media::Column::SortOrder)
            .all(&self.db)
            .await
    }

    /// Attaches a media item to a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn add_media(
        &self,
        project_id: Uuid,
        input: MediaInput,
    ) -> Result<project_media::Model, DbErr> {
        let media = project_media::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(project_id),
            kind: Set(input.kind),
            url: Set(input.url),
            alt: Set(input.alt),
            sort_order: Set(input.sort_order),
        };
        media.insert(&self.db).await
    }

    /// Deletes a media item. Returns the deleted row for the audit snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_media(&self, media_id: Uuid) -> Result<Option<project_media::Model>, DbErr> {
        let Some(existing) = project_media::Entity::find_by_id(media_id)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        project_media::Entity::delete_by_id(media_id)
            .exec(&self.db)
            .await?;
        Ok(Some(existing))
    }
}
