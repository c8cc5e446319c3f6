//! User repository for backoffice accounts.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::users;

/// Fields accepted when updating a user; `None` leaves the column alone.
#[derive(Debug, Default)]
pub struct UpdateUserInput {
    /// New email.
    pub email: Option<String>,
    /// New display name (`Some(None)` clears it).
    pub name: Option<Option<String>>,
    /// New role string.
    pub role: Option<String>,
    /// New staff flag.
    pub is_staff: Option<bool>,
    /// New password hash.
    pub password_hash: Option<String>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        name: Option<&str>,
        role: Option<&str>,
        is_staff: bool,
    ) -> Result<users::Model, DbErr> {
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            name: Set(name.map(ToString::to_string)),
            role: Set(role.map(ToString::to_string)),
            is_staff: Set(is_staff),
            created_at: Set(chrono::Utc::now().into()),
        };
        user.insert(&self.db).await
    }

    /// Lists all users, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Updates a user. Returns `None` when the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateUserInput,
    ) -> Result<Option<users::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut user: users::ActiveModel = existing.into();
        if let Some(email) = input.email {
            user.email = Set(email);
        }
        if let Some(name) = input.name {
            user.name = Set(name);
        }
        if let Some(role) = input.role {
            user.role = Set(Some(role));
        }
        if let Some(is_staff) = input.is_staff {
            user.is_staff = Set(is_staff);
        }
        if let Some(hash) = input.password_hash {
            user.password_hash = Set(hash);
        }

        user.update(&self.db).await.map(Some)
    }

    /// Deletes a user. Returns the deleted row for the audit snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        users::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(Some(existing))
    }
}
