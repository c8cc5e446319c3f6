//! Content repository: CMS page blocks and company info entries.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{company_info, page_content};

/// Fields for creating or updating a company info entry.
#[derive(Debug, Default)]
pub struct UpsertCompanyInfoInput {
    /// Entry value.
    pub value: Option<String>,
    /// Grouping category.
    pub category: Option<String>,
    /// Display label.
    pub label: Option<String>,
    /// Position within the category.
    pub sort_order: Option<i32>,
    /// Whether the entry is shown publicly.
    pub is_active: Option<bool>,
}

/// Repository for page content blocks and company info.
#[derive(Debug, Clone)]
pub struct ContentRepository {
    db: DatabaseConnection,
}

impl ContentRepository {
    /// Creates a new content repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all blocks of a page, ordered by section then key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_page(&self, page: &str) -> Result<Vec<page_content::Model>, DbErr> {
        page_content::Entity::find()
            .filter(page_content::Column::Page.eq(page))
            .order_by_asc(page_content::Column::Section)
            .order_by_asc(page_content::Column::Key)
            .all(&self.db)
            .await
    }

    /// Inserts or updates one block, keyed by (page, section, key).
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn upsert_block(
        &self,
        page: &str,
        section: &str,
        key: &str,
        value: Option<String>,
    ) -> Result<page_content::Model, DbErr> {
        let existing = page_content::Entity::find()
            .filter(page_content::Column::Page.eq(page))
            .filter(page_content::Column::Section.eq(section))
            .filter(page_content::Column::Key.eq(key))
            .one(&self.db)
            .await?;

        match existing {
            Some(row) => {
                let mut block: page_content::ActiveModel = row.into();
                block.value = Set(value);
                block.update(&self.db).await
            }
            None => {
                let block = page_content::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    page: Set(page.to_string()),
                    section: Set(section.to_string()),
                    key: Set(key.to_string()),
                    value: Set(value),
                };
                block.insert(&self.db).await
            }
        }
    }

    /// Lists company info entries ordered by category then sort order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_company_info(
        &self,
        category: Option<&str>,
        active_only: bool,
    ) -> Result<Vec<company_info::Model>, DbErr> {
        let mut query = company_info::Entity::find()
            .order_by_asc(company_info::Column::Category)
            .order_by_asc(company_info::Column::SortOrder);
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            query = query.filter(company_info::Column::Category.eq(category));
        }
        if active_only {
            query = query.filter(company_info::Column::IsActive.eq(true));
        }
        query.all(&self.db).await
    }

    /// Finds a company info entry by its key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_company_info(&self, key: &str) -> Result<Option<company_info::Model>, DbErr> {
        company_info::Entity::find()
            .filter(company_info::Column::Key.eq(key))
            .one(&self.db)
            .await
    }

    /// Creates a company info entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including on a duplicate key.
    pub async fn create_company_info(
        &self,
        key: String,
        input: UpsertCompanyInfoInput,
    ) -> Result<company_info::Model, DbErr> {
        let entry = company_info::ActiveModel {
            id: Set(Uuid::new_v4()),
            key: Set(key),
            value: Set(input.value.unwrap_or_default()),
            category: Set(input.category.unwrap_or_else(|| "general".to_string())),
            label: Set(input.label),
            sort_order: Set(input.sort_order.unwrap_or(0)),
            is_active: Set(input.is_active.unwrap_or(true)),
        };
        entry.insert(&self.db).await
    }

    /// Updates a company info entry by key. Returns `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_company_info(
        &self,
        key: &str,
        input: UpsertCompanyInfoInput,
    ) -> Result<Option<company_info::Model>, DbErr> {
        let Some(existing) = self.find_company_info(key).await? else {
            return Ok(None);
        };

        let mut entry: company_info::ActiveModel = existing.into();
        if let Some(value) = input.value {
            entry.value = Set(value);
        }
        if let Some(category) = input.category {
            entry.category = Set(category);
        }
        if let Some(label) = input.label {
            entry.label = Set(Some(label));
        }
        if let Some(sort_order) = input.sort_order {
            entry.sort_order = Set(sort_order);
        }
        if let Some(is_active) = input.is_active {
            entry.is_active = Set(is_active);
        }
        entry.update(&self.db).await.map(Some)
    }

    /// Deletes a company info entry by key.
    ///
    /// Returns the deleted row for the audit snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_company_info(
        &self,
        key: &str,
    ) -> Result<Option<company_info::Model>, DbErr> {
        let Some(existing) = self.find_company_info(key).await? else {
            return Ok(None);
        };
        company_info::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(Some(existing))
    }
}
