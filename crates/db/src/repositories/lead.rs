//! Contact lead repository: public inquiries and their follow-up state.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::contact_leads;

/// Newest leads returned per list call.
const LEAD_LIST_CAP: u64 = 100;

/// Fields captured from the public contact form.
#[derive(Debug)]
pub struct CreateLeadInput {
    /// Sender name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Inquiry message.
    pub message: String,
    /// Property the inquiry refers to, when any.
    pub property_id: Option<Uuid>,
}

/// Contact lead repository.
#[derive(Debug, Clone)]
pub struct LeadRepository {
    db: DatabaseConnection,
}

impl LeadRepository {
    /// Creates a new lead repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a new lead with status "new".
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateLeadInput) -> Result<contact_leads::Model, DbErr> {
        let lead = contact_leads::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            message: Set(input.message),
            property_id: Set(input.property_id),
            status: Set("new".to_string()),
            notes: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };
        lead.insert(&self.db).await
    }

    /// Lists the newest leads, capped at 100, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, status: Option<&str>) -> Result<Vec<contact_leads::Model>, DbErr> {
        let mut query = contact_leads::Entity::find()
            .order_by_desc(contact_leads::Column::CreatedAt)
            .limit(LEAD_LIST_CAP);
        if let Some(status) = status.filter(|s| !s.is_empty()) {
            query = query.filter(contact_leads::Column::Status.eq(status));
        }
        query.all(&self.db).await
    }

    /// Finds a lead by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<contact_leads::Model>, DbErr> {
        contact_leads::Entity::find_by_id(id).one(&self.db).await
    }

    /// Updates a lead's follow-up status and notes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        id: Uuid,
        status: Option<String>,
        notes: Option<String>,
    ) -> Result<Option<contact_leads::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut lead: contact_leads::ActiveModel = existing.into();
        if let Some(status) = status {
            lead.status = Set(status);
        }
        if let Some(notes) = notes {
            lead.notes = Set(Some(notes));
        }
        lead.update(&self.db).await.map(Some)
    }
}
