//! Best-effort audit trail writer.
//!
//! Audit records are observability, not a transactional guarantee: a
//! failed insert is logged server-side and swallowed so the primary
//! operation never rolls back or fails because of it.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect, Set,
};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::entities::audit_logs;

/// Kind of mutating action being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    /// Entity created.
    Create,
    /// Entity updated.
    Update,
    /// Entity deleted.
    Delete,
}

impl AuditAction {
    /// Action name as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// One audit record to append.
#[derive(Debug)]
pub struct AuditEntry {
    /// Acting user, when known.
    pub user_id: Option<Uuid>,
    /// Action kind.
    pub action: AuditAction,
    /// Entity name, e.g. "Client".
    pub entity: &'static str,
    /// Id of the affected entity.
    pub entity_id: Option<Uuid>,
    /// Snapshot before the action (update/delete).
    pub before: Option<serde_json::Value>,
    /// Snapshot after the action (create/update).
    pub after: Option<serde_json::Value>,
}

/// Serializes a model into an audit snapshot, dropping it on failure.
pub fn snapshot<T: Serialize>(model: &T) -> Option<serde_json::Value> {
    serde_json::to_value(model).ok()
}

/// Audit trail writer and reader.
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    db: DatabaseConnection,
}

impl AuditRecorder {
    /// Creates a new audit recorder.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends an audit record, best-effort.
    ///
    /// Failures are logged and swallowed.
    pub async fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.insert(entry).await {
            warn!(error = %e, "audit log write failed");
        }
    }

    async fn insert(&self, entry: AuditEntry) -> Result<(), DbErr> {
        let row = audit_logs::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(entry.user_id),
            action: Set(entry.action.as_str().to_string()),
            entity: Set(entry.entity.to_string()),
            entity_id: Set(entry.entity_id),
            before: Set(entry.before),
            after: Set(entry.after),
            created_at: Set(chrono::Utc::now().into()),
        };
        row.insert(&self.db).await?;
        Ok(())
    }

    /// Lists audit records, newest first, with the total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<audit_logs::Model>, u64), DbErr> {
        let logs = audit_logs::Entity::find()
            .order_by_desc(audit_logs::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await?;
        let total = audit_logs::Entity::find().count(&self.db).await?;
        Ok((logs, total))
    }
}
