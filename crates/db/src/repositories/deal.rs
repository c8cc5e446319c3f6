//! Deal repository: transactions linking clients to properties, plus
//! their payment schedules.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{clients, deals, invoices, payment_schedules, payments, properties};

/// Fields for creating or updating a deal.
#[derive(Debug, Default)]
pub struct UpsertDealInput {
    /// Client party to the deal.
    pub client_id: Option<Uuid>,
    /// Property the deal concerns, when any.
    pub property_id: Option<Uuid>,
    /// Transaction kind: sale, rental, ...
    pub kind: Option<String>,
    /// Agreed amount.
    pub amount: Option<Decimal>,
    /// Deal status.
    pub status: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for creating or updating a payment schedule row.
#[derive(Debug, Default)]
pub struct ScheduleInput {
    /// Due date of the installment.
    pub due_date: Option<NaiveDate>,
    /// Installment amount.
    pub amount: Option<Decimal>,
    /// pending | paid | overdue.
    pub status: Option<String>,
}

/// A deal with its related client and property.
pub type DealWithRelations = (deals::Model, Option<clients::Model>, Option<properties::Model>);

/// Deal repository.
#[derive(Debug, Clone)]
pub struct DealRepository {
    db: DatabaseConnection,
}

impl DealRepository {
    /// Creates a new deal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists deals with their client and property, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<DealWithRelations>, DbErr> {
        let with_clients = deals::Entity::find()
            .order_by_desc(deals::Column::CreatedAt)
            .find_also_related(clients::Entity)
            .all(&self.db)
            .await?;

        let mut out = Vec::with_capacity(with_clients.len());
        for (deal, client) in with_clients {
            let property = match deal.property_id {
                Some(property_id) => {
                    properties::Entity::find_by_id(property_id)
                        .one(&self.db)
                        .await?
                }
                None => None,
            };
            out.push((deal, client, property));
        }
        Ok(out)
    }

    /// Finds a deal by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<deals::Model>, DbErr> {
        deals::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a deal with status "open" unless one is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: UpsertDealInput) -> Result<deals::Model, DbErr> {
        let client_id = input
            .client_id
            .ok_or_else(|| DbErr::Custom("client_id required".to_string()))?;
        let deal = deals::ActiveModel {
            id: Set(Uuid::new_v4()),
            client_id: Set(client_id),
            property_id: Set(input.property_id),
            kind: Set(input.kind.unwrap_or_else(|| "sale".to_string())),
            amount: Set(input.amount),
            status: Set(input.status.unwrap_or_else(|| "open".to_string())),
            notes: Set(input.notes),
            created_at: Set(chrono::Utc::now().into()),
        };
        deal.insert(&self.db).await
    }

    /// Updates a deal. Returns `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpsertDealInput,
    ) -> Result<Option<deals::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut deal: deals::ActiveModel = existing.into();
        if let Some(client_id) = input.client_id {
            deal.client_id = Set(client_id);
        }
        if let Some(property_id) = input.property_id {
            deal.property_id = Set(Some(property_id));
        }
        if let Some(kind) = input.kind {
            deal.kind = Set(kind);
        }
        if let Some(amount) = input.amount {
            deal.amount = Set(Some(amount));
        }
        if let Some(status) = input.status {
            deal.status = Set(status);
        }
        if let Some(notes) = input.notes {
            deal.notes = Set(Some(notes));
        }
        deal.update(&self.db).await.map(Some)
    }

    /// Deletes a deal with its schedules, invoices, and payments in one
    /// transaction.
    ///
    /// Returns the deleted row for the audit snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub async fn delete(&self, id: Uuid) -> Result<Option<deals::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        // Payments go first: schedule rows drop their payment link on
        // payment delete, so the schedule delete that follows is clean.
        let txn = self.db.begin().await?;
        payments::Entity::delete_many()
            .filter(payments::Column::DealId.eq(id))
            .exec(&txn)
            .await?;
        payment_schedules::Entity::delete_many()
            .filter(payment_schedules::Column::DealId.eq(id))
            .exec(&txn)
            .await?;
        invoices::Entity::delete_many()
            .filter(invoices::Column::DealId.eq(id))
            .exec(&txn)
            .await?;
        deals::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(Some(existing))
    }

    /// Lists a deal's payment schedule ordered by due date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_schedules(
        &self,
        deal_id: Uuid,
    ) -> Result<Vec<payment_schedules::Model>, DbErr> {
        payment_schedules::Entity::find()
            .filter(payment_schedules::Column::DealId.eq(deal_id))
            .order_by_asc(payment_schedules::Column::DueDate)
            .all(&self.db)
            .await
    }

    /// Adds a schedule row to a deal.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn add_schedule(
        &self,
        deal_id: Uuid,
        input: ScheduleInput,
    ) -> Result<payment_schedules::Model, DbErr> {
        let due_date = input
            .due_date
            .ok_or_else(|| DbErr::Custom("due_date required".to_string()))?;
        let amount = input
            .amount
            .ok_or_else(|| DbErr::Custom("amount required".to_string()))?;
        let schedule = payment_schedules::ActiveModel {
            id: Set(Uuid::new_v4()),
            deal_id: Set(deal_id),
            due_date: Set(due_date),
            amount: Set(amount),
            status: Set(input.status.unwrap_or_else(|| "pending".to_string())),
            payment_id: Set(None),
        };
        schedule.insert(&self.db).await
    }

    /// Updates a schedule row. Returns `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_schedule(
        &self,
        schedule_id: Uuid,
        input: ScheduleInput,
    ) -> Result<Option<payment_schedules::Model>, DbErr> {
        let Some(existing) = payment_schedules::Entity::find_by_id(schedule_id)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut schedule: payment_schedules::ActiveModel = existing.into();
        if let Some(due_date) = input.due_date {
            schedule.due_date = Set(due_date);
        }
        if let Some(amount) = input.amount {
            schedule.amount = Set(amount);
        }
        if let Some(status) = input.status {
            schedule.status = Set(status);
        }
        schedule.update(&self.db).await.map(Some)
    }
}
