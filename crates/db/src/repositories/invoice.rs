//! Invoice repository. Numbering is serialized through a transaction so
//! concurrent creates in the same month cannot mint duplicates.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use terralot_core::billing;
use uuid::Uuid;

use crate::entities::{deals, invoices};

/// Fields for issuing an invoice.
#[derive(Debug)]
pub struct CreateInvoiceInput {
    /// Deal the invoice bills.
    pub deal_id: Uuid,
    /// Invoiced amount.
    pub amount: Decimal,
    /// Issue date; defaults to today.
    pub issue_date: Option<NaiveDate>,
    /// Payment deadline.
    pub due_date: Option<NaiveDate>,
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists invoices with their deal, newest issue date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<(invoices::Model, Option<deals::Model>)>, DbErr> {
        invoices::Entity::find()
            .order_by_desc(invoices::Column::IssueDate)
            .order_by_desc(invoices::Column::Number)
            .find_also_related(deals::Entity)
            .all(&self.db)
            .await
    }

    /// Finds an invoice by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<invoices::Model>, DbErr> {
        invoices::Entity::find_by_id(id).one(&self.db).await
    }

    /// Issues an invoice with the next free number for its month.
    ///
    /// The number lookup and insert run in one transaction; the unique
    /// constraint on `number` backs it up.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub async fn create_numbered(
        &self,
        input: CreateInvoiceInput,
    ) -> Result<invoices::Model, DbErr> {
        let issue_date = input
            .issue_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive());
        let prefix = billing::invoice_prefix(issue_date);

        let txn = self.db.begin().await?;

        // Sequences are compared numerically; string order would put
        // "-9999" above "-10000".
        let existing: Vec<String> = invoices::Entity::find()
            .filter(invoices::Column::Number.like(format!("{prefix}-%")))
            .select_only()
            .column(invoices::Column::Number)
            .into_tuple()
            .all(&txn)
            .await?;
        let seq = billing::next_sequence(existing.iter().map(String::as_str));
        let number = billing::invoice_number(&prefix, seq);

        let invoice = invoices::ActiveModel {
            id: Set(Uuid::new_v4()),
            deal_id: Set(input.deal_id),
            number: Set(number),
            amount: Set(input.amount),
            status: Set("open".to_string()),
            issue_date: Set(issue_date),
            due_date: Set(input.due_date),
        };
        let created = invoice.insert(&txn).await?;
        txn.commit().await?;

        Ok(created)
    }

    /// Updates an invoice's status. Returns `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: String,
    ) -> Result<Option<invoices::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let mut invoice: invoices::ActiveModel = existing.into();
        invoice.status = Set(status);
        invoice.update(&self.db).await.map(Some)
    }

    /// Deletes an invoice. Returns the deleted row for the audit snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<Option<invoices::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        invoices::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(Some(existing))
    }
}
