//! Payment and expense repository. Recording a payment against a
//! schedule row marks that row paid in the same transaction.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{deals, expenses, invoices, payment_schedules, payments};

/// Fields for recording a payment.
#[derive(Debug)]
pub struct CreatePaymentInput {
    /// Deal the payment belongs to.
    pub deal_id: Uuid,
    /// Invoice the payment settles, when any.
    pub invoice_id: Option<Uuid>,
    /// Schedule row the payment settles, when any.
    pub schedule_id: Option<Uuid>,
    /// Paid amount.
    pub amount: Decimal,
    /// Payment method.
    pub method: Option<String>,
    /// External reference.
    pub reference: Option<String>,
    /// Payment timestamp; defaults to now.
    pub paid_at: Option<DateTime<FixedOffset>>,
}

/// Fields for recording an expense.
#[derive(Debug)]
pub struct CreateExpenseInput {
    /// What the expense was for.
    pub label: String,
    /// Grouping category.
    pub category: Option<String>,
    /// Spent amount.
    pub amount: Decimal,
    /// Spend timestamp; defaults to now.
    pub spent_at: Option<DateTime<FixedOffset>>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// A payment with its related deal and invoice.
pub type PaymentWithRelations = (payments::Model, Option<deals::Model>, Option<invoices::Model>);

/// Payment and expense repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists payments with their deal and invoice, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<PaymentWithRelations>, DbErr> {
        let with_deals = payments::Entity::find()
            .order_by_desc(payments::Column::PaidAt)
            .find_also_related(deals::Entity)
            .all(&self.db)
            .await?;

        let mut out = Vec::with_capacity(with_deals.len());
        for (payment, deal) in with_deals {
            let invoice = match payment.invoice_id {
                Some(invoice_id) => invoices::Entity::find_by_id(invoice_id).one(&self.db).await?,
                None => None,
            };
            out.push((payment, deal, invoice));
        }
        Ok(out)
    }

    /// Records a payment; when it settles a schedule row, that row is
    /// marked paid and linked in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails, including when the
    /// referenced schedule row does not exist.
    pub async fn create(&self, input: CreatePaymentInput) -> Result<payments::Model, DbErr> {
        let txn = self.db.begin().await?;

        let payment = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            deal_id: Set(input.deal_id),
            invoice_id: Set(input.invoice_id),
            schedule_id: Set(input.schedule_id),
            amount: Set(input.amount),
            method: Set(input.method),
            reference: Set(input.reference),
            paid_at: Set(input.paid_at.unwrap_or_else(|| chrono::Utc::now().into())),
        };
        let created = payment.insert(&txn).await?;

        if let Some(schedule_id) = input.schedule_id {
            let Some(schedule) = payment_schedules::Entity::find_by_id(schedule_id)
                .one(&txn)
                .await?
            else {
                return Err(DbErr::RecordNotFound(format!(
                    "payment schedule {schedule_id} not found"
                )));
            };
            let mut schedule: payment_schedules::ActiveModel = schedule.into();
            schedule.status = Set("paid".to_string());
            schedule.payment_id = Set(Some(created.id));
            schedule.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(created)
    }

    /// Lists expenses, newest spend first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_expenses(&self) -> Result<Vec<expenses::Model>, DbErr> {
        expenses::Entity::find()
            .order_by_desc(expenses::Column::SpentAt)
            .all(&self.db)
            .await
    }

    /// Records an expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_expense(
        &self,
        input: CreateExpenseInput,
    ) -> Result<expenses::Model, DbErr> {
        let expense = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            label: Set(input.label),
            category: Set(input.category),
            amount: Set(input.amount),
            spent_at: Set(input.spent_at.unwrap_or_else(|| chrono::Utc::now().into())),
            notes: Set(input.notes),
        };
        expense.insert(&self.db).await
    }
}
