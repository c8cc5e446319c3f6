//! Billing routes: invoices, payments, expenses.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::require_role;
use crate::routes::db_error;
use terralot_core::Role;
use terralot_db::{DealRepository, InvoiceRepository, PaymentRepository};
use terralot_db::repositories::{
    CreateExpenseInput, CreateInvoiceInput, CreatePaymentInput, audit::snapshot,
};

/// Payload for issuing an invoice.
#[derive(Debug, Deserialize)]
struct InvoicePayload {
    deal_id: Option<Uuid>,
    amount: Option<Decimal>,
    issue_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
}

/// Payload for updating an invoice's status.
#[derive(Debug, Deserialize)]
struct InvoiceStatusPayload {
    status: String,
}

/// Payload for recording a payment.
#[derive(Debug, Deserialize)]
struct PaymentPayload {
    deal_id: Option<Uuid>,
    invoice_id: Option<Uuid>,
    schedule_id: Option<Uuid>,
    amount: Option<Decimal>,
    method: Option<String>,
    reference: Option<String>,
    paid_at: Option<DateTime<FixedOffset>>,
}

/// Payload for recording an expense.
#[derive(Debug, Deserialize)]
struct ExpensePayload {
    label: Option<String>,
    category: Option<String>,
    amount: Option<Decimal>,
    spent_at: Option<DateTime<FixedOffset>>,
    notes: Option<String>,
}

/// Creates the admin billing routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/{id}", put(update_invoice).delete(delete_invoice))
        .route("/payments", get(list_payments).post(create_payment))
        .route("/expenses", get(list_expenses).post(create_expense))
}

/// GET /admin/invoices - List invoices with their deal.
async fn list_invoices(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(rows) => {
            let payload: Vec<Value> = rows
                .iter()
                .map(|(invoice, deal)| {
                    let mut value = snapshot(invoice).unwrap_or_else(|| json!({}));
                    if let Value::Object(map) = &mut value {
                        map.insert(
                            "deal".to_string(),
                            deal.as_ref().and_then(snapshot).unwrap_or(Value::Null),
                        );
                    }
                    value
                })
                .collect();
            Json(payload).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to list invoices");
            db_error(&e)
        }
    }
}

/// POST /admin/invoices - Issue a numbered invoice.
async fn create_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<InvoicePayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }
    let (Some(deal_id), Some(amount)) = (payload.deal_id, payload.amount) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "deal_id and amount required" })),
        )
            .into_response();
    };

    let deals = DealRepository::new((*state.db).clone());
    match deals.find_by_id(deal_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Deal not found" })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "failed to fetch deal");
            return db_error(&e);
        }
    }

    let repo = InvoiceRepository::new((*state.db).clone());
    match repo
        .create_numbered(CreateInvoiceInput {
            deal_id,
            amount,
            issue_date: payload.issue_date,
            due_date: payload.due_date,
        })
        .await
    {
        Ok(invoice) => (StatusCode::CREATED, Json(invoice)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to create invoice");
            db_error(&e)
        }
    }
}

/// PUT /admin/invoices/{id} - Update an invoice's status.
async fn update_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<InvoiceStatusPayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.update_status(id, payload.status).await {
        Ok(Some(invoice)) => Json(invoice).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Invoice not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to update invoice");
            db_error(&e)
        }
    }
}

/// DELETE /admin/invoices/{id} - Delete an invoice.
async fn delete_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }

    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(Some(_)) => Json(json!({ "ok": true })).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Invoice not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to delete invoice");
            db_error(&e)
        }
    }
}

/// GET /admin/payments - List payments with deal and invoice.
async fn list_payments(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = PaymentRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(rows) => {
            let payload: Vec<Value> = rows
                .iter()
                .map(|(payment, deal, invoice)| {
                    let mut value = snapshot(payment).unwrap_or_else(|| json!({}));
                    if let Value::Object(map) = &mut value {
                        map.insert(
                            "deal".to_string(),
                            deal.as_ref().and_then(snapshot).unwrap_or(Value::Null),
                        );
                        map.insert(
                            "invoice".to_string(),
                            invoice.as_ref().and_then(snapshot).unwrap_or(Value::Null),
                        );
                    }
                    value
                })
                .collect();
            Json(payload).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to list payments");
            db_error(&e)
        }
    }
}

/// POST /admin/payments - Record a payment.
async fn create_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<PaymentPayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }
    let (Some(deal_id), Some(amount)) = (payload.deal_id, payload.amount) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "deal_id and amount required" })),
        )
            .into_response();
    };

    let repo = PaymentRepository::new((*state.db).clone());
    match repo
        .create(CreatePaymentInput {
            deal_id,
            invoice_id: payload.invoice_id,
            schedule_id: payload.schedule_id,
            amount,
            method: payload.method,
            reference: payload.reference,
            paid_at: payload.paid_at,
        })
        .await
    {
        Ok(payment) => (StatusCode::CREATED, Json(payment)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to record payment");
            db_error(&e)
        }
    }
}

/// GET /admin/expenses - List expenses.
async fn list_expenses(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = PaymentRepository::new((*state.db).clone());
    match repo.list_expenses().await {
        Ok(expenses) => Json(expenses).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list expenses");
            db_error(&e)
        }
    }
}

/// POST /admin/expenses - Record an expense.
async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ExpensePayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }
    let (Some(label), Some(amount)) = (payload.label, payload.amount) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "label and amount required" })),
        )
            .into_response();
    };

    let repo = PaymentRepository::new((*state.db).clone());
    match repo
        .create_expense(CreateExpenseInput {
            label,
            category: payload.category,
            amount,
            spent_at: payload.spent_at,
            notes: payload.notes,
        })
        .await
    {
        Ok(expense) => (StatusCode::CREATED, Json(expense)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to record expense");
            db_error(&e)
        }
    }
}
