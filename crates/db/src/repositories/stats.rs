//! Aggregate queries: admin dashboard, site-wide stats, global search.

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::Serialize;

use crate::entities::{
    clients, contact_leads, deals, expenses, invoices, payments, projects, properties, services,
};

/// Results returned per entity by the global search.
const SEARCH_TAKE: u64 = 10;

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Deals neither closed nor cancelled.
    pub deals_open: u64,
    /// Invoices still open.
    pub invoices_open: u64,
    /// Payments received this calendar month.
    pub payments_month: Decimal,
    /// Expenses recorded this calendar month.
    pub expenses_month: Decimal,
}

/// Per-status count used in overview breakdowns.
#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    /// Status code.
    pub status: String,
    /// Row count.
    pub count: i64,
}

/// Site-wide totals and breakdowns.
#[derive(Debug, Clone, Serialize)]
pub struct StatsOverview {
    /// Total property listings.
    pub properties: u64,
    /// Total projects.
    pub projects: u64,
    /// Total clients.
    pub clients: u64,
    /// Total contact leads.
    pub leads: u64,
    /// Property counts grouped by status.
    pub properties_by_status: Vec<StatusCount>,
    /// Project counts grouped by status.
    pub projects_by_status: Vec<StatusCount>,
    /// Deal counts grouped by status.
    pub deals_by_status: Vec<StatusCount>,
    /// Invoice counts grouped by status.
    pub invoices_by_status: Vec<StatusCount>,
    /// Five most recent deals.
    pub recent_deals: Vec<deals::Model>,
}

/// Matches from the global search, capped at ten per entity.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    /// Matching properties.
    pub properties: Vec<properties::Model>,
    /// Matching projects.
    pub projects: Vec<projects::Model>,
    /// Matching clients.
    pub clients: Vec<clients::Model>,
    /// Matching services.
    pub services: Vec<services::Model>,
}

/// Repository for aggregate and cross-entity queries.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    db: DatabaseConnection,
}

impl StatsRepository {
    /// Creates a new stats repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes the dashboard headline numbers.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the aggregate queries fails.
    pub async fn dashboard(&self) -> Result<DashboardSummary, DbErr> {
        let deals_open = deals::Entity::find()
            .filter(deals::Column::Status.ne("closed"))
            .filter(deals::Column::Status.ne("cancelled"))
            .count(&self.db)
            .await?;

        let invoices_open = invoices::Entity::find()
            .filter(invoices::Column::Status.eq("open"))
            .count(&self.db)
            .await?;

        let now = Utc::now();
        let month_start = now
            .date_naive()
            .with_day(1)
            .unwrap_or_else(|| now.date_naive())
            .and_hms_opt(0, 0, 0)
            .unwrap_or_else(|| now.naive_utc())
            .and_utc();

        let payments_month: Option<Decimal> = payments::Entity::find()
            .select_only()
            .column_as(payments::Column::Amount.sum(), "total")
            .filter(payments::Column::PaidAt.gte(month_start))
            .into_tuple()
            .one(&self.db)
            .await?
            .flatten();

        let expenses_month: Option<Decimal> = expenses::Entity::find()
            .select_only()
            .column_as(expenses::Column::Amount.sum(), "total")
            .filter(expenses::Column::SpentAt.gte(month_start))
            .into_tuple()
            .one(&self.db)
            .await?
            .flatten();

        Ok(DashboardSummary {
            deals_open,
            invoices_open,
            payments_month: payments_month.unwrap_or_default(),
            expenses_month: expenses_month.unwrap_or_default(),
        })
    }

    /// Computes site-wide totals and status breakdowns.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the aggregate queries fails.
    pub async fn overview(&self) -> Result<StatsOverview, DbErr> {
        let properties_total = properties::Entity::find().count(&self.db).await?;
        let projects_total = projects::Entity::find().count(&self.db).await?;
        let clients_total = clients::Entity::find().count(&self.db).await?;
        let leads_total = contact_leads::Entity::find().count(&self.db).await?;

        // Listing statuses are nullable; unset rows group under "unknown".
        let properties_by_status: Vec<(Option<String>, i64)> = properties::Entity::find()
            .select_only()
            .column(properties::Column::Status)
            .column_as(properties::Column::Id.count(), "count")
            .group_by(properties::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await?;

        let projects_by_status: Vec<(Option<String>, i64)> = projects::Entity::find()
            .select_only()
            .column(projects::Column::Status)
            .column_as(projects::Column::Id.count(), "count")
            .group_by(projects::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await?;

        let deals_by_status: Vec<(String, i64)> = deals::Entity::find()
            .select_only()
            .column(deals::Column::Status)
            .column_as(deals::Column::Id.count(), "count")
            .group_by(deals::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await?;

        let invoices_by_status: Vec<(String, i64)> = invoices::Entity::find()
            .select_only()
            .column(invoices::Column::Status)
            .column_as(invoices::Column::Id.count(), "count")
            .group_by(invoices::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await?;

        let recent_deals = deals::Entity::find()
            .order_by_desc(deals::Column::CreatedAt)
            .limit(5)
            .all(&self.db)
            .await?;

        Ok(StatsOverview {
            properties: properties_total,
            projects: projects_total,
            clients: clients_total,
            leads: leads_total,
            properties_by_status: properties_by_status
                .into_iter()
                .map(|(status, count)| StatusCount {
                    status: status.unwrap_or_else(|| "unknown".to_string()),
                    count,
                })
                .collect(),
            projects_by_status: projects_by_status
                .into_iter()
                .map(|(status, count)| StatusCount {
                    status: status.unwrap_or_else(|| "unknown".to_string()),
                    count,
                })
                .collect(),
            deals_by_status: deals_by_status
                .into_iter()
                .map(|(status, count)| StatusCount { status, count })
                .collect(),
            invoices_by_status: invoices_by_status
                .into_iter()
                .map(|(status, count)| StatusCount { status, count })
                .collect(),
            recent_deals,
        })
    }

    /// Searches properties, projects, clients, and services by substring.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the search queries fails.
    pub async fn search(&self, term: &str) -> Result<SearchResults, DbErr> {
        let pattern = format!("%{term}%");

        let matched_properties = properties::Entity::find()
            .filter(
                Condition::any()
                    .add(
                        Expr::col((properties::Entity, properties::Column::Title))
                            .ilike(pattern.clone()),
                    )
                    .add(
                        Expr::col((properties::Entity, properties::Column::Location))
                            .ilike(pattern.clone()),
                    ),
            )
            .order_by_desc(properties::Column::CreatedAt)
            .limit(SEARCH_TAKE)
            .all(&self.db)
            .await?;

        let matched_projects = projects::Entity::find()
            .filter(
                Condition::any()
                    .add(
                        Expr::col((projects::Entity, projects::Column::Title))
                            .ilike(pattern.clone()),
                    )
                    .add(
                        Expr::col((projects::Entity, projects::Column::Location))
                            .ilike(pattern.clone()),
                    ),
            )
            .order_by_desc(projects::Column::CreatedAt)
            .limit(SEARCH_TAKE)
            .all(&self.db)
            .await?;

        let matched_clients = clients::Entity::find()
            .filter(
                Condition::any()
                    .add(
                        Expr::col((clients::Entity, clients::Column::Name))
                            .ilike(pattern.clone()),
                    )
                    .add(
                        Expr::col((clients::Entity, clients::Column::Email))
                            .ilike(pattern.clone()),
                    ),
            )
            .order_by_asc(clients::Column::Name)
            .limit(SEARCH_TAKE)
            .all(&self.db)
            .await?;

        let matched_services = services::Entity::find()
            .filter(
                Condition::any()
                    .add(
                        Expr::col((services::Entity, services::Column::Name))
                            .ilike(pattern.clone()),
                    )
                    .add(Expr::col((services::Entity, services::Column::Title)).ilike(pattern)),
            )
            .order_by_asc(services::Column::Name)
            .limit(SEARCH_TAKE)
            .all(&self.db)
            .await?;

        Ok(SearchResults {
            properties: matched_properties,
            projects: matched_projects,
            clients: matched_clients,
            services: matched_services,
        })
    }
}
