//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application.

pub mod audit;
pub mod client;
pub mod content;
pub mod deal;
pub mod invoice;
pub mod lead;
pub mod payment;
pub mod project;
pub mod property;
pub mod service;
pub mod stats;
pub mod user;

pub use audit::{AuditAction, AuditEntry, AuditRecorder};
pub use client::{ClientRepository, CoOwnershipInput, UpsertClientInput};
pub use content::{ContentRepository, UpsertCompanyInfoInput};
pub use deal::{DealRepository, ScheduleInput, UpsertDealInput};
pub use invoice::{CreateInvoiceInput, InvoiceRepository};
pub use lead::{CreateLeadInput, LeadRepository};
pub use payment::{CreateExpenseInput, CreatePaymentInput, PaymentRepository};
pub use project::{MediaInput, ProjectFilter, ProjectRepository, UpsertProjectInput};
pub use property::{ImageInput, PropertyFilter, PropertyRepository, UpsertPropertyInput};
pub use service::{ServiceRepository, UpsertServiceInput};
pub use stats::{DashboardSummary, SearchResults, StatsOverview, StatsRepository};
pub use user::{UpdateUserInput, UserRepository};
