//! `SeaORM` entity definitions, one module per table.

pub mod audit_logs;
pub mod clients;
pub mod co_ownerships;
pub mod company_info;
pub mod contact_leads;
pub mod deals;
pub mod expenses;
pub mod invoices;
pub mod page_content;
pub mod payment_schedules;
pub mod payments;
pub mod project_media;
pub mod projects;
pub mod properties;
pub mod property_images;
pub mod services;
pub mod users;
