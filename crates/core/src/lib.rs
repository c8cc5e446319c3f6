//! Core business logic for Terralot.
//!
//! Pure domain logic with no web or database dependencies:
//! - Status/phase normalization between French labels and internal codes
//! - Role enumeration and resolution
//! - Password hashing
//! - Invoice numbering
//! - CSV row encoding for exports
//! - Object storage service for forwarded uploads

pub mod auth;
pub mod billing;
pub mod catalog;
pub mod export;
pub mod role;
pub mod storage;

pub use catalog::{
    ProjectPhase, PropertyStatus, normalize_project_phase, normalize_property_status,
    property_status_label,
};
pub use role::Role;
