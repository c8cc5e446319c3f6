//! Object storage for forwarded uploads.

pub mod error;
pub mod service;

pub use error::StorageError;
pub use service::{S3Target, StorageService};
