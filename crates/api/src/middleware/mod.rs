//! Request middleware: authentication and the role gate.

pub mod auth;
pub mod role;
