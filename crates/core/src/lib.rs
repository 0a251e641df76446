//! Shared domain types, the error taxonomy, and input validation helpers.

pub mod error;
pub mod types;
pub mod validation;
