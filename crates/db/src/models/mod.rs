//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Serialize` safe representation for API responses where needed
//! - `Deserialize` DTOs for inserts and patches

pub mod user;
