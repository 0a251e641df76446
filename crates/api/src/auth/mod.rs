//! Authentication building blocks.
//!
//! - [`password`]: Argon2id hashing and verification.
//! - [`jwt`]: signed access/refresh token generation and validation.
//! - [`session`]: the session authority -- credential verification,
//!   token-pair issuance and rotation, logout invalidation.

pub mod jwt;
pub mod password;
pub mod session;
