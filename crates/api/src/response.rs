//! Shared response envelope for API handlers.
//!
//! Every successful response is `{statusCode, data, message, success}`.
//! Use [`ApiResponse`] instead of ad-hoc `serde_json::json!` so the shape
//! stays consistent and type-checked. The failure counterpart lives in
//! [`crate::error`].

use serde::Serialize;

/// Standard success envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    /// Build an envelope. `success` is derived from the status code so it
    /// can never disagree with it.
    pub fn new(status_code: u16, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code,
            data,
            message: message.into(),
            success: status_code < 400,
        }
    }
}
