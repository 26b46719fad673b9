//! OpenAPI schema wrappers for types that stay framework-agnostic.
//!
//! The failure envelope is produced internally by the error adapter; this
//! mirror exists so the OpenAPI document can describe it without coupling
//! the adapter type to utoipa consumers.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ErrorCode;

/// OpenAPI mirror of the failure envelope returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorSchema {
    /// Always `false` for failures.
    #[schema(example = false)]
    pub success: bool,
    /// Short human-readable error message.
    #[schema(example = "token has expired")]
    pub error: String,
    /// Stable machine-readable error code.
    #[schema(example = "token_expired")]
    pub code: ErrorCode,
    /// Optional structured validation details.
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
    /// Correlation identifier, mirrored in the `Trace-Id` header.
    #[schema(example = "0b8ef8f2-0c4e-4a22-9a8b-0f6c5f2a7e11")]
    pub trace_id: Option<String>,
}
