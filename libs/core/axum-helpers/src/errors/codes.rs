//! Type-safe error codes for API responses.
//!
//! Each error code carries:
//! - String representation for client consumption (e.g., "NOT_FOUND")
//! - Integer code for logging and monitoring (e.g., 1004)
//! - Default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::NotFound;
//! assert_eq!(code.as_str(), "NOT_FOUND");
//! assert_eq!(code.code(), 1004);
//! assert_eq!(code.default_message(), "Resource not found");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request was understood but refers to state that does not allow it
    BadRequest,

    /// JSON extraction from request body failed
    JsonExtraction,

    /// Query string could not be deserialized
    QueryExtraction,

    /// Requested resource was not found
    NotFound,

    // Server errors (1000s)
    /// An unexpected internal server error occurred
    InternalError,

    // Database errors (2000-2999)
    /// Query or statement execution failed
    DatabaseError,

    /// Could not acquire a connection from the pool
    DatabaseConnection,

    /// Database migration failed
    DatabaseMigration,
}

impl ErrorCode {
    /// Get the SCREAMING_SNAKE_CASE identifier sent to clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::QueryExtraction => "QUERY_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseConnection => "DATABASE_CONNECTION",
            Self::DatabaseMigration => "DATABASE_MIGRATION",
        }
    }

    /// Get the integer code for logging and monitoring.
    ///
    /// Ranges:
    /// - 1000-1999: Request and generic server errors
    /// - 2000-2999: Database errors
    pub fn code(&self) -> i32 {
        match self {
            Self::BadRequest => 1000,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::QueryExtraction => 1006,

            Self::DatabaseError => 2003,
            Self::DatabaseConnection => 2013,
            Self::DatabaseMigration => 2016,
        }
    }

    /// Get the default user-facing error message.
    ///
    /// Handlers can override it with something more specific, except for
    /// server-side failures which always use the default.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad request",
            Self::JsonExtraction => "Failed to parse request body",
            Self::QueryExtraction => "Failed to parse query parameters",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An unexpected error occurred.",
            Self::DatabaseError => "An unexpected error occurred.",
            Self::DatabaseConnection => "An unexpected error occurred.",
            Self::DatabaseMigration => "Database migration failed",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
