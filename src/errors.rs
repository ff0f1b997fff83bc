//! # Errors
//!
//! Everything the engine can fail with, surfaced synchronously from
//! construction or from [`Datatable::translate`](crate::Datatable::translate).
//! Nothing is retried.
//!
//! When returned from an axum handler, a `GridError` becomes a sanitised JSON
//! body (`{"error": "..."}`) with a matching status code. Internal details
//! such as database errors are logged through `tracing`, never sent to
//! clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub enum GridError {
    /// A required integration hook (record source, pagination strategy)
    /// was never supplied to the builder
    NotImplemented {
        /// Name of the missing hook
        hook: &'static str,
    },

    /// A column reference could not be mapped onto a known table/column
    ColumnResolution {
        /// The reference as declared or requested
        reference: String,
        /// Why it failed to resolve
        reason: String,
    },

    /// Error raised by the data source (details logged, not exposed)
    Database {
        internal: DbErr,
    },
}

impl GridError {
    pub fn not_implemented(hook: &'static str) -> Self {
        Self::NotImplemented { hook }
    }

    pub fn column_resolution(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ColumnResolution {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    pub fn database(err: DbErr) -> Self {
        Self::Database { internal: err }
    }

    /// HTTP status for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ColumnResolution { .. } => StatusCode::BAD_REQUEST,
            Self::NotImplemented { .. } | Self::Database { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message that is safe to show to a client
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotImplemented { hook } => {
                format!("Datatable is missing its '{hook}' implementation")
            }
            Self::ColumnResolution { reference, reason } => {
                format!("Cannot resolve column '{reference}': {reason}")
            }
            Self::Database { .. } => "A database error occurred".to_string(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal } => {
                tracing::error!(error = ?internal, "Database error during grid translation");
            }
            Self::NotImplemented { hook } => {
                tracing::error!(hook, "Datatable hook not implemented");
            }
            Self::ColumnResolution { .. } => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "Grid request error"
                );
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for GridError {
    fn into_response(self) -> Response {
        self.log_internal();
        let body = ErrorResponse {
            error: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database { internal } => Some(internal),
            _ => None,
        }
    }
}

impl From<DbErr> for GridError {
    fn from(err: DbErr) -> Self {
        Self::database(err)
    }
}
