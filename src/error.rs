use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::constants::{
    ERR_IDENTITY_DELETION_FAILED, ERR_INTERNAL, ERR_INVALID_TOKEN, ERR_MISSING_AUTHORIZATION,
};

/// Application error type
///
/// Only these reach the caller. Failures of individual purge or revocation
/// steps are recorded in a `DeletionReport` and never become an `AppError`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing authorization header")]
    MissingAuthorization,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Identity deletion failed: {0}")]
    IdentityDeletionFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MissingAuthorization => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": ERR_MISSING_AUTHORIZATION }),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": ERR_INVALID_TOKEN }),
            ),
            AppError::IdentityDeletionFailed(details) => {
                tracing::error!("Identity deletion failed: {}", details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": ERR_IDENTITY_DELETION_FAILED, "details": details }),
                )
            }
            AppError::Internal(details) => {
                tracing::error!("Unexpected error: {}", details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": ERR_INTERNAL, "details": details }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Failure of an authority service call
#[derive(Error, Debug)]
pub enum AuthError {
    /// The authority refused the credential or does not know the user
    #[error("Rejected by authority service: {0}")]
    Rejected(String),

    #[error("Authority service unreachable: {0}")]
    Transport(String),

    #[error("Unexpected authority response: {0}")]
    Malformed(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Rejected(reason) => {
                tracing::warn!("Token rejected: {}", reason);
                AppError::InvalidToken
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Failure deleting rows from one collection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Expected when a schema does not (yet) have the collection
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Deletion failed: {0}")]
    Failed(String),
}

/// Failure revoking a federated refresh token
#[derive(Error, Debug)]
pub enum RevokeError {
    #[error("Revocation rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Revocation request failed: {0}")]
    Transport(String),
}

/// Text carried by a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;
