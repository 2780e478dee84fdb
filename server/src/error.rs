use std::io;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{config::ConfigError, store::StoreError, validate::FieldError};

/// Every way a request handler can fail.
///
/// A list that exists but belongs to someone else is reported exactly like a
/// list that does not exist.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Store error: {0}")]
    Internal(#[from] StoreError),
}

impl AppError {
    pub fn list_not_found() -> Self {
        AppError::NotFound("Todo not found")
    }

    pub fn item_not_found() -> Self {
        AppError::NotFound("Item not found")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            AppError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
            }
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
            }
            AppError::Internal(err) => {
                error!("{err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Server error" })),
                )
                    .into_response()
            }
        }
    }
}

/// Failures that stop the server from starting or shutting down cleanly.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
