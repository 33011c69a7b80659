//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("grid '{controller}': invalid identifier '{value}'")]
    InvalidIdentifier { controller: String, value: String },
    #[error("grid '{controller}': unknown join type '{join_type}'")]
    UnknownJoinType { controller: String, join_type: String },
    #[error("duplicate grid controller: {0}")]
    DuplicateController(String),
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),
    #[error("config write failed: {0}")]
    ConfigWriteFailed(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Stable machine-readable code, shared by the JSON body and flash payloads.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::Unauthorized => "unauthorized",
            AppError::NotFound(_) => "not_found",
            AppError::ValidationFailed(_) => "validation_failed",
            AppError::PersistenceFailed(_) => "persistence_failed",
            AppError::ConfigWriteFailed(_) => "config_write_failed",
            AppError::Db(sqlx::Error::RowNotFound) => "not_found",
            AppError::Db(_) => "database_error",
            AppError::BadRequest(_) => "bad_request",
        }
    }

    /// Messages meant for the user, one per flash entry.
    pub fn messages(&self) -> Vec<String> {
        match self {
            AppError::ValidationFailed(messages) if !messages.is_empty() => messages.clone(),
            AppError::NotFound(message) => vec![message.clone()],
            other => vec![other.to_string()],
        }
    }

    pub(crate) fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::ConfigWriteFailed(_) | AppError::PersistenceFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Db(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        let details = match err {
            AppError::ValidationFailed(messages) => Some(serde_json::json!({ "messages": messages })),
            _ => None,
        };
        ErrorBody {
            error: ErrorDetail {
                code: err.code().to_string(),
                message: err.to_string(),
                details,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Db(e) = &self {
            tracing::error!(error = %e, "database error");
        }
        let status = self.status();
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
