use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use validator::ValidationErrors;

/// Web layer errors. Every storage error kind maps to a distinct
/// machine-readable `code` so clients can tell retryable conditions apart
/// from conflicts that will never succeed.
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(ValidationErrors),
    BadRequest(String),
    Unauthorized,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
        }
    }
}

fn storage_error_code(error: &StorageError) -> &'static str {
    match error {
        StorageError::NotFound => "not_found",
        StorageError::InvalidInput(_) => "validation",
        StorageError::DuplicateResult(_) => "duplicate_result",
        StorageError::BotNotInMatch(_) => "bot_not_in_match",
        StorageError::LadderDisabled => "ladder_disabled",
        StorageError::NoMapsAvailable => "no_maps",
        StorageError::InsufficientActiveBots => "not_enough_bots",
        StorageError::SeasonPaused => "season_paused",
        StorageError::SeasonClosing => "season_closing",
        StorageError::TooManyActiveRounds => "round_limit_reached",
        StorageError::Database(_) | StorageError::Migration(_) => "internal",
    }
}

fn storage_status(error: &StorageError) -> StatusCode {
    match error {
        StorageError::NotFound => StatusCode::NOT_FOUND,
        StorageError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        StorageError::DuplicateResult(_) | StorageError::BotNotInMatch(_) => StatusCode::CONFLICT,
        StorageError::LadderDisabled => StatusCode::SERVICE_UNAVAILABLE,
        StorageError::NoMapsAvailable
        | StorageError::InsufficientActiveBots
        | StorageError::SeasonPaused
        | StorageError::SeasonClosing
        | StorageError::TooManyActiveRounds => StatusCode::CONFLICT,
        StorageError::Database(_) | StorageError::Migration(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Storage(e @ (StorageError::Database(_) | StorageError::Migration(_))) => {
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "An internal error occurred",
                        "code": "internal"
                    }),
                )
            }
            Self::Storage(e) => (
                storage_status(e),
                json!({
                    "error": e.to_string(),
                    "code": storage_error_code(e)
                }),
            ),
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": "Validation failed",
                        "code": "validation",
                        "details": field_errors
                    }),
                )
            }
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": msg,
                    "code": "validation"
                }),
            ),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "error": "Unauthorized",
                    "code": "unauthorized"
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

pub type WebResult<T> = Result<T, WebError>;
