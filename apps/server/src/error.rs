use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use energycoop_core::errors::{DatabaseError, Error as CoreError, ValidationError};
use energycoop_core::validation::FieldErrors;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    /// Malformed JSON body or query string.
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
}

impl ErrorBody {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
            errors: None,
        }
    }

    fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }
}

fn validation_body(err: &ValidationError) -> ErrorBody {
    let status = StatusCode::UNPROCESSABLE_ENTITY;
    match err {
        ValidationError::Fields(fields) => {
            ErrorBody::new(status, err.to_string()).with_errors(fields.clone())
        }
        ValidationError::MissingField(field) => {
            let mut fields = FieldErrors::default();
            fields.add(field, format!("The {} field is required.", field));
            ErrorBody::new(status, err.to_string()).with_errors(fields)
        }
        other => ErrorBody::new(status, other.to_string()).with_errors(FieldErrors::default()),
    }
}

fn core_body(err: &CoreError) -> ErrorBody {
    match err {
        CoreError::Validation(v) => validation_body(v),
        CoreError::Unauthenticated(_) => ErrorBody::new(StatusCode::UNAUTHORIZED, err.to_string()),
        CoreError::PermissionDenied(_) => ErrorBody::new(StatusCode::FORBIDDEN, err.to_string()),
        CoreError::NotFound(_) | CoreError::Database(DatabaseError::NotFound(_)) => {
            ErrorBody::new(StatusCode::NOT_FOUND, err.to_string())
        }
        CoreError::InsufficientFunds { .. }
        | CoreError::ConstraintViolation(_)
        | CoreError::Calculation(_)
        | CoreError::Database(DatabaseError::ForeignKeyViolation(_)) => {
            ErrorBody::new(StatusCode::BAD_REQUEST, err.to_string())
        }
        CoreError::Database(DatabaseError::UniqueViolation(_)) => ErrorBody::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "A record with the same unique value already exists",
        )
        .with_errors(FieldErrors::default()),
        _ => {
            tracing::error!("Request failed: {}", err);
            ErrorBody::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::Core(e) => core_body(e),
            ApiError::Unprocessable(reason) => {
                ErrorBody::new(StatusCode::UNPROCESSABLE_ENTITY, reason.clone())
                    .with_errors(FieldErrors::default())
            }
            ApiError::Internal(reason) => {
                tracing::error!("Request failed: {}", reason);
                ErrorBody::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };
        let status =
            StatusCode::from_u16(body.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
