//! Consistent error responses.
//!
//! Every failure leaving a handler goes through [`ApiError`], which picks the
//! status, logs `[ERROR] <status> - <message>` once, and renders
//! `{ "error": "<message>" }`.

use axum::extract::rejection::{BytesRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use advisorhub_auth::{PasswordError, TokenError};
use advisorhub_core::ValidationErrors;
use advisorhub_infra::RepositoryError;

pub const NOT_AUTHENTICATED: &str = "Not authenticated";
pub const INTERNAL: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body parsed but failed field rules.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Body could not be read as JSON of the expected shape.
    #[error("{message}")]
    MalformedBody { status: StatusCode, message: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("Not authenticated")]
    Unauthenticated,

    /// Credentials were presented but rejected.
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Details are logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MalformedBody { status, .. } => *status,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated | ApiError::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the client.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => INTERNAL.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.public_message();

        if let ApiError::Internal(detail) = &self {
            tracing::error!(detail = %detail, "request failed");
        }
        tracing::error!("[ERROR] {} - {}", status.as_u16(), message);

        json_error(status, message)
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::MalformedBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("blocking task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_statuses() {
        let cases = [
            (ApiError::Validation(ValidationErrors::single("email", "Required")), 422),
            (ApiError::BadRequest("bad".into()), 400),
            (ApiError::Unauthenticated, 401),
            (ApiError::InvalidCredentials("Invalid email or password".into()), 401),
            (ApiError::Forbidden("no".into()), 403),
            (ApiError::NotFound("Product not found".into()), 404),
            (ApiError::Internal("boom".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.status().as_u16(), status, "{err:?}");
        }
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let err = ApiError::from(RepositoryError::Database("connection refused".into()));
        assert_eq!(err.public_message(), INTERNAL);
    }

    #[test]
    fn validation_message_lists_fields() {
        let err = ApiError::Validation(ValidationErrors::single("email", "Invalid email"));
        assert_eq!(err.public_message(), "Invalid email at \"email\"");
        assert_eq!(ApiError::Unauthenticated.public_message(), NOT_AUTHENTICATED);
    }
}
