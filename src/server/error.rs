use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to API clients.
///
/// The inner string is the cause, written to the log only. Clients always get a fixed
/// message for the status code.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(cause: impl ToString) -> Self {
        Self::BadRequest(cause.to_string())
    }

    pub fn not_found(cause: impl ToString) -> Self {
        Self::NotFound(cause.to_string())
    }

    pub fn unprocessable(cause: impl ToString) -> Self {
        Self::Unprocessable(cause.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "Bad Request",
            Self::NotFound(_) => "Resource Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::Unprocessable(_) => "Unprocessable Entity",
            Self::Internal(_) => "Internal Server Error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::info!("{}", self);
        }
        let body = Json(json!({
            "success": false,
            "error": status.as_u16(),
            "message": self.message(),
        }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> ApiError {
        match error {
            sqlx::Error::RowNotFound => ApiError::NotFound("row not found".to_owned()),
            error => ApiError::Internal(error.to_string()),
        }
    }
}
