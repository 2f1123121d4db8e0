//! HTTP error responses with structured JSON bodies.

use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body serialized in JSON responses
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ErrorBody {
    /// Short error title
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Detailed error description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

/// API-level HTTP error.
///
/// Page-level conditions only: a missing invoice on a fetch path is a 404
/// here, while mutation failures never become `ApiError` - they travel back
/// as Form-State values with a 2xx/422 status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    fn title(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "Bad Request",
            ApiError::NotFound(_) => "Not Found",
            ApiError::Internal(_) => "Internal Server Error",
        }
    }

    fn detail(&self) -> &str {
        match self {
            ApiError::BadRequest(detail)
            | ApiError::NotFound(detail)
            | ApiError::Internal(detail) => detail,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = ErrorBody {
            title: self.title().to_string(),
            detail: self.detail().to_string(),
        };
        let body = serde_json::to_string(&body).unwrap_or_default();

        HttpResponse::build(self.status_code())
            .append_header((header::CONTENT_TYPE, "application/problem+json"))
            .body(body)
    }
}

/// Convert core errors to page-level responses.
impl From<crate::Error> for ApiError {
    fn from(err: crate::Error) -> Self {
        match err {
            crate::Error::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Type alias for Results using ApiError
pub type Result<T> = std::result::Result<T, ApiError>;
