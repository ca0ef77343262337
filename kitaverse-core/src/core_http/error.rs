//! Mapping of failures onto HTTP responses

use super::types::ErrorResponse;
use crate::core_space::{ErrorKind, MembershipError};
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Membership(#[from] MembershipError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Membership(err) => match err.kind() {
                ErrorKind::NotFound | ErrorKind::NotMember => StatusCode::NOT_FOUND,
                ErrorKind::Full => StatusCode::BAD_REQUEST,
            },
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable code callers can branch on
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Membership(err) => err.kind().as_str(),
            ApiError::InvalidRequest(_) => "invalid_request",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_response = ErrorResponse {
            error: self.to_string(),
            details: Some(self.code().to_string()),
        };
        (self.status(), Json(error_response)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
