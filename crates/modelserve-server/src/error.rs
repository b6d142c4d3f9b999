//! Conversion of dispatch errors into HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use modelserve_core::Error;
use serde_json::json;

/// Error handling
///
/// Every variant renders as `{"error": "<message>"}`.
#[derive(Debug)]
pub enum AppError {
    /// Error raised by the dispatch core
    Dispatch(Error),
    /// Request rejected by an extractor before reaching the core
    Rejected(StatusCode, String),
    /// No route matched
    NotFound,
    /// Route matched but not for this method
    MethodNotAllowed,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Dispatch(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected(status, _) => *status,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Dispatch(err) => err.to_string(),
            Self::Rejected(_, msg) => msg.clone(),
            Self::NotFound => "Not found".to_string(),
            Self::MethodNotAllowed => "Method not allowed".to_string(),
        }
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError::Dispatch(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.message() });
        (self.status(), Json(body)).into_response()
    }
}
