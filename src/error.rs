//! Error type for request handlers.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

/// Body sent for any internal failure. Never includes error details.
pub const INTERNAL_ERROR_BODY: &str = "<!DOCTYPE html><html><head><title>Error</title></head>\
<body><h1>Something went wrong</h1><p>The request could not be completed.</p>\
<a href=\"/tasks\">Back to tasks</a></body></html>";

/// Unexpected failure while handling a request.
///
/// Validation problems and malformed ids are not errors; they are handled
/// inside the handlers. Anything that reaches this type becomes a 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Storage(err) = &self;
        let detail = format!("{err:#}");
        tracing::error!(error = %detail, "Request failed");
        internal_error_response()
    }
}

/// Generic 500 response.
pub fn internal_error_response() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Html(INTERNAL_ERROR_BODY)).into_response()
}

/// Result type for request handlers.
pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_error_hides_details() {
        let err = AppError::from(anyhow::anyhow!("no such table: tasks"));
        assert!(err.to_string().contains("no such table"));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!INTERNAL_ERROR_BODY.contains("no such table"));
    }
}
