//! Error types for oracle-web.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use oracle_client::QueryError;

/// Presentation server errors.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// The query round trip failed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The request body could not be read.
    #[error("Requisição inválida: {0}")]
    InvalidRequest(String),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Query(err) => {
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            WebError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let body = serde_json::json!({
            "error": message,
            "error_html": oracle_render::escape_html(&message),
        });

        (status, axum::Json(body)).into_response()
    }
}
