use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use linkpulse_redirector::RedirectorError;
use linkpulse_shortener::ShortenerError;
use thiserror::Error;
use tracing::{debug, error};

pub type Result<T> = std::result::Result<T, AppError>;

/// Seconds a client should wait before retrying a 503.
const RETRY_AFTER_SECS: &str = "1";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing or empty x-owner-id header")]
    MissingOwner,
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("short id not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
    #[error(transparent)]
    Redirector(#[from] RedirectorError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingOwner => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Shortener(err) => match err {
                ShortenerError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
                ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
                ShortenerError::Unauthorized(_) => StatusCode::FORBIDDEN,
                ShortenerError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                ShortenerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Redirector(err) => match err {
                RedirectorError::NotFound(_) => StatusCode::NOT_FOUND,
                RedirectorError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                RedirectorError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Message returned to the client. Server-side faults are not echoed.
    fn public_message(&self, status: StatusCode) -> String {
        match status {
            StatusCode::SERVICE_UNAVAILABLE => "service temporarily unavailable".to_string(),
            StatusCode::INTERNAL_SERVER_ERROR => "internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "request failed");
        } else {
            debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = Json(serde_json::json!({
            "error": self.public_message(status)
        }));
        let mut response = (status, body).into_response();

        if status == StatusCode::SERVICE_UNAVAILABLE {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECS));
        }

        response
    }
}
