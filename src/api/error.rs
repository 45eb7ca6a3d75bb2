//! HTTP error mapping for engine and lookup failures.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::error::EngineError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub code: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// Failures a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown organization or member.
    #[error("{0}")]
    NotFound(String),
    /// Invalid request input.
    #[error("{0}")]
    BadRequest(String),
    /// Engine invariant violated.
    #[error("{0}")]
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::MalformedForecast(_) => Self::Internal(err.to_string()),
            EngineError::InvalidHistoricalData(_)
            | EngineError::InvalidMeasurement(_)
            | EngineError::HourOutOfRange(_) => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        if status.is_server_error() {
            warn!(error = %self, "request failed");
        }
        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_status() {
        let cases = [
            (EngineError::InvalidHistoricalData("x".into()), StatusCode::BAD_REQUEST),
            (EngineError::InvalidMeasurement("x".into()), StatusCode::BAD_REQUEST),
            (EngineError::HourOutOfRange(30), StatusCode::BAD_REQUEST),
            (
                EngineError::MalformedForecast("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let resp = ApiError::from(err).into_response();
            assert_eq!(resp.status(), expected);
        }
    }

    #[test]
    fn not_found_is_404() {
        let resp = ApiError::NotFound("organization \"x\" not found".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
