//! JSON error bodies for the HTTP API.
//!
//! Every failure leaves the server as `{"error": kind, "message": text}`
//! with a status derived from the kind.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use qlab_primitives::PrimitivesError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    /// A credential or backend setting is missing on the server side.
    #[error("server not configured: {0}")]
    Configuration(String),

    /// The quantum backend or its queue failed.
    #[error("backend failure: {0}")]
    Remote(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status and machine-readable kind.
    pub fn status_and_kind(&self) -> (StatusCode, &'static str) {
        use StatusCode as S;
        match self {
            Self::NotFound(_) => (S::NOT_FOUND, "not_found"),
            Self::BadRequest(_) => (S::BAD_REQUEST, "bad_request"),
            Self::Configuration(_) => (S::SERVICE_UNAVAILABLE, "configuration"),
            Self::Remote(_) => (S::BAD_GATEWAY, "remote"),
            Self::Internal(_) => (S::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

#[derive(Serialize)]
struct Body<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_kind();
        if status.is_server_error() {
            tracing::warn!(%status, error = %self, "request failed");
        }
        let message = self.to_string();
        (status, Json(Body { error, message })).into_response()
    }
}

impl From<PrimitivesError> for ApiError {
    fn from(e: PrimitivesError) -> Self {
        match e {
            PrimitivesError::Configuration(msg) => ApiError::Configuration(msg),
            PrimitivesError::Remote(err) => ApiError::Remote(err.to_string()),
            PrimitivesError::InvalidInput(msg) | PrimitivesError::Circuit(msg) => {
                ApiError::BadRequest(msg)
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qlab_hal::HalError;

    #[test]
    fn test_primitives_errors_map_to_status() {
        let cases = [
            (
                PrimitivesError::Configuration("IBM_QUANTUM_API_KEY not set".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                PrimitivesError::Remote(HalError::JobFailed("calibration".into())),
                StatusCode::BAD_GATEWAY,
            ),
            (
                PrimitivesError::InvalidInput("too wide".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                PrimitivesError::Circuit("empty circuit".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_and_kind().0, status);
        }
    }

    #[test]
    fn test_remote_message_keeps_reason() {
        let err = ApiError::from(PrimitivesError::Remote(HalError::JobFailed(
            "calibration in progress".into(),
        )));
        assert!(err.to_string().contains("calibration in progress"));
    }
}
