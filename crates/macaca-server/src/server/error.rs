use crate::telemetry::ERRORS_TOTAL;
use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

/// Request-time failure, rendered as `{"error": message}`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing upload field
    #[error("{0}")]
    BadRequest(String),

    /// Body is not `multipart/form-data`
    #[error("{}", .0.body_text())]
    Rejected(#[from] MultipartRejection),

    /// Multipart stream failed mid-read, including the upload size limit
    #[error("{}", .0.body_text())]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Core(#[from] macaca_core::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Rejected(e) => e.status(),
            Self::Multipart(e) => e.status(),
            Self::Core(e) if e.is_client_error() => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) | Self::Rejected(_) => "bad_request",
            Self::Multipart(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => "too_large",
            Self::Multipart(_) => "bad_request",
            Self::Core(macaca_core::Error::ImageDecode(_)) => "decode",
            Self::Core(macaca_core::Error::Inference(_)) => "inference",
            Self::Core(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        metrics::counter!(ERRORS_TOTAL, "kind" => self.kind()).increment(1);
        warn!(status = status.as_u16(), "Analyze failed: {}", self);

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
