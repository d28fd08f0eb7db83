use crate::server::ApiError;
use crate::state::AppState;
use crate::telemetry::{INFERENCE_LATENCY_US, REQUESTS_TOTAL};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use macaca_core::AnalyzeResponse;
use std::time::Instant;
use tracing::{debug, info};

/// Multipart field carrying the uploaded image
pub const UPLOAD_FIELD: &str = "file";

// ============================================================================
// Inference
// ============================================================================

#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    metrics::counter!(REQUESTS_TOTAL).increment(1);
    let mut multipart = multipart?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            upload = Some(field.bytes().await?);
            break;
        }
    }

    let bytes = upload.ok_or_else(|| {
        ApiError::BadRequest(format!("multipart field `{}` is required", UPLOAD_FIELD))
    })?;
    debug!("Received upload of {} bytes", bytes.len());

    let start = Instant::now();
    let top = state.inference.analyze(bytes).await?;
    metrics::histogram!(INFERENCE_LATENCY_US).record(start.elapsed().as_micros() as f64);

    let response = AnalyzeResponse::try_from(&top)?;
    info!(pred_1 = %response.pred_1, "Analyze complete");

    Ok(Json(response))
}

// ============================================================================
// Health and metrics
// ============================================================================

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let predictor = state.predictor();
    Json(serde_json::json!({
        "status": "ok",
        "model": predictor.name(),
        "classes": predictor.num_classes(),
    }))
}

pub async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}
