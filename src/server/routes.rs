use axum::{
    Json,
    body::Bytes,
    extract::State,
    response::Html,
};
use serde_json::Value;
use tracing::{info, debug, Instrument};
use uuid::Uuid;

use crate::summarizer::SummarizeError;
use super::error::ApiError;
use super::server::AppState;
use super::types::{HealthResponse, SummarizeResponse};

/// Bundled web interface
const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// Serves the web page. Does not depend on the model.
pub async fn home() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Reports whether the model is loaded.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    debug!("Health check endpoint called");
    Json(HealthResponse {
        status: "ok".to_string(),
        model_loaded: state.summarizer.is_some(),
        model: state.summarizer.as_ref().map(|s| s.model_name().to_string()),
    })
}

/// Summarizes the `text` field of a JSON body.
///
/// Checks run in order and stop at the first failure: model loaded, body is a
/// JSON object holding `text`, `text` is a non-blank string.
pub async fn summarize(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let span = tracing::info_span!("summarize", request_id = %Uuid::new_v4());
    summarize_inner(state, body).instrument(span).await
}

async fn summarize_inner(state: AppState, body: Bytes) -> Result<Json<SummarizeResponse>, ApiError> {
    let summarizer = state.summarizer.clone().ok_or(ApiError::ModelUnavailable)?;

    let input_text = extract_text(&body)?;
    let original_length = input_text.chars().count();
    info!("Received text. Length: {} chars.", original_length);

    // Inference blocks; keep it off the async workers
    let params = state.params;
    let outputs = tokio::task::spawn_blocking(move || summarizer.summarize(&input_text, &params))
        .await
        .map_err(|e| SummarizeError::Inference(format!("summarization task did not complete: {}", e)))??;

    let summary = outputs
        .into_iter()
        .next()
        .map(|output| output.summary_text)
        .ok_or_else(|| SummarizeError::Inference("model returned no summaries".to_string()))?;

    let summary_length = summary.chars().count();
    info!("Generated summary. Length: {} chars.", summary_length);

    Ok(Json(SummarizeResponse {
        original_length,
        summary,
        summary_length,
    }))
}

/// Pulls a usable `text` value out of a raw request body.
pub(crate) fn extract_text(body: &[u8]) -> Result<String, ApiError> {
    let payload: Value = serde_json::from_slice(body).map_err(|_| ApiError::MissingText)?;

    let text = match &payload {
        Value::Object(map) => map.get("text").ok_or(ApiError::MissingText)?,
        _ => return Err(ApiError::MissingText),
    };

    match text {
        Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
        _ => Err(ApiError::InvalidText),
    }
}
