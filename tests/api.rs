//! In-process tests of the HTTP surface using stub summarizers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use sumserve::server::{router, AppState};
use sumserve::summarizer::{GenerationParams, Summarizer, SummarizeError, SummaryOutput};

/// Keeps the first `max_length` words of the input. Deterministic.
struct LeadWords;

impl Summarizer for LeadWords {
    fn model_name(&self) -> &str {
        "lead-words"
    }

    fn summarize(&self, text: &str, params: &GenerationParams) -> Result<Vec<SummaryOutput>, SummarizeError> {
        let words: Vec<&str> = text.split_whitespace().take(params.max_length).collect();
        Ok(vec![SummaryOutput { summary_text: words.join(" ") }])
    }
}

/// Always fails, and counts how often it was asked.
#[derive(Default)]
struct Broken {
    calls: AtomicUsize,
}

impl Summarizer for Broken {
    fn model_name(&self) -> &str {
        "broken"
    }

    fn summarize(&self, _text: &str, _params: &GenerationParams) -> Result<Vec<SummaryOutput>, SummarizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SummarizeError::Inference("tensor shape mismatch in layer 7".to_string()))
    }
}

/// Returns a well-formed but empty result list.
struct Empty;

impl Summarizer for Empty {
    fn model_name(&self) -> &str {
        "empty"
    }

    fn summarize(&self, _text: &str, _params: &GenerationParams) -> Result<Vec<SummaryOutput>, SummarizeError> {
        Ok(Vec::new())
    }
}

/// Remembers the generation parameters of every call.
#[derive(Default)]
struct Recording {
    seen: Mutex<Vec<GenerationParams>>,
}

impl Summarizer for Recording {
    fn model_name(&self) -> &str {
        "recording"
    }

    fn summarize(&self, text: &str, params: &GenerationParams) -> Result<Vec<SummaryOutput>, SummarizeError> {
        self.seen.lock().unwrap().push(*params);
        Ok(vec![SummaryOutput { summary_text: text.to_string() }])
    }
}

struct Panics;

impl Summarizer for Panics {
    fn model_name(&self) -> &str {
        "panics"
    }

    fn summarize(&self, _text: &str, _params: &GenerationParams) -> Result<Vec<SummaryOutput>, SummarizeError> {
        panic!("backend crashed");
    }
}

fn app_with(summarizer: Option<Arc<dyn Summarizer>>) -> Router {
    router(AppState::new(summarizer))
}

async fn post_raw(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/summarize")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

async fn post_json(app: Router, payload: Value) -> (StatusCode, Value) {
    post_raw(app, &payload.to_string()).await
}

#[tokio::test]
async fn summarizes_valid_text() {
    let text = "Rust is a systems programming language. It focuses on safety and speed.";
    let (status, body) = post_json(app_with(Some(Arc::new(LeadWords))), json!({ "text": text })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["original_length"], text.chars().count());
    assert_eq!(body["summary"], text);
    assert_eq!(body["summary_length"], text.chars().count());
}

#[tokio::test]
async fn lengths_count_characters_not_bytes() {
    let text = "Ünïcödé façade naïve café";
    let (status, body) = post_json(app_with(Some(Arc::new(LeadWords))), json!({ "text": text })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["original_length"], 25);
    assert_eq!(body["summary_length"], 25);
}

#[tokio::test]
async fn summary_respects_length_bound() {
    let text = "word ".repeat(1000);
    let (status, body) = post_json(app_with(Some(Arc::new(LeadWords))), json!({ "text": text })).await;

    assert_eq!(status, StatusCode::OK);
    let words = body["summary"].as_str().unwrap().split_whitespace().count();
    assert!(words <= GenerationParams::SUMMARY.max_length);
}

#[tokio::test]
async fn repeated_calls_are_deterministic() {
    let app = app_with(Some(Arc::new(LeadWords)));
    let payload = json!({ "text": "The same input should always give the same summary back." });

    let (_, first) = post_json(app.clone(), payload.clone()).await;
    let (_, second) = post_json(app, payload).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn missing_text_key_is_bad_request() {
    for payload in ["{}", r#"{"content": "hello"}"#, "[]", "not json at all", ""] {
        let (status, body) = post_raw(app_with(Some(Arc::new(LeadWords))), payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {payload:?}");
        assert_eq!(body, json!({ "error": "Missing 'text' key in JSON payload" }));
    }
}

#[tokio::test]
async fn blank_or_non_string_text_is_bad_request() {
    for text in [json!(""), json!("   \n\t"), json!(null), json!(7), json!({"nested": "x"})] {
        let (status, body) = post_json(app_with(Some(Arc::new(LeadWords))), json!({ "text": text })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "'text' must be a non-empty string" }));
    }
}

#[tokio::test]
async fn absent_model_short_circuits_every_payload() {
    for payload in [r#"{"text": "a perfectly fine request"}"#, "{}", r#"{"text": ""}"#, "garbage"] {
        let (status, body) = post_raw(app_with(None), payload).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Model is not available" }));
    }
}

#[tokio::test]
async fn inference_failure_is_opaque() {
    let broken = Arc::new(Broken::default());
    let (status, body) = post_json(app_with(Some(broken.clone())), json!({ "text": "hello there" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "An internal error occurred" }));
    assert_eq!(broken.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn invalid_input_never_reaches_the_model() {
    let broken = Arc::new(Broken::default());
    let (status, _) = post_json(app_with(Some(broken.clone())), json!({ "text": " " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(broken.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_result_is_internal_error() {
    let (status, body) = post_json(app_with(Some(Arc::new(Empty))), json!({ "text": "hello" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "An internal error occurred" }));
}

#[tokio::test]
async fn backend_panic_is_internal_error() {
    let (status, body) = post_json(app_with(Some(Arc::new(Panics))), json!({ "text": "hello" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "An internal error occurred" }));
}

#[tokio::test]
async fn home_page_is_html_regardless_of_model() {
    for app in [app_with(None), app_with(Some(Arc::new(LeadWords)))] {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/summarize"));
    }
}

#[tokio::test]
async fn health_reports_model_state() {
    let request = || Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = app_with(None).oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "status": "ok", "model_loaded": false, "model": null }));

    let response = app_with(Some(Arc::new(LeadWords))).oneshot(request()).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["model"], "lead-words");
}

#[tokio::test]
async fn summarize_rejects_get() {
    let request = Request::builder().uri("/summarize").body(Body::empty()).unwrap();
    let response = app_with(Some(Arc::new(LeadWords))).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn handler_passes_fixed_generation_params() {
    let recording = Arc::new(Recording::default());
    let (status, _) = post_json(app_with(Some(recording.clone())), json!({ "text": "some text" })).await;

    assert_eq!(status, StatusCode::OK);
    let seen = recording.seen.lock().unwrap();
    assert_eq!(seen.as_slice(), &[GenerationParams::SUMMARY]);
    assert_eq!(seen[0].max_length, 150);
    assert_eq!(seen[0].min_length, 30);
    assert!(!seen[0].do_sample);
}

#[tokio::test]
async fn large_body_reaches_the_model() {
    let text = "a".repeat(3 * 1024 * 1024);
    let (status, body) = post_json(app_with(Some(Arc::new(LeadWords))), json!({ "text": text })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["original_length"], 3 * 1024 * 1024);
}

#[tokio::test]
async fn large_body_with_failing_model_is_json_error() {
    let text = "word ".repeat(1024 * 1024);
    let (status, body) = post_json(app_with(Some(Arc::new(Broken::default()))), json!({ "text": text })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "An internal error occurred" }));
}
