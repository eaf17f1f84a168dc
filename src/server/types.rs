use serde::{Deserialize, Serialize};

/// Successful `/summarize` response
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SummarizeResponse {
    /// Length of the submitted text, in characters
    pub original_length: usize,
    pub summary: String,
    /// Length of the summary, in characters
    pub summary_length: usize,
}

/// Error body shared by every failing route
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

/// `/health` response
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model: Option<String>,
}
