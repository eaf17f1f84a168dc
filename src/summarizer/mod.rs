//! # Summarizer Module
//!
//! The summarization capability the HTTP layer delegates to. The model itself is
//! opaque: given text and generation parameters it either yields summary records
//! or fails with a [`SummarizeError`].
//!
//! ## Key Components
//!
//! - [`Summarizer`]: the capability trait, shared read-only across requests
//! - [`GenerationParams`]: length bounds and decoding mode for one call
//! - [`loader`]: builds the capability once at startup, or reports it absent
//! - `llama`: the `llama_cpp` backed implementation (feature `llama`)

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod loader;
#[cfg(feature = "llama")]
pub mod llama;

pub use loader::{initialize, try_initialize};

/// Failures raised at the two call sites of the capability.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// The model could not be constructed at startup.
    #[error("failed to load summarization model: {0}")]
    Load(String),
    /// Generation failed or returned something unusable.
    #[error("summarization failed: {0}")]
    Inference(String),
}

/// Generation settings passed with every invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationParams {
    /// Upper bound on generated tokens
    pub max_length: usize,
    /// Lower bound the model is asked to reach
    pub min_length: usize,
    /// Random sampling; `false` means greedy decoding
    pub do_sample: bool,
}

impl GenerationParams {
    /// The fixed configuration used by `/summarize`.
    pub const SUMMARY: GenerationParams = GenerationParams {
        max_length: 150,
        min_length: 30,
        do_sample: false,
    };
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::SUMMARY
    }
}

/// One generated summary, as returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryOutput {
    pub summary_text: String,
}

/// A loaded summarization model.
///
/// Implementations must be safe to call concurrently from several blocking
/// threads; `summarize` takes `&self` and may block for the whole generation.
pub trait Summarizer: Send + Sync {
    /// Identifier of the underlying model.
    fn model_name(&self) -> &str;

    /// Summarizes `text`. Backends return one record per generated sequence.
    fn summarize(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<Vec<SummaryOutput>, SummarizeError>;
}

/// Builds the instruction prompt fed to a completion model.
pub fn build_prompt(text: &str, params: &GenerationParams) -> String {
    format!(
        "Summarize the following text in one concise paragraph of roughly {} to {} words. \
         Reply with the summary only.\n\n### Text:\n{}\n\n### Summary:\n",
        params.min_length,
        params.max_length,
        text.trim()
    )
}
