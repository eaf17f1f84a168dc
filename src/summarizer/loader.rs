use std::sync::Arc;
use std::time::{Duration, Instant};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, error};

use crate::config::ModelConfig;
use super::{Summarizer, SummarizeError};

/// Loads the summarization model once, at startup.
///
/// Any failure is logged and turned into `None`: the server keeps running and
/// `/summarize` answers with the unavailable error for the rest of the process.
pub fn initialize(config: &ModelConfig) -> Option<Arc<dyn Summarizer>> {
    match try_initialize(config) {
        Ok(summarizer) => Some(summarizer),
        Err(e) => {
            error!("Error loading model: {}", e);
            None
        }
    }
}

/// Typed variant of [`initialize`].
pub fn try_initialize(config: &ModelConfig) -> Result<Arc<dyn Summarizer>, SummarizeError> {
    info!("Loading summarization model '{}' from {}", config.name, config.path.display());

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {wide_msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Loading model {}...", config.name));

    let started = Instant::now();
    let result = load_backend(config);
    pb.disable_steady_tick();

    match &result {
        Ok(_) => {
            pb.finish_with_message(format!("Model {} loaded", config.name));
            info!(elapsed_ms = started.elapsed().as_millis() as u64, "Model loaded successfully.");
        }
        Err(_) => pb.finish_with_message(format!("Model {} unavailable", config.name)),
    }

    result
}

#[cfg(feature = "llama")]
fn load_backend(config: &ModelConfig) -> Result<Arc<dyn Summarizer>, SummarizeError> {
    let summarizer = super::llama::LlamaSummarizer::load(config)?;
    Ok(Arc::new(summarizer))
}

#[cfg(not(feature = "llama"))]
fn load_backend(_config: &ModelConfig) -> Result<Arc<dyn Summarizer>, SummarizeError> {
    Err(SummarizeError::Load(
        "built without the `llama` backend feature".to_string(),
    ))
}
