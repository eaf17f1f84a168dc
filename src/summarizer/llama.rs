use llama_cpp::{LlamaModel, LlamaParams, SessionParams};
use llama_cpp::standard_sampler::StandardSampler;
use tracing::{debug, info};

use crate::config::ModelConfig;
use super::{build_prompt, GenerationParams, Summarizer, SummarizeError, SummaryOutput};

/// Summarizer backed by a GGUF completion model run through `llama_cpp`.
///
/// The loaded model is shared; every call opens its own session, so concurrent
/// requests never touch each other's context.
pub struct LlamaSummarizer {
    name: String,
    model: LlamaModel,
    context_size: u32,
}

impl LlamaSummarizer {
    pub fn load(config: &ModelConfig) -> Result<Self, SummarizeError> {
        if !config.path.is_file() {
            return Err(SummarizeError::Load(format!(
                "model file not found at {}",
                config.path.display()
            )));
        }

        let llama_params = LlamaParams {
            n_gpu_layers: config.n_gpu_layers,
            use_mmap: config.use_mmap,
            use_mlock: config.use_mlock,
            ..Default::default()
        };
        info!(
            n_gpu_layers = config.n_gpu_layers,
            use_mmap = config.use_mmap,
            use_mlock = config.use_mlock,
            "Attempting to load model with LlamaParams"
        );

        let model = LlamaModel::load_from_file(&config.path, llama_params)
            .map_err(|e| SummarizeError::Load(format!("llama_cpp could not load {}: {}", config.path.display(), e)))?;

        Ok(Self {
            name: config.name.clone(),
            model,
            context_size: config.context_size,
        })
    }

    fn count_tokens(&self, text: &str, add_bos: bool) -> Result<usize, SummarizeError> {
        self.model
            .tokenize_bytes(text, add_bos, false)
            .map(|tokens| tokens.len())
            .map_err(|e| SummarizeError::Inference(format!("tokenization failed: {}", e)))
    }
}

impl Summarizer for LlamaSummarizer {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn summarize(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<Vec<SummaryOutput>, SummarizeError> {
        let prompt = build_prompt(text, params);

        // Prompt (with BOS, as the session feeds it) plus the longest allowed
        // summary has to fit in one session
        let prompt_tokens = self.count_tokens(&prompt, true)?;
        let budget = self.context_size as usize;
        if !fits_context(prompt_tokens, params.max_length, budget) {
            return Err(SummarizeError::Inference(format!(
                "input of {} prompt tokens exceeds context of {} tokens",
                prompt_tokens, budget
            )));
        }

        let session_params = SessionParams {
            n_ctx: self.context_size,
            n_batch: 512,
            ..Default::default()
        };
        let mut session = self
            .model
            .create_session(session_params)
            .map_err(|e| SummarizeError::Inference(format!("failed to create session: {}", e)))?;

        session
            .advance_context(&prompt)
            .map_err(|e| SummarizeError::Inference(format!("failed to advance context: {}", e)))?;
        debug!(prompt_tokens, "Context advanced with summarization prompt.");

        let sampler = if params.do_sample {
            StandardSampler::default()
        } else {
            StandardSampler::new_greedy()
        };
        let completion = session
            .start_completing_with(sampler, params.max_length)
            .map_err(|e| SummarizeError::Inference(format!("failed to start completion: {}", e)))?;

        let generated: String = completion.into_strings().collect();
        let summary = clean_completion(&generated);
        if summary.is_empty() {
            return Err(SummarizeError::Inference("model produced an empty summary".to_string()));
        }

        if let Ok(summary_tokens) = self.count_tokens(&summary, false) {
            if summary_tokens < params.min_length {
                debug!(summary_tokens, min_length = params.min_length, "Summary shorter than requested minimum.");
            }
        }

        Ok(vec![SummaryOutput { summary_text: summary }])
    }
}

fn fits_context(prompt_tokens: usize, max_length: usize, context_size: usize) -> bool {
    prompt_tokens + max_length <= context_size
}

/// Drops anything the model emits after the summary section.
fn clean_completion(generated: &str) -> String {
    let cut = generated.find("\n###").unwrap_or(generated.len());
    generated[..cut].trim().to_string()
}
