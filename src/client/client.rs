use std::io::Read;
use std::path::Path;
use anyhow::{bail, Context, Result};
use colored::*;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::server::types::{ErrorResponse, SummarizeResponse};
use super::display::print_summary;

/// Thin HTTP client for the `/summarize` endpoint.
pub struct SummarizeClient {
    http: reqwest::Client,
    base_url: String,
}

impl SummarizeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn summarize(&self, text: &str) -> Result<SummarizeResponse> {
        let url = format!("{}/summarize", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .with_context(|| format!("could not reach {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "unreadable error body".to_string());
            bail!("server returned {}: {}", status, message);
        }

        response
            .json::<SummarizeResponse>()
            .await
            .context("malformed summary response")
    }
}

/// Summarizes a file, or stdin when no file is given, and prints the result.
pub async fn run_once(base_url: &str, file: Option<&Path>) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    let client = SummarizeClient::new(base_url);
    let response = client.summarize(&text).await?;
    print_summary(&response);
    Ok(())
}

/// Prompt loop: each entered line is sent for summarization.
pub async fn interactive_loop(base_url: &str) -> Result<()> {
    println!("{}", "Paste text and press Enter to summarize. Type 'exit' to leave.".cyan());

    let mut rl = DefaultEditor::new()?;
    let client = SummarizeClient::new(base_url);

    loop {
        match rl.readline("> ") {
            Ok(input) => {
                let input_trimmed = input.trim();
                if input_trimmed.is_empty() {
                    continue;
                }
                if ["exit", "bye", "quit"].contains(&input_trimmed.to_lowercase().as_str()) {
                    println!("Goodbye!");
                    break;
                }
                let _ = rl.add_history_entry(input_trimmed);

                match client.summarize(&input).await {
                    Ok(response) => print_summary(&response),
                    Err(e) => println!("{} {:#}", "Error:".red().bold(), e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
