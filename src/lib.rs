//! A small HTTP service that summarizes text with a locally loaded model.
//!
//! The model is loaded once at startup ([`summarizer::initialize`]); if loading
//! fails the server still runs and `/summarize` reports the model as
//! unavailable.

pub mod client;
pub mod config;
pub mod logging;
pub mod server;
pub mod summarizer;
