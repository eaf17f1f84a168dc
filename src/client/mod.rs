// Command-line client for a running summarization server
mod client;
mod display;

pub use client::{interactive_loop, run_once, SummarizeClient};
pub use display::{lengths_table, print_summary};
