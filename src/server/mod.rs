//! HTTP surface: the web page, the summarization endpoint and a health probe.

pub mod error;
pub mod routes;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use server::{router, ApiServer, AppState};
