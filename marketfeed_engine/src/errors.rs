use thiserror::Error;

use crate::seo::LlmError;

/// Error surface of the engine APIs. Storage backend errors are flattened to
/// strings at this boundary so that the APIs stay generic over the backend.
#[derive(Debug, Error)]
pub enum ListingApiError {
    #[error("Storage error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("LLM provider error: {0}")]
    Llm(#[from] LlmError),
}

impl ListingApiError {
    pub fn database<E: std::error::Error>(e: E) -> Self {
        Self::DatabaseError(e.to_string())
    }
}
