//! Completion backend module
//!
//! Provides the backend trait used by the assessor, the Gemini REST
//! client and the assessment response schema.

pub mod client;
pub mod schema;

use crate::errors::Result;
use async_trait::async_trait;

// Re-export commonly used types
pub use client::{GeminiClient, DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use schema::assessment_schema;

/// Default sampling temperature for analytical output
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// One request to a JSON-constrained completion endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_instruction: String,
    pub user_content: String,
    pub temperature: f32,
    pub response_schema: serde_json::Value,
}

/// A hosted model that answers with schema-constrained JSON text
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send one request.
    ///
    /// Returns `Ok(None)` when the provider answered without any text.
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>>;

    /// Model identifier used for logging
    fn model(&self) -> &str;
}
