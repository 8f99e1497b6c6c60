//! Gemini REST client
//!
//! Sends schema-constrained `generateContent` requests:
//! - Endpoint: POST {base}/v1beta/models/{model}:generateContent
//! - Auth: `x-goog-api-key` header, key resolved at call time
//! - Response: text parts of the first candidate

use crate::errors::{Result, TriageError};
use crate::provider::{CompletionBackend, CompletionRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default provider endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Environment variable holding the provider key
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";

/// Request timeout (60 seconds)
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Where the provider key comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Read from this environment variable on every call
    Env(String),
    /// Fixed key supplied by the caller
    Explicit(String),
}

impl ApiKeySource {
    /// Resolve the key now; a missing or blank key is a credential error
    pub fn resolve(&self) -> Result<String> {
        let (key, var) = match self {
            ApiKeySource::Env(var) => (std::env::var(var).ok(), var.as_str()),
            ApiKeySource::Explicit(key) => (Some(key.clone()), "explicit key"),
        };

        match key {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(TriageError::MissingCredential {
                var: var.to_string(),
            }),
        }
    }
}

/// Gemini completion client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: ApiKeySource,
}

impl GeminiClient {
    /// Create client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_BASE_URL, DEFAULT_MODEL, REQUEST_TIMEOUT)
    }

    /// Create client with custom configuration
    pub fn with_config(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TriageError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: ApiKeySource::Env(DEFAULT_API_KEY_ENV.to_string()),
        })
    }

    /// Replace the credential source
    pub fn with_api_key(mut self, source: ApiKeySource) -> Self {
        self.api_key = source;
        self
    }

    /// URL of the generate endpoint for the configured model
    pub fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Check that the model metadata endpoint answers with this key
    pub async fn health_check(&self) -> Result<bool> {
        let key = self.api_key.resolve()?;
        let url = format!("{}/v1beta/models/{}", self.base_url, self.model);

        match self.client.get(&url).header(API_KEY_HEADER, key).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::debug!(error = %e, "provider health check failed");
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl CompletionBackend for GeminiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>> {
        let key = self.api_key.resolve()?;
        let url = self.generate_url();
        let body = GenerateContentRequest::from_completion(request);

        tracing::debug!(model = %self.model, url = %url, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TriageError::ProviderApi(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| TriageError::ProviderApi(format!("Failed to parse envelope: {}", e)))?;

        Ok(envelope.text())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// generateContent request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    pub(crate) fn from_completion(request: &CompletionRequest) -> Self {
        Self {
            system_instruction: Content::text(None, &request.system_instruction),
            contents: vec![Content::text(Some("user"), &request.user_content)],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                response_mime_type: "application/json".to_string(),
                response_schema: request.response_schema.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// generateContent response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, `None` when there is none
    pub(crate) fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
