//! OpenAI-compatible Provider Implementation
//!
//! Talks to any chat-completions endpoint (OpenRouter, OpenAI, or a local
//! gateway speaking the same protocol).
//!
//! # Features
//!
//! - Blocking HTTP communication, one request per call
//! - Configurable endpoint, model, temperature and token limit
//! - Timeout handling
//!
//! No retries: a failed call is reported to the caller as-is.
//!
//! # Examples
//!
//! ```no_run
//! use factsheet_llm::{OpenAiCompatibleProvider, ProviderConfig};
//! use factsheet_domain::LlmProvider;
//!
//! let config = ProviderConfig {
//!     api_key: "sk-...".to_string(),
//!     ..ProviderConfig::default()
//! };
//! let provider = OpenAiCompatibleProvider::new(config).unwrap();
//! let answer = provider.generate("Say 'hello' and nothing else", None).unwrap();
//! ```

use crate::LlmError;
use factsheet_domain::LlmProvider as LlmProviderTrait;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default chat-completions endpoint (OpenRouter)
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "openai/gpt-4.1-nano";

/// Default timeout for LLM requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default completion length cap
pub const DEFAULT_MAX_TOKENS: u32 = 256;

/// Connection and sampling settings for [`OpenAiCompatibleProvider`]
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Bearer credential
    pub api_key: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Completion length cap
    pub max_tokens: u32,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            temperature: 0.0,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Chat-completions provider
pub struct OpenAiCompatibleProvider {
    config: ProviderConfig,
    client: Client,
}

/// Request body for the chat-completions API
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response from the chat-completions API
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty or the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Config("API key is not set".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Settings this provider was built with
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn build_request<'a>(&'a self, prompt: &'a str, system: Option<&'a str>) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

impl LlmProviderTrait for OpenAiCompatibleProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, Self::Error> {
        let body = self.build_request(prompt, system);
        debug!(model = %self.config.model, "Sending completion request ({} chars)", prompt.len());

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.config.model.clone()));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| LlmError::InvalidResponse("Response contained no choices".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(base_url: String) -> ProviderConfig {
        ProviderConfig {
            base_url,
            api_key: "test-key".to_string(),
            timeout_secs: 5,
            ..ProviderConfig::default()
        }
    }

    fn generate_blocking(
        config: ProviderConfig,
        prompt: &'static str,
        system: Option<&'static str>,
    ) -> tokio::task::JoinHandle<Result<String, LlmError>> {
        tokio::task::spawn_blocking(move || {
            let provider = OpenAiCompatibleProvider::new(config)?;
            provider.generate(prompt, system)
        })
    }

    #[test]
    fn test_missing_api_key() {
        let result = OpenAiCompatibleProvider::new(ProviderConfig::default());
        assert!(matches!(result, Err(LlmError::Config(_))));
    }

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_tokens, 256);
    }

    #[test]
    fn test_request_body() {
        let provider = OpenAiCompatibleProvider::new(config_for("http://x/".to_string())).unwrap();
        assert_eq!(provider.endpoint(), "http://x/chat/completions");

        let body = serde_json::to_value(provider.build_request("extract", Some("be brief"))).unwrap();
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be brief");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "extract");
        assert_eq!(body["max_tokens"], 256);

        let body = serde_json::to_value(provider.build_request("extract", None)).unwrap();
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_generate_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({ "model": DEFAULT_MODEL })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "Phase I" } },
                    { "message": { "role": "assistant", "content": "ignored" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = generate_blocking(config_for(server.uri()), "phase?", None)
            .await
            .unwrap();
        assert_eq!(result.unwrap(), "Phase I");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_generate_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let result = generate_blocking(config_for(server.uri()), "phase?", None)
            .await
            .unwrap();
        assert!(matches!(result, Err(LlmError::RateLimitExceeded)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_generate_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = generate_blocking(config_for(server.uri()), "phase?", None)
            .await
            .unwrap();
        match result {
            Err(LlmError::Communication(message)) => assert!(message.contains("boom")),
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_generate_without_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
            .mount(&server)
            .await;

        let result = generate_blocking(config_for(server.uri()), "phase?", None)
            .await
            .unwrap();
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }
}
