// ABOUTME: OpenRouter API client wrapping the OpenAI-compatible chat API.
// ABOUTME: Supports custom HTTP-Referer and X-Title headers for app identification.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};

use super::openai::{OpenAIError, OpenAIRequest, OpenAIResponse};
use super::{Request, Response};
use crate::error::LlmError;

/// Base URL for OpenRouter's OpenAI-compatible API.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model when none is specified.
pub const OPENROUTER_DEFAULT_MODEL: &str = "deepseek/deepseek-chat";

/// Client for OpenRouter API.
/// OpenRouter provides a unified API that routes to various LLM providers.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    api_key: String,
    http: reqwest::Client,
    headers: HeaderMap,
    base_url: String,
    default_model: String,
}

impl OpenRouterClient {
    /// Create a new OpenRouter client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_headers(api_key, None, None)
    }

    /// Create a new OpenRouter client from the OPENROUTER_API_KEY environment variable.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var("OPENROUTER_API_KEY").map_err(|_| {
            LlmError::Configuration("OPENROUTER_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::new(api_key))
    }

    /// Create a new OpenRouter client with custom headers for app identification.
    ///
    /// # Arguments
    /// * `api_key` - OpenRouter API key
    /// * `referer` - HTTP-Referer header (your app's URL, helps OpenRouter track usage)
    /// * `title` - X-Title header (your app's name, displayed in OpenRouter dashboard)
    pub fn with_headers(
        api_key: impl Into<String>,
        referer: Option<&str>,
        title: Option<&str>,
    ) -> Self {
        let mut headers = HeaderMap::new();

        if let Some(referer) = referer {
            if let Ok(value) = HeaderValue::from_str(referer) {
                headers.insert("HTTP-Referer", value);
            }
        }

        if let Some(title) = title {
            if let Ok(value) = HeaderValue::from_str(title) {
                headers.insert("X-Title", value);
            }
        }

        let http = build_http(&headers, None);

        Self {
            api_key: api_key.into(),
            http,
            headers,
            base_url: OPENROUTER_BASE_URL.to_string(),
            default_model: OPENROUTER_DEFAULT_MODEL.to_string(),
        }
    }

    /// Set the default model to use when none is specified in the request.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Bound every request by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = build_http(&self.headers, Some(timeout));
        self
    }

    /// The model used when a request leaves `model` empty.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}

fn build_http(headers: &HeaderMap, timeout: Option<Duration>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder().default_headers(headers.clone());
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}

#[async_trait]
impl super::client::LlmClient for OpenRouterClient {
    async fn create_message(&self, req: &Request) -> Result<Response, LlmError> {
        let mut openai_req = OpenAIRequest::from(req);

        // Use default model if none specified
        if openai_req.model.is_empty() {
            openai_req.model = self.default_model.clone();
        }

        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(model = %openai_req.model, messages = openai_req.messages.len(), "sending completion request");

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&openai_req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            let message = serde_json::from_str::<OpenAIError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let openai_resp: OpenAIResponse = response.json().await?;
        openai_resp.into_response().ok_or(LlmError::EmptyResponse)
    }
}
