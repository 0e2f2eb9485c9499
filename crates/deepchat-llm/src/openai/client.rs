// OpenAI-compatible client implementation (DashScope, DeepSeek, OpenAI, ...)

use crate::config::ProviderConfig;
use crate::streaming::parse_chat_sse_stream;
use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, ChunkStream};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use std::time::Duration;

/// Chat completion client speaking the OpenAI wire protocol (HTTP direct, no SDK)
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Create a client from provider configuration (key, base URL, optional timeout)
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Self::build(&config.api_key, &config.base_url, config.timeout)
    }

    fn build(api_key: &str, base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http_client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send(&self, request: ChatRequest, stream: bool) -> Result<reqwest::Response> {
        let payload = build_chat_request(&request.model, &request.messages, &request.options, stream);

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            stream,
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(self.completions_url())
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Provider API error ({}): {}", status, error_text);
        }

        Ok(response)
    }
}

/// Request body for `/chat/completions`
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionPayload<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

pub(crate) fn build_chat_request<'a>(
    model: &'a str,
    messages: &'a [Message],
    options: &ChatOptions,
    stream: bool,
) -> ChatCompletionPayload<'a> {
    ChatCompletionPayload {
        model,
        messages,
        temperature: options.temperature,
        stream,
    }
}

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let response = self.send(request, false).await?;

        response
            .json::<ChatResponse>()
            .await
            .context("Failed to parse response")
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<ChunkStream> {
        let response = self.send(request, true).await?;
        Ok(parse_chat_sse_stream(response))
    }
}
