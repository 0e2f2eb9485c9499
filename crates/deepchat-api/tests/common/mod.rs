#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use deepchat_api::{build_router, config::Config, state::AppState};
use deepchat_llm::{
    ChatClient, ChatRequest, ChatResponse, ChunkStream, ProviderChunk, ResponseChoice,
    ResponseMessage, TokenUsage,
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Provider double: either streams `chunks` or fails with `error`
pub struct FakeProvider {
    pub chunks: Vec<Result<ProviderChunk, String>>,
    pub reply: String,
    pub error: Option<String>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl FakeProvider {
    pub fn streaming(chunks: Vec<Result<ProviderChunk, String>>) -> Self {
        Self {
            chunks,
            reply: String::new(),
            error: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Self::streaming(Vec::new())
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::streaming(Vec::new())
        }
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    fn record(&self, request: ChatRequest) -> Result<()> {
        self.requests.lock().unwrap().push(request);
        match &self.error {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ChatClient for FakeProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let model = request.model.clone();
        self.record(request)?;

        Ok(ChatResponse {
            id: "chatcmpl-fake".to_string(),
            object: "chat.completion".to_string(),
            created: 1_700_000_000,
            model,
            choices: vec![ResponseChoice {
                index: 0,
                message: ResponseMessage {
                    role: "assistant".to_string(),
                    content: Some(self.reply.clone()),
                    reasoning_content: None,
                },
                finish_reason: Some("stop".to_string()),
            }],
            usage: TokenUsage {
                prompt_tokens: 9,
                completion_tokens: 4,
                total_tokens: 13,
            },
        })
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<ChunkStream> {
        self.record(request)?;

        let items: Vec<Result<ProviderChunk>> = self
            .chunks
            .iter()
            .cloned()
            .map(|item| item.map_err(|e| anyhow!(e)))
            .collect();
        Ok(Box::pin(futures::stream::iter(items)))
    }
}

pub fn chunk(reasoning: Option<&str>, content: Option<&str>) -> Result<ProviderChunk, String> {
    let mut chunk = ProviderChunk::new("chatcmpl-s", 1_700_000_000, "deepseek-r1");
    chunk.delta_reasoning = reasoning.map(str::to_string);
    chunk.delta_content = content.map(str::to_string);
    Ok(chunk)
}

pub fn app(provider: Arc<FakeProvider>) -> Router {
    let config: Config = toml::from_str("").unwrap();
    build_router(Arc::new(AppState::new(config, provider)))
}

/// Send a request and return status plus body text
pub async fn send(app: Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> (u16, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// `(event, data)` pairs from an SSE body
pub fn sse_events(body: &str) -> Vec<(String, serde_json::Value)> {
    body.split("\n\n")
        .filter_map(|block| {
            let mut event = None;
            let mut data = None;
            for line in block.lines() {
                if let Some(name) = line.strip_prefix("event:") {
                    event = Some(name.trim().to_string());
                } else if let Some(json) = line.strip_prefix("data:") {
                    data = serde_json::from_str(json.trim()).ok();
                }
            }
            Some((event?, data?))
        })
        .collect()
}
