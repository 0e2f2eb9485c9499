#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use deepchat_llm::{
    ChatClient, ChatRequest, ChatResponse, ChunkStream, ProviderChunk, ResponseChoice,
    ResponseMessage, TokenUsage,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// What the fake provider does for one call
pub enum Script {
    /// Stream these items, then end
    Stream(Vec<Result<ProviderChunk, String>>),
    /// Return this text as a complete response
    Reply(String),
    /// Fail before anything is sent back
    Fail(String),
}

/// In-memory provider replaying scripted calls in order
#[derive(Default)]
pub struct ScriptedClient {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_script(&self, request: ChatRequest) -> Result<Script> {
        self.requests.lock().unwrap().push(request);
        self.scripts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("No scripted response left"))
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let model = request.model.clone();
        match self.next_script(request)? {
            Script::Reply(text) => Ok(ChatResponse {
                id: "chatcmpl-fake".to_string(),
                object: "chat.completion".to_string(),
                created: 1_700_000_000,
                model,
                choices: vec![ResponseChoice {
                    index: 0,
                    message: ResponseMessage {
                        role: "assistant".to_string(),
                        content: Some(text),
                        reasoning_content: None,
                    },
                    finish_reason: Some("stop".to_string()),
                }],
                usage: TokenUsage {
                    prompt_tokens: 12,
                    completion_tokens: 3,
                    total_tokens: 15,
                },
            }),
            Script::Fail(message) => Err(anyhow!(message)),
            Script::Stream(_) => Err(anyhow!("Scripted a stream for a non-streaming call")),
        }
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<ChunkStream> {
        match self.next_script(request)? {
            Script::Stream(items) => {
                let items: Vec<Result<ProviderChunk>> =
                    items.into_iter().map(|item| item.map_err(|e| anyhow!(e))).collect();
                Ok(Box::pin(futures::stream::iter(items)))
            }
            Script::Fail(message) => Err(anyhow!(message)),
            Script::Reply(_) => Err(anyhow!("Scripted a reply for a streaming call")),
        }
    }
}

pub fn reasoning(text: &str) -> Result<ProviderChunk, String> {
    Ok(ProviderChunk::new("chatcmpl-s", 1_700_000_000, "deepseek-r1").with_reasoning(text))
}

pub fn answer(text: &str) -> Result<ProviderChunk, String> {
    Ok(ProviderChunk::new("chatcmpl-s", 1_700_000_000, "deepseek-r1").with_content(text))
}

pub fn last_answer(text: &str) -> Result<ProviderChunk, String> {
    Ok(ProviderChunk::new("chatcmpl-s", 1_700_000_000, "deepseek-r1")
        .with_content(text)
        .with_finish_reason("stop"))
}
