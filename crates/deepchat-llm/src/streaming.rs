use anyhow::Result;
use reqwest::Response;
use serde::{Deserialize, Serialize};

use crate::buffer_utils::{parse_sse_stream, SseLineParser};
use crate::traits::ChunkStream;

/// Incremental text carried by a chunk, tagged by channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// "Thinking" text, shown apart from the answer
    Reasoning {
        content: String,
    },

    /// Final-answer text
    Message {
        content: String,
    },
}

/// One incremental unit of a streamed response, flattened from its first choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderChunk {
    pub id: String,
    pub created: i64,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl ProviderChunk {
    /// Chunk header with no deltas; fill in with the `with_*` helpers
    pub fn new(id: impl Into<String>, created: i64, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created,
            model: model.into(),
            delta_content: None,
            delta_reasoning: None,
            finish_reason: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.delta_content = Some(content.into());
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.delta_reasoning = Some(reasoning.into());
        self
    }

    pub fn with_finish_reason(mut self, reason: impl Into<String>) -> Self {
        self.finish_reason = Some(reason.into());
        self
    }

    /// Text events in this chunk: reasoning first, then answer; empty deltas dropped
    pub fn events(&self) -> Vec<StreamEvent> {
        let mut events = Vec::with_capacity(2);

        if let Some(reasoning) = self.delta_reasoning.as_deref().filter(|s| !s.is_empty()) {
            events.push(StreamEvent::Reasoning {
                content: reasoning.to_string(),
            });
        }

        if let Some(content) = self.delta_content.as_deref().filter(|s| !s.is_empty()) {
            events.push(StreamEvent::Message {
                content: content.to_string(),
            });
        }

        events
    }

    pub fn is_done(&self) -> bool {
        self.finish_reason.is_some()
    }
}

// Wire format of `chat.completion.chunk` objects

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStreamChunk {
    pub id: String,
    #[serde(default)]
    pub object: String,
    pub created: i64,
    pub model: String,
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<crate::traits::TokenUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChoice {
    pub index: u32,
    pub delta: Delta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Delta {
    pub role: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning_content: Option<String>,
}

impl ChatStreamChunk {
    /// Flatten to a `ProviderChunk`; `None` for usage-only chunks with no choices
    pub fn into_provider_chunk(self) -> Option<ProviderChunk> {
        let choice = self.choices.into_iter().next()?;

        Some(ProviderChunk {
            id: self.id,
            created: self.created,
            model: self.model,
            delta_content: choice.delta.content,
            delta_reasoning: choice.delta.reasoning_content,
            finish_reason: choice.finish_reason,
        })
    }
}

/// Parses `data:` payloads of a chat completion stream
pub struct ChatChunkParser;

impl SseLineParser for ChatChunkParser {
    type Item = ProviderChunk;

    fn parse_data_line(&self, data: &str) -> Result<Option<ProviderChunk>> {
        let chunk: ChatStreamChunk = serde_json::from_str(data)
            .map_err(|e| anyhow::anyhow!("Failed to parse chat chunk: {}", e))?;

        if chunk.choices.is_empty() {
            if let Some(usage) = &chunk.usage {
                tracing::debug!(
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    total_tokens = usage.total_tokens,
                    "Provider reported stream usage"
                );
            }
        }

        Ok(chunk.into_provider_chunk())
    }
}

/// Turn a streaming `/chat/completions` HTTP response into provider chunks
pub fn parse_chat_sse_stream(response: Response) -> ChunkStream {
    parse_sse_stream(response.bytes_stream(), ChatChunkParser)
}
