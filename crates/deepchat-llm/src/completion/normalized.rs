use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::parser::parse_response;
use crate::streaming::ProviderChunk;
use crate::traits::{ChatResponse, TokenUsage};

/// Words-to-tokens ratio used to estimate usage of streamed responses
pub const TOKENS_PER_WORD: f64 = 1.3;

const DEFAULT_FINISH_REASON: &str = "stop";

/// One completion record, whether the provider answered in one piece or streamed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCompletion {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<CompletionChoice>,
    pub usage: Option<TokenUsage>,
    pub reasoning: Option<String>,
    pub is_stream: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: CompletionMessage,
    pub finish_reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: String,
}

impl CompletionChoice {
    fn assistant(index: u32, content: String, finish_reason: String) -> Self {
        Self {
            index,
            message: CompletionMessage {
                role: "assistant".to_string(),
                content,
            },
            finish_reason,
        }
    }
}

impl NormalizedCompletion {
    pub const OBJECT: &'static str = "chat.completion";

    /// Normalize a non-streamed response
    ///
    /// Every choice gets the answer parsed out of `full_text`; the provider's
    /// per-choice texts are not consulted. Usage is copied verbatim.
    pub fn from_complete(response: &ChatResponse, full_text: &str) -> Self {
        let (reasoning, final_answer) = parse_response(full_text);

        let choices = response
            .choices
            .iter()
            .map(|choice| {
                CompletionChoice::assistant(
                    choice.index,
                    final_answer.clone(),
                    choice
                        .finish_reason
                        .clone()
                        .unwrap_or_else(|| DEFAULT_FINISH_REASON.to_string()),
                )
            })
            .collect();

        Self {
            id: response.id.clone(),
            object: Self::OBJECT.to_string(),
            created: response.created,
            model: response.model.clone(),
            choices,
            usage: Some(response.usage),
            reasoning,
            is_stream: false,
        }
    }

    /// Normalize a streamed response from its chunks and accumulated answer text
    ///
    /// `model_hint` is only used when no chunk arrived. Usage is estimated
    /// from the word count of `full_text`; prompt tokens are unknown here.
    pub fn from_stream(chunks: &[ProviderChunk], full_text: &str, model_hint: &str) -> Self {
        let (Some(first), Some(last)) = (chunks.first(), chunks.last()) else {
            return Self {
                id: String::new(),
                object: Self::OBJECT.to_string(),
                created: Utc::now().timestamp(),
                model: model_hint.to_string(),
                choices: Vec::new(),
                usage: None,
                reasoning: None,
                is_stream: true,
            };
        };

        let (reasoning, final_answer) = parse_response(full_text);
        let finish_reason = last
            .finish_reason
            .clone()
            .unwrap_or_else(|| DEFAULT_FINISH_REASON.to_string());

        Self {
            id: first.id.clone(),
            object: Self::OBJECT.to_string(),
            created: first.created,
            model: first.model.clone(),
            choices: vec![CompletionChoice::assistant(0, final_answer, finish_reason)],
            usage: Some(estimate_usage(full_text)),
            reasoning,
            is_stream: true,
        }
    }

    /// Content of the first choice, if any
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// Rough usage for text whose token counts the provider did not report
pub fn estimate_usage(full_text: &str) -> TokenUsage {
    let words = full_text.split_whitespace().count();
    let completion_tokens = (words as f64 * TOKENS_PER_WORD).round() as u32;
    let prompt_tokens = 0;

    TokenUsage {
        prompt_tokens,
        completion_tokens,
        total_tokens: prompt_tokens + completion_tokens,
    }
}
