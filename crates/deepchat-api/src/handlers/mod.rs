pub mod chat;
pub mod stream;

use serde::Deserialize;

use deepchat_llm::{ChatOptions, ChatRequest, Message};

use crate::{config::LlmConfig, error::{ApiError, ApiResult}};

/// Body accepted by `/chat` and `/chat/stream`
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl ChatBody {
    /// Provider request for this body, with unset fields taken from `defaults`
    pub fn to_request(&self, defaults: &LlmConfig) -> ApiResult<ChatRequest> {
        let temperature = self.temperature.unwrap_or(defaults.temperature);
        if !(0.0..=1.0).contains(&temperature) {
            return Err(ApiError::BadRequest(format!(
                "temperature must be between 0 and 1, got {}",
                temperature
            )));
        }

        let model = self
            .model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(&defaults.model);

        Ok(ChatRequest::new(model, vec![Message::human(self.message.as_str())])
            .with_options(ChatOptions::new().temperature(temperature)))
    }
}
