use std::sync::Arc;
use anyhow::{Result, anyhow, bail};

use deepchat_llm::ChatClient;

use crate::session::ConversationSession;

pub const DEFAULT_MODEL: &str = "deepseek-r1";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant created by xAI. \
Maintain a friendly tone and provide useful responses.";

/// Builder for constructing a ConversationSession
pub struct SessionBuilder {
    client: Option<Arc<dyn ChatClient>>,
    model: String,
    temperature: Option<f32>,
    system_prompt: String,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            client: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Set the chat client
    pub fn client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sampling temperature; left to the provider when unset
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Persona placed in the first (system) turn
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Build the session
    pub fn build(self) -> Result<ConversationSession> {
        let client = self.client
            .ok_or_else(|| anyhow!("Chat client is required"))?;

        if self.model.trim().is_empty() {
            bail!("Model name must not be empty");
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                bail!("Temperature must be between 0 and 2, got {}", t);
            }
        }

        Ok(ConversationSession::new(
            client,
            self.model,
            self.temperature,
            self.system_prompt,
        ))
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
