use std::sync::Arc;
use deepchat_llm::ChatClient;
use crate::config::Config;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm_client: Arc<dyn ChatClient>,
}

impl AppState {
    pub fn new(config: Config, llm_client: Arc<dyn ChatClient>) -> Self {
        Self {
            config: Arc::new(config),
            llm_client,
        }
    }
}
