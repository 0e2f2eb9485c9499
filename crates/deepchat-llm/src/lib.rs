pub mod buffer_utils;
pub mod completion;
pub mod config;
pub mod openai;
pub mod provider;
pub mod streaming;
pub mod traits;
pub mod types;

pub use traits::{
    ChatClient,
    ChatRequest, ChatResponse, ChatOptions,
    ResponseChoice, ResponseMessage,
    ChunkStream, TokenUsage,
};

pub use completion::{parse_response, CompletionChoice, NormalizedCompletion};
pub use config::{ClientFactory, ProviderConfig};
pub use openai::OpenAIClient;
pub use streaming::{ProviderChunk, StreamEvent};
pub use types::{Message, Role};
