use deepchat_llm::{NormalizedCompletion, StreamEvent};
use serde::{Deserialize, Serialize};

/// Which part of the reply a fragment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// "Thinking" output, surfaced transiently and never stored in history
    Reasoning,
    /// Final-answer text
    Answer,
}

/// One item produced by a streaming turn
///
/// A turn yields any number of `Fragment`s in provider arrival order and
/// ends with exactly one `Summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnEvent {
    Fragment {
        channel: Channel,
        text: String,
    },

    Summary {
        /// Accumulated answer text, as appended to history
        answer: String,
        /// Accumulated reasoning deltas (empty when the model sent none)
        reasoning: String,
        completion: NormalizedCompletion,
    },
}

impl TurnEvent {
    pub fn fragment(channel: Channel, text: impl Into<String>) -> Self {
        Self::Fragment {
            channel,
            text: text.into(),
        }
    }

    /// Fragment text, `None` for the summary
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Fragment { text, .. } => Some(text),
            Self::Summary { .. } => None,
        }
    }

    pub fn is_summary(&self) -> bool {
        matches!(self, Self::Summary { .. })
    }
}

impl From<StreamEvent> for TurnEvent {
    fn from(event: StreamEvent) -> Self {
        match event {
            StreamEvent::Reasoning { content } => Self::fragment(Channel::Reasoning, content),
            StreamEvent::Message { content } => Self::fragment(Channel::Answer, content),
        }
    }
}
