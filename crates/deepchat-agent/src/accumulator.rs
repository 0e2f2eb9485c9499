use deepchat_llm::{NormalizedCompletion, ProviderChunk};

use crate::events::TurnEvent;

/// Folds one streamed reply into reasoning text, answer text and the raw chunks
///
/// Each pushed chunk hands back the fragments to forward right away; `finish`
/// produces the closing summary.
#[derive(Debug, Default)]
pub struct TurnAccumulator {
    reasoning: String,
    answer: String,
    chunks: Vec<ProviderChunk>,
}

impl TurnAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a chunk and return its fragments in forwarding order
    pub fn push(&mut self, chunk: ProviderChunk) -> Vec<TurnEvent> {
        let events: Vec<TurnEvent> = chunk.events().into_iter().map(TurnEvent::from).collect();

        for event in &events {
            if let TurnEvent::Fragment { channel, text } = event {
                match channel {
                    crate::Channel::Reasoning => self.reasoning.push_str(text),
                    crate::Channel::Answer => self.answer.push_str(text),
                }
            }
        }

        self.chunks.push(chunk);
        events
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Close the turn; `model_hint` names the model when no chunk arrived
    pub fn finish(self, model_hint: &str) -> TurnEvent {
        let completion = NormalizedCompletion::from_stream(&self.chunks, &self.answer, model_hint);

        TurnEvent::Summary {
            answer: self.answer,
            reasoning: self.reasoning,
            completion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Channel;

    #[test]
    fn test_accumulates_both_channels() {
        let mut acc = TurnAccumulator::new();

        let first = acc.push(ProviderChunk::new("c", 1, "deepseek-r1").with_reasoning("Compare "));
        let second = acc.push(ProviderChunk::new("c", 1, "deepseek-r1").with_reasoning("tenths."));
        let third = acc.push(
            ProviderChunk::new("c", 1, "deepseek-r1")
                .with_content("9.9")
                .with_finish_reason("stop"),
        );

        assert_eq!(first, vec![TurnEvent::fragment(Channel::Reasoning, "Compare ")]);
        assert_eq!(second.len(), 1);
        assert_eq!(third, vec![TurnEvent::fragment(Channel::Answer, "9.9")]);
        assert_eq!(acc.reasoning(), "Compare tenths.");
        assert_eq!(acc.answer(), "9.9");
        assert_eq!(acc.chunk_count(), 3);

        match acc.finish("hint") {
            TurnEvent::Summary { answer, reasoning, completion } => {
                assert_eq!(answer, "9.9");
                assert_eq!(reasoning, "Compare tenths.");
                assert_eq!(completion.model, "deepseek-r1");
                assert_eq!(completion.content(), Some("9.9"));
                assert_eq!(completion.choices[0].finish_reason, "stop");
                // Reasoning deltas never feed the marker-based reasoning field
                assert_eq!(completion.reasoning, None);
            }
            other => panic!("Expected Summary, got {:?}", other),
        }
    }

    #[test]
    fn test_chunks_without_text_still_count() {
        let mut acc = TurnAccumulator::new();
        let events = acc.push(ProviderChunk::new("c", 1, "m").with_finish_reason("stop"));

        assert!(events.is_empty());
        assert_eq!(acc.chunk_count(), 1);
    }

    #[test]
    fn test_finish_without_chunks() {
        match TurnAccumulator::new().finish("qwen-plus") {
            TurnEvent::Summary { answer, completion, .. } => {
                assert!(answer.is_empty());
                assert_eq!(completion.model, "qwen-plus");
                assert!(completion.choices.is_empty());
            }
            other => panic!("Expected Summary, got {:?}", other),
        }
    }
}
