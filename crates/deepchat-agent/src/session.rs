use std::pin::Pin;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::{Stream, StreamExt};
use tracing::{debug, info, warn};

use deepchat_llm::{ChatClient, ChatOptions, ChatRequest, Message, NormalizedCompletion, Role};

use crate::accumulator::TurnAccumulator;
use crate::builder::SessionBuilder;
use crate::events::TurnEvent;

/// Fragments of one streaming turn followed by its summary
pub type TurnStream<'a> = Pin<Box<dyn Stream<Item = Result<TurnEvent>> + Send + 'a>>;

/// A multi-turn conversation with a persona
///
/// History always starts with the system turn. Each successful turn appends
/// exactly one user and one assistant message; a failed, or abandoned, turn
/// leaves history as it was before the call.
pub struct ConversationSession {
    client: Arc<dyn ChatClient>,
    model: String,
    temperature: Option<f32>,
    history: Vec<Message>,
}

impl ConversationSession {
    pub(crate) fn new(
        client: Arc<dyn ChatClient>,
        model: String,
        temperature: Option<f32>,
        system_prompt: String,
    ) -> Self {
        Self {
            client,
            model,
            temperature,
            history: vec![Message::system(system_prompt)],
        }
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn system_prompt(&self) -> &str {
        // new() seeds the system turn and reset never removes it
        self.history.first().map(|m| m.content.as_str()).unwrap_or_default()
    }

    /// Append a turn without calling the provider
    pub fn append_turn(&mut self, role: Role, content: impl Into<String>) {
        self.history.push(Message::new(role, content));
    }

    /// Drop everything but the system turn
    pub fn reset_to_system_prompt(&mut self) {
        let dropped = self.history.len().saturating_sub(1);
        self.history.truncate(1);
        info!(dropped, "Conversation reset to system prompt");
    }

    /// Send `user_input` and stream the reply
    ///
    /// Yields reasoning and answer fragments as the provider sends them, then
    /// one [`TurnEvent::Summary`]. The assistant turn is recorded right before
    /// the summary is yielded. Failing to open the stream returns `Err`; a
    /// failure mid-stream ends the stream with an `Err` item. Both roll the
    /// user turn back, as does dropping the stream before the summary.
    pub async fn take_turn(&mut self, user_input: &str) -> Result<TurnStream<'_>> {
        let client = Arc::clone(&self.client);
        let model = self.model.clone();
        let options = self.options();

        let turn = PendingTurn::begin(&mut self.history, Message::human(user_input));
        let request = ChatRequest::new(model.clone(), turn.messages().to_vec()).with_options(options);

        debug!(model = %model, turns = turn.messages().len(), "Opening streaming turn");

        // On error the guard drops here and removes the user turn
        let mut chunks = client
            .chat_stream(request)
            .await
            .context("Failed to open provider stream")?;

        let stream = async_stream::stream! {
            let turn = turn;
            let mut acc = TurnAccumulator::new();

            while let Some(chunk_result) = chunks.next().await {
                let chunk = match chunk_result {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        // Dropping `turn` on the way out restores history
                        yield Err(e.context("Provider stream failed"));
                        return;
                    }
                };
                for event in acc.push(chunk) {
                    yield Ok(event);
                }
            }

            debug!(chunks = acc.chunk_count(), answer_len = acc.answer().len(), "Streaming turn complete");
            turn.commit(Message::ai(acc.answer()));
            yield Ok(acc.finish(&model));
        };

        Ok(Box::pin(stream))
    }

    /// Send `user_input` and wait for the whole reply
    pub async fn respond(&mut self, user_input: &str) -> Result<NormalizedCompletion> {
        let client = Arc::clone(&self.client);
        let options = self.options();

        let turn = PendingTurn::begin(&mut self.history, Message::human(user_input));
        let request = ChatRequest::new(self.model.clone(), turn.messages().to_vec()).with_options(options);

        debug!(model = %self.model, "Sending single-shot turn");

        let response = client.chat(request).await.context("Chat request failed")?;
        let answer = response.content();
        let completion = NormalizedCompletion::from_complete(&response, &answer);

        turn.commit(Message::ai(answer));
        Ok(completion)
    }

    fn options(&self) -> ChatOptions {
        ChatOptions {
            temperature: self.temperature,
        }
    }
}

/// History with an optimistic user turn that is undone unless committed
struct PendingTurn<'a> {
    history: &'a mut Vec<Message>,
    checkpoint: usize,
    committed: bool,
}

impl<'a> PendingTurn<'a> {
    fn begin(history: &'a mut Vec<Message>, user: Message) -> Self {
        let checkpoint = history.len();
        history.push(user);
        Self {
            history,
            checkpoint,
            committed: false,
        }
    }

    fn messages(&self) -> &[Message] {
        self.history.as_slice()
    }

    fn commit(mut self, reply: Message) {
        self.history.push(reply);
        self.committed = true;
    }
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.history.truncate(self.checkpoint);
            warn!(restored_len = self.checkpoint, "Turn did not complete, history rolled back");
        }
    }
}
