use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;

use deepchat_llm::StreamEvent;

use super::ChatBody;
use crate::{error::ApiResult, state::AppState};

/// Relay one streamed completion as Server-Sent Events
///
/// Every reasoning or answer fragment becomes a `reasoning` or `message`
/// event carrying `{"content": ...}`, sent as soon as it arrives. The event
/// stream simply ends with the provider stream. A failure, whether opening
/// the provider stream or mid-way, is reported as one final `error` event.
pub async fn chat_stream(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatBody>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let request = req.to_request(&state.config.llm)?;
    let client = Arc::clone(&state.llm_client);

    tracing::debug!(model = %request.model, "Relaying streamed completion");

    let sse_stream = async_stream::stream! {
        let mut chunks = match client.chat_stream(request).await {
            Ok(chunks) => chunks,
            Err(e) => {
                tracing::error!("Failed to open provider stream: {:#}", e);
                yield Ok(error_event(&e));
                return;
            }
        };

        let mut fragments = 0usize;
        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(chunk) => {
                    for event in chunk.events() {
                        fragments += 1;
                        yield Ok(fragment_event(event));
                    }
                }
                Err(e) => {
                    tracing::error!(fragments, "Provider stream failed: {:#}", e);
                    yield Ok(error_event(&e));
                    return;
                }
            }
        }

        tracing::debug!(fragments, "Relay finished");
    };

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::default()))
}

fn fragment_event(event: StreamEvent) -> Event {
    let (name, content) = match event {
        StreamEvent::Reasoning { content } => ("reasoning", content),
        StreamEvent::Message { content } => ("message", content),
    };

    Event::default()
        .event(name)
        .data(serde_json::json!({ "content": content }).to_string())
}

fn error_event(error: &anyhow::Error) -> Event {
    Event::default()
        .event("error")
        .data(serde_json::json!({ "content": format!("Error: {:#}", error) }).to_string())
}
