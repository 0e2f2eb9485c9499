use anyhow::Result;
use futures::{Stream, StreamExt};
use std::fmt::Display;
use std::pin::Pin;

use super::buffering::CircularLineBuffer;

/// Strategy for turning SSE `data:` payloads into typed items
pub trait SseLineParser: Send {
    type Item: Send + 'static;

    /// Parse one data payload; `Ok(None)` means the payload carries nothing to emit
    fn parse_data_line(&self, data: &str) -> Result<Option<Self::Item>>;

    /// Check if this payload signals end of stream
    fn is_done_marker(&self, data: &str) -> bool {
        data == "[DONE]"
    }
}

/// Generic SSE stream parser over any byte-chunk stream
///
/// Ends at the done marker or when the transport closes. Transport errors are
/// yielded and end the stream; a payload that fails to parse is yielded as an
/// error and parsing continues with the next line.
pub fn parse_sse_stream<S, B, E, P>(
    bytes: S,
    parser: P,
) -> Pin<Box<dyn Stream<Item = Result<P::Item>> + Send>>
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Display + Send,
    P: SseLineParser + 'static,
{
    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(bytes);
        let mut buffer = CircularLineBuffer::with_capacity(4096);

        while let Some(chunk_result) = byte_chunks.next().await {
            let bytes = match chunk_result {
                Ok(bytes) => bytes,
                Err(e) => {
                    yield Err(anyhow::anyhow!("Stream error: {}", e));
                    break;
                }
            };
            buffer.extend(bytes.as_ref());

            while let Some(line_result) = buffer.next_line() {
                match line_result.and_then(|line| parse_line(&parser, &line)) {
                    Ok(Line::Item(item)) => yield Ok(item),
                    Ok(Line::Skip) => {}
                    // Lines buffered after the marker are never parsed
                    Ok(Line::Done) => return,
                    Err(e) => yield Err(e),
                }
            }
        }

        // Transport closed without a done marker; a last event without a
        // trailing newline is still an event
        if let Some(line_result) = buffer.take_remainder() {
            match line_result.and_then(|line| parse_line(&parser, &line)) {
                Ok(Line::Item(item)) => yield Ok(item),
                Ok(_) => {}
                Err(e) => yield Err(e),
            }
        }
    })
}

enum Line<T> {
    Item(T),
    Skip,
    Done,
}

fn parse_line<P: SseLineParser>(parser: &P, line: &str) -> Result<Line<P::Item>> {
    // Comments (`: keep-alive`), `event:`/`id:` fields and blank separators carry no payload
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(Line::Skip);
    };
    let data = data.trim_start();

    if parser.is_done_marker(data) {
        return Ok(Line::Done);
    }

    Ok(match parser.parse_data_line(data)? {
        Some(item) => Line::Item(item),
        None => Line::Skip,
    })
}
