use anyhow::Result;
use std::collections::VecDeque;

/// Byte buffer that hands out complete lines as network chunks arrive
///
/// Provider streams split SSE lines at arbitrary byte offsets (even inside a
/// multi-byte UTF-8 sequence), so bytes are only decoded once a full line is
/// available.
pub struct CircularLineBuffer {
    buffer: VecDeque<u8>,
}

impl CircularLineBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
    }

    /// Extract next line (up to `\n`), trimmed of surrounding whitespace
    ///
    /// Returns None if no complete line is available yet.
    pub fn next_line(&mut self) -> Option<Result<String>> {
        let newline_pos = self.buffer.iter().position(|&b| b == b'\n')?;
        let line_bytes: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
        Some(decode(&line_bytes))
    }

    /// Drain whatever is left after the transport closed without a final newline
    pub fn take_remainder(&mut self) -> Option<Result<String>> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest: Vec<u8> = self.buffer.drain(..).collect();
        Some(decode(&rest))
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

fn decode(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(|s| s.trim().to_string())
        .map_err(|e| anyhow::anyhow!("Invalid UTF-8 in stream: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_split_across_chunks() {
        let mut buffer = CircularLineBuffer::with_capacity(64);

        buffer.extend(b"data: {\"a\"");
        assert!(buffer.next_line().is_none());

        buffer.extend(b":1}\r\n\ndata: [DONE]\n");
        assert_eq!(buffer.next_line().unwrap().unwrap(), "data: {\"a\":1}");
        assert_eq!(buffer.next_line().unwrap().unwrap(), "");
        assert_eq!(buffer.next_line().unwrap().unwrap(), "data: [DONE]");
        assert!(buffer.next_line().is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_multibyte_char_split_between_chunks() {
        let mut buffer = CircularLineBuffer::with_capacity(16);
        let text = "答案\n".as_bytes();

        buffer.extend(&text[..2]);
        assert!(buffer.next_line().is_none());
        buffer.extend(&text[2..]);

        assert_eq!(buffer.next_line().unwrap().unwrap(), "答案");
    }

    #[test]
    fn test_remainder_without_newline() {
        let mut buffer = CircularLineBuffer::with_capacity(16);
        buffer.extend(b"data: tail");

        assert!(buffer.next_line().is_none());
        assert_eq!(buffer.len(), 10);
        assert_eq!(buffer.take_remainder().unwrap().unwrap(), "data: tail");
        assert!(buffer.take_remainder().is_none());
    }
}
