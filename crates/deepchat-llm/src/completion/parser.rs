/// Opens the reasoning segment embedded in raw model text
pub const REASONING_MARKER: &str = "[Reasoning]";

/// Opens the final-answer segment; everything after it is the answer
pub const FINAL_ANSWER_MARKER: &str = "[Final Answer]";

/// Split raw model text into `(reasoning, final_answer)`
///
/// Only the first occurrence of each marker counts, and `[Reasoning]` must
/// come before `[Final Answer]`. Anything else (a missing marker, reversed
/// order) means the whole trimmed text is the answer and there is no
/// reasoning. Never fails.
pub fn parse_response(raw: &str) -> (Option<String>, String) {
    let split = raw.find(REASONING_MARKER).and_then(|reasoning_at| {
        let reasoning_start = reasoning_at + REASONING_MARKER.len();
        let answer_at = raw.find(FINAL_ANSWER_MARKER)?;
        (answer_at >= reasoning_start).then(|| {
            let reasoning = &raw[reasoning_start..answer_at];
            let answer = &raw[answer_at + FINAL_ANSWER_MARKER.len()..];
            (reasoning, answer)
        })
    });

    match split {
        Some((reasoning, answer)) => (Some(reasoning.trim().to_string()), answer.trim().to_string()),
        None => (None, raw.trim().to_string()),
    }
}
