//! Completion normalization
//!
//! Reshapes non-streamed responses and streamed chunk sequences into one
//! [`NormalizedCompletion`] record, splitting the embedded
//! `[Reasoning] ... [Final Answer] ...` convention out of the raw text.

mod normalized;
mod parser;

pub use normalized::{
    estimate_usage, CompletionChoice, CompletionMessage, NormalizedCompletion, TOKENS_PER_WORD,
};
pub use parser::{parse_response, FINAL_ANSWER_MARKER, REASONING_MARKER};
