//! Conversation sessions over an OpenAI-compatible chat provider
//!
//! A [`ConversationSession`] keeps the role-tagged history of one
//! conversation, starting from a persona system turn. Turns either stream
//! ([`ConversationSession::take_turn`]), surfacing the model's reasoning and
//! answer separately as [`TurnEvent`]s, or complete in one call
//! ([`ConversationSession::respond`]).
//!
//! ```no_run
//! use deepchat_agent::{ConversationSession, TurnEvent};
//! use futures::StreamExt;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut session = ConversationSession::builder()
//!     .client(deepchat_llm::provider::client()?)
//!     .build()?;
//!
//! let mut turn = session.take_turn("9.9 or 9.11, which is larger?").await?;
//! while let Some(event) = turn.next().await {
//!     if let TurnEvent::Fragment { text, .. } = event? {
//!         print!("{}", text);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod accumulator;
pub mod builder;
pub mod events;
pub mod session;

pub use accumulator::TurnAccumulator;
pub use builder::{SessionBuilder, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT};
pub use events::{Channel, TurnEvent};
pub use session::{ConversationSession, TurnStream};
