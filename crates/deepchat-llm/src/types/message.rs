use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a turn in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt (persona / instructions)
    System,

    /// User/Human message
    User,

    /// Assistant/AI message
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role-tagged turn of a chat history
///
/// Serializes to the provider wire shape: `{"role": "user", "content": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create human message
    pub fn human(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create AI message with text
    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Get role as string
    pub fn role(&self) -> &str {
        self.role.as_str()
    }
}
