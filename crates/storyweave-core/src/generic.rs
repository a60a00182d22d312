//! Generic message and role types used by the *storyweave* crates.
//!
//! They mirror the three roles every chat API understands. Backends convert
//! them into their own wire structs via `From`/`Into`, and tests can build
//! them without mocking a transport layer.
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A single chat message that is independent of any specific LLM provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericMessage {
    pub role: GenericRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl GenericMessage {
    /// ```rust
    /// use storyweave_core::generic::{GenericMessage, GenericRole};
    ///
    /// let sys = GenericMessage::new("You are a creative story writer.", GenericRole::System);
    /// assert_eq!(sys.role.to_string(), "system");
    /// ```
    pub fn new(content: impl Into<String>, role: GenericRole) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl ToString) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

/// High-level chat roles recognised by most LLM providers.
///
/// `Display` renders the canonical lowercase name.
#[derive(Debug, Clone, Serialize, Deserialize, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenericRole {
    /// Global behaviour and output-format instructions.
    System,
    /// Messages produced by the model.
    Assistant,
    /// Messages originating from the writer.
    User,
}

impl Display for GenericRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenericRole::System => write!(f, "system"),
            GenericRole::Assistant => write!(f, "assistant"),
            GenericRole::User => write!(f, "user"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenericChatCompletionResponse {
    pub message: GenericMessage,
    pub usage: Option<GenericUsageReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenericUsageReport {
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub total_tokens: i64,
}
