//! Unified error type exposed by **`storyweave-core`**.
//!
//! Backend crates convert their internal errors into one of these variants
//! before handing them to the story client, so callers only ever match on a
//! single enum.

use thiserror::Error;

/// Convenient alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, StoryError>;

#[derive(Debug, Error)]
pub enum StoryError {
    /// The selected backend does not recognise the requested `model`.
    #[error("provider `{provider}` does not support model `{model}`")]
    ModelNotSupported {
        provider: &'static str,
        model: String,
    },

    /// Failure while serialising or deserialising JSON payloads sent to / received
    /// from the LLM provider.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic forwarding of any backend-specific error that doesn’t fit another
    /// category.
    #[error("backend returned an error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid: {0}")]
    Invalid(String),

    /// The model finished without producing any usable text.
    #[error("the model returned an empty response")]
    EmptyResponse,
}
