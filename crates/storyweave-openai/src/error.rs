use reqwest::StatusCode;
use storyweave_core::error::StoryError;

/// High-level error type covering every failure mode the client can hit.
#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("couldn’t serialise body: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("API returned non-success status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("API format error: {0}")]
    Format(String),

    /// The server reported an error inside an open event stream.
    #[error("stream aborted by the API: {0}")]
    Stream(String),

    #[error("event stream is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

impl From<OpenAiError> for StoryError {
    fn from(value: OpenAiError) -> Self {
        StoryError::Backend(Box::new(value))
    }
}
