use std::{env, sync::Arc, time::Duration};

use storyweave_core::error::{Result, StoryError};

use crate::client::{DEFAULT_TIMEOUT, OpenAiClient};

/// Wires the HTTP client [`OpenAiClient`] into a value that implements the
/// `storyweave_core::provider` traits.
///
/// The type exposes no methods of its own; everything user-facing sits on
/// `storyweave::StoryClient` once the adapter is plugged in.
pub struct OpenAiAdapter {
    pub(crate) client: Arc<OpenAiClient>,
}

/// Builder for [`OpenAiAdapter`].
///
/// ```rust,no_run
/// use storyweave_openai::OpenAiAdapterBuilder;
///
/// let backend = OpenAiAdapterBuilder::new_from_env()
///     .build()
///     .expect("OPENAI_API_KEY must be set");
/// ```
///
/// Point it at DeepSeek (or any other compatible server) with
/// `OPENAI_BASE_URL` or [`with_base_url`](Self::with_base_url).
#[derive(Default)]
pub struct OpenAiAdapterBuilder {
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: Option<String>,
    pub(crate) timeout: Option<Duration>,
}

impl OpenAiAdapterBuilder {
    /// Create an *empty* builder. Remember to supply an API key manually.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `OPENAI_API_KEY` and, if set, `OPENAI_BASE_URL`.
    ///
    /// Never panics. A missing key only surfaces during [`Self::build`].
    pub fn new_from_env() -> Self {
        Self {
            api_key: env::var("OPENAI_API_KEY").ok(),
            base_url: env::var("OPENAI_BASE_URL").ok(),
            timeout: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Time limit for a non-streaming completion. Streamed responses are
    /// not cut off by it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Finalise the builder and return a ready-to-use adapter.
    ///
    /// # Errors
    ///
    /// * [`StoryError::Invalid`] if the API key is missing or blank.
    /// * [`StoryError::Backend`] if the HTTP client cannot be built.
    pub fn build(self) -> Result<OpenAiAdapter> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(StoryError::Invalid(
                "missing env variable: `OPENAI_API_KEY`".into(),
            ))?;
        let base_url = self.base_url.filter(|url| !url.trim().is_empty());

        let client = OpenAiClient::new(
            api_key,
            base_url,
            self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        )?;

        Ok(OpenAiAdapter {
            client: Arc::new(client),
        })
    }
}
