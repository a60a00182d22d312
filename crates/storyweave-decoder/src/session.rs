//! Drive a [`StoryDecoder`] from an async token stream.

use std::{fmt::Display, time::Duration};

use async_stream::stream;
use futures_core::Stream;
use futures_util::{StreamExt, pin_mut};
use tracing::{debug, error, warn};

use crate::{decoder::StoryDecoder, event::StoryEvent};

/// Which prompt the session answers. Selects the failure wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionKind {
    #[default]
    Initial,
    Continuation,
}

impl SessionKind {
    pub fn failure_message(self) -> &'static str {
        match self {
            SessionKind::Initial => "Failed to generate story",
            SessionKind::Continuation => "Failed to continue story",
        }
    }

    pub fn timeout_message(self) -> &'static str {
        match self {
            SessionKind::Initial => "Story generation timed out. Please try again.",
            SessionKind::Continuation => "Story continuation timed out. Please try again.",
        }
    }
}

/// What an idle token source turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdleBehavior {
    /// Emit an `error` event.
    #[default]
    Fail,
    /// Treat the text received so far as the whole response.
    Finish,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Longest wait for the first chunk.
    pub first_chunk_timeout: Duration,
    /// Longest wait between later chunks.
    pub idle_timeout: Duration,
    pub on_idle: IdleBehavior,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            first_chunk_timeout: Duration::from_secs(50),
            idle_timeout: Duration::from_secs(30),
            on_idle: IdleBehavior::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_first_chunk_timeout(mut self, timeout: Duration) -> Self {
        self.first_chunk_timeout = timeout;
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn with_on_idle(mut self, on_idle: IdleBehavior) -> Self {
        self.on_idle = on_idle;
        self
    }
}

/// Decode a token stream into story events.
///
/// The returned stream yields progress events as chunks arrive and always
/// ends with exactly one `complete` or `error` event. A failed token source
/// or a source that goes quiet for longer than the configured window ends the
/// session early; partial progress is discarded in that case.
pub fn decode_session<'a, S, E>(
    tokens: S,
    kind: SessionKind,
    config: SessionConfig,
) -> impl Stream<Item = StoryEvent> + Send + 'a
where
    S: Stream<Item = Result<String, E>> + Send + 'a,
    E: Display + Send + 'a,
{
    stream! {
        pin_mut!(tokens);
        let mut decoder = StoryDecoder::new();
        let mut chunks = 0usize;

        loop {
            let window = if chunks == 0 {
                config.first_chunk_timeout
            } else {
                config.idle_timeout
            };

            match tokio::time::timeout(window, tokens.next()).await {
                Ok(Some(Ok(chunk))) => {
                    chunks += 1;
                    for event in decoder.feed(&chunk) {
                        yield event;
                    }
                }
                Ok(Some(Err(err))) => {
                    error!(error = %err, chunks, "token source failed");
                    yield decoder.fail(kind.failure_message());
                    break;
                }
                Ok(None) => {
                    debug!(chunks, bytes = decoder.raw().len(), "token source ended");
                    yield decoder.finish();
                    break;
                }
                Err(_) => {
                    warn!(chunks, ?window, "token source went idle");
                    match config.on_idle {
                        IdleBehavior::Fail => yield decoder.fail(kind.timeout_message()),
                        IdleBehavior::Finish => yield decoder.finish(),
                    }
                    break;
                }
            }
        }
    }
}
