//! Server-sent-event framing for [`StoryEvent`]s.
//!
//! Each event becomes one `data: <json>\n\n` frame. [`frames`] adapts an
//! event stream into a body stream for an HTTP response; [`SseWriter`] pushes
//! frames into any [`std::io::Write`], flushing after each one so a frame is
//! fully written before the next begins.

use std::io::Write;

use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;

use crate::event::StoryEvent;

/// Response headers for an event-stream body.
pub const SSE_HEADERS: [(&str, &str); 3] = [
    ("Content-Type", "text/event-stream"),
    ("Cache-Control", "no-cache"),
    ("Connection", "keep-alive"),
];

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("couldn’t serialise event: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("sink write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode a single event as an SSE frame.
///
/// ```rust
/// use storyweave_decoder::{StoryEvent, sse::encode};
///
/// let frame = encode(&StoryEvent::GeneratingSuggestions).unwrap();
/// assert_eq!(&frame[..], b"data: {\"type\":\"generating_suggestions\"}\n\n");
/// ```
pub fn encode(event: &StoryEvent) -> Result<Bytes, SinkError> {
    let json = serde_json::to_string(event)?;
    Ok(Bytes::from(format!("data: {json}\n\n")))
}

/// Map an event stream to SSE frames, preserving order.
pub fn frames<'a, S>(events: S) -> impl Stream<Item = Result<Bytes, SinkError>> + Send + 'a
where
    S: Stream<Item = StoryEvent> + Send + 'a,
{
    events.map(|event| encode(&event))
}

/// Destination for decoder events.
pub trait EventSink {
    type Error;

    fn send(&mut self, event: &StoryEvent) -> Result<(), Self::Error>;
}

/// Collects events in memory.
impl EventSink for Vec<StoryEvent> {
    type Error = std::convert::Infallible;

    fn send(&mut self, event: &StoryEvent) -> Result<(), Self::Error> {
        self.push(event.clone());
        Ok(())
    }
}

/// Writes SSE frames into a byte sink.
#[derive(Debug)]
pub struct SseWriter<W> {
    inner: W,
}

impl<W: Write> SseWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> EventSink for SseWriter<W> {
    type Error = SinkError;

    fn send(&mut self, event: &StoryEvent) -> Result<(), Self::Error> {
        let frame = encode(event)?;
        self.inner.write_all(&frame)?;
        self.inner.flush()?;
        Ok(())
    }
}
