//! Incremental structured-output decoder for streamed story responses.
//!
//! The model is asked for `{"content": "...", "suggestions": ["...", ...]}`
//! and answers token by token. [`StoryDecoder`] watches the growing text and
//! turns it into [`StoryEvent`]s:
//!
//! * `content` – the decoded story text so far, re-sent whenever it grows,
//! * `generating_suggestions` – once the `content` string has closed,
//! * `suggestion` – each element of the `suggestions` array as it closes,
//! * `complete` / `error` – exactly one terminal event per session.
//!
//! The final result never depends on how the text was chunked: it is
//! recovered from the full accumulated text by [`validate::recover`], which
//! falls back to plain prose plus default suggestions when the model ignored
//! the JSON contract.
//!
//! ```rust
//! use storyweave_decoder::{StoryDecoder, StoryEvent};
//!
//! let mut decoder = StoryDecoder::new();
//! let mut events = decoder.feed(r#"{"content": "Once upon"#);
//! events.extend(decoder.feed(r#" a time","suggestions":["Meet a fox"]}"#));
//! events.push(decoder.finish());
//!
//! assert_eq!(events[0], StoryEvent::content("Once upon"));
//! assert!(events.last().unwrap().is_terminal());
//! ```
//!
//! [`session::decode_session`] wraps the decoder around an async token
//! stream with an idle watchdog, and [`sse`] frames events for an HTTP
//! `text/event-stream` response.
mod decoder;
mod event;
mod scan;
pub mod session;
pub mod sse;
pub mod validate;

pub use decoder::{DecoderState, StoryDecoder};
pub use event::{DecodedStory, StoryEvent, word_count};
pub use session::{IdleBehavior, SessionConfig, SessionKind, decode_session};
