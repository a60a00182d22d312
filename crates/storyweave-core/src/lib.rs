//! Provider-agnostic building blocks shared by every `storyweave` crate.
//!
//! * [`generic`] – chat messages and roles independent of any HTTP API.
//! * [`model`] – logical model identifiers, mapped by each backend.
//! * [`provider`] – the traits a backend implements; the streaming one is the
//!   token source the story decoder consumes.
//! * [`template`] – how a prompt turns into messages and sampling hints.
//! * [`schema_util`] – JSON Schema helpers for structured responses.
//! * [`error`] – the unified [`StoryError`](error::StoryError).
pub mod error;
pub mod generic;
pub mod model;
pub mod provider;
pub mod schema_util;
pub mod template;

pub use error::{Result, StoryError};
