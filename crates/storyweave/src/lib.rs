//! # `storyweave` – the umbrella crate
//!
//! One import for the whole co-writing stack:
//!
//! | Crate                    | What it provides                                                        |
//! |--------------------------|-------------------------------------------------------------------------|
//! | **`storyweave-core`**    | Messages, model ids, provider traits, errors, schema helpers            |
//! | **`storyweave-prompt`**  | Prompt builder and the initial-story / continuation prompts             |
//! | **`storyweave-decoder`** | Incremental decoder turning streamed JSON into `StoryEvent`s, SSE frames |
//! | **`storyweave-openai`**  | OpenAI-compatible HTTP backend *(feature `openai`, on by default)*      |
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use storyweave::{StoryClient, StoryEvent, prompt::InitialStoryPrompt};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = storyweave::openai::OpenAiAdapterBuilder::new_from_env().build()?;
//!     let client = StoryClient::new(backend);
//!
//!     let prompt = InitialStoryPrompt::new("A lighthouse keeper finds a letter")?;
//!     let mut events = std::pin::pin!(client.stream_story(prompt));
//!     while let Some(event) = events.next().await {
//!         if let StoryEvent::Complete(story) = event {
//!             println!("{}", story.content);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
mod client;

pub use client::StoryClient;
pub use storyweave_core::*;
pub use storyweave_decoder as decoder;
pub use storyweave_decoder::{DecodedStory, SessionConfig, StoryEvent};
pub use storyweave_prompt as prompt;

#[cfg(feature = "openai")]
pub use storyweave_openai as openai;
