//! OpenAI-compatible backend for **storyweave**.
//!
//! Talks to any server exposing `POST {base}/chat/completions`, which covers
//! both OpenAI and DeepSeek. Plug the resulting [`OpenAiAdapter`] into
//! `storyweave::StoryClient`.
mod adapter;
mod model_map;
mod provider_impl_chat;
mod provider_impl_chat_stream;

pub use adapter::{OpenAiAdapter, OpenAiAdapterBuilder};
pub mod api_v1;
mod client;
pub mod error;
pub mod sse;

pub use client::OpenAiClient;
