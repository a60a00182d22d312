use std::{future::Future, pin::Pin};

use crate::{error::Result, generic::GenericChatCompletionResponse, model::Model};
use futures_core::stream::Stream;

/// A **backend** turns a chat prompt into a network call to a concrete provider
/// and parses the reply.
///
/// * **One associated type** – the in-memory `Message` representation this
///   provider accepts.
/// * **One method** – `chat_complete`, a single non-streaming round-trip.
pub trait ChatCompletionProvider: Send + Sync {
    /// Chat message type consumed by this backend.
    type Message: Send + Sync + 'static;

    fn chat_complete<'p, M>(
        &self,
        params: ChatCompleteParameters<M>,
    ) -> Pin<Box<dyn Future<Output = Result<GenericChatCompletionResponse>> + Send + 'p>>
    where
        M: Into<Self::Message> + Clone + Send + Sync + 'p;
}

/// A provider that delivers the model’s answer **incrementally**.
///
/// The stream yields UTF-8 text deltas in emission order and ends when the
/// model stops. It is lazy, finite and cannot be restarted; an `Err` item
/// means the source failed and no further items should be expected.
pub trait StreamingChatProvider: ChatCompletionProvider {
    type Delta<'s>: Stream<Item = Result<String>> + Send + 's
    where
        Self: 's;

    /// Start a streaming chat completion. Nothing is sent until the returned
    /// stream is polled.
    fn chat_complete_stream<'s, M>(&'s self, params: ChatCompleteParameters<M>) -> Self::Delta<'s>
    where
        M: Into<Self::Message> + Clone + Send + Sync + 's;
}

#[derive(Debug, Clone)]
pub struct ChatCompleteParameters<M: Clone> {
    pub messages: Vec<M>,
    pub model: Model,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub response_format: Option<serde_json::Value>,
}

impl<M: Clone> ChatCompleteParameters<M> {
    pub fn new(messages: Vec<M>, model: Model) -> Self {
        Self {
            messages,
            model,
            temperature: None,
            max_tokens: None,
            response_format: None,
        }
    }

    pub fn messages(&self) -> &Vec<M> {
        &self.messages
    }

    pub fn model(&self) -> Model {
        self.model.clone()
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_response_format(mut self, response_format: serde_json::Value) -> Self {
        self.response_format = Some(response_format);
        self
    }
}
