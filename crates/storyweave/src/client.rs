//! Story client bound to a single streaming backend.
use std::sync::Arc;

use futures_core::Stream;
use storyweave_core::{
    error::{Result, StoryError},
    generic::GenericMessage,
    model::Model,
    provider::{ChatCompleteParameters, StreamingChatProvider},
    schema_util::ResponseFormat,
    template::PromptTemplate,
};
use storyweave_decoder::{
    DecodedStory, SessionConfig, SessionKind, StoryEvent, decode_session, validate,
};
use storyweave_prompt::{ContinuationPrompt, InitialStoryPrompt};
use tracing::{debug, info};

/// Runs story prompts against `B` and decodes the answers.
///
/// Clone the client to share it across tasks; the backend sits behind an
/// `Arc`.
#[derive(Debug)]
pub struct StoryClient<B> {
    backend: Arc<B>,
    model: Model,
    session: SessionConfig,
    response_format: Option<ResponseFormat>,
}

impl<B> Clone for StoryClient<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            model: self.model.clone(),
            session: self.session.clone(),
            response_format: self.response_format.clone(),
        }
    }
}

impl<B> StoryClient<B>
where
    B: StreamingChatProvider,
    GenericMessage: Into<B::Message>,
{
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            model: Model::default(),
            session: SessionConfig::default(),
            response_format: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<Model>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_session_config(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// Ask the provider to enforce a response format. Off by default; the
    /// prompts already describe the JSON shape.
    pub fn with_response_format(mut self, response_format: ResponseFormat) -> Self {
        self.response_format = Some(response_format);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Stream a new story. Ends with exactly one `complete` or `error` event.
    pub fn stream_story(
        &self,
        prompt: InitialStoryPrompt,
    ) -> impl Stream<Item = StoryEvent> + Send + '_ {
        self.stream(prompt, SessionKind::Initial)
    }

    /// Stream the next segment of a story.
    pub fn stream_continuation(
        &self,
        prompt: ContinuationPrompt,
    ) -> impl Stream<Item = StoryEvent> + Send + '_ {
        self.stream(prompt, SessionKind::Continuation)
    }

    /// Generate a new story in one round-trip.
    ///
    /// # Errors
    ///
    /// Backend failures, or [`StoryError::EmptyResponse`] if the model
    /// produced no text.
    pub async fn generate_story(&self, prompt: InitialStoryPrompt) -> Result<DecodedStory> {
        self.complete(prompt).await
    }

    /// Continue a story in one round-trip. Same error cases as
    /// [`generate_story`](Self::generate_story).
    pub async fn continue_story(&self, prompt: ContinuationPrompt) -> Result<DecodedStory> {
        self.complete(prompt).await
    }

    fn stream<'s, P>(
        &'s self,
        prompt: P,
        kind: SessionKind,
    ) -> impl Stream<Item = StoryEvent> + Send + 's
    where
        P: PromptTemplate<Message = GenericMessage>,
    {
        let params = self.parameters(prompt);
        info!(model = ?self.model, ?kind, "starting story stream");
        let tokens = self.backend.chat_complete_stream(params);
        decode_session(tokens, kind, self.session.clone())
    }

    async fn complete<P>(&self, prompt: P) -> Result<DecodedStory>
    where
        P: PromptTemplate<Message = GenericMessage>,
    {
        let params = self.parameters(prompt);
        info!(model = ?self.model, "requesting story");
        let response = self.backend.chat_complete(params).await?;
        if let Some(usage) = response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "story request finished"
            );
        }
        validate::recover(&response.message.content).ok_or(StoryError::EmptyResponse)
    }

    fn parameters<P>(&self, prompt: P) -> ChatCompleteParameters<GenericMessage>
    where
        P: PromptTemplate<Message = GenericMessage>,
    {
        let temperature = prompt.temperature();
        let max_tokens = prompt.max_tokens();

        let mut params = ChatCompleteParameters::new(prompt.into_prompt(), self.model.clone());
        if let Some(temperature) = temperature {
            params = params.with_temperature(temperature);
        }
        if let Some(max_tokens) = max_tokens {
            params = params.with_max_tokens(max_tokens);
        }
        if let Some(format) = &self.response_format {
            params = params.with_response_format(format.to_value());
        }
        params
    }
}
