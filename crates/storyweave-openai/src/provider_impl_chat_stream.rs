use std::pin::Pin;

use futures_core::stream::Stream;
use storyweave_core::error::{Result, StoryError};
use storyweave_core::provider::{ChatCompleteParameters, StreamingChatProvider};
use tracing::debug;

use crate::OpenAiAdapter;
use crate::api_v1::ChatCompletionRequest;

impl StreamingChatProvider for OpenAiAdapter {
    type Delta<'s>
        = Pin<Box<dyn Stream<Item = Result<String>> + Send + 's>>
    where
        Self: 's;

    fn chat_complete_stream<'s, M>(&'s self, params: ChatCompleteParameters<M>) -> Self::Delta<'s>
    where
        M: Into<Self::Message> + Clone + Send + Sync + 's,
    {
        let client = self.client.clone();

        Box::pin(async_stream::try_stream! {
            use futures_util::StreamExt;

            let request = ChatCompletionRequest::try_from(params)?;

            let stream = client.chat_completion_stream(request);
            futures_util::pin_mut!(stream);

            let mut deltas = 0usize;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(StoryError::from)?;
                if let Some(text) = chunk.primary_text() {
                    deltas += 1;
                    yield text;
                }
            }
            debug!(deltas, "chat completion stream ended");
        })
    }
}
