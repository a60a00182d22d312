use std::{future::Future, pin::Pin, sync::Arc};

use storyweave_core::{
    error::Result,
    generic::{GenericChatCompletionResponse, GenericUsageReport},
    provider::{ChatCompleteParameters, ChatCompletionProvider},
};
use tracing::warn;

use crate::{
    OpenAiAdapter,
    api_v1::{ChatCompletionMessage, ChatCompletionRequest, FinishReason},
    error::OpenAiError,
};

impl ChatCompletionProvider for OpenAiAdapter {
    type Message = ChatCompletionMessage;

    fn chat_complete<'p, M>(
        &self,
        params: ChatCompleteParameters<M>,
    ) -> Pin<Box<dyn Future<Output = Result<GenericChatCompletionResponse>> + Send + 'p>>
    where
        M: Into<Self::Message> + Clone + Send + Sync + 'p,
    {
        let client = Arc::clone(&self.client);

        Box::pin(async move {
            let request = ChatCompletionRequest::try_from(params)?;
            let response = client.chat_completion(request).await?;

            let usage = response.usage.map(|usage| GenericUsageReport {
                prompt_tokens: usage.prompt_tokens as i64,
                completion_tokens: usage.completion_tokens as i64,
                total_tokens: usage.total_tokens as i64,
            });

            let Some(first_choice) = response.choices.into_iter().find(|c| c.index == 0) else {
                return Err(OpenAiError::Format("response has no choices".into()).into());
            };

            match first_choice.finish_reason {
                None | Some(FinishReason::Stop) => {}
                Some(FinishReason::Length) => {
                    warn!("completion stopped at the token limit");
                }
                Some(other) => {
                    return Err(OpenAiError::Format(format!(
                        "unhandled finish reason on API: {other:?}"
                    ))
                    .into());
                }
            }

            Ok(GenericChatCompletionResponse {
                message: first_choice.message.into(),
                usage,
            })
        })
    }
}
