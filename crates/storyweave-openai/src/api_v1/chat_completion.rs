use serde::{Deserialize, Serialize};
use storyweave_core::{
    error::StoryError,
    generic::{GenericMessage, GenericRole},
    provider::ChatCompleteParameters,
};

use crate::impl_builder_methods;
use crate::model_map::map_model;

use super::common;

#[derive(Debug, Serialize, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatCompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl ChatCompletionRequest {
    pub fn new(model: String, messages: Vec<ChatCompletionMessage>) -> Self {
        Self {
            model,
            messages,
            temperature: None,
            max_tokens: None,
            response_format: None,
            stream: None,
        }
    }
}

impl_builder_methods!(
    ChatCompletionRequest,
    temperature: f64,
    max_tokens: u32,
    response_format: serde_json::Value,
    stream: bool
);

impl<M> TryFrom<ChatCompleteParameters<M>> for ChatCompletionRequest
where
    M: Into<ChatCompletionMessage> + Clone,
{
    type Error = StoryError;

    fn try_from(value: ChatCompleteParameters<M>) -> Result<Self, Self::Error> {
        let model = map_model(&value.model).ok_or_else(|| StoryError::ModelNotSupported {
            provider: "openai",
            model: format!("{:?}", value.model),
        })?;

        Ok(Self {
            model: model.into(),
            messages: value.messages.into_iter().map(Into::into).collect(),
            temperature: value.temperature,
            max_tokens: value.max_tokens,
            response_format: value.response_format,
            stream: None,
        })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    System,
    Assistant,
}

impl From<GenericRole> for MessageRole {
    fn from(value: GenericRole) -> Self {
        match value {
            GenericRole::System => MessageRole::System,
            GenericRole::Assistant => MessageRole::Assistant,
            GenericRole::User => MessageRole::User,
        }
    }
}

impl From<MessageRole> for GenericRole {
    fn from(value: MessageRole) -> Self {
        match value {
            MessageRole::System => GenericRole::System,
            MessageRole::Assistant => GenericRole::Assistant,
            MessageRole::User => GenericRole::User,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ChatCompletionMessage {
    pub role: MessageRole,
    /// `null` in some assistant replies.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<GenericMessage> for ChatCompletionMessage {
    fn from(value: GenericMessage) -> Self {
        Self {
            role: value.role.into(),
            content: Some(value.content),
            name: value.name,
        }
    }
}

impl From<ChatCompletionMessage> for GenericMessage {
    fn from(value: ChatCompletionMessage) -> Self {
        GenericMessage {
            role: value.role.into(),
            content: value.content.unwrap_or_default(),
            name: value.name,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    InsufficientSystemResource,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionChoice {
    pub index: i64,
    pub message: ChatCompletionMessage,
    pub finish_reason: Option<FinishReason>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<ChatCompletionChoice>,
    #[serde(default)]
    pub usage: Option<common::Usage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storyweave_core::model::{Model, OpenAiModel};

    #[test]
    fn parameters_become_a_request() {
        let params = ChatCompleteParameters::new(
            vec![
                GenericMessage::new("Be brief.", GenericRole::System),
                GenericMessage::new("A dragon", GenericRole::User),
            ],
            Model::OpenAi(OpenAiModel::Gpt4oMini),
        )
        .with_temperature(0.8)
        .with_max_tokens(1000);

        let request = ChatCompletionRequest::try_from(params).unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    { "role": "system", "content": "Be brief." },
                    { "role": "user", "content": "A dragon" }
                ],
                "temperature": 0.8,
                "max_tokens": 1000
            })
        );
    }

    #[test]
    fn blank_custom_model_is_rejected() {
        let params = ChatCompleteParameters::new(
            vec![GenericMessage::new("x", GenericRole::User)],
            Model::Custom(String::new()),
        );
        let err = ChatCompletionRequest::try_from(params).unwrap_err();
        assert!(matches!(err, StoryError::ModelNotSupported { provider: "openai", .. }));
    }

    #[test]
    fn builder_sets_stream_and_format() {
        let request = ChatCompletionRequest::new("deepseek-chat".into(), vec![])
            .stream(true)
            .response_format(json!({ "type": "json_object" }));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["stream"], json!(true));
        assert_eq!(value["response_format"]["type"], "json_object");
        assert!(value.get("temperature").is_none());
    }

    #[test]
    fn response_with_null_content_parses() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "c-1",
            "object": "chat.completion",
            "created": 1,
            "model": "deepseek-chat",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": null },
                "finish_reason": "insufficient_system_resource"
            }]
        }))
        .unwrap();

        let choice = &response.choices[0];
        assert_eq!(
            choice.finish_reason,
            Some(FinishReason::InsufficientSystemResource)
        );
        assert_eq!(GenericMessage::from(choice.message.clone()).content, "");
        assert!(response.usage.is_none());
    }
}
