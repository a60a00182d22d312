use serde::Deserialize;

use super::chat_completion::{FinishReason, MessageRole};

/// A delta message as returned when `stream = true`.
#[derive(Debug, Deserialize, Default)]
pub struct ChatCompletionMessageDelta {
    #[serde(default)]
    pub role: Option<MessageRole>,
    #[serde(default)]
    pub content: Option<String>,
}

/// A single streaming choice payload.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunkChoice {
    #[serde(default)]
    pub index: i64,
    #[serde(default)]
    pub delta: ChatCompletionMessageDelta,
    pub finish_reason: Option<FinishReason>,
}

/// The outermost object sent for each SSE event.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunkResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<ChatCompletionChunkChoice>,
}

impl ChatCompletionChunkResponse {
    /// Text appended to the first choice by this chunk, if any.
    pub fn primary_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .find(|choice| choice.index == 0)
            .and_then(|choice| choice.delta.content)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

/// Either a regular chunk or an error reported mid-stream.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StreamPayload {
    Error { error: ApiErrorBody },
    Chunk(ChatCompletionChunkResponse),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_payload_yields_first_choice_text() {
        let payload: StreamPayload = serde_json::from_str(
            r#"{"id":"x","object":"chat.completion.chunk","created":1,"model":"deepseek-chat",
               "choices":[{"index":1,"delta":{"content":"other"}},
                          {"index":0,"delta":{"content":"Once"},"finish_reason":null}]}"#,
        )
        .unwrap();
        let StreamPayload::Chunk(chunk) = payload else {
            panic!("expected a chunk");
        };
        assert_eq!(chunk.primary_text().as_deref(), Some("Once"));
    }

    #[test]
    fn role_only_and_final_chunks_carry_no_text() {
        let first: ChatCompletionChunkResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"delta":{"role":"assistant","content":""}}]}"#,
        )
        .unwrap();
        assert_eq!(first.primary_text(), None);

        let last: ChatCompletionChunkResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"delta":{},"finish_reason":"stop"}],"usage":{"prompt_tokens":1,"completion_tokens":2,"total_tokens":3}}"#,
        )
        .unwrap();
        assert_eq!(last.primary_text(), None);
    }

    #[test]
    fn error_payload_is_recognised() {
        let payload: StreamPayload = serde_json::from_str(
            r#"{"error":{"message":"Rate limit reached","type":"rate_limit_error","code":429}}"#,
        )
        .unwrap();
        match payload {
            StreamPayload::Error { error } => {
                assert_eq!(error.message, "Rate limit reached");
                assert_eq!(error.kind.as_deref(), Some("rate_limit_error"));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }
}
