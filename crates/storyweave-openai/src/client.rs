use async_stream::try_stream;

use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::{
    Client as HttpClient,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    api_v1::{
        ChatCompletionChunkResponse, ChatCompletionRequest, ChatCompletionResponse, StreamPayload,
    },
    error::OpenAiError,
    sse::SseFrameDecoder,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimal HTTP client for an OpenAI-compatible *chat/completions* endpoint.
///
/// * Accepts and returns the `api_v1` request / response structs defined
///   in this crate.
/// * Shares a single `reqwest::Client`, so cloning `OpenAiClient` is cheap.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    http: HttpClient,
    base: String,
    timeout: Duration,
}

impl OpenAiClient {
    /// Build a default `reqwest` client with Rustls TLS.
    ///
    /// `timeout` bounds a non-streaming completion as a whole. Streams only
    /// carry the connect timeout; how long they may stay quiet is up to the
    /// consumer.
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, OpenAiError> {
        let http = HttpClient::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self::with_http(api_key, http, base_url).with_timeout(timeout))
    }

    /// Build with a custom `reqwest::Client` in case the caller needs proxy
    /// settings, custom TLS, etc.
    pub fn with_http(
        api_key: impl Into<String>,
        http: HttpClient,
        base_url: Option<String>,
    ) -> Self {
        let base = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        Self {
            api_key: api_key.into(),
            http,
            base: base.trim_end_matches('/').to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn headers(&self, streaming: bool) -> Result<HeaderMap, OpenAiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        if streaming {
            headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        }
        Ok(headers)
    }

    /// Perform a **non-streaming** chat completion.
    pub async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiError> {
        let headers = self.headers(false)?;
        let url = format!("{}/chat/completions", self.base);
        debug!(%url, model = %request.model, "sending chat completion");

        let resp = self
            .http
            .post(url)
            .headers(headers)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(OpenAiError::Api { status, body });
        }

        let bytes = resp.bytes().await?;
        let parsed: ChatCompletionResponse = serde_json::from_slice(&bytes)?;
        Ok(parsed)
    }

    /// Perform a **streaming** chat completion.
    ///
    /// Nothing is sent until the stream is polled. The stream ends after
    /// `[DONE]` or when the server closes the body.
    pub fn chat_completion_stream(
        &self,
        mut request: ChatCompletionRequest,
    ) -> impl Stream<Item = Result<ChatCompletionChunkResponse, OpenAiError>> + '_ {
        request.stream = Some(true);
        let url = format!("{}/chat/completions", self.base);

        try_stream! {
            let headers = self.headers(true)?;
            debug!(%url, model = %request.model, "opening chat completion stream");
            let resp = self.http.post(url).headers(headers).json(&request).send().await?;

            if !resp.status().is_success() {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                return Err(OpenAiError::Api { status, body })?;
            }

            let mut bytes_stream = resp.bytes_stream();
            let mut frames = SseFrameDecoder::new();

            while let Some(chunk) = bytes_stream.next().await {
                let chunk = chunk?;
                for data in frames.push(&chunk)? {
                    yield parse_payload(&data)?;
                }
                if frames.is_done() {
                    return;
                }
            }

            for data in frames.finish()? {
                yield parse_payload(&data)?;
            }
        }
    }
}

fn parse_payload(data: &str) -> Result<ChatCompletionChunkResponse, OpenAiError> {
    match serde_json::from_str::<StreamPayload>(data)? {
        StreamPayload::Chunk(chunk) => Ok(chunk),
        StreamPayload::Error { error } => {
            warn!(message = %error.message, kind = ?error.kind, "error event in stream");
            Err(OpenAiError::Stream(error.message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_events_become_stream_errors() {
        let err = parse_payload(r#"{"error":{"message":"overloaded"}}"#).unwrap_err();
        assert!(matches!(err, OpenAiError::Stream(message) if message == "overloaded"));
    }

    #[test]
    fn malformed_events_are_serde_errors() {
        let err = parse_payload("not json").unwrap_err();
        assert!(matches!(err, OpenAiError::Serde(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = OpenAiClient::with_http(
            "key",
            HttpClient::new(),
            Some("https://api.deepseek.com/v1/".into()),
        );
        assert_eq!(client.base_url(), "https://api.deepseek.com/v1");
    }
}
