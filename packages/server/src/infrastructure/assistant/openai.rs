//! OpenAI-compatible chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::domain::{AssistantClient, AssistantError, AssistantRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Connection settings for the chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(15),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Assistant backed by an OpenAI-compatible HTTP API.
pub struct OpenAiAssistant {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiAssistant {
    pub fn new(config: OpenAiConfig) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AssistantError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn build_headers(&self) -> Result<HeaderMap, AssistantError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key))
            .map_err(|e| AssistantError::Transport(format!("invalid API key header: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    fn build_body<'a>(&'a self, request: &'a AssistantRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: &request.query,
                },
            ],
            max_tokens: request.max_tokens,
        }
    }
}

/// Pull the first non-blank choice out of a completions response body.
fn parse_reply(body: &str) -> Result<String, AssistantError> {
    let response: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| AssistantError::Decode(e.to_string()))?;
    response
        .choices
        .into_iter()
        .filter_map(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .find(|content| !content.is_empty())
        .ok_or(AssistantError::EmptyReply)
}

#[async_trait]
impl AssistantClient for OpenAiAssistant {
    #[tracing::instrument(skip_all, fields(model = %self.config.model))]
    async fn ask(&self, request: AssistantRequest) -> Result<String, AssistantError> {
        let response = self
            .client
            .post(self.config.completions_url())
            .headers(self.build_headers()?)
            .json(&self.build_body(&request))
            .send()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply = parse_reply(&body)?;
        tracing::debug!("Assistant replied with {} characters", reply.len());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assistant() -> OpenAiAssistant {
        let mut config = OpenAiConfig::new("sk-test");
        config.base_url = "http://localhost:9999/v1/".to_string();
        OpenAiAssistant::new(config).unwrap()
    }

    #[test]
    fn test_request_body_carries_system_and_user_messages() {
        // テスト項目: リクエストボディに system / user メッセージと最大長が含まれる
        // given (前提条件):
        let assistant = assistant();
        let request = AssistantRequest::new("what is rust?", 200);

        // when (操作):
        let body = serde_json::to_value(assistant.build_body(&request)).unwrap();

        // then (期待する結果):
        assert_eq!(body["model"], json!("gpt-3.5-turbo"));
        assert_eq!(body["max_tokens"], json!(200));
        assert_eq!(body["messages"][0]["role"], json!("system"));
        assert_eq!(body["messages"][1], json!({"role": "user", "content": "what is rust?"}));
        assert_eq!(
            assistant.config.completions_url(),
            "http://localhost:9999/v1/chat/completions"
        );
    }

    #[test]
    fn test_headers_use_bearer_auth() {
        // テスト項目: Authorization ヘッダが Bearer 形式になる
        // given (前提条件):
        let assistant = assistant();

        // when (操作):
        let headers = assistant.build_headers().unwrap();

        // then (期待する結果):
        assert_eq!(headers[AUTHORIZATION], "Bearer sk-test");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_parse_reply_takes_first_non_blank_choice() {
        // テスト項目: 応答から最初の空でない選択肢が取り出される
        // given (前提条件):
        let body = r#"{"choices":[{"message":{"content":"  "}},{"message":{"content":" Hi! "}}]}"#;

        // when (操作):
        let reply = parse_reply(body);

        // then (期待する結果):
        assert_eq!(reply.unwrap(), "Hi!");
    }

    #[test]
    fn test_parse_reply_errors() {
        // テスト項目: 空の応答や壊れた JSON はエラーになる
        // given (前提条件):
        let empty = r#"{"choices":[]}"#;
        let broken = "<html>";

        // when (操作):
        let empty_result = parse_reply(empty);
        let broken_result = parse_reply(broken);

        // then (期待する結果):
        assert!(matches!(empty_result, Err(AssistantError::EmptyReply)));
        assert!(matches!(broken_result, Err(AssistantError::Decode(_))));
    }

    #[tokio::test]
    async fn test_ask_unreachable_endpoint_is_transport_error() {
        // テスト項目: 接続できないエンドポイントへの問い合わせは Transport エラーになる
        // given (前提条件):
        let mut config = OpenAiConfig::new("sk-test");
        config.base_url = "http://127.0.0.1:1".to_string();
        config.request_timeout = Duration::from_secs(2);
        let assistant = OpenAiAssistant::new(config).unwrap();

        // when (操作):
        let result = assistant.ask(AssistantRequest::new("hello", 10)).await;

        // then (期待する結果):
        assert!(matches!(result, Err(AssistantError::Transport(_))));
    }
}
