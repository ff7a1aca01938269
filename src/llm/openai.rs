use crate::core::LanguageModel;
use crate::utils::error::{AnalyticsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature,
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        tracing::debug!("Sending prompt to OpenAI model '{}'", self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                model: &self.model,
                messages: vec![ChatMessage {
                    role: "user",
                    content: prompt,
                }],
                temperature: self.temperature,
            })
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("OpenAI response status: {}", status);
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AnalyticsError::LlmResponseError {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AnalyticsError::LlmResponseError {
                status: status.as_u16(),
                message: "response contained no completion".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new(base_url, "sk-test", "gpt-4", 0.3, Duration::from_secs(10)).unwrap()
    }

    #[tokio::test]
    async fn test_chat_completion() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer sk-test")
                .json_body(serde_json::json!({
                    "model": "gpt-4",
                    "messages": [{"role": "user", "content": "Who is late?"}],
                    "temperature": 0.3
                }));
            then.status(200).json_body(serde_json::json!({
                "id": "chatcmpl-1",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Bob is late."}
                }]
            }));
        });

        let answer = client(&server.base_url()).complete("Who is late?").await.unwrap();

        mock.assert();
        assert_eq!(answer, "Bob is late.");
    }

    #[tokio::test]
    async fn test_unauthorized_is_llm_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(401)
                .json_body(serde_json::json!({"error": {"message": "Incorrect API key"}}));
        });

        let err = client(&server.base_url()).complete("hi").await.unwrap_err();
        match err {
            AnalyticsError::LlmResponseError { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("Incorrect API key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(serde_json::json!({"choices": []}));
        });

        assert!(client(&server.base_url()).complete("hi").await.is_err());
    }
}
