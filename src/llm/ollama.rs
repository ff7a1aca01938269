use crate::core::LanguageModel;
use crate::utils::error::{AnalyticsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Model listing doubles as a liveness check, so it gives up quickly.
const TAGS_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Names of the models installed on a local Ollama server.
pub async fn list_ollama_models(base_url: &str) -> Result<Vec<String>> {
    let url = format!("{}/api/tags", base_url.trim_end_matches('/'));
    tracing::debug!("Listing Ollama models: {}", url);

    let client = Client::builder().timeout(TAGS_TIMEOUT).build()?;
    let response = client.get(&url).send().await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(AnalyticsError::LlmResponseError {
            status: status.as_u16(),
            message,
        });
    }

    let tags: TagsResponse = response.json().await?;
    Ok(tags.models.into_iter().map(|m| m.name).collect())
}

pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        tracing::debug!("Sending prompt to Ollama model '{}' at {}", self.model, url);

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Ollama response status: {}", status);
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AnalyticsError::LlmResponseError {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_list_models() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(200).json_body(serde_json::json!({
                "models": [{"name": "llama2:latest"}, {"name": "mistral:7b"}]
            }));
        });

        let models = list_ollama_models(&server.base_url()).await.unwrap();

        mock.assert();
        assert_eq!(models, vec!["llama2:latest", "mistral:7b"]);
    }

    #[tokio::test]
    async fn test_list_models_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(500).body("boom");
        });

        let err = list_ollama_models(&server.base_url()).await.unwrap_err();
        assert!(matches!(err, AnalyticsError::LlmResponseError { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_generate_non_streaming() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .json_body(serde_json::json!({
                    "model": "llama2",
                    "prompt": "How many employees?",
                    "stream": false
                }));
            then.status(200).json_body(serde_json::json!({
                "model": "llama2",
                "response": "There are 4.",
                "done": true
            }));
        });

        let client =
            OllamaClient::new(&server.base_url(), "llama2", Duration::from_secs(10)).unwrap();
        let answer = client.complete("How many employees?").await.unwrap();

        mock.assert();
        assert_eq!(answer, "There are 4.");
        assert_eq!(client.name(), "llama2");
    }
}
