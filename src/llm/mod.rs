pub mod enhance;
pub mod history;
pub mod ollama;
pub mod openai;
pub mod prompt;

use crate::config::toml_config::LlmConfig;
use crate::core::analyzer::AttendanceAnalyzer;
use crate::core::LanguageModel;
use crate::domain::model::DataSummary;
use crate::utils::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub use enhance::enhance_with_data;
pub use history::{ChatHistory, HISTORY_FILE};
pub use ollama::{list_ollama_models, OllamaClient};
pub use openai::OpenAiClient;
pub use prompt::analysis_prompt;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const OPENAI_MODELS: [&str; 2] = ["gpt-4", "gpt-3.5-turbo"];

pub const SUGGESTED_QUESTIONS: [&str; 8] = [
    "Show me employees who came late more than 5 times",
    "Calculate total working hours for each employee this month",
    "Which employees have the most overtime hours?",
    "Generate a weekly report for all employees",
    "Show me absence patterns by department",
    "Who took the most annual leave?",
    "Calculate average early departure time",
    "Show me weekend overtime distribution",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LlmProvider {
    OpenAi,
    Ollama,
}

impl TryFrom<String> for LlmProvider {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "ollama" | "ollama (local)" | "local" => Ok(LlmProvider::Ollama),
            other => Err(format!("unknown provider '{}' (expected openai or ollama)", other)),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::OpenAi => f.write_str("OpenAI"),
            LlmProvider::Ollama => f.write_str("Ollama (Local)"),
        }
    }
}

/// Answers questions about an attendance sheet with a configured model.
#[derive(Default)]
pub struct LlmHandler {
    model: Option<Box<dyn LanguageModel>>,
}

impl LlmHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(model: Box<dyn LanguageModel>) -> Self {
        Self { model: Some(model) }
    }

    /// Builds the client for `provider`. OpenAI needs an API key from the
    /// config file or `OPENAI_API_KEY`.
    pub fn initialize(
        &mut self,
        provider: LlmProvider,
        model_name: &str,
        config: &LlmConfig,
    ) -> Result<()> {
        self.initialize_with_key(provider, model_name, config, config.resolved_api_key())
    }

    pub fn initialize_with_key(
        &mut self,
        provider: LlmProvider,
        model_name: &str,
        config: &LlmConfig,
        api_key: Option<String>,
    ) -> Result<()> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let model: Box<dyn LanguageModel> = match provider {
            LlmProvider::OpenAi => {
                let api_key = api_key.ok_or_else(|| AnalyticsError::ConfigError {
                    message: "OpenAI API key is required".to_string(),
                })?;
                Box::new(OpenAiClient::new(
                    &config.openai_base_url,
                    &api_key,
                    model_name,
                    config.temperature,
                    timeout,
                )?)
            }
            LlmProvider::Ollama => Box::new(OllamaClient::new(
                &config.ollama_base_url,
                model_name,
                timeout,
            )?),
        };

        tracing::info!("✅ {} ready ({})", model_name, provider);
        self.model = Some(model);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_ref().map(|m| m.name())
    }

    /// Asks the model and appends tables computed from the data.
    pub async fn generate_report(
        &self,
        query: &str,
        summary: &DataSummary,
        analyzer: &AttendanceAnalyzer,
    ) -> Result<String> {
        let model = self.model.as_ref().ok_or(AnalyticsError::NoModelError)?;

        let prompt = analysis_prompt(query, summary);
        tracing::debug!("Prompt is {} characters", prompt.len());

        let answer = model.complete(&prompt).await?;
        Ok(enhance_with_data(query, &answer, analyzer))
    }
}

/// Model to use when none was given: the configured one, otherwise the
/// OpenAI default or the first model the Ollama server reports.
pub async fn resolve_model(
    provider: LlmProvider,
    requested: Option<&str>,
    config: &LlmConfig,
) -> Result<String> {
    if let Some(model) = requested.or(config.model.as_deref()) {
        return Ok(model.to_string());
    }

    match provider {
        LlmProvider::OpenAi => Ok(DEFAULT_OPENAI_MODEL.to_string()),
        LlmProvider::Ollama => match list_ollama_models(&config.ollama_base_url).await {
            Ok(models) => models.into_iter().next().ok_or_else(|| {
                tracing::warn!(
                    "⚠️ No Ollama models found. Please install Ollama and pull a model."
                );
                AnalyticsError::NoModelError
            }),
            Err(e) => {
                tracing::warn!("⚠️ Could not reach Ollama: {}", e);
                Err(AnalyticsError::NoModelError)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::{parse_attendance, ParseOptions};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedModel {
        answer: String,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LanguageModel for CannedModel {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.answer.clone())
        }
    }

    fn analyzer() -> AttendanceAnalyzer {
        let csv = "Employee ID,First Name,Department,Regular(H),Late In(M)\n\
                   101,Alice,IT,160,0\n\
                   102,Bob,IT,150,45\n";
        AttendanceAnalyzer::new(parse_attendance(csv.as_bytes(), &ParseOptions::default()).unwrap())
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("OpenAI".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAi);
        assert_eq!("ollama".parse::<LlmProvider>().unwrap(), LlmProvider::Ollama);
        assert_eq!(
            "Ollama (Local)".parse::<LlmProvider>().unwrap(),
            LlmProvider::Ollama
        );
        assert!("claude".parse::<LlmProvider>().is_err());
    }

    #[tokio::test]
    async fn test_generate_without_model_fails() {
        let analyzer = analyzer();
        let err = LlmHandler::new()
            .generate_report("Who is late?", &analyzer.data_summary(), &analyzer)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::NoModelError));
    }

    #[tokio::test]
    async fn test_generate_report_enriches_answer() {
        let analyzer = analyzer();
        let model = CannedModel {
            answer: "Bob was late.".to_string(),
            prompts: Mutex::new(Vec::new()),
        };
        let handler = LlmHandler::with_model(Box::new(model));
        assert_eq!(handler.model_name(), Some("canned"));

        let answer = handler
            .generate_report("Who is late?", &analyzer.data_summary(), &analyzer)
            .await
            .unwrap();

        assert!(answer.starts_with("Bob was late.\n\n"));
        assert!(answer.contains("| 102 | Bob | IT | 45 |"));
    }

    #[test]
    fn test_openai_requires_api_key() {
        let config = LlmConfig {
            api_key: Some(String::new()),
            ..LlmConfig::default()
        };
        let api_key = config.resolved_api_key_from(|_| None);
        assert_eq!(api_key, None);

        let mut handler = LlmHandler::new();
        let err = handler
            .initialize_with_key(LlmProvider::OpenAi, "gpt-4", &config, api_key)
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::ConfigError { .. }));
        assert!(err.to_string().contains("OpenAI API key is required"));
        assert!(!handler.is_ready());

        handler
            .initialize_with_key(
                LlmProvider::OpenAi,
                "gpt-4",
                &config,
                Some("sk-test".to_string()),
            )
            .unwrap();
        assert_eq!(handler.model_name(), Some("gpt-4"));
    }

    #[tokio::test]
    async fn test_resolve_model_prefers_explicit_choice() {
        let config = LlmConfig {
            model: Some("from-config".to_string()),
            ..LlmConfig::default()
        };
        assert_eq!(
            resolve_model(LlmProvider::Ollama, Some("cli"), &config).await.unwrap(),
            "cli"
        );
        assert_eq!(
            resolve_model(LlmProvider::Ollama, None, &config).await.unwrap(),
            "from-config"
        );
        assert_eq!(
            resolve_model(LlmProvider::OpenAi, None, &LlmConfig::default())
                .await
                .unwrap(),
            DEFAULT_OPENAI_MODEL
        );
    }
}
