use crate::core::insights::Thresholds;
use crate::core::report::ReportFormat;
use crate::llm::LlmProvider;
use crate::utils::error::{AnalyticsError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "attendance.toml";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub llm: LlmConfig,
    pub thresholds: Thresholds,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub output_path: String,
    /// Overrides the current month as the report period, e.g. "November 2024".
    pub report_period: Option<String>,
    /// Header row used when no row contains an "Employee ID" cell.
    pub header_row: usize,
    pub report_format: ReportFormat,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            report_period: None,
            header_row: 0,
            report_format: ReportFormat::Both,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub openai_base_url: String,
    pub ollama_base_url: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Ollama,
            model: None,
            api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            temperature: 0.3,
            timeout_seconds: 120,
        }
    }
}

impl LlmConfig {
    /// API key from the config file, falling back to `OPENAI_API_KEY`.
    /// Unresolved `${VAR}` placeholders count as missing.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.resolved_api_key_from(|name| std::env::var(name).ok())
    }

    /// Same as `resolved_api_key`, reading variables through `env`.
    pub fn resolved_api_key_from<F>(&self, env: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let usable = |key: &str| !key.trim().is_empty() && !key.contains("${");
        self.api_key
            .clone()
            .filter(|k| usable(k))
            .or_else(|| env(OPENAI_API_KEY_ENV).filter(|k| usable(k)))
    }
}

/// Where the loaded configuration came from.
#[derive(Debug)]
pub enum ConfigSource {
    File,
    Missing,
    /// The file exists but could not be read or parsed; defaults are in use.
    Invalid(AnalyticsError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AnalyticsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Loads the file when present. A missing file is not an error: a
    /// warning is logged and defaults are used. Returns whether the file existed.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(
                "⚠️ Configuration file '{}' not found, continuing with defaults",
                path.display()
            );
            return Ok((Self::default(), false));
        }

        tracing::info!("📁 Loading configuration from: {}", path.display());
        Ok((Self::from_file(path)?, true))
    }

    /// Like `load_or_default`, but a file that fails to load is reported
    /// instead of returned as an error, so diagnostics can keep going.
    pub fn load_lenient<P: AsRef<Path>>(path: P) -> (Self, ConfigSource) {
        match Self::load_or_default(path) {
            Ok((config, true)) => (config, ConfigSource::File),
            Ok((config, false)) => (config, ConfigSource::Missing),
            Err(e) => {
                tracing::warn!("⚠️ Configuration could not be loaded, using defaults: {}", e);
                (Self::default(), ConfigSource::Invalid(e))
            }
        }
    }

    /// 替換環境變數 (例如 ${OPENAI_API_KEY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AnalyticsError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_path("general.output_path", &self.general.output_path)?;
        if let Some(period) = &self.general.report_period {
            validate_non_empty_string("general.report_period", period)?;
        }

        validate_url("llm.openai_base_url", &self.llm.openai_base_url)?;
        validate_url("llm.ollama_base_url", &self.llm.ollama_base_url)?;
        if let Some(model) = &self.llm.model {
            validate_non_empty_string("llm.model", model)?;
        }
        validate_range("llm.temperature", self.llm.temperature, 0.0, 2.0)?;
        validate_range("llm.timeout_seconds", self.llm.timeout_seconds, 1, 3600)?;

        let t = &self.thresholds;
        let limits = [
            ("thresholds.excessive_late_minutes", t.excessive_late_minutes),
            ("thresholds.severe_late_minutes", t.severe_late_minutes),
            ("thresholds.critical_late_minutes", t.critical_late_minutes),
            ("thresholds.moderate_overtime_hours", t.moderate_overtime_hours),
            ("thresholds.note_overtime_hours", t.note_overtime_hours),
            ("thresholds.high_overtime_hours", t.high_overtime_hours),
            ("thresholds.significant_absence_hours", t.significant_absence_hours),
        ];
        for (field, value) in limits {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalyticsError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "Threshold must be a non-negative number".to_string(),
                });
            }
        }
        if t.severe_late_minutes > t.critical_late_minutes {
            return Err(AnalyticsError::ConfigValidationError {
                field: "thresholds.severe_late_minutes".to_string(),
                message: "must not exceed thresholds.critical_late_minutes".to_string(),
            });
        }
        if t.moderate_overtime_hours > t.note_overtime_hours
            || t.note_overtime_hours > t.high_overtime_hours
        {
            return Err(AnalyticsError::ConfigValidationError {
                field: "thresholds.note_overtime_hours".to_string(),
                message: "overtime limits must satisfy moderate <= note <= high".to_string(),
            });
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
