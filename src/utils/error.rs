use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Language model returned an error ({status}): {message}")]
    LlmResponseError { status: u16, message: String },

    #[error("No language model initialized")]
    NoModelError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Configuration,
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AnalyticsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalyticsError::ApiError(_) => ErrorCategory::Network,
            AnalyticsError::LlmResponseError { .. } | AnalyticsError::NoModelError => {
                ErrorCategory::Model
            }
            AnalyticsError::CsvError(_)
            | AnalyticsError::SerializationError(_)
            | AnalyticsError::ProcessingError { .. }
            | AnalyticsError::ValidationError { .. } => ErrorCategory::Data,
            AnalyticsError::ZipError(_) | AnalyticsError::IoError(_) => ErrorCategory::Storage,
            AnalyticsError::ConfigError { .. }
            | AnalyticsError::ConfigValidationError { .. }
            | AnalyticsError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路與模型錯誤通常可以重試
            AnalyticsError::ApiError(_) | AnalyticsError::LlmResponseError { .. } => {
                ErrorSeverity::Medium
            }
            AnalyticsError::NoModelError => ErrorSeverity::Medium,
            AnalyticsError::CsvError(_)
            | AnalyticsError::SerializationError(_)
            | AnalyticsError::ProcessingError { .. }
            | AnalyticsError::ValidationError { .. } => ErrorSeverity::High,
            AnalyticsError::ConfigError { .. }
            | AnalyticsError::ConfigValidationError { .. }
            | AnalyticsError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            AnalyticsError::ZipError(_) | AnalyticsError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AnalyticsError::ApiError(_) => {
                "Check network connectivity and that the model server is reachable, then retry"
            }
            AnalyticsError::LlmResponseError { .. } => {
                "Verify the model name and API key, or try a different model"
            }
            AnalyticsError::NoModelError => {
                "Configure a model with --provider/--model or the [llm] section of the config file"
            }
            AnalyticsError::CsvError(_) => {
                "Make sure the attendance export is a valid CSV or TSV file"
            }
            AnalyticsError::SerializationError(_) => "Check the JSON content for syntax errors",
            AnalyticsError::ProcessingError { .. } => {
                "Inspect the input data for unexpected values"
            }
            AnalyticsError::ValidationError { .. } => {
                "Check that the export contains an 'Employee ID' header row"
            }
            AnalyticsError::ConfigError { .. }
            | AnalyticsError::ConfigValidationError { .. }
            | AnalyticsError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command-line flags"
            }
            AnalyticsError::IoError(_) | AnalyticsError::ZipError(_) => {
                "Check file paths, permissions and free disk space"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => {
                format!("Could not reach the language model service: {}", self)
            }
            ErrorCategory::Model => format!("AI analysis failed: {}", self),
            ErrorCategory::Data => format!("Could not process the attendance data: {}", self),
            ErrorCategory::Storage => format!("Could not read or write files: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl From<toml::de::Error> for AnalyticsError {
    fn from(e: toml::de::Error) -> Self {
        AnalyticsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_maps_to_exit_code() {
        let config_err = AnalyticsError::ConfigError {
            message: "OpenAI API key is required".to_string(),
        };
        assert_eq!(config_err.severity(), ErrorSeverity::High);
        assert_eq!(config_err.exit_code(), 1);

        assert_eq!(AnalyticsError::NoModelError.exit_code(), 2);

        let io_err = AnalyticsError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(io_err.category(), ErrorCategory::Storage);
        assert_eq!(io_err.exit_code(), 3);
    }

    #[test]
    fn test_user_friendly_message_mentions_cause() {
        let err = AnalyticsError::ValidationError {
            message: "missing column 'Employee ID'".to_string(),
        };
        let message = err.user_friendly_message();
        assert!(message.starts_with("Could not process the attendance data"));
        assert!(message.contains("Employee ID"));
    }
}
