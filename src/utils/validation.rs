use crate::utils::error::{AnalyticsError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Attendance exports the parser understands.
pub const SUPPORTED_INPUT_EXTENSIONS: &[&str] = &["csv", "tsv", "tab", "txt"];

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AnalyticsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AnalyticsError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AnalyticsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AnalyticsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AnalyticsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(AnalyticsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_input_file(field_name: &str, file: &str) -> Result<()> {
    validate_path(field_name, file)?;

    let extension = std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if SUPPORTED_INPUT_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(AnalyticsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {} (export spreadsheets to CSV first)",
                ext,
                SUPPORTED_INPUT_EXTENSIONS.join(", ")
            ),
        }),
        None => Err(AnalyticsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AnalyticsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AnalyticsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("llm.ollama_base_url", "http://localhost:11434").is_ok());
        assert!(validate_url("llm.openai_base_url", "https://api.openai.com").is_ok());
        assert!(validate_url("llm.openai_base_url", "").is_err());
        assert!(validate_url("llm.openai_base_url", "invalid-url").is_err());
        assert!(validate_url("llm.openai_base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("top", 5, 1).is_ok());
        assert!(validate_positive_number("top", 0, 1).is_err());
    }

    #[test]
    fn test_validate_input_file() {
        assert!(validate_input_file("file", "november.csv").is_ok());
        assert!(validate_input_file("file", "november.TSV").is_ok());
        assert!(validate_input_file("file", "november.xlsx").is_err());
        assert!(validate_input_file("file", "november").is_err());
        assert!(validate_input_file("file", "").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("llm.temperature", 0.3, 0.0, 2.0).is_ok());
        assert!(validate_range("llm.temperature", 2.5, 0.0, 2.0).is_err());
        assert!(validate_non_empty_string("llm.model", "  ").is_err());
    }
}
