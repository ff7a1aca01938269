#[cfg(feature = "cli")]
pub mod args;
pub mod cli;
pub mod toml_config;

use crate::core::insights::Thresholds;
use crate::core::report::ReportFormat;
use crate::core::ConfigProvider;
use crate::utils::validation::{validate_input_file, validate_path, Validate};
use serde::{Deserialize, Serialize};
use toml_config::AppConfig;

/// Resolved settings for one report run: the file config with any
/// command-line overrides applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    pub input_file: String,
    pub output_path: String,
    pub report_period: Option<String>,
    pub header_row: usize,
    pub report_format: ReportFormat,
    pub thresholds: Thresholds,
}

impl ReportSettings {
    pub fn from_config(config: &AppConfig, input_file: impl Into<String>) -> Self {
        Self {
            input_file: input_file.into(),
            output_path: config.general.output_path.clone(),
            report_period: config.general.report_period.clone(),
            header_row: config.general.header_row,
            report_format: config.general.report_format,
            thresholds: config.thresholds.clone(),
        }
    }

    pub fn with_output_path(mut self, output_path: Option<String>) -> Self {
        if let Some(path) = output_path {
            self.output_path = path;
        }
        self
    }

    pub fn with_period(mut self, period: Option<String>) -> Self {
        if period.is_some() {
            self.report_period = period;
        }
        self
    }

    pub fn with_format(mut self, format: Option<ReportFormat>) -> Self {
        if let Some(format) = format {
            self.report_format = format;
        }
        self
    }
}

impl ConfigProvider for ReportSettings {
    fn input_file(&self) -> &str {
        &self.input_file
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn report_period(&self) -> Option<&str> {
        self.report_period.as_deref()
    }

    fn header_row(&self) -> usize {
        self.header_row
    }

    fn report_format(&self) -> ReportFormat {
        self.report_format
    }

    fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }
}

impl Validate for ReportSettings {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validate_input_file("input_file", &self.input_file)?;
        validate_path("output_path", &self.output_path)?;
        Ok(())
    }
}
