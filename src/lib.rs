pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod llm;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::args::CliConfig;
pub use config::{cli::LocalStorage, toml_config::AppConfig, ReportSettings};

pub use app::pipelines::ReportPipeline;
pub use core::{analyzer::AttendanceAnalyzer, engine::ReportEngine};
pub use llm::{LlmHandler, LlmProvider};
pub use utils::error::{AnalyticsError, Result};
