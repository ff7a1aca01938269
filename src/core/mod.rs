pub mod analyzer;
pub mod engine;
pub mod insights;
pub mod parser;
pub mod report;
pub mod table;

pub use crate::domain::model::{AttendanceSheet, ReportArtifacts, ReportFile, Table};
pub use crate::domain::ports::{ConfigProvider, LanguageModel, Pipeline, Storage};
pub use crate::utils::error::Result;
