use crate::core::insights::Thresholds;
use crate::core::report::ReportFormat;
use crate::domain::model::{AttendanceSheet, ReportArtifacts};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_file(&self) -> &str;
    fn output_path(&self) -> &str;
    fn report_period(&self) -> Option<&str>;
    fn header_row(&self) -> usize;
    fn report_format(&self) -> ReportFormat;
    fn thresholds(&self) -> &Thresholds;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<AttendanceSheet>;
    async fn transform(&self, sheet: AttendanceSheet) -> Result<ReportArtifacts>;
    async fn load(&self, artifacts: ReportArtifacts) -> Result<Vec<String>>;
}

/// A text-completion backend (hosted chat API or local model server).
#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;
    async fn complete(&self, prompt: &str) -> Result<String>;
}
