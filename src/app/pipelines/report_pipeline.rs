use crate::core::analyzer::AttendanceAnalyzer;
use crate::core::parser::{parse_attendance, ParseOptions};
use crate::core::report::ReportGenerator;
use crate::core::{AttendanceSheet, ConfigProvider, Pipeline, ReportArtifacts, Storage};
use crate::utils::error::Result;
use chrono::Local;
use std::path::Path;

/// Reads an attendance export from `source` and writes the generated
/// reports to `sink`.
pub struct ReportPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) source: S,
    pub(crate) sink: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> ReportPipeline<S, C> {
    pub fn new(source: S, sink: S, config: C) -> Self {
        Self {
            source,
            sink,
            config,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ReportPipeline<S, C> {
    async fn extract(&self) -> Result<AttendanceSheet> {
        let input = self.config.input_file();
        tracing::debug!("Reading attendance export: {}", input);

        let data = self.source.read_file(input).await?;
        let options = ParseOptions::for_path(
            input,
            self.config.header_row(),
            self.config.report_period(),
        );
        parse_attendance(&data, &options)
    }

    async fn transform(&self, sheet: AttendanceSheet) -> Result<ReportArtifacts> {
        let analyzer = AttendanceAnalyzer::new(sheet);
        let generator = ReportGenerator::new(&analyzer, self.config.thresholds(), Local::now());

        let insights = generator.insights();
        tracing::debug!(
            "Insights: {} concerns, {} recommendations, {} highlights",
            insights.concerns.len(),
            insights.recommendations.len(),
            insights.highlights.len()
        );

        generator.generate(self.config.report_format())
    }

    async fn load(&self, artifacts: ReportArtifacts) -> Result<Vec<String>> {
        let mut paths = Vec::with_capacity(artifacts.files.len());
        for file in artifacts.files {
            self.sink.write_file(&file.name, &file.contents).await?;
            let path = Path::new(self.config.output_path()).join(&file.name);
            paths.push(path.to_string_lossy().to_string());
        }
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::insights::Thresholds;
    use crate::core::report::{ReportFormat, BUNDLE_FILE, MARKDOWN_FILE};
    use crate::utils::error::AnalyticsError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    const EXPORT: &str = "\
Attendance Export,,,,
Employee ID,First Name,Department,Regular(H),Late In(M),Normal OT(H)
101,Alice,IT,168,0,25
102,Bob,Sales,150,120,2
";

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn with_file(path: &str, data: &[u8]) -> Self {
            let storage = Self::new();
            storage.write_file(path, data).await.unwrap();
            storage
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                AnalyticsError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn exists(&self, path: &str) -> bool {
            self.files.lock().await.contains_key(path)
        }
    }

    struct MockConfig {
        input_file: String,
        format: ReportFormat,
        thresholds: Thresholds,
    }

    impl MockConfig {
        fn new(input_file: &str, format: ReportFormat) -> Self {
            Self {
                input_file: input_file.to_string(),
                format,
                thresholds: Thresholds::default(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_file(&self) -> &str {
            &self.input_file
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn report_period(&self) -> Option<&str> {
            Some("November 2024")
        }

        fn header_row(&self) -> usize {
            0
        }

        fn report_format(&self) -> ReportFormat {
            self.format
        }

        fn thresholds(&self) -> &Thresholds {
            &self.thresholds
        }
    }

    #[tokio::test]
    async fn test_extract_detects_header_below_title_row() {
        let source = MockStorage::with_file("nov.csv", EXPORT.as_bytes()).await;
        let pipeline = ReportPipeline::new(
            source,
            MockStorage::new(),
            MockConfig::new("nov.csv", ReportFormat::Both),
        );

        let sheet = pipeline.extract().await.unwrap();

        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.period, "November 2024");
        assert_eq!(sheet.columns[0], "Employee ID");
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let pipeline = ReportPipeline::new(
            MockStorage::new(),
            MockStorage::new(),
            MockConfig::new("missing.csv", ReportFormat::Both),
        );

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, AnalyticsError::IoError(_)));
    }

    #[tokio::test]
    async fn test_transform_respects_format() {
        let source = MockStorage::with_file("nov.csv", EXPORT.as_bytes()).await;
        let pipeline = ReportPipeline::new(
            source,
            MockStorage::new(),
            MockConfig::new("nov.csv", ReportFormat::Markdown),
        );

        let sheet = pipeline.extract().await.unwrap();
        let artifacts = pipeline.transform(sheet).await.unwrap();

        assert_eq!(artifacts.files.len(), 1);
        assert_eq!(artifacts.files[0].name, MARKDOWN_FILE);
        let markdown = String::from_utf8(artifacts.files[0].contents.clone()).unwrap();
        assert!(markdown.starts_with("# Attendance Report - November 2024"));
    }

    #[tokio::test]
    async fn test_load_writes_every_artifact() {
        let source = MockStorage::with_file("nov.csv", EXPORT.as_bytes()).await;
        let sink = MockStorage::new();
        let pipeline = ReportPipeline::new(
            source,
            sink.clone(),
            MockConfig::new("nov.csv", ReportFormat::Both),
        );

        let sheet = pipeline.extract().await.unwrap();
        let artifacts = pipeline.transform(sheet).await.unwrap();
        let paths = pipeline.load(artifacts).await.unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with(BUNDLE_FILE));
        assert!(paths[1].ends_with(MARKDOWN_FILE));

        let bundle = sink.get_file(BUNDLE_FILE).await.unwrap();
        assert_eq!(&bundle[..2], b"PK");
        assert!(sink.get_file(MARKDOWN_FILE).await.is_some());
    }
}
