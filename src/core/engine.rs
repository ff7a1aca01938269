use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives a report pipeline through load, analysis and write-out.
pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<Vec<String>> {
        tracing::info!("🚀 Starting attendance report generation");
        self.monitor.log_stats("Start");

        tracing::info!("📥 Loading attendance export...");
        let sheet = self.pipeline.extract().await?;
        tracing::info!("Loaded {} employee rows", sheet.len());
        self.monitor.log_stats("Load");

        tracing::info!("🔍 Analyzing attendance data...");
        let artifacts = self.pipeline.transform(sheet).await?;
        tracing::info!("Prepared {} report files", artifacts.files.len());
        self.monitor.log_stats("Analyze");

        tracing::info!("💾 Writing reports...");
        let paths = self.pipeline.load(artifacts).await?;
        for path in &paths {
            tracing::info!("📁 Report saved to: {}", path);
        }
        self.monitor.log_stats("Write");
        self.monitor.log_final_stats();

        Ok(paths)
    }
}
