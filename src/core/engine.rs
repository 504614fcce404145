use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct DashboardEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> DashboardEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting dashboard generation");

        // Extract
        tracing::info!("📥 Loading indicator tables and map assets...");
        let input = self.pipeline.extract().await?;
        match &input.geo {
            Ok(geo) => tracing::info!("🗺️ {} boundary polygons available", geo.polygons.len()),
            Err(missing) => tracing::warn!("⚠️ Maps disabled: {}", missing),
        }
        if !input.discrepancies.is_empty() {
            tracing::warn!(
                "⚠️ {} published values disagree with their definition",
                input.discrepancies.len()
            );
        }
        self.monitor.log_phase("Extract");

        // Transform
        tracing::info!("🎨 Rendering sections...");
        let dashboard = self.pipeline.transform(input).await?;
        tracing::info!("🎨 Rendered {} sections", dashboard.sections.len());
        self.monitor.log_phase("Transform");

        // Load
        tracing::info!("💾 Writing dashboard...");
        let output_path = self.pipeline.load(dashboard).await?;
        tracing::info!("📁 Output saved to: {}", output_path);
        self.monitor.log_phase("Load");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
