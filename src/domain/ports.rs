use crate::analysis::AgeBuckets;
use crate::domain::section::Section;
use crate::geo::GeoSettings;
use crate::core::pipeline::DashboardInput;
use crate::render::RenderedDashboard;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn title(&self) -> &str;
    fn output_path(&self) -> &str;
    fn sections(&self) -> Vec<Section>;
    fn output_formats(&self) -> &[String];
    /// 啟用壓縮時的 ZIP 檔名
    fn archive_name(&self) -> Option<&str>;
    fn geo_settings(&self) -> GeoSettings;
    fn age_buckets(&self) -> AgeBuckets;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<DashboardInput>;
    async fn transform(&self, input: DashboardInput) -> Result<RenderedDashboard>;
    async fn load(&self, dashboard: RenderedDashboard) -> Result<String>;
}
