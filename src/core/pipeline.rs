use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::data::Datasets;
use crate::domain::model::Discrepancy;
use crate::domain::section::Section;
use crate::geo::{try_load_geo_assets_with, GeoAvailability};
use crate::render::{render_html, render_section, HtmlOptions, RenderSettings, RenderedDashboard};
use crate::utils::error::{DashError, MissingAsset, Result};
use reqwest::Client;
use std::collections::HashSet;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// extract 階段的結果
#[derive(Debug, Clone)]
pub struct DashboardInput {
    pub datasets: Datasets,
    pub geo: GeoAvailability,
    pub discrepancies: Vec<Discrepancy>,
}

pub struct DashboardPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
    html: HtmlOptions,
}

impl<S: Storage, C: ConfigProvider> DashboardPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
            html: HtmlOptions::default(),
        }
    }

    pub fn with_html_options(mut self, html: HtmlOptions) -> Self {
        self.html = html;
        self
    }

    fn wants(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }

    /// 依設定的格式產生所有檔案 (相對路徑, 內容)
    fn artifacts(&self, dashboard: &RenderedDashboard) -> Result<Vec<(String, Vec<u8>)>> {
        let mut files = Vec::new();

        if self.wants("html") {
            files.push((
                "index.html".to_string(),
                render_html(dashboard, &self.html).into_bytes(),
            ));
        }

        if self.wants("json") {
            for view in &dashboard.sections {
                let json = serde_json::to_vec_pretty(view)?;
                files.push((format!("sections/{}.json", view.section.slug()), json));
            }
        }

        if self.wants("csv") {
            for view in &dashboard.sections {
                let mut seen = HashSet::new();
                for table in view.tables() {
                    // 同一區塊可能重複顯示同一張表
                    if !seen.insert(table.id.as_str()) {
                        continue;
                    }
                    files.push((
                        format!("tables/{}/{}.csv", view.section.slug(), table.id),
                        table.to_csv()?.into_bytes(),
                    ));
                }
            }
        }

        Ok(files)
    }
}

fn zip_bundle(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DashboardPipeline<S, C> {
    async fn extract(&self) -> Result<DashboardInput> {
        let datasets = Datasets::antioquia();
        let discrepancies = datasets.check_consistency();
        for d in &discrepancies {
            tracing::warn!("⚠️ {}", d);
        }

        // 只有遷移區塊用到邊界資料
        let geo = if self.config.sections().contains(&Section::Migration) {
            try_load_geo_assets_with(&self.client, &self.config.geo_settings()).await
        } else {
            Err(MissingAsset::new(
                "boundary",
                "migration section not selected",
            ))
        };
        if let Err(missing) = &geo {
            tracing::debug!("Boundary unavailable: {}", missing);
        }

        Ok(DashboardInput {
            datasets,
            geo,
            discrepancies,
        })
    }

    async fn transform(&self, input: DashboardInput) -> Result<RenderedDashboard> {
        let sections = self.config.sections();
        let selected = *sections.first().ok_or_else(|| DashError::ConfigValidationError {
            field: "dashboard.sections".to_string(),
            message: "at least one section must be selected".to_string(),
        })?;

        let geo_settings = self.config.geo_settings();
        let settings = RenderSettings {
            age_buckets: self.config.age_buckets(),
            duplicate_policy: geo_settings.duplicate_policy,
            map_view: geo_settings.view,
            discrepancies: input.discrepancies,
        };

        let mut views = Vec::with_capacity(sections.len());
        for section in sections {
            tracing::debug!("Rendering section: {}", section);
            views.push(render_section(section, &input.datasets, &input.geo, &settings)?);
        }

        Ok(RenderedDashboard {
            title: self.config.title().to_string(),
            sections: views,
            selected,
            generated_at: chrono::Local::now(),
        })
    }

    async fn load(&self, dashboard: RenderedDashboard) -> Result<String> {
        let files = self.artifacts(&dashboard)?;
        tracing::debug!("Writing {} files", files.len());

        for (name, data) in &files {
            self.storage.write_file(name, data).await?;
            tracing::debug!("Wrote {} ({} bytes)", name, data.len());
        }

        if let Some(archive) = self.config.archive_name() {
            let zip_data = zip_bundle(&files)?;
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(archive, &zip_data).await?;
            return Ok(format!("{}/{}", self.config.output_path(), archive));
        }

        Ok(self.config.output_path().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AgeBuckets;
    use crate::geo::GeoSettings;
    use crate::render::CalloutKind;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

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

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn names(&self) -> Vec<String> {
            let files = self.files.lock().await;
            let mut names: Vec<String> = files.keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                DashError::IoError(std::io::Error::new(
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
    }

    struct MockConfig {
        sections: Vec<Section>,
        formats: Vec<String>,
        archive: Option<String>,
        geo: GeoSettings,
    }

    impl MockConfig {
        fn new(formats: &[&str]) -> Self {
            Self {
                sections: Section::ALL.to_vec(),
                formats: formats.iter().map(|f| f.to_string()).collect(),
                archive: None,
                geo: GeoSettings::default(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn title(&self) -> &str {
            "Análisis Demográfico"
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn sections(&self) -> Vec<Section> {
            self.sections.clone()
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn archive_name(&self) -> Option<&str> {
            self.archive.as_deref()
        }

        fn geo_settings(&self) -> GeoSettings {
            self.geo.clone()
        }

        fn age_buckets(&self) -> AgeBuckets {
            AgeBuckets::default()
        }
    }

    #[tokio::test]
    async fn test_extract_without_boundary() {
        let pipeline = DashboardPipeline::new(MockStorage::new(), MockConfig::new(&["html"]));
        let input = pipeline.extract().await.unwrap();

        assert!(input.geo.is_err());
        assert_eq!(input.datasets.municipalities().len(), 10);
        assert_eq!(input.discrepancies.len(), 3);
    }

    #[tokio::test]
    async fn test_transform_respects_section_selection() {
        let mut config = MockConfig::new(&["html"]);
        config.sections = vec![Section::Migration, Section::Population];
        let pipeline = DashboardPipeline::new(MockStorage::new(), config);

        let input = pipeline.extract().await.unwrap();
        let dashboard = pipeline.transform(input).await.unwrap();

        assert_eq!(dashboard.selected, Section::Migration);
        assert_eq!(dashboard.sections.len(), 2);
        let migration = dashboard.section(Section::Migration).unwrap();
        assert!(!migration.callouts(CalloutKind::Warning).is_empty());
    }

    #[tokio::test]
    async fn test_transform_rejects_empty_selection() {
        let mut config = MockConfig::new(&["html"]);
        config.sections = Vec::new();
        let pipeline = DashboardPipeline::new(MockStorage::new(), config);

        let input = pipeline.extract().await.unwrap();
        let err = pipeline.transform(input).await.unwrap_err();
        assert!(matches!(err, DashError::ConfigValidationError { .. }));
    }

    #[tokio::test]
    async fn test_load_writes_requested_formats() {
        let storage = MockStorage::new();
        let pipeline = DashboardPipeline::new(storage.clone(), MockConfig::new(&["html", "json"]));

        let input = pipeline.extract().await.unwrap();
        let dashboard = pipeline.transform(input).await.unwrap();
        let output = pipeline.load(dashboard).await.unwrap();

        assert_eq!(output, "test_output");
        assert_eq!(
            storage.names().await,
            vec![
                "index.html",
                "sections/fecundidad.json",
                "sections/migracion.json",
                "sections/mortalidad.json",
                "sections/poblacion.json",
            ]
        );

        let html = String::from_utf8(storage.get_file("index.html").await.unwrap()).unwrap();
        assert!(html.contains("No se pudo cargar el mapa"));

        let json = storage.get_file("sections/poblacion.json").await.unwrap();
        let view: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(view["section"], "poblacion");
        assert_eq!(view["blocks"][0]["type"], "subheader");
    }

    #[tokio::test]
    async fn test_load_csv_and_archive() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new(&["csv"]);
        config.sections = vec![Section::Mortality];
        config.archive = Some("dashboard.zip".to_string());
        let pipeline = DashboardPipeline::new(storage.clone(), config);

        let input = pipeline.extract().await.unwrap();
        let dashboard = pipeline.transform(input).await.unwrap();
        let output = pipeline.load(dashboard).await.unwrap();

        assert_eq!(output, "test_output/dashboard.zip");
        let csv = storage.get_file("tables/mortalidad/tbm.csv").await.unwrap();
        let csv = String::from_utf8(csv).unwrap();
        assert!(csv.starts_with("Indicador,Hombres,Mujeres,Total"));

        let zip_data = storage.get_file("dashboard.zip").await.unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        assert!(archive.file_names().any(|n| n == "tables/mortalidad/causas_mortalidad.csv"));
        assert!(archive.file_names().all(|n| n.ends_with(".csv")));
    }
}
