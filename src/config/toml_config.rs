use crate::analysis::AgeBuckets;
use crate::config::{DEFAULT_ARCHIVE, DEFAULT_TITLE};
use crate::core::ConfigProvider;
use crate::domain::section::{parse_sections, Section};
use crate::geo::{DuplicatePolicy, GeoSettings, MapView, TextEncoding, DEFAULT_NAME_FIELD};
use crate::utils::error::{DashError, Result};
use crate::utils::validation::{
    validate_formats, validate_non_empty_string, validate_path, validate_range,
    validate_url_or_path, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub dashboard: DashboardSection,
    #[serde(default)]
    pub geo: GeoConfig,
    /// 覆寫 0-14 / 15-64 / 65+ 的年齡組標籤
    pub aggregation: Option<AgeBuckets>,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSection {
    pub title: Option<String>,
    /// slug 清單；省略或含 "all" 時輸出全部
    pub sections: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoConfig {
    pub boundary: Option<String>,
    pub name_field: Option<String>,
    pub encoding: Option<TextEncoding>,
    pub duplicate_policy: Option<DuplicatePolicy>,
    pub center: Option<[f64; 2]>,
    pub zoom: Option<u8>,
    pub tiles: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl DashboardConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換 ${VAR}；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashError::ProcessingError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn section_spec(&self) -> String {
        self.dashboard
            .sections
            .as_ref()
            .map(|s| s.join(","))
            .unwrap_or_else(|| "all".to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(title) = &self.dashboard.title {
            validate_non_empty_string("dashboard.title", title)?;
        }
        parse_sections(&self.section_spec())?;

        if let Some(boundary) = &self.geo.boundary {
            validate_url_or_path("geo.boundary", boundary)?;
        }
        if let Some(name_field) = &self.geo.name_field {
            validate_non_empty_string("geo.name_field", name_field)?;
        }
        if let Some(zoom) = self.geo.zoom {
            validate_range("geo.zoom", zoom, 1, 18)?;
        }
        if let Some([lat, lon]) = self.geo.center {
            validate_range("geo.center.lat", lat, -90.0, 90.0)?;
            validate_range("geo.center.lon", lon, -180.0, 180.0)?;
        }

        if let Some(buckets) = &self.aggregation {
            for (field, labels) in [
                ("aggregation.youth", &buckets.youth),
                ("aggregation.working", &buckets.working),
                ("aggregation.elderly", &buckets.elderly),
            ] {
                for label in labels {
                    validate_non_empty_string(field, label)?;
                }
            }
        }

        validate_path("load.output_path", &self.load.output_path)?;
        validate_formats("load.output_formats", &self.load.output_formats)?;
        if let Some(CompressionConfig {
            enabled: true,
            filename: Some(filename),
        }) = &self.load.compression
        {
            validate_path("load.compression.filename", filename)?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for DashboardConfig {
    fn title(&self) -> &str {
        self.dashboard.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn sections(&self) -> Vec<Section> {
        parse_sections(&self.section_spec()).unwrap_or_else(|_| Section::ALL.to_vec())
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn archive_name(&self) -> Option<&str> {
        match &self.load.compression {
            Some(c) if c.enabled => Some(c.filename.as_deref().unwrap_or(DEFAULT_ARCHIVE)),
            _ => None,
        }
    }

    fn geo_settings(&self) -> GeoSettings {
        let defaults = MapView::default();
        GeoSettings {
            source: self.geo.boundary.clone(),
            name_field: self
                .geo
                .name_field
                .clone()
                .unwrap_or_else(|| DEFAULT_NAME_FIELD.to_string()),
            encoding: self.geo.encoding.unwrap_or_default(),
            duplicate_policy: self.geo.duplicate_policy.unwrap_or_default(),
            view: MapView {
                center: self.geo.center.unwrap_or(defaults.center),
                zoom: self.geo.zoom.unwrap_or(defaults.zoom),
                tiles: self.geo.tiles.clone().unwrap_or(defaults.tiles),
                ..defaults
            },
        }
    }

    fn age_buckets(&self) -> AgeBuckets {
        self.aggregation.clone().unwrap_or_default()
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[dashboard]
title = "Antioquia"
sections = ["migracion", "poblacion"]

[geo]
boundary = "data/antioquia.geojson"
encoding = "latin-1"
duplicate_policy = "first-wins"
zoom = 8

[aggregation]
youth = ["0 a 4", "5 a 9"]

[load]
output_path = "./dist"
output_formats = ["html", "csv"]

[load.compression]
enabled = true

[monitoring]
enabled = true
log_level = "debug"
"#;

        let config = DashboardConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());

        assert_eq!(config.title(), "Antioquia");
        assert_eq!(config.sections(), vec![Section::Migration, Section::Population]);
        assert_eq!(config.archive_name(), Some("dashboard.zip"));
        assert!(config.monitoring_enabled());
        assert_eq!(config.log_level(), Some("debug"));

        let geo = config.geo_settings();
        assert_eq!(geo.encoding, TextEncoding::Latin1);
        assert_eq!(geo.duplicate_policy, DuplicatePolicy::FirstWins);
        assert_eq!(geo.view.zoom, 8);
        assert_eq!(geo.view.center, MapView::default().center);
        assert_eq!(geo.name_field, DEFAULT_NAME_FIELD);

        // 未覆寫的分桶保留預設
        let buckets = config.age_buckets();
        assert_eq!(buckets.youth, vec!["0 a 4", "5 a 9"]);
        assert_eq!(buckets.elderly, AgeBuckets::default().elderly);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let toml_content = r#"
[load]
output_path = "./output"
output_formats = ["html"]
"#;

        let config = DashboardConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.title(), DEFAULT_TITLE);
        assert_eq!(config.sections(), Section::ALL.to_vec());
        assert_eq!(config.archive_name(), None);
        assert_eq!(config.geo_settings(), GeoSettings::default());
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DEMOGRAFIA_TEST_BOUNDARY", "https://example.com/mpios.geojson");

        let toml_content = r#"
[geo]
boundary = "${DEMOGRAFIA_TEST_BOUNDARY}"

[load]
output_path = "./output"
output_formats = ["html"]
"#;

        let config = DashboardConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.geo.boundary.as_deref(),
            Some("https://example.com/mpios.geojson")
        );

        std::env::remove_var("DEMOGRAFIA_TEST_BOUNDARY");
    }

    #[test]
    fn test_config_validation() {
        let bad_section = r#"
[dashboard]
sections = ["economia"]

[load]
output_path = "./output"
output_formats = ["html"]
"#;
        let config = DashboardConfig::from_toml_str(bad_section).unwrap();
        assert!(config.validate().is_err());

        let bad_zoom = r#"
[geo]
zoom = 30

[load]
output_path = "./output"
output_formats = ["html"]
"#;
        let config = DashboardConfig::from_toml_str(bad_zoom).unwrap();
        assert!(config.validate().is_err());

        let bad_encoding = r#"
[geo]
encoding = "ebcdic"

[load]
output_path = "./output"
output_formats = ["html"]
"#;
        assert!(DashboardConfig::from_toml_str(bad_encoding).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[dashboard]
title = "file-test"

[load]
output_path = "./output"
output_formats = ["json"]
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = DashboardConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.title(), "file-test");
    }
}
