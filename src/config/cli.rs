use crate::analysis::AgeBuckets;
use crate::config::{DEFAULT_ARCHIVE, DEFAULT_TITLE};
use crate::core::ConfigProvider;
use crate::domain::section::{parse_sections, Section};
use crate::geo::{DuplicatePolicy, GeoSettings, TextEncoding};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_formats, validate_non_empty_string, validate_path, validate_url_or_path, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "demografia")]
#[command(about = "Static demographic dashboard for the department of Antioquia")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// `all` or a comma separated list of: poblacion, mortalidad, fecundidad, migracion
    #[arg(long, default_value = "all")]
    pub section: String,

    /// Municipal boundary (GeoJSON or .shp with its .dbf), local path or http(s) URL
    #[arg(long)]
    pub boundary: Option<String>,

    #[arg(long, default_value = crate::geo::DEFAULT_NAME_FIELD)]
    pub name_field: String,

    /// auto, utf-8 or latin-1
    #[arg(long, default_value = "auto")]
    pub encoding: TextEncoding,

    /// reject, first-wins or last-wins
    #[arg(long, default_value = "reject")]
    pub duplicate_policy: DuplicatePolicy,

    #[arg(long, value_delimiter = ',', default_value = "html")]
    pub formats: Vec<String>,

    #[arg(long, help = "Bundle every written file into dashboard.zip")]
    pub zip: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl ConfigProvider for CliConfig {
    fn title(&self) -> &str {
        &self.title
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn sections(&self) -> Vec<Section> {
        // validate() 已經擋下無效的 slug
        parse_sections(&self.section).unwrap_or_else(|_| Section::ALL.to_vec())
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn archive_name(&self) -> Option<&str> {
        self.zip.then_some(DEFAULT_ARCHIVE)
    }

    fn geo_settings(&self) -> GeoSettings {
        GeoSettings {
            source: self.boundary.clone(),
            name_field: self.name_field.clone(),
            encoding: self.encoding,
            duplicate_policy: self.duplicate_policy,
            ..GeoSettings::default()
        }
    }

    fn age_buckets(&self) -> AgeBuckets {
        AgeBuckets::default()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("title", &self.title)?;
        validate_path("output_path", &self.output_path)?;
        parse_sections(&self.section)?;
        validate_formats("formats", &self.formats)?;
        validate_non_empty_string("name_field", &self.name_field)?;
        if let Some(boundary) = &self.boundary {
            validate_url_or_path("boundary", boundary)?;
        }
        Ok(())
    }
}
