//! 每個區塊的內容組裝，以及整頁 HTML 輸出。

pub mod fertility;
pub mod html;
pub mod migration;
pub mod mortality;
pub mod population;
pub mod view;

pub use html::{render_html, HtmlOptions};
pub use view::{Block, CalloutKind, SectionView};

use crate::analysis::AgeBuckets;
use crate::data::Datasets;
use crate::domain::model::Discrepancy;
use crate::domain::section::Section;
use crate::geo::{DuplicatePolicy, GeoAvailability, MapView};
use crate::utils::error::Result;
use chrono::{DateTime, Local};
use serde::Serialize;

/// 區塊組裝時需要的設定
#[derive(Debug, Clone, Default)]
pub struct RenderSettings {
    pub age_buckets: AgeBuckets,
    pub duplicate_policy: DuplicatePolicy,
    pub map_view: MapView,
    /// 一致性檢查的結果，依區塊顯示為警告
    pub discrepancies: Vec<Discrepancy>,
}

/// 完成組裝、等待輸出的儀表板
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDashboard {
    pub title: String,
    pub sections: Vec<SectionView>,
    /// 初始顯示的區塊
    pub selected: Section,
    pub generated_at: DateTime<Local>,
}

impl RenderedDashboard {
    pub fn section(&self, section: Section) -> Option<&SectionView> {
        self.sections.iter().find(|s| s.section == section)
    }
}

/// 單一區塊的內容。選擇哪個區塊由呼叫端決定。
pub fn render_section(
    section: Section,
    data: &Datasets,
    geo: &GeoAvailability,
    settings: &RenderSettings,
) -> Result<SectionView> {
    let view = match section {
        Section::Population => population::render(data, settings)?,
        Section::Mortality => mortality::render(data, settings)?,
        Section::Fertility => fertility::render(data, settings)?,
        Section::Migration => migration::render(data, geo, settings)?,
    };
    tracing::debug!(
        "Rendered section '{}' with {} blocks",
        section.slug(),
        view.blocks.len()
    );
    Ok(view)
}

pub(crate) fn push_discrepancies(view: &mut SectionView, settings: &RenderSettings) {
    let flagged: Vec<String> = settings
        .discrepancies
        .iter()
        .filter(|d| d.table == view.section.slug())
        .map(|d| d.to_string())
        .collect();
    if !flagged.is_empty() {
        view.callout(
            CalloutKind::Warning,
            format!(
                "Valores publicados que no coinciden con su definición:\n- {}",
                flagged.join("\n- ")
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::MissingAsset;

    #[test]
    fn test_every_section_renders_without_maps() {
        let data = Datasets::antioquia();
        let geo: GeoAvailability = Err(MissingAsset::new("boundary", "not configured"));
        let settings = RenderSettings::default();

        for section in Section::ALL {
            let view = render_section(section, &data, &geo, &settings).unwrap();
            assert_eq!(view.section, section);
            assert!(!view.blocks.is_empty());
        }
    }

    #[test]
    fn test_only_migration_reports_missing_maps() {
        let data = Datasets::antioquia();
        let geo: GeoAvailability = Err(MissingAsset::new("boundary", "not configured"));
        let settings = RenderSettings::default();

        for section in Section::ALL {
            let view = render_section(section, &data, &geo, &settings).unwrap();
            let errors = view.callouts(CalloutKind::Error);
            let has_map_error = errors.iter().any(|e| e.starts_with("No se pudo cargar el mapa"));
            assert_eq!(has_map_error, section == Section::Migration, "{}", section);
        }
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let data = Datasets::antioquia();
        let geo: GeoAvailability = Err(MissingAsset::new("boundary", "not configured"));
        let settings = RenderSettings::default();

        let a = render_section(Section::Migration, &data, &geo, &settings).unwrap();
        let b = render_section(Section::Migration, &data, &geo, &settings).unwrap();
        assert_eq!(a, b);
    }
}
