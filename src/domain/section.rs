use crate::utils::error::DashError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 側邊欄的四個互斥視圖
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "poblacion")]
    Population,
    #[serde(rename = "mortalidad")]
    Mortality,
    #[serde(rename = "fecundidad")]
    Fertility,
    #[serde(rename = "migracion")]
    Migration,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Population,
        Section::Mortality,
        Section::Fertility,
        Section::Migration,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Section::Population => "poblacion",
            Section::Mortality => "mortalidad",
            Section::Fertility => "fecundidad",
            Section::Migration => "migracion",
        }
    }

    /// 側邊欄上的標籤
    pub fn label(&self) -> &'static str {
        match self {
            Section::Population => "📋 Población (2018)",
            Section::Mortality => "💀 Mortalidad (2023)",
            Section::Fertility => "👶 Fecundidad (2023)",
            Section::Migration => "🚶‍♂️ Migración (2018)",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Section {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Section::ALL
            .into_iter()
            .find(|section| section.slug() == wanted)
            .ok_or_else(|| DashError::InvalidConfigValueError {
                field: "section".to_string(),
                value: s.to_string(),
                reason: format!(
                    "Unknown section. Valid sections: all, {}",
                    Section::ALL.map(|s| s.slug()).join(", ")
                ),
            })
    }
}

/// `"all"` 或以逗號分隔的 slug 清單
pub fn parse_sections(value: &str) -> Result<Vec<Section>, DashError> {
    if value.trim().eq_ignore_ascii_case("all") || value.trim().is_empty() {
        return Ok(Section::ALL.to_vec());
    }
    let mut sections = Vec::new();
    for part in value.split(',') {
        let section: Section = part.parse()?;
        if !sections.contains(&section) {
            sections.push(section);
        }
    }
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_section_slugs() {
        assert_eq!("migracion".parse::<Section>().unwrap(), Section::Migration);
        assert_eq!(" Poblacion ".parse::<Section>().unwrap(), Section::Population);
        assert!("economia".parse::<Section>().is_err());
    }

    #[test]
    fn test_parse_sections_list() {
        assert_eq!(parse_sections("all").unwrap(), Section::ALL.to_vec());
        assert_eq!(
            parse_sections("fecundidad,mortalidad,fecundidad").unwrap(),
            vec![Section::Fertility, Section::Mortality]
        );
    }
}
