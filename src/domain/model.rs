use serde::{Deserialize, Serialize};

/// 五歲組人口（男、女、合計）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeGroupRow {
    pub age_band: String,
    pub male: i64,
    pub female: i64,
    pub total: i64,
}

impl AgeGroupRow {
    pub fn new(age_band: &str, total: i64, male: i64, female: i64) -> Self {
        Self {
            age_band: age_band.to_string(),
            male,
            female,
            total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRow {
    pub settlement: String,
    pub total: i64,
}

/// 粗死亡率表的一列，`Indicador` 為列名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SexBreakdownRow {
    pub indicator: String,
    pub male: f64,
    pub female: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountRow {
    pub indicator: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CauseOfDeathRow {
    pub cause: String,
    pub short_label: String,
    pub total: i64,
    pub percent: f64,
    pub rate: f64,
}

/// 以年齡組為鍵的單一數值（出生數、TEF、TNR ...）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeValueRow {
    pub age_band: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FemalePopulationRow {
    pub age_band: String,
    pub mid_year_population: i64,
    pub class_mark: f64,
    pub survivors_nlx: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FemaleBirthsRow {
    pub age_band: String,
    pub births: i64,
    pub female_fertility_rate: Option<f64>,
}

/// 單一指標卡：標籤、顯示值、說明
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub label: String,
    pub value: String,
    pub help: Option<String>,
}

impl Indicator {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }
}

/// 2015-2020 各市鎮遷移指標
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalityMigrationRow {
    pub name: String,
    pub population_2020: i64,
    pub population_2015: i64,
    pub non_migrants: i64,
    pub immigrants: i64,
    pub emigrants: i64,
    pub net_migration: i64,
    pub gross_migration: i64,
    pub mean_population: f64,
    pub immigration_rate: f64,
    pub emigration_rate: f64,
    pub net_rate: f64,
    pub migration_efficacy_index: f64,
}

/// 遷移對男性比例指數的影響
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasculinityEffectRow {
    pub municipality: String,
    pub total_am: f64,
    pub factual: f64,
    pub counterfactual: f64,
    pub non_migrant: f64,
    pub absolute_net_effect: f64,
    pub relative_net_effect: f64,
    pub relative_immigration_diff: f64,
    pub relative_emigration_diff: f64,
}

/// 邊界資料中的一個多邊形
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonRecord {
    /// 原始名稱（未正規化）
    pub name: String,
    /// GeoJSON geometry 物件
    pub geometry: serde_json::Value,
    pub properties: serde_json::Map<String, serde_json::Value>,
    /// (lat, lon)
    pub centroid: Option<(f64, f64)>,
}

/// 發佈數據與推導值不一致的紀錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub table: String,
    pub row: String,
    pub field: String,
    pub published: f64,
    pub expected: f64,
}

impl std::fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}: {} publicado {} ≠ calculado {}",
            self.table, self.row, self.field, self.published, self.expected
        )
    }
}
