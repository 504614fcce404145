//! Fecundidad 2023.

use crate::domain::model::{AgeValueRow, FemaleBirthsRow, FemalePopulationRow, Indicator};

pub const BIRTHS_TOTAL_LABEL: &str = "15-49";
pub const TNR_TOTAL_LABEL: &str = "15-49 TNR";
pub const GIRLS_TOTAL_LABEL: &str = "Nacimientos niñas totales";

fn age_values(rows: &[(&str, f64)]) -> Vec<AgeValueRow> {
    rows.iter()
        .map(|&(age_band, value)| AgeValueRow {
            age_band: age_band.to_string(),
            value,
        })
        .collect()
}

/// 四欄指標卡，每欄兩個
pub fn headline_indicators() -> [[Indicator; 2]; 4] {
    [
        [
            Indicator::new("Tasa Bruta de Natalidad", "8,645754363").with_help("Por 1000 habitantes"),
            Indicator::new("Total Nacimientos", "59,017"),
        ],
        [
            Indicator::new("Tasa General de Fecundidad (TGF)", "32,33")
                .with_help("Por 1000 mujeres en edad fértil"),
            Indicator::new("Población Media 2023", "6,826,125"),
        ],
        [
            Indicator::new("Índice Sintético de Fecundidad (ISF)", "1,06238362")
                .with_help("Hijos por mujer"),
            Indicator::new("Edad Media Materna (EMM)", "29,56884046"),
        ],
        [
            Indicator::new("Tasa Bruta de Reproductividad (TBR)", "0,519450526"),
            Indicator::new("TNR (15-49)", "0,5113291"),
        ],
    ]
}

/// 依母親年齡的出生數，最後一列為 15-49 合計
pub fn births_by_mother_age() -> Vec<AgeValueRow> {
    age_values(&[
        ("15-19", 8575.0),
        ("20-24", 16257.0),
        ("25-29", 15245.0),
        ("30-34", 11134.0),
        ("35-39", 5807.0),
        ("40-44", 1457.0),
        ("45-49", 89.0),
        (BIRTHS_TOTAL_LABEL, 58564.0),
    ])
}

/// TEF，每千名婦女
pub fn age_specific_fertility() -> Vec<AgeValueRow> {
    age_values(&[
        ("15-19", 32.6592017),
        ("20-24", 58.7863052),
        ("25-29", 51.7505923),
        ("30-34", 39.7610196),
        ("35-39", 22.9680022),
        ("40-44", 6.121000029),
        ("45-49", 0.430602796),
    ])
}

pub fn female_population() -> Vec<FemalePopulationRow> {
    const ROWS: [(&str, i64, f64, Option<f64>); 8] = [
        ("15-19", 262560, 17.5, Some(494542.0)),
        ("20-24", 276544, 22.5, Some(493428.0)),
        ("25-29", 294586, 27.5, Some(492189.0)),
        ("30-34", 286023, 32.5, Some(490773.0)),
        ("35-39", 252830, 37.5, Some(488918.0)),
        ("40-44", 238033, 42.5, Some(486260.0)),
        ("45-49", 206687, 47.5, Some(482620.0)),
        (BIRTHS_TOTAL_LABEL, 1811263, 33.0, None),
    ];

    ROWS.iter()
        .map(|&(age_band, mid_year_population, class_mark, survivors_nlx)| FemalePopulationRow {
            age_band: age_band.to_string(),
            mid_year_population,
            class_mark,
            survivors_nlx,
        })
        .collect()
}

pub fn female_births() -> Vec<FemaleBirthsRow> {
    const ROWS: [(&str, i64, Option<f64>); 9] = [
        ("15-19", 4137, Some(15.75639854)),
        ("20-24", 7924, Some(28.65366813)),
        ("25-29", 7470, Some(25.35762053)),
        ("30-34", 5508, Some(19.66981284)),
        ("35-39", 2859, Some(11.30799351)),
        ("40-44", 699, Some(2.936567619)),
        ("45-49", 43, Some(0.208044047)),
        (BIRTHS_TOTAL_LABEL, 28640, None),
        (GIRLS_TOTAL_LABEL, 28862, None),
    ];

    ROWS.iter()
        .map(|&(age_band, births, female_fertility_rate)| FemaleBirthsRow {
            age_band: age_band.to_string(),
            births,
            female_fertility_rate,
        })
        .collect()
}

/// TNR 各年齡組貢獻，最後一列為 15-49 的 TNR
pub fn net_reproduction() -> Vec<AgeValueRow> {
    age_values(&[
        ("15-19", 161.513469),
        ("20-24", 290.068090),
        ("25-29", 254.710723),
        ("30-34", 195.136348),
        ("35-39", 112.294697),
        ("40-44", 29.763974),
        ("45-49", 2.078175),
        (TNR_TOTAL_LABEL, 0.511329),
    ])
}
