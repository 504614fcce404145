//! Mortalidad 2023.

use crate::domain::model::{CauseOfDeathRow, CountRow, Indicator, SexBreakdownRow};
use serde::Serialize;

pub const AGE_BANDS: [&str; 20] = [
    "0", "1", "2-4", "5-9", "10-14", "15-19", "20-24", "25-29", "30-34", "35-39", "40-44",
    "45-49", "50-54", "55-59", "60-64", "65-69", "70-74", "75-79", "80-84", "85 y más",
];

/// 各年齡組死亡率（每千人）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeSpecificRates {
    pub male: [f64; 20],
    pub female: [f64; 20],
    pub total: [f64; 20],
}

pub fn crude_death_rates() -> Vec<SexBreakdownRow> {
    [
        ("Defunciones 2023", 19585.0, 17093.0, 36680.0),
        ("Población 2023", 3314221.0, 3511904.0, 6826125.0),
        ("TBM 2023", 5.91, 4.87, 5.37),
    ]
    .into_iter()
    .map(|(indicator, male, female, total)| SexBreakdownRow {
        indicator: indicator.to_string(),
        male,
        female,
        total,
    })
    .collect()
}

pub fn crude_death_rate_metrics() -> Vec<Indicator> {
    vec![
        Indicator::new("TBM Hombres", "5,91"),
        Indicator::new("TBM Mujeres", "4,87"),
        Indicator::new("TBM Total", "5,37"),
    ]
}

pub fn age_specific_rates() -> AgeSpecificRates {
    AgeSpecificRates {
        male: [
            8.424, 0.683, 0.360, 0.187, 0.255, 1.171, 2.047, 2.007, 2.126, 2.135, 2.600, 2.864,
            4.005, 6.207, 10.211, 16.358, 26.037, 41.618, 65.534, 143.943,
        ],
        female: [
            7.172, 0.526, 0.240, 0.127, 0.187, 0.388, 0.513, 0.492, 0.661, 0.854, 1.328, 1.679,
            2.456, 3.979, 5.701, 9.181, 14.737, 26.917, 48.514, 132.142,
        ],
        total: [
            7.812, 0.607, 0.302, 0.158, 0.222, 0.788, 1.289, 1.282, 1.396, 1.487, 1.942, 2.235,
            3.172, 4.996, 7.722, 12.310, 19.583, 33.096, 55.457, 136.565,
        ],
    }
}

fn counts(rows: &[(&str, i64)]) -> Vec<CountRow> {
    rows.iter()
        .map(|&(indicator, count)| CountRow {
            indicator: indicator.to_string(),
            count,
        })
        .collect()
}

pub fn infant_mortality() -> Vec<CountRow> {
    counts(&[("Menores 1 año", 461), ("Nacimientos", 59017)])
}

pub fn child_mortality() -> Vec<CountRow> {
    counts(&[("Menores 5 años", 593), ("Nacimientos", 59017)])
}

pub fn child_mortality_0_4() -> Vec<CountRow> {
    counts(&[("Menores 5 años", 593), ("Pob 0 a 4 años", 435379)])
}

pub fn causes_of_death() -> Vec<CauseOfDeathRow> {
    const ROWS: [(&str, &str, i64, f64, f64); 17] = [
        ("303 Enfermedades isquémicas del corazón", "Isquémicas corazón", 5511, 15.02, 0.807339),
        (
            "605 Enfermedades crónicas de las vías respiratorias inferiores",
            "Vías resp. inferiores",
            3679,
            7.30,
            0.392463,
        ),
        ("307 Enfermedades cerebrovasculares", "Cerebrovasculares", 2095, 5.71, 0.306909),
        (
            "3 Tumor maligno de los órganos digestivos y del peritoneo, excepto estómago y colon",
            "Tumor órg. digestivos",
            1506,
            4.11,
            0.220623,
        ),
        ("302 Enfermedades hipertensivas", "Hipertensivas", 1477, 4.03, 0.216375),
        ("512 Agresiones (homicidios)", "Homicidios", 1393, 3.80, 0.204069),
        ("108 Infecciones respiratorias agudas", "Infecciones respiratorias", 1305, 3.56, 0.191177),
        ("609 Resto de enfermedades del sistema digestivo", "Sistema digestivo", 1292, 3.52, 0.189273),
        (
            "604 Enfermedades del sistema nervioso, excepto meningitis",
            "Sistema nervioso",
            1267,
            3.45,
            0.185610,
        ),
        (
            "204 Tumor maligno de la tráquea, los bronquios y el pulmón",
            "Tumor tráquea/bronquios",
            1167,
            3.18,
            0.170961,
        ),
        (
            "214 Tumores malignos de otras localizaciones y de las no especificadas",
            "Tumores otros",
            1067,
            2.91,
            0.156311,
        ),
        ("610 Enfermedades del sistema urinario", "Sistema urinario", 1014, 2.76, 0.148547),
        ("614 Resto de las enfermedades", "Resto enfermedades", 942, 2.57, 0.137999),
        ("501 Accidentes de transporte terrestre", "Accidentes tránsito", 923, 2.53, 0.136095),
        (
            "Cardiovascular, enfermedad reumática crónica del corazón, pulmonar y otras formas de enferme",
            "Cardiovascular otras",
            885,
            2.41,
            0.129649,
        ),
        ("601 Diabetes mellitus", "Diabetes mellitus", 748, 2.04, 0.109579),
        ("201 Tumor maligno del estómago", "Tumor estómago", 700, 1.91, 0.102547),
    ];

    ROWS.iter()
        .map(|&(cause, short_label, total, percent, rate)| CauseOfDeathRow {
            cause: cause.to_string(),
            short_label: short_label.to_string(),
            total,
            percent,
            rate,
        })
        .collect()
}

pub fn summary_metrics() -> Vec<Indicator> {
    vec![
        Indicator::new("Total Defunciones", "36,680"),
        Indicator::new("Total Población", "6,826,125"),
        Indicator::new("Causa Principal", "15,02").with_help("Enfermedades isquémicas del corazón"),
    ]
}

/// 嬰兒與兒童死亡率，順序對應三個計數表
pub fn infant_child_metrics() -> [Indicator; 3] {
    [
        Indicator::new("TMI 2023", "7,81").with_help("Tasa de Mortalidad Infantil"),
        Indicator::new("TN 2023", "10,05").with_help("Tasa de Mortalidad de la Niñez"),
        Indicator::new("TN 2023", "1,36").with_help("Tasa de Mortalidad de la Niñez"),
    ]
}
