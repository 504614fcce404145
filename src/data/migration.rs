//! Migración Valle de Aburrá 2015-2020 y efecto sobre el índice de masculinidad.

use crate::domain::model::{Indicator, MasculinityEffectRow, MunicipalityMigrationRow};

pub const TOTAL_LABEL: &str = "TOTAL";

pub fn municipalities() -> Vec<MunicipalityMigrationRow> {
    // nombre, pob 2020, pob 2015, no migrantes, inmigrantes, emigrantes, neta, bruta,
    // pob media, tasa inm., tasa em., tasa neta, índice de eficacia
    #[allow(clippy::type_complexity)]
    const ROWS: [(&str, i64, i64, i64, i64, i64, i64, i64, f64, f64, f64, f64, f64); 11] = [
        (TOTAL_LABEL, 2580420, 3396101, 2472125, 108295, 108295, 0, 216590, 2988262.0, 7.248026776, 7.248025776, 0.0, 0.0),
        ("MEDELLÍN", 540095, 216148, 522749, 17346, 19438, -2092, 36784, 1350781.5, 2.87, 2.88, -0.31, -5.69),
        ("BARBOSA", 102045, 41735, 100026, 2019, 2540, -521, 4559, 71890.0, 5.62, 7.07, -1.45, -11.43),
        ("BELLO", 72626, 43384, 61739, 10887, 1308, 9579, 12195, 253237.0, 8.60, 1.03, 7.57, 78.55),
        ("CALDAS", 43362, 70999, 44206, 5156, 1694, 3462, 6850, 60180.5, 17.14, 5.63, 11.51, 50.54),
        ("COPACABANA", 275874, 70714, 264608, 11266, 3070, 8196, 14336, 173309.0, 13.00, 3.54, 9.46, 57.17),
        ("ENVIGADO", 108695, 195836, 108042, 653, 32986, -1943, 33639, 152265.5, 0.86, 4.33, -3.47, -66.93),
        ("GIRARDOTA", 396632, 44810, 389897, 8735, 22741, -14006, 31476, 22171.0, 7.88, 20.51, -12.63, -44.50),
        ("ITAGÜÍ", 78838, 240340, 73319, 5519, 3163, 2366, 8672, 159583.0, 6.92, 3.95, 2.97, 27.28),
        ("LA ESTRELLA", 573234, 62284, 561851, 11383, 40887, -29504, 52270, 317759.0, 7.16, 25.73, -18.57, -56.45),
        ("SABANETA", 381019, 74040, 345688, 35331, 10168, 25163, 45499, 227529.5, 31.06, 8.94, 22.12, 55.30),
    ];

    ROWS.iter()
        .map(
            |&(
                name,
                population_2020,
                population_2015,
                non_migrants,
                immigrants,
                emigrants,
                net_migration,
                gross_migration,
                mean_population,
                immigration_rate,
                emigration_rate,
                net_rate,
                migration_efficacy_index,
            )| MunicipalityMigrationRow {
                name: name.to_string(),
                population_2020,
                population_2015,
                non_migrants,
                immigrants,
                emigrants,
                net_migration,
                gross_migration,
                mean_population,
                immigration_rate,
                emigration_rate,
                net_rate,
                migration_efficacy_index,
            },
        )
        .collect()
}

/// 區域總計指標卡，每欄兩個
pub fn headline_indicators() -> [[Indicator; 2]; 4] {
    [
        [
            Indicator::new("Población 2020", "2,580,420"),
            Indicator::new("Población 2015", "3,396,101"),
        ],
        [
            Indicator::new("Total Inmigrantes", "108,295"),
            Indicator::new("Total Emigrantes", "108,295"),
        ],
        [
            Indicator::new("Migración Neta Total", "0"),
            Indicator::new("Migración Bruta", "216,590"),
        ],
        [
            Indicator::new("Tasa Inmigración", "7,25‰"),
            Indicator::new("Tasa Emigración", "7,25‰"),
        ],
    ]
}

pub fn masculinity_effects() -> Vec<MasculinityEffectRow> {
    // municipio, total AM, F, CF, NM, efecto abs., efecto rel., dif. inm., dif. em.
    const ROWS: [(&str, f64, f64, f64, f64, f64, f64, f64, f64); 10] = [
        ("MEDELLÍN", 87.00, 87.00, 87.06, 86.98, -0.07, -0.076, 0.162, -0.92),
        ("BARBOSA", 97.51, 97.51, 96.56, 97.14, 0.95, 0.981, 3.855, 5.95),
        ("BELLO", 88.98, 88.98, 88.74, 88.83, 0.24, 0.271, 1.613, 1.10),
        ("CALDAS", 91.28, 91.28, 91.04, 91.03, 0.25, 0.269, 2.840, -0.15),
        ("COPACABANA", 92.92, 92.92, 92.09, 92.24, 0.82, 0.894, 7.373, 1.57),
        ("ENVIGADO", 84.26, 84.26, 84.99, 84.59, -0.72, -0.849, -3.857, -4.63),
        ("GIRARDOTA", 94.09, 94.09, 93.54, 93.80, 0.55, 0.586, 3.108, 2.75),
        ("ITAGÜÍ", 88.55, 88.55, 88.38, 88.30, 0.17, 0.197, 2.861, -0.89),
        ("LA ESTRELLA", 93.05, 93.05, 93.02, 93.01, 0.03, 0.031, 0.406, -0.10),
        ("SABANETA", 85.98, 85.98, 87.07, 86.71, -1.09, -1.253, -8.335, -4.19),
    ];

    ROWS.iter()
        .map(
            |&(
                municipality,
                total_am,
                factual,
                counterfactual,
                non_migrant,
                absolute_net_effect,
                relative_net_effect,
                relative_immigration_diff,
                relative_emigration_diff,
            )| MasculinityEffectRow {
                municipality: municipality.to_string(),
                total_am,
                factual,
                counterfactual,
                non_migrant,
                absolute_net_effect,
                relative_net_effect,
                relative_immigration_diff,
                relative_emigration_diff,
            },
        )
        .collect()
}
