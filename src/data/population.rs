//! Censo 2018 — población por grupos quinquenales, asentamientos e indicadores oficiales.

use crate::domain::model::{AgeGroupRow, Indicator, SettlementRow};

/// 彙總列的標籤
pub const TOTAL_LABEL: &str = "Total";

pub fn age_groups() -> Vec<AgeGroupRow> {
    // (edad, total, hombres, mujeres)
    const ROWS: [(&str, i64, i64, i64); 19] = [
        (TOTAL_LABEL, 5974788, 2885383, 3089405),
        ("0 a 4", 345333, 176817, 168516),
        ("5 a 9", 381885, 195622, 186263),
        ("10 a 14", 450754, 230481, 220273),
        ("15 a 19", 498542, 254659, 243883),
        ("20 a 24", 541149, 272044, 269105),
        ("25 a 29", 525871, 262798, 263073),
        ("30 a 34", 473849, 234582, 239267),
        ("35 a 39", 449108, 217593, 231515),
        ("40 a 44", 367163, 172252, 194911),
        ("45 a 49", 364200, 167730, 196470),
        ("50 a 54", 382513, 174935, 207578),
        ("55 a 59", 339892, 153994, 185898),
        ("60 a 64", 271563, 121372, 150191),
        ("65 a 69", 204426, 90607, 113819),
        ("70 a 74", 145598, 63813, 81785),
        ("75 a 79", 102126, 44037, 58089),
        ("80 a 84", 67557, 27764, 39793),
        ("85 y más", 63259, 24283, 38976),
    ];

    ROWS.iter()
        .map(|&(band, total, male, female)| AgeGroupRow::new(band, total, male, female))
        .collect()
}

pub fn settlements() -> Vec<SettlementRow> {
    [
        ("Cabecera Urbana", 4779570),
        ("Centros Poblados", 331657),
        ("Rural Disperso", 863561),
    ]
    .into_iter()
    .map(|(settlement, total)| SettlementRow {
        settlement: settlement.to_string(),
        total,
    })
    .collect()
}

pub fn surface_indicators() -> Vec<Indicator> {
    vec![
        Indicator::new("Superficie del Departamento (km²)", "63.612"),
        Indicator::new(
            "Densidad poblacional en el departamento de Antioquia años 2018",
            "93,9 hab/km²",
        ),
    ]
}

pub fn dependency_indicators() -> Vec<Indicator> {
    vec![
        Indicator::new("Índice de dependencia total", "51,56"),
        Indicator::new("Índice de dependencia juvenil", "29,88"),
        Indicator::new("Índice de dependencia senil", "21,68"),
        Indicator::new("Índice de envejecimiento", "72,54"),
        Indicator::new("Índice de masculinidad", "93,40"),
    ]
}
