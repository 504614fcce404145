use crate::domain::model::{AgeGroupRow, SettlementRow};
use crate::utils::format::round_to;
use serde::Serialize;

/// `value / total × 100`；total 為 0 時回傳 0
pub fn share(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    value / total * 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareRow {
    pub label: String,
    pub total: i64,
    pub male: i64,
    pub female: i64,
    pub pct_total: f64,
    pub pct_male: f64,
    pub pct_female: f64,
}

/// 以彙總列的總人口為分母，結果取兩位小數
pub fn population_shares(rows: &[AgeGroupRow], total_population: i64) -> Vec<ShareRow> {
    let denominator = total_population as f64;
    rows.iter()
        .map(|row| ShareRow {
            label: row.age_band.clone(),
            total: row.total,
            male: row.male,
            female: row.female,
            pct_total: round_to(share(row.total as f64, denominator), 2),
            pct_male: round_to(share(row.male as f64, denominator), 2),
            pct_female: round_to(share(row.female as f64, denominator), 2),
        })
        .collect()
}

/// (asentamiento, total, %)
pub fn settlement_shares(rows: &[SettlementRow], total_population: i64) -> Vec<(String, i64, f64)> {
    rows.iter()
        .map(|row| {
            (
                row.settlement.clone(),
                row.total,
                round_to(share(row.total as f64, total_population as f64), 2),
            )
        })
        .collect()
}
