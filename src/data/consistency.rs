use crate::domain::model::{AgeGroupRow, Discrepancy, MunicipalityMigrationRow};

/// 發佈資料的四捨五入容許誤差
pub const COUNT_TOLERANCE: i64 = 1;
pub const PERCENT_TOLERANCE: f64 = 0.01;

/// 每列 男+女=合計，且各年齡組加總等於彙總列
pub fn check_population_totals(rows: &[AgeGroupRow], total_label: &str) -> Vec<Discrepancy> {
    let mut found = Vec::new();

    for row in rows {
        if row.male + row.female != row.total {
            found.push(Discrepancy {
                table: "poblacion".to_string(),
                row: row.age_band.clone(),
                field: "Total".to_string(),
                published: row.total as f64,
                expected: (row.male + row.female) as f64,
            });
        }
    }

    if let Some(aggregate) = rows.iter().find(|r| r.age_band == total_label) {
        let bands = rows.iter().filter(|r| r.age_band != total_label);
        let (total, male, female) = bands.fold((0, 0, 0), |(t, m, f), r| {
            (t + r.total, m + r.male, f + r.female)
        });
        for (field, published, expected) in [
            ("Total", aggregate.total, total),
            ("Hombres", aggregate.male, male),
            ("Mujeres", aggregate.female, female),
        ] {
            if (published - expected).abs() > COUNT_TOLERANCE {
                found.push(Discrepancy {
                    table: "poblacion".to_string(),
                    row: total_label.to_string(),
                    field: field.to_string(),
                    published: published as f64,
                    expected: expected as f64,
                });
            }
        }
    }

    found
}

/// 淨遷移 = 移入 - 移出；效能指數 = 淨遷移 / 總遷移 × 100
pub fn check_migration_consistency(rows: &[MunicipalityMigrationRow]) -> Vec<Discrepancy> {
    let mut found = Vec::new();

    for row in rows {
        let expected_net = row.immigrants - row.emigrants;
        if (row.net_migration - expected_net).abs() > COUNT_TOLERANCE {
            found.push(Discrepancy {
                table: "migracion".to_string(),
                row: row.name.clone(),
                field: "Migracion_Neta".to_string(),
                published: row.net_migration as f64,
                expected: expected_net as f64,
            });
        }

        let expected_efficacy = if row.gross_migration == 0 {
            0.0
        } else {
            row.net_migration as f64 / row.gross_migration as f64 * 100.0
        };
        if (row.migration_efficacy_index - expected_efficacy).abs() > PERCENT_TOLERANCE {
            found.push(Discrepancy {
                table: "migracion".to_string(),
                row: row.name.clone(),
                field: "Indice_Eficacia_Migratoria".to_string(),
                published: row.migration_efficacy_index,
                expected: crate::utils::format::round_to(expected_efficacy, 2),
            });
        }
    }

    found
}
