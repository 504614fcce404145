use crate::analysis::{top_n_by, Order};
use crate::chart::{palette, BarColor, BarEncoding, ChartKind, ChartSpec, Field, LineEncoding};
use crate::data::{fertility, Datasets};
use crate::domain::model::AgeValueRow;
use crate::domain::section::Section;
use crate::domain::table::{Cell, Table};
use crate::render::view::{CalloutKind, SectionView};
use crate::render::RenderSettings;
use crate::utils::error::{DashError, Result};
use crate::utils::format::decimal_comma;

const AGE_COLUMN: &str = "Grupos de edad";

fn age_value_table(id: &str, title: &str, value_column: &str, rows: &[AgeValueRow]) -> Table {
    let mut table = Table::new(id, title, &[AGE_COLUMN, value_column]);
    for row in rows {
        let value = if row.value.fract() == 0.0 {
            Cell::Int(row.value as i64)
        } else {
            Cell::Float(row.value)
        };
        table.push_row(vec![row.age_band.as_str().into(), value]);
    }
    table
}

fn female_population_table(data: &Datasets) -> Table {
    let mut table = Table::new(
        "poblacion_mujeres",
        "Población Media de Mujeres",
        &[AGE_COLUMN, "30.06.2023", "Marca de Clase", "nLx"],
    );
    for row in &data.female_population {
        table.push_row(vec![
            row.age_band.as_str().into(),
            row.mid_year_population.into(),
            row.class_mark.into(),
            row.survivors_nlx.into(),
        ]);
    }
    table
}

fn female_births_table(data: &Datasets) -> Table {
    let mut table = Table::new(
        "nacimientos_ninas",
        "Población Nacimientos Niñas",
        &[AGE_COLUMN, "Población/Nacimientos", "TEFm"],
    );
    for row in &data.female_births {
        table.push_row(vec![
            row.age_band.as_str().into(),
            row.births.into(),
            row.female_fertility_rate.into(),
        ]);
    }
    table
}

fn single_bar(id: &str, title: &str, value: Field, color: &str, height: u32) -> ChartSpec {
    let mut tooltip = Field::new(&value.name);
    tooltip.format = value.format.clone();
    ChartSpec::new(
        id,
        title,
        500,
        height,
        ChartKind::Bar(BarEncoding {
            horizontal: false,
            category: Field::titled(AGE_COLUMN, "Edad de la Madre"),
            value,
            color: BarColor::Fixed(color.to_string()),
            offset: None,
            sort_by_value: false,
            tooltip: vec![AGE_COLUMN.into(), tooltip],
        }),
    )
}

fn tef_line_spec() -> ChartSpec {
    ChartSpec::new(
        "tef",
        "Tasa Específica de Fecundidad (TEF) por Edad",
        500,
        400,
        ChartKind::Line(LineEncoding {
            x: Field::titled(AGE_COLUMN, "Grupo de Edad"),
            y: Field::titled("TEF", "TEF (por 1000 mujeres)"),
            color: None,
            stroke: Some(palette::TOTAL.into()),
            stroke_width: Some(3.0),
            log_domain: None,
            y_domain: Some((0.0, 70.0)),
            legend_labels: None,
            tooltip: vec![AGE_COLUMN.into(), Field::new("TEF").format(".2f")],
        }),
    )
}

/// 由 TEF 推導的觀察：最高峰、次高峰、青少年生育率
fn tef_observations(rates: &[AgeValueRow]) -> Result<Vec<String>> {
    let peaks = top_n_by(rates, 2, |r| r.value, Order::Descending);
    let (peak, second) = match peaks.as_slice() {
        [peak, second] => (*peak, *second),
        _ => {
            return Err(DashError::DataInconsistency {
                table: "fecundidad".to_string(),
                message: "at least two fertility rates are required".to_string(),
            })
        }
    };
    let adolescent = rates.first().ok_or_else(|| DashError::DataInconsistency {
        table: "fecundidad".to_string(),
        message: "empty fertility rate table".to_string(),
    })?;

    Ok(vec![
        format!(
            "**Pico de fecundidad:** {} años ({} por 1000)",
            peak.age_band,
            decimal_comma(peak.value, 2)
        ),
        format!(
            "**Segundo pico:** {} años ({} por 1000)",
            second.age_band,
            decimal_comma(second.value, 2)
        ),
        format!(
            "**Fecundidad adolescente:** {} por 1000 ({} años)",
            decimal_comma(adolescent.value, 2),
            adolescent.age_band
        ),
        "**Descenso marcado:** A partir de los 30 años".to_string(),
    ])
}

pub fn render(data: &Datasets, _settings: &RenderSettings) -> Result<SectionView> {
    let mut view = SectionView::new(
        Section::Fertility,
        "👶 Análisis de Fecundidad - Antioquia 2023",
    );

    view.subheader("📊 Indicadores Generales de Fecundidad")
        .metric_columns(
            fertility::headline_indicators()
                .into_iter()
                .map(|column| column.to_vec())
                .collect(),
        )
        .divider();

    // 出生數
    let births = age_value_table(
        "nacimientos_edad_madre",
        "Nacimientos Ocurridos según Edad de la Madre - 2023",
        "Total",
        &data.births_by_mother_age,
    );
    view.subheader("👩‍👧 Nacimientos Ocurridos según Edad de la Madre - 2023")
        .table(births.clone());
    view.chart(
        &births.filter_rows(|r| r.first().and_then(Cell::as_str) != Some(fertility::BIRTHS_TOTAL_LABEL)),
        &single_bar(
            "nacimientos",
            "Distribución de Nacimientos por Edad de la Madre",
            Field::titled("Total", "Número de Nacimientos"),
            palette::FEMALE,
            300,
        ),
    )?;
    view.divider();

    // TEF
    let tef = age_value_table(
        "tef",
        "Tasas Específicas de Fecundidad por Edad - 2023",
        "TEF",
        &data.age_specific_fertility,
    );
    view.subheader("📈 Tasas Específicas de Fecundidad por Edad - 2023")
        .table(tef.clone())
        .subheader("🔍 Observaciones")
        .bullets(tef_observations(&data.age_specific_fertility)?);
    view.chart(&tef, &tef_line_spec())?;
    view.divider();

    view.subheader("👩 Población Media de Mujeres en Edad Fértil - 2023")
        .paragraph("**Población Media de Mujeres**")
        .table(female_population_table(data))
        .paragraph("**Población Nacimientos Niñas**")
        .table(female_births_table(data))
        .divider();

    // TNR
    let tnr = age_value_table(
        "tnr",
        "Tasa Neta de Reproducción por Grupos de Edad",
        "TNR",
        &data.net_reproduction,
    );
    let tnr_total = data
        .net_reproduction
        .iter()
        .find(|r| r.age_band == fertility::TNR_TOTAL_LABEL)
        .map(|r| r.value)
        .ok_or_else(|| DashError::DataInconsistency {
            table: "fecundidad".to_string(),
            message: format!("missing '{}' row", fertility::TNR_TOTAL_LABEL),
        })?;
    let trend = if tnr_total < 1.0 { "decrecer" } else { "crecer" };
    view.subheader("🔄 Tasa Neta de Reproducción por Grupos de Edad")
        .table(tnr.clone())
        .subheader("📌 Interpretación TNR")
        .callout(
            CalloutKind::Info,
            format!(
                "**TNR = {}** indica que cada mujer está siendo reemplazada por aproximadamente {} hijas, lo que significa que la población tiende a **{}** en el largo plazo.",
                decimal_comma(tnr_total, 3),
                decimal_comma(tnr_total, 2),
                trend
            ),
        );
    view.chart(
        &tnr.without_label(fertility::TNR_TOTAL_LABEL),
        &single_bar(
            "tnr",
            "Tasa Neta de Reproducción por Edad",
            Field::titled("TNR", "Tasa Neta de Reproducción").format(".2f"),
            palette::MALE,
            350,
        ),
    )?;
    view.divider();

    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::view::Block;

    #[test]
    fn test_tef_observations() {
        let bullets = tef_observations(&fertility::age_specific_fertility()).unwrap();
        assert_eq!(bullets[0], "**Pico de fecundidad:** 20-24 años (58,79 por 1000)");
        assert_eq!(bullets[1], "**Segundo pico:** 25-29 años (51,75 por 1000)");
        assert_eq!(bullets[2], "**Fecundidad adolescente:** 32,66 por 1000 (15-19 años)");
    }

    #[test]
    fn test_fertility_section() {
        let view = render(&Datasets::antioquia(), &RenderSettings::default()).unwrap();

        let first_metrics = view.blocks.iter().find_map(|b| match b {
            Block::Metrics { columns } => Some(columns),
            _ => None,
        });
        assert_eq!(first_metrics.map(|c| c.len()), Some(4));

        let info = view.callouts(CalloutKind::Info);
        assert!(info[0].starts_with("**TNR = 0,511**"));
        assert!(info[0].contains("**decrecer**"));

        // 長條圖不含彙總列
        let charts: Vec<_> = view.charts().collect();
        assert_eq!(charts.len(), 3);
        assert_eq!(charts[0].vega_lite["data"]["values"].as_array().unwrap().len(), 7);
        assert_eq!(charts[2].vega_lite["data"]["values"].as_array().unwrap().len(), 7);

        let nlx = view
            .tables()
            .find(|t| t.id == "poblacion_mujeres")
            .and_then(|t| t.cell(7, "nLx"))
            .cloned();
        assert_eq!(nlx, Some(Cell::Missing));
    }
}
