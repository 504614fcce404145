use crate::analysis::{bucket_sums, population_shares, settlement_shares};
use crate::chart::{
    palette, ArcEncoding, ChartKind, ChartSpec, Field, LineEncoding, PyramidEncoding,
};
use crate::data::{population, Datasets};
use crate::domain::model::Indicator;
use crate::domain::section::Section;
use crate::domain::table::{Cell, Table};
use crate::render::view::{CalloutKind, SectionView};
use crate::render::{push_discrepancies, RenderSettings};
use crate::utils::error::{DashError, Result};
use crate::utils::format::thousands;

pub fn shares_table(data: &Datasets, total_population: i64) -> Table {
    let mut table = Table::new(
        "poblacion_quinquenal",
        "Cuadro de población por grupos quinquenales (2018)",
        &["Edad", "Total", "Hombres", "Mujeres", "% Total", "% Hombres", "% Mujeres"],
    );
    for row in population_shares(&data.age_groups, total_population) {
        table.push_row(vec![
            row.label.into(),
            row.total.into(),
            row.male.into(),
            row.female.into(),
            row.pct_total.into(),
            row.pct_male.into(),
            row.pct_female.into(),
        ]);
    }
    table
}

fn pyramid_spec() -> ChartSpec {
    ChartSpec::new(
        "piramide_poblacional",
        "Pirámide Poblacional - Antioquia (2018)",
        500,
        500,
        ChartKind::Pyramid(PyramidEncoding {
            category: "Edad".into(),
            left: Field::new("% Hombres"),
            right: Field::new("% Mujeres"),
            left_color: palette::MALE.into(),
            right_color: palette::FEMALE.into(),
        }),
    )
}

fn distribution_spec() -> ChartSpec {
    ChartSpec::new(
        "distribucion_edad",
        "Distribución porcentual por edad (2018)",
        520,
        300,
        ChartKind::Line(LineEncoding {
            x: Field::titled("Edad", "Grupo de edad"),
            y: Field::titled("% Total", "% del total poblacional"),
            color: None,
            stroke: Some(palette::TOTAL.into()),
            stroke_width: None,
            log_domain: None,
            y_domain: None,
            legend_labels: None,
            tooltip: vec!["Edad".into(), "% Total".into()],
        }),
    )
}

fn settlement_pie_spec() -> ChartSpec {
    ChartSpec::new(
        "asentamientos",
        "Distribución por Asentamiento (2018)",
        300,
        300,
        ChartKind::Arc(ArcEncoding {
            theta: "Total".into(),
            color: "Asentamiento".into(),
            tooltip: vec!["Asentamiento".into(), Field::new("Total").format(","), "%".into()],
        }),
    )
}

fn bullets_from(indicators: &[Indicator]) -> Vec<String> {
    indicators
        .iter()
        .map(|i| format!("{}: **{}**", i.label, i.value))
        .collect()
}

pub fn render(data: &Datasets, settings: &RenderSettings) -> Result<SectionView> {
    let total_population = data
        .total_population()
        .ok_or_else(|| DashError::DataInconsistency {
            table: "poblacion".to_string(),
            message: format!("missing '{}' row", population::TOTAL_LABEL),
        })?;

    let mut view = SectionView::new(
        Section::Population,
        "📊 Datos Demográficos - Censo 2018 (Antioquia) - Indicadores Departamentales",
    );

    let table = shares_table(data, total_population);
    view.subheader("📋 Cuadro de población por grupos quinquenales (2018)")
        .table(table.clone());
    push_discrepancies(&mut view, settings);
    view.divider();

    let bands = table.without_label(population::TOTAL_LABEL);
    view.subheader("🧭 Visualizaciones");
    view.chart(&bands, &pyramid_spec())?;
    view.chart(&bands, &distribution_spec())?;

    let sums = bucket_sums(&data.age_groups, &settings.age_buckets);
    view.subheader("📘 Resumen Poblacional (Censo 2018)")
        .metrics(vec![Indicator::new(
            "Población total (Censo 2018)",
            &thousands(total_population),
        )])
        .bullets([
            format!("Población 0–14 años: **{}**", thousands(sums.youth)),
            format!("Población 15–64 años: **{}**", thousands(sums.working)),
            format!("Población 65 años y más: **{}**", thousands(sums.elderly)),
        ]);
    if !sums.unmatched.is_empty() {
        view.callout(
            CalloutKind::Warning,
            format!(
                "Grupos de edad sin coincidencia en la tabla: {}",
                sums.unmatched.join(", ")
            ),
        );
    }
    view.divider();

    view.subheader("🧮 Indicadores Demográficos Oficiales (Censo 2018)")
        .paragraph("**Superficie y densidad poblacional**")
        .bullets(bullets_from(&population::surface_indicators()))
        .divider()
        .paragraph("**Índices de Dependencia (ET - 2018)**")
        .bullets(bullets_from(&population::dependency_indicators()))
        .divider();

    let mut areas = Table::new(
        "asentamientos",
        "Distribución por tipo de asentamiento (2018)",
        &["Asentamiento", "Total", "%"],
    );
    for (settlement, total, pct) in settlement_shares(&data.settlements, total_population) {
        areas.push_row(vec![settlement.into(), total.into(), Cell::Float(pct)]);
    }
    view.subheader("🏙️ Distribución por tipo de asentamiento (2018)")
        .table(areas.clone());
    view.chart(&areas, &settlement_pie_spec())?;

    Ok(view)
}
