use crate::chart::{
    BarColor, BarEncoding, ChartKind, ChartSpec, Field, LineEncoding, TreemapEncoding,
};
use crate::data::{mortality, Datasets};
use crate::domain::model::CountRow;
use crate::domain::section::Section;
use crate::domain::table::{Cell, Table};
use crate::render::view::SectionView;
use crate::render::RenderSettings;
use crate::utils::error::Result;

fn crude_rates_table(data: &Datasets) -> Table {
    let mut table = Table::new(
        "tbm",
        "Tasas Bruta de Mortalidad por sexo - Antioquia 2023",
        &["Indicador", "Hombres", "Mujeres", "Total"],
    );
    // 計數列以整數顯示
    let cell = |v: f64| {
        if v.fract() == 0.0 {
            Cell::Int(v as i64)
        } else {
            Cell::Float(v)
        }
    };
    for row in &data.crude_death_rates {
        table.push_row(vec![
            row.indicator.as_str().into(),
            cell(row.male),
            cell(row.female),
            cell(row.total),
        ]);
    }
    table
}

fn age_rates_table(data: &Datasets) -> Table {
    let rates = &data.mortality_rates;
    let mut table = Table::new(
        "tasas_especificas",
        "Tasas Específicas de Mortalidad por Edad y Sexo - 2023",
        &["x", "Hombres", "Mujeres", "Total"],
    );
    for (i, band) in mortality::AGE_BANDS.iter().enumerate() {
        table.push_row(vec![
            (*band).into(),
            rates.male[i].into(),
            rates.female[i].into(),
            rates.total[i].into(),
        ]);
    }
    table
}

fn counts_table(id: &str, title: &str, rows: &[CountRow]) -> Table {
    let mut table = Table::new(id, title, &["Indicador", "Cantidad"]);
    for row in rows {
        table.push_row(vec![row.indicator.as_str().into(), row.count.into()]);
    }
    table
}

fn causes_table(data: &Datasets) -> Table {
    let mut table = Table::new(
        "causas_mortalidad",
        "17 Principales Causas de Mortalidad - Antioquia 2023",
        &["Causa", "Total", "%", "TMxCE", "Causa_corta"],
    );
    for row in &data.causes_of_death {
        table.push_row(vec![
            row.cause.as_str().into(),
            row.total.into(),
            row.percent.into(),
            row.rate.into(),
            row.short_label.as_str().into(),
        ]);
    }
    table
}

fn tbm_bar_spec() -> ChartSpec {
    ChartSpec::new(
        "tbm_sexo",
        "Tasa Bruta de Mortalidad por Sexo 2023",
        400,
        300,
        ChartKind::Bar(BarEncoding {
            horizontal: false,
            category: Field::titled("Sexo", "Sexo"),
            value: Field::titled("TBM", "Tasa Bruta de Mortalidad"),
            color: BarColor::Category {
                field: "Sexo".into(),
                legend: None,
            },
            offset: None,
            sort_by_value: false,
            tooltip: vec!["Sexo".into(), "TBM".into()],
        }),
    )
}

fn age_rates_line_spec() -> ChartSpec {
    ChartSpec::new(
        "tasas_especificas_mx",
        "Tasas específicas de mortalidad de la población del departamento de Antioquia durante el año 2023",
        700,
        450,
        ChartKind::Line(LineEncoding {
            x: Field::titled("x", "Grupos de Edad"),
            y: Field::titled("Tasa_ajustada", "mx"),
            color: Some("Sexo".into()),
            stroke: None,
            stroke_width: Some(3.0),
            log_domain: Some((0.0001, 0.2)),
            y_domain: None,
            legend_labels: Some(vec![
                ("Hombres".into(), "mxH".into()),
                ("Mujeres".into(), "mxM".into()),
                ("Total".into(), "mxT".into()),
            ]),
            tooltip: vec![
                Field::titled("x", "Grupo de Edad"),
                "Sexo".into(),
                Field::titled("Tasa_ajustada", "Tasa (mx)").format(".6f"),
            ],
        }),
    )
}

fn treemap_spec() -> ChartSpec {
    ChartSpec::new(
        "treemap_causas",
        "Distribución de las 17 Principales Causas de Mortalidad",
        800,
        500,
        ChartKind::Treemap(TreemapEncoding {
            label: "Causa_corta".into(),
            value: Field::titled("Total", "Defunciones"),
            tooltip: vec![
                Field::titled("Causa", "Causa"),
                Field::titled("Total", "Defunciones").format(","),
                Field::titled("%", "Porcentaje").format(".2f"),
            ],
        }),
    )
}

pub fn render(data: &Datasets, _settings: &RenderSettings) -> Result<SectionView> {
    let mut view = SectionView::new(
        Section::Mortality,
        "💀 Análisis de Mortalidad - Antioquia 2023",
    );

    // 1. TBM
    let tbm = crude_rates_table(data);
    view.subheader("📊 Tasas Bruta de Mortalidad por sexo - Antioquia 2023")
        .table(tbm.clone())
        .subheader("🔢 Indicadores Generales")
        .metrics(mortality::crude_death_rate_metrics());
    let tbm_long = tbm
        .filter_rows(|row| row.first().and_then(Cell::as_str) == Some("TBM 2023"))
        .melt(&["Indicador"], "Sexo", "TBM")?;
    view.chart(&tbm_long, &tbm_bar_spec())?;
    view.divider();

    // 2. 年齡別死亡率，對數刻度
    let rates = age_rates_table(data);
    let rates_long = rates
        .melt(&["x"], "Sexo", "Tasa")?
        .with_column("Tasa_ajustada", |row| {
            row.get(2)
                .and_then(Cell::as_f64)
                .map(|v| Cell::Float(v / 1000.0))
                .unwrap_or(Cell::Missing)
        });
    view.subheader("📈 Tasas Específicas de Mortalidad por Edad y Sexo - 2023")
        .table(rates);
    view.chart(&rates_long, &age_rates_line_spec())?;
    view.divider();

    // 3. 嬰兒與兒童
    let [infant, child, child_0_4] = mortality::infant_child_metrics();
    view.subheader("👶 Mortalidad Infantil y de la Niñez - Antioquia 2023")
        .paragraph("**Mortalidad Infantil 2023**")
        .table(counts_table(
            "mortalidad_infantil",
            "Mortalidad Infantil 2023",
            &data.infant_mortality,
        ))
        .metrics(vec![infant])
        .paragraph("**Mortalidad de la Niñez 2023**")
        .table(counts_table(
            "mortalidad_ninez",
            "Mortalidad de la Niñez 2023",
            &data.child_mortality,
        ))
        .metrics(vec![child])
        .paragraph("**Mortalidad Niñez (0-4 años) 2023**")
        .table(counts_table(
            "mortalidad_ninez_0_4",
            "Mortalidad Niñez (0-4 años) 2023",
            &data.child_mortality_0_4,
        ))
        .metrics(vec![child_0_4])
        .divider();

    // 4. 死因
    let causes = causes_table(data);
    view.subheader("🏥 17 Principales Causas de Mortalidad - Antioquia 2023")
        .table(causes.select(&["Causa", "Total", "%", "TMxCE"])?)
        .subheader("📊 Resumen")
        .metrics(mortality::summary_metrics())
        .divider()
        .subheader("🗺️ Treemap - Distribución de Causas de Mortalidad");
    view.chart(&causes, &treemap_spec())?;

    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mortality_section_charts() {
        let view = render(&Datasets::antioquia(), &RenderSettings::default()).unwrap();
        let charts: Vec<_> = view.charts().collect();
        assert_eq!(charts.len(), 3);

        // TBM 長表只剩三個性別
        let tbm = charts[0].vega_lite["data"]["values"].as_array().unwrap();
        let sexes: Vec<&str> = tbm.iter().filter_map(|v| v["Sexo"].as_str()).collect();
        assert_eq!(sexes, vec!["Hombres", "Mujeres", "Total"]);
        assert_eq!(tbm[1]["TBM"], 4.87);

        let mx = &charts[1].vega_lite;
        assert_eq!(mx["data"]["values"].as_array().unwrap().len(), 60);
        let first = mx["data"]["values"][0]["Tasa_ajustada"].as_f64().unwrap();
        assert!((first - 0.008424).abs() < 1e-12);
        assert_eq!(mx["encoding"]["y"]["scale"]["type"], "log");

        assert_eq!(charts[2].kind, "treemap");
        assert_eq!(
            charts[2].vega_lite["data"]["values"].as_array().map(Vec::len),
            Some(17)
        );
    }

    #[test]
    fn test_crude_rates_table_keeps_counts_as_integers() {
        let table = crude_rates_table(&Datasets::antioquia());
        assert_eq!(table.cell(0, "Hombres"), Some(&Cell::Int(19585)));
        assert_eq!(table.cell(2, "Total"), Some(&Cell::Float(5.37)));
        assert_eq!(table.cell(1, "Total").map(Cell::display), Some("6,826,125".to_string()));
    }
}
