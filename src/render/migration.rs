use crate::analysis::{arg_max_by, arg_min_by, count_where, top_n_by, Order};
use crate::chart::{palette, BarColor, BarEncoding, ChartKind, ChartSpec, Field};
use crate::data::{migration, Datasets};
use crate::domain::model::{MasculinityEffectRow, MunicipalityMigrationRow};
use crate::domain::section::Section;
use crate::domain::table::{Cell, Table};
use crate::geo::{choropleth, join, ChoroplethSpec, GeoAvailability};
use crate::render::view::{CalloutKind, SectionView};
use crate::render::{push_discrepancies, RenderSettings};
use crate::utils::error::{DashError, Result};
use crate::utils::format::{fixed, signed};

const MIGRATION_COLUMNS: [&str; 13] = [
    "Municipio",
    "Poblacion_2020",
    "Poblacion_2015",
    "No_migrantes",
    "Inmigrantes",
    "Emigrantes",
    "Migracion_Neta",
    "Migracion_Bruta",
    "Poblacion_Media",
    "Tasa_Inmigracion",
    "Tasa_Emigracion",
    "Tasa_migracion",
    "Indice_Eficacia_Migratoria",
];

fn migration_row(row: &MunicipalityMigrationRow) -> Vec<Cell> {
    vec![
        row.name.as_str().into(),
        row.population_2020.into(),
        row.population_2015.into(),
        row.non_migrants.into(),
        row.immigrants.into(),
        row.emigrants.into(),
        row.net_migration.into(),
        row.gross_migration.into(),
        row.mean_population.into(),
        row.immigration_rate.into(),
        row.emigration_rate.into(),
        row.net_rate.into(),
        row.migration_efficacy_index.into(),
    ]
}

pub fn migration_table<'a, I>(id: &str, title: &str, rows: I) -> Table
where
    I: IntoIterator<Item = &'a MunicipalityMigrationRow>,
{
    let mut table = Table::new(id, title, &MIGRATION_COLUMNS);
    for row in rows {
        table.push_row(migration_row(row));
    }
    table
}

fn ranking_table(id: &str, title: &str, rows: &[&MunicipalityMigrationRow]) -> Table {
    let mut table = Table::new(id, title, &["Municipio", "Tasa_migracion", "Migracion_Neta"]);
    for row in rows {
        table.push_row(vec![
            row.name.as_str().into(),
            row.net_rate.into(),
            row.net_migration.into(),
        ]);
    }
    table
}

fn masculinity_table(rows: &[MasculinityEffectRow]) -> Table {
    let mut table = Table::new(
        "indice_masculinidad",
        "Índices de Masculinidad por Municipio",
        &[
            "Municipio",
            "Total_AM",
            "Factual",
            "ContraFactual",
            "No_migrantes",
            "Efecto_absoluto_migracion_Neta",
            "Efecto_Relativo_migracion_Neta",
            "Diferencia_Relativa_Inmigracion",
            "Diferencia_Relativa_Emigracion",
        ],
    );
    for row in rows {
        table.push_row(vec![
            row.municipality.as_str().into(),
            row.total_am.into(),
            row.factual.into(),
            row.counterfactual.into(),
            row.non_migrant.into(),
            row.absolute_net_effect.into(),
            row.relative_net_effect.into(),
            row.relative_immigration_diff.into(),
            row.relative_emigration_diff.into(),
        ]);
    }
    table
}

/// 水平長條，正負值不同顏色，依數值排序
fn diverging_bar(
    id: &str,
    title: &str,
    value: Field,
    colors: (&str, &str),
    size: (u32, u32),
    tooltip: Vec<Field>,
) -> ChartSpec {
    ChartSpec::new(
        id,
        title,
        size.0,
        size.1,
        ChartKind::Bar(BarEncoding {
            horizontal: true,
            category: Field::titled("Municipio", "Municipio"),
            value,
            color: BarColor::Diverging {
                positive: colors.0.to_string(),
                negative: colors.1.to_string(),
            },
            offset: None,
            sort_by_value: true,
            tooltip,
        }),
    )
}

fn comparison_spec() -> ChartSpec {
    ChartSpec::new(
        "comparacion_masculinidad",
        "Índice de Masculinidad por Tipo de Población",
        600,
        400,
        ChartKind::Bar(BarEncoding {
            horizontal: false,
            category: Field::titled("Municipio", "Municipio"),
            value: Field::titled(
                "Indice_Masculinidad",
                "Índice de Masculinidad (hombres por 100 mujeres)",
            ),
            color: BarColor::Category {
                field: "Tipo_Poblacion".into(),
                legend: Some("Tipo de Población".into()),
            },
            offset: Some("Tipo_Poblacion".into()),
            sort_by_value: false,
            tooltip: vec![
                "Municipio".into(),
                "Tipo_Poblacion".into(),
                Field::new("Indice_Masculinidad").format(".2f"),
            ],
        }),
    )
}

fn population_kind(column: &str) -> &str {
    match column {
        "Factual" => "Inmigrantes (F)",
        "ContraFactual" => "Emigrantes (CF)",
        "No_migrantes" => "No migrantes (NM)",
        other => other,
    }
}

/// 兩張面量圖，或在地圖資源無法使用時的診斷訊息
fn render_maps(
    view: &mut SectionView,
    municipalities: &[&MunicipalityMigrationRow],
    geo: &GeoAvailability,
    settings: &RenderSettings,
) {
    view.subheader("🗺️ Visualización Geográfica de la Migración")
        .callout(
            CalloutKind::Info,
            "Los mapas mostrarán:\n- **Mapa 1:** Tasa de migración (verde = atracción, rojo = expulsión)\n- **Mapa 2:** Índice de Eficacia Migratoria (%)",
        );

    let context = match geo {
        Ok(context) => context,
        Err(missing) => {
            tracing::warn!("⚠️ Maps skipped: {}", missing);
            view.callout(
                CalloutKind::Error,
                format!("No se pudo cargar el mapa: {}", missing.reason),
            )
            .callout(
                CalloutKind::Info,
                "Verifica que el archivo de límites municipales esté en la ruta configurada.",
            );
            return;
        }
    };

    let joined = match join(
        &context.polygons,
        municipalities,
        |r| r.name.as_str(),
        settings.duplicate_policy,
    ) {
        Ok(joined) => joined,
        Err(e) => {
            tracing::warn!("⚠️ Boundary join failed: {}", e);
            view.callout(CalloutKind::Error, format!("No se pudo cargar el mapa: {}", e));
            return;
        }
    };

    let rate_spec = ChoroplethSpec::new("mapa_tasa_migracion", "📍 Mapa 1: Tasa de Migración", "Tasa de Migración")
        .popup("Tasa", " por mil")
        .marker_color("blue");
    let efficacy_spec = ChoroplethSpec::new(
        "mapa_eficacia_migratoria",
        "📍 Mapa 2: Índice de Eficacia Migratoria",
        "Índice Eficacia Migratoria",
    )
    .popup("Eficacia", "")
    .marker_color("purple");

    let rate_map = choropleth(&joined, &rate_spec, &settings.map_view, |r| r.net_rate, |r| r.name.as_str());
    let efficacy_map = choropleth(
        &joined,
        &efficacy_spec,
        &settings.map_view,
        |r| r.migration_efficacy_index,
        |r| r.name.as_str(),
    );

    view.subheader(&rate_map.title.clone())
        .map(rate_map)
        .divider()
        .subheader(&efficacy_map.title.clone())
        .map(efficacy_map);
}

fn extreme_callouts(
    view: &mut SectionView,
    rows: &[MasculinityEffectRow],
    key: fn(&MasculinityEffectRow) -> f64,
) {
    if let Some(max) = arg_max_by(rows, key) {
        view.callout(
            CalloutKind::Success,
            format!(
                "**Mayor efecto:** {} ({} por 1000)",
                max.municipality,
                signed(key(max), 2)
            ),
        );
    }
    if let Some(min) = arg_min_by(rows, key) {
        view.callout(
            CalloutKind::Error,
            format!(
                "**Menor efecto:** {} ({} por 1000)",
                min.municipality,
                fixed(key(min), 2)
            ),
        );
    }
}

pub fn render(
    data: &Datasets,
    geo: &GeoAvailability,
    settings: &RenderSettings,
) -> Result<SectionView> {
    let mut view = SectionView::new(
        Section::Migration,
        "🚶‍♂️ Análisis de Migración - Valle de Aburrá (2015-2020)",
    );

    view.subheader("📊 Indicadores de Migración por Municipio")
        .table(migration_table(
            "migracion_municipios",
            "Indicadores de Migración por Municipio",
            &data.migration,
        ));

    push_discrepancies(&mut view, settings);
    view.divider();

    view.subheader("🔢 Indicadores Generales del Valle de Aburrá")
        .metric_columns(
            migration::headline_indicators()
                .into_iter()
                .map(|column| column.to_vec())
                .collect(),
        )
        .divider();

    // 市鎮比較（不含 TOTAL）
    let municipalities = data.municipalities();
    if municipalities.is_empty() {
        return Err(DashError::DataInconsistency {
            table: Section::Migration.slug().to_string(),
            message: "no municipality rows".to_string(),
        });
    }
    let mpio = migration_table(
        "migracion_mpio",
        "Municipios del Valle de Aburrá",
        municipalities.iter().copied(),
    );
    view.subheader("📈 Análisis Comparativo de Migración");
    view.chart(
        &mpio,
        &diverging_bar(
            "migracion_neta",
            "Migración Neta por Municipio",
            Field::titled("Migracion_Neta", "Migración Neta"),
            (palette::TOTAL, palette::NEGATIVE),
            (400, 400),
            vec!["Municipio".into(), "Migracion_Neta".into(), "Tasa_migracion".into()],
        ),
    )?;
    view.chart(
        &mpio,
        &diverging_bar(
            "tasa_migracion",
            "Tasa de Migración por Municipio (‰)",
            Field::titled("Tasa_migracion", "Tasa de Migración (‰)"),
            (palette::MALE, palette::FEMALE),
            (400, 400),
            vec![
                "Municipio".into(),
                "Tasa_migracion".into(),
                "Indice_Eficacia_Migratoria".into(),
            ],
        ),
    )?;
    view.divider();

    // 排名
    let owned: Vec<MunicipalityMigrationRow> = municipalities.iter().map(|r| (*r).clone()).collect();
    let top = top_n_by(&owned, 5, |r| r.net_rate, Order::Descending);
    let bottom = top_n_by(&owned, 5, |r| r.net_rate, Order::Ascending);
    view.subheader("🏆 Ranking de Migración")
        .paragraph("**⬆️ Mayor Atracción Migratoria**")
        .table(ranking_table("mayor_atraccion", "Mayor Atracción Migratoria", &top))
        .paragraph("**⬇️ Mayor Expulsión Migratoria**")
        .table(ranking_table("mayor_expulsion", "Mayor Expulsión Migratoria", &bottom))
        .divider();

    render_maps(&mut view, &municipalities, geo, settings);
    view.divider();

    // 男性比例指數
    let masc = masculinity_table(&data.masculinity);
    view.subheader("📊 Análisis del Efecto de la Migración en el Índice de Masculinidad del Área Metropolitana de Antioquia al año 2018")
        .paragraph("**Índice de Masculinidad:** Número de hombres por cada 100 mujeres")
        .bullets([
            "**Factual (F):** Índice de masculinidad de los inmigrantes",
            "**ContraFactual (CF):** Índice de masculinidad de los emigrantes",
            "**No migrantes (NM):** Índice de masculinidad de población que no migra",
        ])
        .divider()
        .subheader("📋 Índices de Masculinidad por Municipio")
        .table(masc.clone())
        .divider();

    let comparison = masc
        .select(&["Municipio", "Factual", "ContraFactual", "No_migrantes"])?
        .melt(&["Municipio"], "Tipo", "Indice_Masculinidad")?
        .with_column("Tipo_Poblacion", |row| {
            row.get(1)
                .and_then(Cell::as_str)
                .map(|kind| Cell::Text(population_kind(kind).to_string()))
                .unwrap_or(Cell::Missing)
        });
    view.subheader("📊 Comparación: Inmigrantes, Emigrantes y No Migrantes");
    view.chart(&comparison, &comparison_spec())?;
    view.subheader("🔍 Interpretación").callout(
        CalloutKind::Info,
        "**¿Qué observar?**\n- Si **Factual > No migrantes**: La inmigración trae proporcionalmente más hombres\n- Si **ContraFactual > No migrantes**: La emigración se lleva proporcionalmente más hombres\n- La diferencia entre barras muestra el impacto de la migración en la composición por sexo",
    );
    view.divider();

    view.subheader("📈 Efectos Relativos de la Migración (por 1000)")
        .paragraph("**Diferencia Relativa de Inmigración:** (F − NM) / CF × 1000")
        .paragraph("Indica cuántos hombres adicionales (o menos) aporta la inmigración por cada 1000 mujeres, comparado con la población no migrante y relativizado por el índice de emigrantes.");
    view.chart(
        &masc,
        &diverging_bar(
            "efecto_inmigracion",
            "Efecto Relativo de la Inmigración",
            Field::titled("Diferencia_Relativa_Inmigracion", "Diferencia Relativa (por 1000)"),
            (palette::MALE, palette::NEGATIVE),
            (400, 400),
            vec![
                "Municipio".into(),
                Field::titled("Diferencia_Relativa_Inmigracion", "Dif. Relativa").format(".3f"),
            ],
        ),
    )?;
    view.paragraph("**Interpretación:**").bullets([
        "**Positivo:** Inmigración aumenta proporción de hombres",
        "**Negativo:** Inmigración disminuye proporción de hombres",
    ]);
    view.chart(
        &masc,
        &diverging_bar(
            "efecto_emigracion",
            "Efecto Relativo de la Emigración",
            Field::titled("Diferencia_Relativa_Emigracion", "Diferencia Relativa (por 1000)"),
            (palette::TOTAL, palette::FEMALE),
            (400, 400),
            vec![
                "Municipio".into(),
                Field::titled("Diferencia_Relativa_Emigracion", "Dif. Relativa").format(".2f"),
            ],
        ),
    )?;
    view.paragraph("**Interpretación:**")
        .bullets([
            "**Positivo:** Emigración retiene más mujeres (se van más hombres)",
            "**Negativo:** Emigración retiene más hombres (se van más mujeres)",
        ])
        .divider();

    // 淨效果
    view.subheader("⚖️ Efecto Neto de la Migración");
    view.chart(
        &masc,
        &diverging_bar(
            "efecto_neto",
            "Cambio Neto en Índice de Masculinidad por Migración",
            Field::titled("Efecto_absoluto_migracion_Neta", "Efecto Absoluto Neto (F - CF)"),
            (palette::TOTAL, palette::NEGATIVE),
            (500, 400),
            vec![
                "Municipio".into(),
                Field::titled("Efecto_absoluto_migracion_Neta", "Efecto Neto").format(".2f"),
                Field::titled("Efecto_Relativo_migracion_Neta", "Efecto Relativo (%)").format(".2f"),
            ],
        ),
    )?;
    view.subheader("📊 Hallazgos Clave");
    let rows = &data.masculinity;
    if let Some(max) = arg_max_by(rows, |r| r.absolute_net_effect) {
        view.callout(
            CalloutKind::Success,
            format!(
                "**Mayor aumento:**\n**{}**\n{} puntos",
                max.municipality,
                signed(max.absolute_net_effect, 2)
            ),
        );
    }
    if let Some(min) = arg_min_by(rows, |r| r.absolute_net_effect) {
        view.callout(
            CalloutKind::Error,
            format!(
                "**Mayor disminución:**\n**{}**\n{} puntos",
                min.municipality,
                fixed(min.absolute_net_effect, 2)
            ),
        );
    }
    view.callout(
        CalloutKind::Info,
        "**Efecto Neto = F - CF**\nMuestra si la migración neta aumenta o disminuye el índice de masculinidad",
    )
    .divider();

    // 結論
    view.subheader("💡 Conclusiones del Análisis")
        .subheader("🔵 Inmigración")
        .paragraph(format!(
            "**{} municipios** reciben inmigración masculinizada",
            count_where(rows, |r| r.relative_immigration_diff > 0.0)
        ));
    extreme_callouts(&mut view, rows, |r| r.relative_immigration_diff);
    view.subheader("🟣 Emigración").paragraph(format!(
        "**{} municipios** pierden población masculina por emigración",
        count_where(rows, |r| r.relative_emigration_diff > 0.0)
    ));
    extreme_callouts(&mut view, rows, |r| r.relative_emigration_diff);
    view.divider();

    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PolygonRecord;
    use crate::geo::GeoContext;
    use crate::render::view::Block;
    use crate::utils::error::MissingAsset;
    use serde_json::json;

    fn square(name: &str, lon: f64, lat: f64) -> PolygonRecord {
        PolygonRecord {
            name: name.to_string(),
            geometry: json!({
                "type": "Polygon",
                "coordinates": [[[lon, lat], [lon + 0.1, lat], [lon + 0.1, lat + 0.1], [lon, lat + 0.1], [lon, lat]]]
            }),
            properties: serde_json::Map::new(),
            centroid: Some((lat + 0.05, lon + 0.05)),
        }
    }

    fn paragraphs(view: &SectionView) -> Vec<&str> {
        view.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_missing_boundary_renders_diagnostic() {
        let geo: GeoAvailability = Err(MissingAsset::new("antioquia.geojson", "No such file"));
        let view = render(&Datasets::antioquia(), &geo, &RenderSettings::default()).unwrap();

        assert_eq!(view.maps().count(), 0);
        assert_eq!(
            view.callouts(CalloutKind::Error)[0],
            "No se pudo cargar el mapa: No such file"
        );
        // 其餘圖表照常輸出
        assert_eq!(view.charts().count(), 6);
    }

    #[test]
    fn test_maps_render_when_boundary_available() {
        let geo: GeoAvailability = Ok(GeoContext {
            source: "memoria".to_string(),
            polygons: vec![
                square("Bello", -75.6, 6.3),
                square("ITAGUI", -75.65, 6.15),
                square("URRAO", -76.2, 6.3),
            ],
        });
        let view = render(&Datasets::antioquia(), &geo, &RenderSettings::default()).unwrap();

        let maps: Vec<_> = view.maps().collect();
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[0].matched_count(), 2);
        assert_eq!(maps[0].markers[0].popup, "<b>BELLO</b><br>Tasa: 7.57 por mil");
        assert_eq!(maps[1].markers[1].popup, "<b>ITAGÜÍ</b><br>Eficacia: 27.28");
    }

    #[test]
    fn test_rankings_and_conclusions() {
        let geo: GeoAvailability = Err(MissingAsset::new("boundary", "no boundary source configured"));
        let view = render(&Datasets::antioquia(), &geo, &RenderSettings::default()).unwrap();

        let top = view.tables().find(|t| t.id == "mayor_atraccion").unwrap();
        assert_eq!(top.cell(0, "Municipio"), Some(&Cell::Text("SABANETA".into())));
        let bottom = view.tables().find(|t| t.id == "mayor_expulsion").unwrap();
        assert_eq!(bottom.cell(0, "Municipio"), Some(&Cell::Text("LA ESTRELLA".into())));

        let texts = paragraphs(&view);
        assert!(texts.contains(&"**8 municipios** reciben inmigración masculinizada"));
        assert!(texts.contains(&"**4 municipios** pierden población masculina por emigración"));

        let success = view.callouts(CalloutKind::Success);
        assert!(success[0].contains("BARBOSA"));
        assert!(success[1].contains("COPACABANA (+7.37 por 1000)"));
        assert!(success[2].contains("BARBOSA (+5.95 por 1000)"));
    }

    #[test]
    fn test_discrepancies_become_warning() {
        let data = Datasets::antioquia();
        let settings = RenderSettings {
            discrepancies: data.check_consistency(),
            ..RenderSettings::default()
        };
        let geo: GeoAvailability = Err(MissingAsset::new("boundary", "off"));
        let view = render(&data, &geo, &settings).unwrap();

        let warnings = view.callouts(CalloutKind::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("ENVIGADO"));
        assert!(warnings[0].contains("ITAGÜÍ"));
    }
}
