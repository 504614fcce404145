mod common;

use demografia::core::Pipeline;
use demografia::{DashboardConfig, DashboardEngine, DashboardPipeline, LocalStorage};
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn pipeline(config: DashboardConfig) -> DashboardPipeline<LocalStorage, DashboardConfig> {
    let storage = LocalStorage::new(config.load.output_path.clone());
    DashboardPipeline::new(storage, config)
}

fn read_json(path: &Path) -> Value {
    let data = std::fs::read(path).unwrap();
    serde_json::from_slice(&data).unwrap()
}

fn blocks_of_type<'a>(section: &'a Value, kind: &str) -> Vec<&'a Value> {
    section["blocks"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|b| b["type"] == kind)
        .collect()
}

#[tokio::test]
async fn test_dashboard_without_boundary_still_renders_everything() {
    let out = TempDir::new().unwrap();
    let missing = out.path().join("no-such-file.geojson");
    let toml = common::toml_config(
        out.path().to_str().unwrap(),
        Some(missing.to_str().unwrap()),
        "",
    );
    let config = DashboardConfig::from_toml_str(&toml).unwrap();

    let engine = DashboardEngine::new(pipeline(config));
    let output = engine.run().await.unwrap();
    assert_eq!(output, out.path().to_str().unwrap().replace('\\', "/"));

    let html = std::fs::read_to_string(out.path().join("index.html")).unwrap();
    for slug in ["poblacion", "mortalidad", "fecundidad", "migracion"] {
        assert!(html.contains(&format!("data-section=\"{}\"", slug)));
        assert!(out.path().join(format!("sections/{}.json", slug)).exists());
    }
    assert!(html.contains("No se pudo cargar el mapa"));
    assert!(!html.contains("addMap(\""));

    let migration = read_json(&out.path().join("sections/migracion.json"));
    assert!(blocks_of_type(&migration, "map").is_empty());
    assert_eq!(blocks_of_type(&migration, "chart").len(), 6);

    // 其他區塊不受影響
    let population = read_json(&out.path().join("sections/poblacion.json"));
    assert_eq!(blocks_of_type(&population, "chart").len(), 3);

    let csv = std::fs::read_to_string(out.path().join("tables/poblacion/poblacion_quinquenal.csv"))
        .unwrap();
    assert!(csv.starts_with("Edad,Total,Hombres,Mujeres,% Total,% Hombres,% Mujeres"));
}

#[cfg(feature = "maps")]
#[tokio::test]
async fn test_dashboard_with_boundary_renders_two_choropleths() {
    let dir = TempDir::new().unwrap();
    let boundary = dir.path().join("mpios.geojson");
    std::fs::write(&boundary, common::valle_de_aburra()).unwrap();
    let out = dir.path().join("dist");

    let toml = common::toml_config(
        out.to_str().unwrap(),
        Some(boundary.to_str().unwrap()),
        "[load.compression]\nenabled = true\n",
    );
    let config = DashboardConfig::from_toml_str(&toml).unwrap();

    let output = DashboardEngine::new(pipeline(config)).run().await.unwrap();
    assert!(output.ends_with("/dashboard.zip"));
    assert!(out.join("dashboard.zip").exists());

    let migration = read_json(&out.join("sections/migracion.json"));
    let maps = blocks_of_type(&migration, "map");
    assert_eq!(maps.len(), 2);

    // 十個市鎮上色，RIONEGRO 只在底圖
    let rate_map = &maps[0]["map"];
    assert_eq!(rate_map["choropleth"]["features"].as_array().unwrap().len(), 10);
    assert_eq!(rate_map["base"]["features"].as_array().unwrap().len(), 11);
    let popups: Vec<&str> = rate_map["markers"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m["popup"].as_str())
        .collect();
    assert!(popups.contains(&"<b>BELLO</b><br>Tasa: 7.57 por mil"));

    let html = std::fs::read_to_string(out.join("index.html")).unwrap();
    assert_eq!(html.matches("addMap(\"migracion\"").count(), 2);
    assert!(!html.contains("No se pudo cargar el mapa"));
}

#[cfg(feature = "maps")]
#[tokio::test]
async fn test_latin1_boundary_names_join() {
    let dir = TempDir::new().unwrap();
    let boundary = dir.path().join("mpios_latin1.geojson");
    std::fs::write(&boundary, common::to_latin1(&common::valle_de_aburra())).unwrap();

    let toml = common::toml_config(
        dir.path().join("dist").to_str().unwrap(),
        Some(boundary.to_str().unwrap()),
        "",
    );
    let config = DashboardConfig::from_toml_str(&toml).unwrap();
    let pipeline = pipeline(config);

    let input = pipeline.extract().await.unwrap();
    let geo = input.geo.as_ref().unwrap();
    assert!(geo.polygons.iter().any(|p| p.name == "ITAGÜÍ"));
    assert!(geo.polygons.iter().any(|p| p.name == "MEDELLÍN"));

    let dashboard = pipeline.transform(input).await.unwrap();
    let migration = dashboard
        .section(demografia::Section::Migration)
        .unwrap();
    let maps: Vec<_> = migration.maps().collect();
    assert_eq!(maps.len(), 2);
    assert_eq!(maps[1].matched_count(), 10);
    assert!(maps[1]
        .markers
        .iter()
        .any(|m| m.popup == "<b>ITAGÜÍ</b><br>Eficacia: 27.28"));
}

#[cfg(feature = "maps")]
#[tokio::test]
async fn test_shapefile_boundary_with_latin1_attributes() {
    let dir = TempDir::new().unwrap();
    let (shp, dbf) = common::valle_de_aburra_shapefile();
    let boundary = dir.path().join("antioquia_simplificado.shp");
    std::fs::write(&boundary, shp).unwrap();
    std::fs::write(dir.path().join("antioquia_simplificado.dbf"), dbf).unwrap();
    std::fs::write(
        dir.path().join("antioquia_simplificado.prj"),
        r#"GEOGCS["GCS_MAGNA",DATUM["D_MAGNA",SPHEROID["GRS_1980",6378137.0,298.257222101]]]"#,
    )
    .unwrap();

    let toml = common::toml_config(
        dir.path().join("dist").to_str().unwrap(),
        Some(boundary.to_str().unwrap()),
        "",
    );
    let config = DashboardConfig::from_toml_str(&toml).unwrap();
    let pipeline = pipeline(config);

    let input = pipeline.extract().await.unwrap();
    let geo = input.geo.as_ref().unwrap();
    assert_eq!(geo.polygons.len(), 11);
    assert_eq!(geo.polygons[7].name, "ITAGÜÍ");
    let kind = geo.polygons[0].geometry["type"].as_str().unwrap();
    assert!(kind == "Polygon" || kind == "MultiPolygon");
    let (lat, lon) = geo.polygons[0].centroid.unwrap();
    assert!((lat - 6.125).abs() < 1e-9);
    assert!((lon + 75.675).abs() < 1e-9);

    let dashboard = pipeline.transform(input).await.unwrap();
    let maps: Vec<_> = dashboard
        .section(demografia::Section::Migration)
        .unwrap()
        .maps()
        .collect();
    assert_eq!(maps.len(), 2);
    assert_eq!(maps[0].matched_count(), 10);
}

#[cfg(feature = "maps")]
#[tokio::test]
async fn test_projected_shapefile_degrades_to_callout() {
    let dir = TempDir::new().unwrap();
    let (shp, dbf) = common::valle_de_aburra_shapefile();
    let boundary = dir.path().join("mpios.shp");
    std::fs::write(&boundary, shp).unwrap();
    std::fs::write(dir.path().join("mpios.dbf"), dbf).unwrap();
    std::fs::write(
        dir.path().join("mpios.prj"),
        r#"PROJCS["MAGNA-SIRGAS_Origen-Nacional",GEOGCS["GCS_MAGNA"],PROJECTION["Transverse_Mercator"]]"#,
    )
    .unwrap();
    let out = dir.path().join("dist");

    let toml = common::toml_config(out.to_str().unwrap(), Some(boundary.to_str().unwrap()), "");
    let config = DashboardConfig::from_toml_str(&toml).unwrap();
    DashboardEngine::new(pipeline(config)).run().await.unwrap();

    let html = std::fs::read_to_string(out.join("index.html")).unwrap();
    assert!(html.contains("No se pudo cargar el mapa"));
    assert!(html.contains("EPSG:4326"));
    assert!(!html.contains("addMap(\""));
}
