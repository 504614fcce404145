use crate::domain::model::PolygonRecord;
use crate::geo::normalize::TextEncoding;
use crate::utils::error::MissingAsset;

/// 判斷來源是否為 shapefile（依副檔名）
pub fn is_shapefile(source: &str) -> bool {
    source.to_ascii_lowercase().ends_with(".shp")
}

/// 同名的附屬檔案，例如 `mpios.shp` -> `mpios.dbf`
pub fn sidecar(source: &str, extension: &str) -> String {
    let stem = source.get(..source.len().saturating_sub(4)).unwrap_or(source);
    if source.ends_with(".SHP") {
        format!("{}.{}", stem, extension.to_ascii_uppercase())
    } else {
        format!("{}.{}", stem, extension)
    }
}

#[cfg(feature = "maps")]
fn invalid(reason: impl Into<String>) -> MissingAsset {
    MissingAsset::new("boundary.shp", reason)
}

/// .prj 是投影座標系時無法直接放上 Leaflet
#[cfg(feature = "maps")]
fn check_projection(prj: Option<&str>) -> std::result::Result<(), MissingAsset> {
    match prj {
        Some(wkt) if wkt.trim_start().to_ascii_uppercase().starts_with("PROJCS") => Err(invalid(
            "projected coordinate system; reproject the boundary to EPSG:4326",
        )),
        _ => Ok(()),
    }
}

#[cfg(feature = "maps")]
fn is_geographic(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// 解析 .shp + .dbf（可選 .prj），得到與 GeoJSON 來源相同的多邊形紀錄。
/// 名稱欄位比對不分大小寫，dBase 欄名通常是大寫。
#[cfg(feature = "maps")]
pub fn parse_shapefile(
    shp: &[u8],
    dbf: &[u8],
    prj: Option<&str>,
    name_field: &str,
    encoding: TextEncoding,
) -> std::result::Result<Vec<PolygonRecord>, MissingAsset> {
    use crate::geo::dbf::read_dbf;
    use geo::Centroid;

    check_projection(prj)?;

    let shapes = ::shapefile::ShapeReader::new(std::io::Cursor::new(shp))
        .and_then(|reader| reader.read())
        .map_err(|e| invalid(format!("invalid shapefile: {}", e)))?;
    let (fields, records) = read_dbf(dbf, encoding)?;

    if shapes.len() != records.len() {
        return Err(invalid(format!(
            "{} shapes but {} attribute records",
            shapes.len(),
            records.len()
        )));
    }

    let name_key = fields
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(name_field))
        .map(|f| f.name.clone());
    if name_key.is_none() {
        tracing::warn!("⚠️ Shapefile has no '{}' attribute", name_field);
    }

    let mut polygons = Vec::with_capacity(shapes.len());
    for (shape, properties) in shapes.into_iter().zip(records) {
        let name = name_key
            .as_ref()
            .and_then(|key| properties.get(key))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let (geometry, centroid) = match geo::Geometry::<f64>::try_from(shape) {
            Ok(shape) => {
                let centroid = shape.centroid().map(|p| (p.y(), p.x()));
                if let Some((lat, lon)) = centroid {
                    if !is_geographic(lat, lon) {
                        return Err(invalid(format!(
                            "coordinates ({}, {}) are not longitude/latitude; reproject the boundary to EPSG:4326",
                            lon, lat
                        )));
                    }
                }
                let geometry = geojson::Geometry::new(geojson::Value::from(&shape));
                let json = serde_json::to_value(&geometry)
                    .map_err(|e| invalid(format!("invalid geometry: {}", e)))?;
                (json, centroid)
            }
            Err(_) => (serde_json::Value::Null, None),
        };

        polygons.push(PolygonRecord {
            name,
            geometry,
            properties,
            centroid,
        });
    }

    tracing::debug!("Parsed {} shapefile polygons", polygons.len());
    Ok(polygons)
}

#[cfg(not(feature = "maps"))]
pub fn parse_shapefile(
    _shp: &[u8],
    _dbf: &[u8],
    _prj: Option<&str>,
    _name_field: &str,
    _encoding: TextEncoding,
) -> std::result::Result<Vec<PolygonRecord>, MissingAsset> {
    Err(MissingAsset::new(
        "boundary",
        "built without the 'maps' feature",
    ))
}
