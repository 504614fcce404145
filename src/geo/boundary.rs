use crate::domain::model::PolygonRecord;
use crate::utils::error::MissingAsset;

/// 預設的市鎮名稱欄位
pub const DEFAULT_NAME_FIELD: &str = "mpio_cnmbr";

/// 解析 GeoJSON FeatureCollection，每個 feature 產生一個多邊形紀錄。
/// 沒有名稱欄位的 feature 保留為空名稱。
#[cfg(feature = "maps")]
pub fn parse_boundary(
    text: &str,
    name_field: &str,
) -> std::result::Result<Vec<PolygonRecord>, MissingAsset> {
    use geo::Centroid;

    let collection: geojson::FeatureCollection = text
        .parse()
        .map_err(|e| MissingAsset::new("boundary", format!("invalid GeoJSON: {}", e)))?;

    let mut polygons = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let properties = feature.properties.unwrap_or_default();
        let name = properties
            .get(name_field)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let (geometry, centroid) = match feature.geometry {
            Some(geometry) => {
                let centroid = geo::Geometry::<f64>::try_from(geometry.value.clone())
                    .ok()
                    .and_then(|g| g.centroid())
                    .map(|p| (p.y(), p.x()));
                let json = serde_json::to_value(&geometry).map_err(|e| {
                    MissingAsset::new("boundary", format!("invalid geometry: {}", e))
                })?;
                (json, centroid)
            }
            None => (serde_json::Value::Null, None),
        };

        if name.is_empty() {
            tracing::warn!("⚠️ Boundary feature without '{}' property", name_field);
        }

        polygons.push(PolygonRecord {
            name,
            geometry,
            properties,
            centroid,
        });
    }

    tracing::debug!("Parsed {} boundary polygons", polygons.len());
    Ok(polygons)
}

#[cfg(not(feature = "maps"))]
pub fn parse_boundary(
    _text: &str,
    _name_field: &str,
) -> std::result::Result<Vec<PolygonRecord>, MissingAsset> {
    Err(MissingAsset::new(
        "boundary",
        "built without the 'maps' feature",
    ))
}

#[cfg(all(test, feature = "maps"))]
mod tests {
    use super::*;

    const SQUARES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "mpio_cnmbr": "BELLO" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-75.6, 6.3], [-75.5, 6.3], [-75.5, 6.4], [-75.6, 6.4], [-75.6, 6.3]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "codigo": "05001" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-75.7, 6.2], [-75.6, 6.2], [-75.6, 6.3], [-75.7, 6.3], [-75.7, 6.2]]]
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_boundary_reads_names_and_centroids() {
        let polygons = parse_boundary(SQUARES, DEFAULT_NAME_FIELD).unwrap();
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].name, "BELLO");
        assert_eq!(polygons[1].name, "");

        let (lat, lon) = polygons[0].centroid.unwrap();
        assert!((lat - 6.35).abs() < 1e-9);
        assert!((lon + 75.55).abs() < 1e-9);
        assert_eq!(polygons[0].geometry["type"], "Polygon");
    }

    #[test]
    fn test_malformed_boundary_is_missing_asset() {
        let err = parse_boundary("{ not geojson", DEFAULT_NAME_FIELD).unwrap_err();
        assert_eq!(err.asset, "boundary");
        assert!(err.reason.contains("invalid GeoJSON"));
    }
}
