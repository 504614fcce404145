use crate::chart::palette;
use crate::geo::join::JoinedRecord;
use crate::utils::format::{escape_html, fixed};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// 地圖初始視角與底圖
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// [lat, lon]
    pub center: [f64; 2],
    pub zoom: u8,
    pub tiles: String,
    pub width: u32,
    pub height: u32,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: [6.25, -75.56],
            zoom: 10,
            tiles: "CartoDB positron".to_string(),
            width: 800,
            height: 500,
        }
    }
}

/// 一張面量圖要顯示的指標
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethSpec {
    pub id: String,
    pub title: String,
    pub legend: String,
    /// popup 中數值前的名稱，例如 "Tasa"
    pub popup_label: String,
    /// popup 中數值後的單位，例如 " por mil"
    pub popup_suffix: String,
    pub marker_color: String,
    pub classes: usize,
}

impl ChoroplethSpec {
    pub fn new(id: &str, title: &str, legend: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            legend: legend.to_string(),
            popup_label: legend.to_string(),
            popup_suffix: String::new(),
            marker_color: "blue".to_string(),
            classes: palette::RDYLGN_6.len(),
        }
    }

    pub fn popup(mut self, label: &str, suffix: &str) -> Self {
        self.popup_label = label.to_string();
        self.popup_suffix = suffix.to_string();
        self
    }

    pub fn marker_color(mut self, color: &str) -> Self {
        self.marker_color = color.to_string();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendClass {
    pub from: f64,
    pub to: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub popup: String,
    pub color: String,
}

/// 交給 Leaflet 繪製的地圖描述
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSpec {
    pub id: String,
    pub title: String,
    pub view: MapView,
    pub legend: String,
    /// 所有多邊形的灰底圖層
    pub base: Value,
    /// 有值的多邊形，`properties.fill` 為分級顏色
    pub choropleth: Value,
    pub classes: Vec<LegendClass>,
    pub markers: Vec<Marker>,
}

impl MapSpec {
    pub fn matched_count(&self) -> usize {
        self.choropleth["features"]
            .as_array()
            .map(Vec::len)
            .unwrap_or(0)
    }
}

/// `name` 會成為 Leaflet tooltip 的 HTML，先跳脫
fn feature(geometry: &Value, name: &str, style: Value) -> Value {
    json!({
        "type": "Feature",
        "properties": { "name": escape_html(name), "style": style },
        "geometry": geometry,
    })
}

/// 依值的範圍等寬分級上色；沒有對應列的多邊形只出現在底圖
pub fn choropleth<T, V, L>(
    joined: &[JoinedRecord<'_, T>],
    spec: &ChoroplethSpec,
    view: &MapView,
    value: V,
    label: L,
) -> MapSpec
where
    V: Fn(&T) -> f64,
    L: Fn(&T) -> &str,
{
    let values: Vec<f64> = joined
        .iter()
        .filter_map(|j| j.row.map(&value))
        .filter(|v| v.is_finite())
        .collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let base_style = json!({ "fillColor": palette::NEUTRAL_FILL, "color": "white", "weight": 0.5 });
    let base_features: Vec<Value> = joined
        .iter()
        .map(|j| feature(&j.polygon.geometry, &j.polygon.name, base_style.clone()))
        .collect();

    let mut features = Vec::new();
    let mut markers = Vec::new();
    for record in joined {
        let row = match record.row {
            Some(row) => row,
            None => continue,
        };
        let v = value(row);
        let fill = if v.is_finite() {
            palette::RDYLGN_6[palette::class_index(v, min, max, spec.classes)
                .min(palette::RDYLGN_6.len() - 1)]
        } else {
            palette::NEUTRAL_FILL
        };
        features.push(feature(
            &record.polygon.geometry,
            &record.polygon.name,
            json!({ "fillColor": fill, "fillOpacity": 0.8, "color": "black", "opacity": 0.5, "weight": 1 }),
        ));

        if let Some((lat, lon)) = record.polygon.centroid {
            markers.push(Marker {
                lat,
                lon,
                popup: format!(
                    "<b>{}</b><br>{}: {}{}",
                    escape_html(label(row)),
                    escape_html(&spec.popup_label),
                    fixed(v, 2),
                    escape_html(&spec.popup_suffix)
                ),
                color: spec.marker_color.clone(),
            });
        }
    }

    let classes = if values.is_empty() {
        Vec::new()
    } else {
        let step = (max - min) / spec.classes.max(1) as f64;
        (0..spec.classes.min(palette::RDYLGN_6.len()))
            .map(|i| LegendClass {
                from: min + step * i as f64,
                to: min + step * (i + 1) as f64,
                color: palette::RDYLGN_6[i].to_string(),
            })
            .collect()
    };

    tracing::debug!(
        "Choropleth '{}': {} of {} polygons coloured",
        spec.id,
        features.len(),
        joined.len()
    );

    MapSpec {
        id: spec.id.clone(),
        title: spec.title.clone(),
        view: view.clone(),
        legend: spec.legend.clone(),
        base: json!({ "type": "FeatureCollection", "features": base_features }),
        choropleth: json!({ "type": "FeatureCollection", "features": features }),
        classes,
        markers,
    }
}
