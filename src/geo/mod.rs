pub mod boundary;
pub mod choropleth;
pub mod dbf;
pub mod join;
pub mod normalize;
pub mod shp;

pub use boundary::{parse_boundary, DEFAULT_NAME_FIELD};
pub use choropleth::{choropleth, ChoroplethSpec, MapSpec, MapView};
pub use join::{join, DuplicatePolicy, JoinedRecord};
pub use normalize::{decode_legacy_text, decode_text, normalize, TextEncoding};
pub use shp::{is_shapefile, parse_shapefile};

use crate::domain::model::PolygonRecord;
use crate::utils::error::MissingAsset;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// 邊界資料與地圖的設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoSettings {
    /// 本機路徑或 http(s) URL；None 表示沒有設定地圖資源
    pub source: Option<String>,
    pub name_field: String,
    pub encoding: TextEncoding,
    pub duplicate_policy: DuplicatePolicy,
    pub view: MapView,
}

impl Default for GeoSettings {
    fn default() -> Self {
        Self {
            source: None,
            name_field: DEFAULT_NAME_FIELD.to_string(),
            encoding: TextEncoding::Auto,
            duplicate_policy: DuplicatePolicy::Reject,
            view: MapView::default(),
        }
    }
}

/// 已載入的邊界資料
#[derive(Debug, Clone, PartialEq)]
pub struct GeoContext {
    pub source: String,
    pub polygons: Vec<PolygonRecord>,
}

/// 地圖能力：載入成功或缺少資源
pub type GeoAvailability = std::result::Result<GeoContext, MissingAsset>;

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

async fn fetch_bytes(client: &Client, source: &str) -> std::result::Result<Vec<u8>, MissingAsset> {
    if is_remote(source) {
        tracing::debug!("Fetching boundary from: {}", source);
        let response = client
            .get(source)
            .send()
            .await
            .map_err(|e| MissingAsset::new(source, format!("request failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(MissingAsset::new(
                source,
                format!("HTTP status {}", response.status()),
            ));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| MissingAsset::new(source, format!("failed to read body: {}", e)))?;
        Ok(bytes.to_vec())
    } else {
        tokio::fs::read(source)
            .await
            .map_err(|e| MissingAsset::new(source, e.to_string()))
    }
}

/// .shp 與 .dbf 必須都在；.prj 可有可無
async fn load_shapefile(
    client: &Client,
    source: &str,
    settings: &GeoSettings,
) -> std::result::Result<Vec<PolygonRecord>, MissingAsset> {
    let shp = fetch_bytes(client, source).await?;
    let dbf = fetch_bytes(client, &shp::sidecar(source, "dbf")).await?;
    let prj = fetch_bytes(client, &shp::sidecar(source, "prj"))
        .await
        .ok()
        .map(|bytes| decode_text(&bytes, TextEncoding::Auto));

    parse_shapefile(
        &shp,
        &dbf,
        prj.as_deref(),
        &settings.name_field,
        settings.encoding,
    )
    .map_err(|e| MissingAsset::new(source, e.reason))
}

pub async fn try_load_geo_assets(settings: &GeoSettings) -> GeoAvailability {
    try_load_geo_assets_with(&Client::new(), settings).await
}

/// 檢查並載入地圖資源。任何失敗都回傳 `MissingAsset`，不會中斷儀表板。
pub async fn try_load_geo_assets_with(client: &Client, settings: &GeoSettings) -> GeoAvailability {
    let source = settings
        .source
        .as_deref()
        .ok_or_else(|| MissingAsset::new("boundary", "no boundary source configured"))?;

    if !cfg!(feature = "maps") {
        return Err(MissingAsset::new(source, "built without the 'maps' feature"));
    }

    let polygons = if is_shapefile(source) {
        load_shapefile(client, source, settings).await?
    } else {
        let bytes = fetch_bytes(client, source).await?;
        let text = decode_text(&bytes, settings.encoding);
        parse_boundary(&text, &settings.name_field)
            .map_err(|e| MissingAsset::new(source, e.reason))?
    };

    if polygons.is_empty() {
        return Err(MissingAsset::new(source, "boundary contains no features"));
    }

    tracing::info!("🗺️ Loaded {} boundary polygons from {}", polygons.len(), source);
    Ok(GeoContext {
        source: source.to_string(),
        polygons,
    })
}
