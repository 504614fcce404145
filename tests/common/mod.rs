#![allow(dead_code)]

use serde_json::{json, Value};

/// 以 (lon, lat) 為左下角的小正方形
pub fn square_feature(name: &str, lon: f64, lat: f64) -> Value {
    json!({
        "type": "Feature",
        "properties": { "mpio_cnmbr": name, "dpto_cnmbr": "ANTIOQUIA" },
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [lon, lat],
                [lon + 0.05, lat],
                [lon + 0.05, lat + 0.05],
                [lon, lat + 0.05],
                [lon, lat]
            ]]
        }
    })
}

/// 十個市鎮加上一個沒有遷移資料的市鎮
pub const VALLE_DE_ABURRA: [&str; 11] = [
    "MEDELLÍN",
    "BARBOSA",
    "BELLO",
    "CALDAS",
    "COPACABANA",
    "ENVIGADO",
    "GIRARDOTA",
    "ITAGÜÍ",
    "LA ESTRELLA",
    "SABANETA",
    "RIONEGRO",
];

pub fn valle_de_aburra() -> String {
    let features: Vec<Value> = VALLE_DE_ABURRA
        .iter()
        .enumerate()
        .map(|(i, name)| square_feature(name, -75.7 + 0.06 * i as f64, 6.1))
        .collect();
    json!({ "type": "FeatureCollection", "features": features }).to_string()
}

/// 把 UTF-8 字串轉成 ISO-8859-1 位元組
pub fn to_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).expect("character outside Latin-1"))
        .collect()
}

pub fn toml_config(output: &str, boundary: Option<&str>, extra: &str) -> String {
    let geo = boundary
        .map(|b| format!("[geo]\nboundary = \"{}\"\n", b.replace('\\', "/")))
        .unwrap_or_default();
    format!(
        "{}\n[load]\noutput_path = \"{}\"\noutput_formats = [\"html\", \"json\", \"csv\"]\n{}",
        geo,
        output.replace('\\', "/"),
        extra
    )
}

/// ESRI Polygon 紀錄：順時針的正方形外環
fn shp_square(record: i32, lon: f64, lat: f64) -> Vec<u8> {
    let ring = [
        (lon, lat),
        (lon, lat + 0.05),
        (lon + 0.05, lat + 0.05),
        (lon + 0.05, lat),
        (lon, lat),
    ];
    let mut content = Vec::new();
    content.extend_from_slice(&5i32.to_le_bytes());
    for v in [lon, lat, lon + 0.05, lat + 0.05] {
        content.extend_from_slice(&v.to_le_bytes());
    }
    content.extend_from_slice(&1i32.to_le_bytes());
    content.extend_from_slice(&(ring.len() as i32).to_le_bytes());
    content.extend_from_slice(&0i32.to_le_bytes());
    for (x, y) in ring {
        content.extend_from_slice(&x.to_le_bytes());
        content.extend_from_slice(&y.to_le_bytes());
    }

    let mut out = Vec::new();
    out.extend_from_slice(&record.to_be_bytes());
    out.extend_from_slice(&((content.len() / 2) as i32).to_be_bytes());
    out.extend_from_slice(&content);
    out
}

/// 與 `valle_de_aburra()` 相同的市鎮，輸出 (.shp, .dbf)；dBase 名稱為 ISO-8859-1
pub fn valle_de_aburra_shapefile() -> (Vec<u8>, Vec<u8>) {
    let records: Vec<u8> = VALLE_DE_ABURRA
        .iter()
        .enumerate()
        .flat_map(|(i, _)| shp_square(i as i32 + 1, -75.7 + 0.06 * i as f64, 6.1))
        .collect();

    let mut shp = vec![0u8; 100];
    shp[0..4].copy_from_slice(&9994i32.to_be_bytes());
    shp[24..28].copy_from_slice(&(((100 + records.len()) / 2) as i32).to_be_bytes());
    shp[28..32].copy_from_slice(&1000i32.to_le_bytes());
    shp[32..36].copy_from_slice(&5i32.to_le_bytes());
    let xmax = -75.7 + 0.06 * (VALLE_DE_ABURRA.len() - 1) as f64 + 0.05;
    for (i, v) in [-75.7, 6.1, xmax, 6.15].iter().enumerate() {
        shp[36 + i * 8..44 + i * 8].copy_from_slice(&v.to_le_bytes());
    }
    shp.extend_from_slice(&records);

    // dBase III：一個 30 字元的 MPIO_CNMBR 欄位
    let field_len = 30usize;
    let mut dbf = vec![0u8; 32];
    dbf[0] = 0x03;
    dbf[4..8].copy_from_slice(&(VALLE_DE_ABURRA.len() as u32).to_le_bytes());
    dbf[8..10].copy_from_slice(&(32u16 + 32 + 1).to_le_bytes());
    dbf[10..12].copy_from_slice(&(1 + field_len as u16).to_le_bytes());
    let mut descriptor = [0u8; 32];
    descriptor[..10].copy_from_slice(b"MPIO_CNMBR");
    descriptor[11] = b'C';
    descriptor[16] = field_len as u8;
    dbf.extend_from_slice(&descriptor);
    dbf.push(0x0D);
    for name in VALLE_DE_ABURRA {
        dbf.push(b' ');
        let mut cell = to_latin1(name);
        cell.resize(field_len, b' ');
        dbf.extend_from_slice(&cell);
    }
    dbf.push(0x1A);

    (shp, dbf)
}
