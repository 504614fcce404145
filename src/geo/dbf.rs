use crate::geo::normalize::{decode_text, TextEncoding};
use crate::utils::error::MissingAsset;
use serde_json::{Map, Value};

const HEADER_LEN: usize = 32;
const DESCRIPTOR_LEN: usize = 32;
const HEADER_TERMINATOR: u8 = 0x0D;

/// dBase 欄位描述
#[derive(Debug, Clone, PartialEq)]
pub struct DbfField {
    pub name: String,
    pub kind: char,
    pub length: usize,
}

fn u16_le(bytes: &[u8], offset: usize) -> usize {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]]) as usize
}

fn u32_le(bytes: &[u8], offset: usize) -> usize {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ]) as usize
}

fn invalid(reason: impl Into<String>) -> MissingAsset {
    MissingAsset::new("boundary.dbf", reason)
}

fn field_value(field: &DbfField, raw: &[u8], encoding: TextEncoding) -> Value {
    let text = decode_text(raw, encoding);
    let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    match field.kind {
        'N' | 'F' => text
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        'L' => match text {
            "T" | "t" | "Y" | "y" => Value::Bool(true),
            "F" | "f" | "N" | "n" => Value::Bool(false),
            _ => Value::Null,
        },
        _ => Value::String(text.to_string()),
    }
}

/// 讀取 .dbf 屬性表。文字欄位以原始位元組交給 `decode_text`，
/// 刪除標記的紀錄也保留，列序與 .shp 的圖形一一對應。
pub fn read_dbf(
    bytes: &[u8],
    encoding: TextEncoding,
) -> std::result::Result<(Vec<DbfField>, Vec<Map<String, Value>>), MissingAsset> {
    if bytes.len() < HEADER_LEN {
        return Err(invalid("file shorter than the dBase header"));
    }
    let record_count = u32_le(bytes, 4);
    let header_len = u16_le(bytes, 8);
    let record_len = u16_le(bytes, 10);

    let mut fields = Vec::new();
    let mut offset = HEADER_LEN;
    while offset < header_len.min(bytes.len()) && bytes[offset] != HEADER_TERMINATOR {
        let descriptor = bytes
            .get(offset..offset + DESCRIPTOR_LEN)
            .ok_or_else(|| invalid("truncated field descriptor"))?;
        let name_end = descriptor[..11].iter().position(|&b| b == 0).unwrap_or(11);
        fields.push(DbfField {
            name: String::from_utf8_lossy(&descriptor[..name_end]).trim().to_string(),
            kind: descriptor[11] as char,
            length: descriptor[16] as usize,
        });
        offset += DESCRIPTOR_LEN;
    }

    let width: usize = 1 + fields.iter().map(|f| f.length).sum::<usize>();
    if record_len < width {
        return Err(invalid(format!(
            "record length {} is shorter than its fields ({})",
            record_len, width
        )));
    }

    let mut records = Vec::with_capacity(record_count);
    for i in 0..record_count {
        let start = header_len + i * record_len;
        let record = bytes
            .get(start..start + record_len)
            .ok_or_else(|| invalid(format!("truncated at record {}", i)))?;

        // 第一個位元組是刪除標記
        let mut position = 1;
        let mut properties = Map::new();
        for field in &fields {
            let raw = &record[position..position + field.length];
            properties.insert(field.name.clone(), field_value(field, raw, encoding));
            position += field.length;
        }
        records.push(properties);
    }

    tracing::debug!("Read {} dBase records with {} fields", records.len(), fields.len());
    Ok((fields, records))
}
