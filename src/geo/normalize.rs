use serde::{Deserialize, Serialize};
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::utils::error::DashError;

/// 名稱比對用的正規化：合併空白、轉大寫、NFD 分解後去掉組合符號
pub fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// 邊界檔案文字編碼
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// 合法 UTF-8 就用 UTF-8，否則以 ISO-8859-1 解碼
    #[default]
    Auto,
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "latin-1")]
    Latin1,
}

impl FromStr for TextEncoding {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(TextEncoding::Auto),
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            other => Err(DashError::InvalidConfigValueError {
                field: "encoding".to_string(),
                value: other.to_string(),
                reason: "Expected one of: auto, utf-8, latin-1".to_string(),
            }),
        }
    }
}

/// ISO-8859-1 的每個位元組直接對應同值的 code point
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

pub fn decode_legacy_text(bytes: &[u8]) -> String {
    decode_text(bytes, TextEncoding::Auto)
}

pub fn decode_text(bytes: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Latin1 => latin1(bytes),
        TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        TextEncoding::Auto => match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => {
                tracing::debug!("Boundary text is not valid UTF-8, decoding as ISO-8859-1");
                latin1(bytes)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents_case_and_whitespace() {
        assert_eq!(normalize("Itagüí"), "ITAGUI");
        assert_eq!(normalize("ITAGUI"), "ITAGUI");
        assert_eq!(normalize(" itagui "), "ITAGUI");
        assert_eq!(normalize("LA  ESTRELLA"), "LA ESTRELLA");
        assert_eq!(normalize("la\tEstrella\n"), "LA ESTRELLA");
        assert_eq!(normalize("MEDELLÍN"), normalize("Medellin"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for name in ["Itagüí", "LA ESTRELLA", "  Envigado", "Peñol"] {
            let once = normalize(name);
            assert_eq!(normalize(&once), once);
        }
        assert_eq!(normalize("Peñol"), "PENOL");
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // "ITAGÜÍ" en ISO-8859-1
        let bytes = [0x49, 0x54, 0x41, 0x47, 0xDC, 0xCD];
        assert_eq!(decode_legacy_text(&bytes), "ITAGÜÍ");
        assert_eq!(decode_legacy_text("MEDELLÍN".as_bytes()), "MEDELLÍN");
    }

    #[test]
    fn test_forced_encodings() {
        let bytes = "Í".as_bytes();
        assert_eq!(decode_text(bytes, TextEncoding::Latin1), "Ã\u{8d}");
        assert_eq!(decode_text(bytes, TextEncoding::Utf8), "Í");
        assert_eq!("latin-1".parse::<TextEncoding>().unwrap(), TextEncoding::Latin1);
        assert!("cp1252".parse::<TextEncoding>().is_err());
    }
}
