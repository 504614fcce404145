use crate::utils::error::{DashError, Result};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 目前支援的輸出格式
pub const OUTPUT_FORMATS: [&str; 3] = ["html", "json", "csv"];

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DashError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DashError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 邊界資料來源可以是本地路徑或 http(s) URL
pub fn validate_url_or_path(field_name: &str, source: &str) -> Result<()> {
    if !source.contains("://") {
        return validate_path(field_name, source);
    }

    match Url::parse(source) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(DashError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: source.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(DashError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: source.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_formats(field_name: &str, formats: &[String]) -> Result<()> {
    if formats.is_empty() {
        return Err(DashError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one output format is required".to_string(),
        });
    }

    let allowed: HashSet<&str> = OUTPUT_FORMATS.iter().copied().collect();
    for format in formats {
        if !allowed.contains(format.as_str()) {
            return Err(DashError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    OUTPUT_FORMATS.join(", ")
                ),
            });
        }
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DashError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(DashError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_or_path() {
        assert!(validate_url_or_path("geo.boundary", "antioquia.geojson").is_ok());
        assert!(validate_url_or_path("geo.boundary", "https://example.com/a.geojson").is_ok());
        assert!(validate_url_or_path("geo.boundary", "ftp://example.com/a.geojson").is_err());
        assert!(validate_url_or_path("geo.boundary", "").is_err());
    }

    #[test]
    fn test_validate_formats() {
        let ok = vec!["html".to_string(), "csv".to_string()];
        assert!(validate_formats("load.output_formats", &ok).is_ok());

        let bad = vec!["xlsx".to_string()];
        assert!(validate_formats("load.output_formats", &bad).is_err());
        assert!(validate_formats("load.output_formats", &[]).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("geo.zoom", 10u8, 1, 18).is_ok());
        assert!(validate_range("geo.zoom", 0u8, 1, 18).is_err());
        assert!(validate_range("geo.center.lat", 95.0, -90.0, 90.0).is_err());
    }
}
