use thiserror::Error;

/// 地圖資源缺失（邊界檔案不存在、下載失敗、或未啟用 `maps` 功能）
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Missing asset '{asset}': {reason}")]
pub struct MissingAsset {
    pub asset: String,
    pub reason: String,
}

impl MissingAsset {
    pub fn new(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error(transparent)]
    MissingAsset(#[from] MissingAsset),

    #[error("Data inconsistency in '{table}': {message}")]
    DataInconsistency { table: String, message: String },

    #[error("Chart '{chart}' cannot be rendered: {message}")]
    ChartError { chart: String, message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Data,
    Configuration,
    Rendering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Low 只是警告，儀表板仍然輸出
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl DashError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashError::HttpError(_) => ErrorCategory::Network,
            DashError::IoError(_) | DashError::ZipError(_) | DashError::MissingAsset(_) => {
                ErrorCategory::Io
            }
            DashError::CsvError(_)
            | DashError::SerializationError(_)
            | DashError::DataInconsistency { .. }
            | DashError::ProcessingError { .. } => ErrorCategory::Data,
            DashError::ConfigValidationError { .. }
            | DashError::InvalidConfigValueError { .. }
            | DashError::MissingConfigError { .. } => ErrorCategory::Configuration,
            DashError::ChartError { .. } => ErrorCategory::Rendering,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 地圖是選用功能，缺少時儀表板其餘部分照常輸出
            DashError::MissingAsset(_) | DashError::DataInconsistency { .. } => {
                ErrorSeverity::Low
            }
            DashError::HttpError(_) => ErrorSeverity::Medium,
            DashError::CsvError(_)
            | DashError::SerializationError(_)
            | DashError::ChartError { .. }
            | DashError::ProcessingError { .. }
            | DashError::ConfigValidationError { .. }
            | DashError::InvalidConfigValueError { .. }
            | DashError::MissingConfigError { .. } => ErrorSeverity::High,
            DashError::IoError(_) | DashError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DashError::HttpError(_) => {
                "Check network access to the boundary URL or point --boundary at a local boundary file"
                    .to_string()
            }
            DashError::MissingAsset(missing) => format!(
                "Place the boundary file (GeoJSON or .shp + .dbf) at '{}' or build with the 'maps' feature",
                missing.asset
            ),
            DashError::IoError(_) => {
                "Verify the output directory exists and is writable".to_string()
            }
            DashError::ZipError(_) => "Disable compression or free disk space".to_string(),
            DashError::CsvError(_) | DashError::SerializationError(_) => {
                "Re-run with --verbose to see which table failed to serialize".to_string()
            }
            DashError::DataInconsistency { table, .. } => {
                format!("Review the published figures of table '{}'", table)
            }
            DashError::ChartError { chart, .. } => {
                format!("Check the column names used by chart '{}'", chart)
            }
            DashError::ConfigValidationError { field, .. }
            | DashError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the configuration", field)
            }
            DashError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration", field)
            }
            DashError::ProcessingError { .. } => {
                "Re-run with --verbose for details".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download a remote asset: {}", self),
            ErrorCategory::Io => format!("File system problem: {}", self),
            ErrorCategory::Data => format!("Data problem: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Rendering => format!("Chart rendering failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_asset_is_low_severity() {
        let err: DashError = MissingAsset::new("antioquia.geojson", "not found").into();
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.category(), ErrorCategory::Io);
        assert!(err.to_string().contains("antioquia.geojson"));
    }

    #[test]
    fn io_errors_are_critical() {
        let err: DashError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().exit_code(), 3);
        assert!(err.user_friendly_message().starts_with("File system problem"));
    }

    #[test]
    fn config_errors_point_at_field() {
        let err = DashError::MissingConfigError {
            field: "load.output_path".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.recovery_suggestion().contains("load.output_path"));
    }
}
