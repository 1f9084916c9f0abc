//! エラー型定義

use thiserror::Error;

/// 共通エラー型
///
/// いずれも設定や入力の誤りで、セッション中の推論失敗（`PredictionFailure`）とは区別する。
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("Unknown server: {0}")]
    UnknownServer(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        let display = format!("{}", error);
        assert!(display.contains("JSON error"));
    }

    #[test]
    fn test_error_display_config() {
        let error = Error::Config("confidence must be within 0..=100".to_string());
        let display = format!("{}", error);
        assert_eq!(display, "Config error: confidence must be within 0..=100");
    }

    #[test]
    fn test_error_display_unknown_model() {
        let error = Error::UnknownModel("yolov9".to_string());
        assert_eq!(format!("{}", error), "Unknown model: yolov9");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::InvalidBounds("west >= east".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("InvalidBounds"));
        assert!(debug.contains("west >= east"));
    }
}
