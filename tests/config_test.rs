//! 設定ファイルテスト

use fair_predictor::config::Config;
use fair_predictor::error::PredictorError;
use tempfile::tempdir;

/// ファイルが無ければ既定値
#[test]
fn test_load_missing_file_returns_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config::load_from(&dir.path().join("config.json")).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.prediction.server, "dev");
    assert_eq!(config.prediction.model, "ramp");
    assert_eq!(config.max_area_sq_km, 3.0);
    assert!(config.timeout_seconds.is_none());
}

/// 保存と読み込み
#[test]
fn test_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config.prediction.model = "yolov8v2".into();
    config.prediction.confidence = 70.0;
    config.max_area_sq_km = 5.0;
    config.timeout_seconds = Some(90);
    config.save_to(&path).expect("設定保存失敗");

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

/// 推論パラメータはトップレベルのキーとして保存される
#[test]
fn test_file_layout_is_flat() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    Config::default().save_to(&path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["model"], "ramp");
    assert_eq!(json["confidence"], 50.0);
    assert_eq!(json["max_area_sq_km"], 3.0);
    assert!(json["deployment"]["servers"]["prod"].is_string());
}

/// 一部だけ書かれたファイルは残りを既定値で補う
#[test]
fn test_partial_file_uses_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"server": "prod", "tolerance": 1.0, "deployment": {"models": {"custom": "/models/custom.onnx"}}}"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.prediction.server, "prod");
    assert_eq!(config.prediction.tolerance, 1.0);
    assert_eq!(config.prediction.confidence, 50.0);
    assert_eq!(config.max_area_sq_km, 3.0);
    // servers は既定のまま、models は置き換え
    assert!(config.deployment.servers.contains_key("prod"));
    assert_eq!(config.deployment.models.len(), 1);
}

/// 壊れたJSON
#[test]
fn test_invalid_json_is_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ invalid").unwrap();

    assert!(matches!(
        Config::load_from(&path),
        Err(PredictorError::JsonParse(_))
    ));
}

/// 未知のモデル名は解決時に失敗
#[test]
fn test_resolve_unknown_model_fails_fast() {
    let mut config = Config::default();
    config.prediction.model = "does-not-exist".into();

    let err = config.resolve().unwrap_err();
    assert!(matches!(
        err,
        PredictorError::Common(fair_predictor_common::Error::UnknownModel(_))
    ));
}

/// 面積上限は正の値のみ
#[test]
fn test_area_policy_validation() {
    let mut config = Config::default();
    assert_eq!(config.area_policy().unwrap().max_area_sq_km, 3.0);

    config.max_area_sq_km = 0.0;
    assert!(matches!(config.area_policy(), Err(PredictorError::Config(_))));
}

#[test]
fn test_deadline() {
    let mut config = Config::default();
    assert!(config.deadline().is_none());
    config.timeout_seconds = Some(15);
    assert_eq!(config.deadline(), Some(std::time::Duration::from_secs(15)));
}
