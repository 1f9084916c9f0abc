//! デプロイ設定（サーバー・モデルの名前解決と固定パラメータ）

use crate::error::{Error, Result};
use crate::request::PredictionConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 推論に使う航空写真タイル（IGN オルソ画像 WMTS）
pub const IMAGERY_SOURCE: &str = "https://data.geopf.fr/wmts?SERVICE=WMTS&REQUEST=GetTile&VERSION=1.0.0&LAYER=HR.ORTHOIMAGERY.ORTHOPHOTOS&STYLE=normal&TILEMATRIXSET=PM&TILEMATRIX={z}&TILEROW={y}&TILECOL={x}&FORMAT=image/jpeg";

/// 推論時のタイルズーム
pub const ZOOM_LEVEL: u8 = 19;

/// 直交化の角度パラメータ [deg]
pub const ORTHO_MAX_ANGLE_CHANGE_DEG: f64 = 15.0;
pub const ORTHO_SKEW_TOLERANCE_DEG: f64 = 15.0;

const PREDICT_PATH: &str = "/predict/";

/// 名前 → URL / チェックポイントの対応表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deployment {
    pub servers: BTreeMap<String, String>,
    pub models: BTreeMap<String, String>,
}

impl Default for Deployment {
    fn default() -> Self {
        let servers = [
            ("dev", "https://predictor-dev.fair.hotosm.org"),
            ("prod", "https://predictor.fair.hotosm.org"),
        ];
        let models = [
            ("ramp", "/mnt/efsmount/fairdev/data/basemodels/ramp/baseline.tflite"),
            ("yolov8v1", "/mnt/efsmount/data/basemodels/yolo/yolov8s_v1-seg.onnx"),
            ("yolov8v2", "/mnt/efsmount/data/basemodels/yolo/yolov8s_v2-seg.onnx"),
        ];

        Self {
            servers: servers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            models: models
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// 解決済みの設定スナップショット（送信時に読み取り専用で使う）
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// `{base}/predict/`
    pub endpoint: String,
    pub checkpoint: String,
    pub params: PredictionConfig,
}

impl Deployment {
    pub fn server_url(&self, key: &str) -> Result<&str> {
        self.servers
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownServer(key.to_string()))
    }

    pub fn checkpoint(&self, key: &str) -> Result<&str> {
        self.models
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownModel(key.to_string()))
    }

    /// 設定を検証して名前解決する
    ///
    /// 未知のサーバー・モデル名はここで失敗させ、送信時まで持ち越さない。
    pub fn resolve(&self, config: &PredictionConfig) -> Result<ResolvedConfig> {
        self.resolve_with_base(config, None)
    }

    /// `base_override` があればサーバー名の解決より優先する
    pub fn resolve_with_base(
        &self,
        config: &PredictionConfig,
        base_override: Option<&str>,
    ) -> Result<ResolvedConfig> {
        config.validate()?;
        let base = match base_override {
            Some(url) => url,
            None => self.server_url(&config.server)?,
        };
        let checkpoint = self.checkpoint(&config.model)?.to_string();

        Ok(ResolvedConfig {
            endpoint: predict_url(base),
            checkpoint,
            params: config.clone(),
        })
    }
}

/// サーバーのベースURLから推論エンドポイントを組み立てる
pub fn predict_url(base: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), PREDICT_PATH)
}
