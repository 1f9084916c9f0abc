//! 推論リクエストの組み立て

use crate::deployment::{
    ResolvedConfig, IMAGERY_SOURCE, ORTHO_MAX_ANGLE_CHANGE_DEG, ORTHO_SKEW_TOLERANCE_DEG,
    ZOOM_LEVEL,
};
use crate::error::{Error, Result};
use crate::selection::Selection;
use serde::{Deserialize, Serialize};

/// ユーザー設定（サーバー・モデル名と推論パラメータ）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub server: String,
    pub model: String,
    /// 信頼度 0-100
    pub confidence: f64,
    pub area_threshold: f64,
    pub tolerance: f64,
    pub orthogonalize: bool,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            server: "dev".into(),
            model: "ramp".into(),
            confidence: 50.0,
            area_threshold: 3.0,
            tolerance: 0.5,
            orthogonalize: true,
        }
    }
}

impl PredictionConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.confidence) {
            return Err(Error::Config(format!(
                "confidence must be within 0..=100, got {}",
                self.confidence
            )));
        }
        if self.area_threshold.is_nan() || self.area_threshold <= 0.0 {
            return Err(Error::Config(format!(
                "area_threshold must be > 0, got {}",
                self.area_threshold
            )));
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(Error::Config(format!("tolerance must be >= 0, got {}", self.tolerance)));
        }
        Ok(())
    }
}

/// 推論サーバーへ送るJSON本体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub bbox: [f64; 4],
    pub checkpoint: String,
    pub confidence: f64,
    pub area_threshold: f64,
    pub tolerance: f64,
    pub orthogonalize: bool,
    pub ortho_max_angle_change_deg: f64,
    pub ortho_skew_tolerance_deg: f64,
    pub source: String,
    pub zoom_level: u8,
}

impl PredictionRequest {
    /// 有効な選択範囲がある前提で呼ぶ（呼び出し側のセッションが保証する）
    pub fn build(selection: &Selection, config: &ResolvedConfig) -> Self {
        let params = &config.params;
        Self {
            bbox: selection.bounds.to_array(),
            checkpoint: config.checkpoint.clone(),
            confidence: params.confidence,
            area_threshold: params.area_threshold,
            tolerance: params.tolerance,
            orthogonalize: params.orthogonalize,
            ortho_max_angle_change_deg: ORTHO_MAX_ANGLE_CHANGE_DEG,
            ortho_skew_tolerance_deg: ORTHO_SKEW_TOLERANCE_DEG,
            source: IMAGERY_SOURCE.to_string(),
            zoom_level: ZOOM_LEVEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BoundingBox;
    use crate::deployment::Deployment;

    fn selection() -> Selection {
        Selection {
            bounds: BoundingBox::new(2.0, 48.0, 2.01, 48.01).unwrap(),
            area_sq_km: 0.827,
            valid: true,
        }
    }

    #[test]
    fn test_build_payload_fields() {
        let resolved = Deployment::default()
            .resolve(&PredictionConfig::default())
            .unwrap();
        let request = PredictionRequest::build(&selection(), &resolved);

        assert_eq!(request.bbox, [2.0, 48.0, 2.01, 48.01]);
        assert_eq!(request.zoom_level, 19);
        assert_eq!(request.checkpoint, resolved.checkpoint);
        assert!(request.source.contains("HR.ORTHOIMAGERY.ORTHOPHOTOS"));
    }

    #[test]
    fn test_serialized_json_shape() {
        let config = PredictionConfig {
            model: "yolov8v2".into(),
            confidence: 75.0,
            orthogonalize: false,
            ..Default::default()
        };
        let resolved = Deployment::default().resolve(&config).unwrap();
        let json = serde_json::to_value(PredictionRequest::build(&selection(), &resolved)).unwrap();

        assert_eq!(json["bbox"], serde_json::json!([2.0, 48.0, 2.01, 48.01]));
        assert_eq!(json["confidence"], 75.0);
        assert_eq!(json["area_threshold"], 3.0);
        assert_eq!(json["tolerance"], 0.5);
        assert_eq!(json["orthogonalize"], false);
        assert_eq!(json["ortho_max_angle_change_deg"], 15.0);
        assert_eq!(json["ortho_skew_tolerance_deg"], 15.0);
        assert_eq!(json["zoom_level"], 19);
        assert!(json["checkpoint"].as_str().unwrap().ends_with("yolov8s_v2-seg.onnx"));
        assert_eq!(json.as_object().unwrap().len(), 10);
    }

    #[test]
    fn test_validate_ranges() {
        assert!(PredictionConfig::default().validate().is_ok());
        let bad_threshold = PredictionConfig {
            area_threshold: 0.0,
            ..Default::default()
        };
        assert!(bad_threshold.validate().is_err());
        let bad_tolerance = PredictionConfig {
            tolerance: -0.1,
            ..Default::default()
        };
        assert!(bad_tolerance.validate().is_err());
        let nan_confidence = PredictionConfig {
            confidence: f64::NAN,
            ..Default::default()
        };
        assert!(nan_confidence.validate().is_err());
    }
}
