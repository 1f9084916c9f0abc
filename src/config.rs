use crate::error::{PredictorError, Result};
use fair_predictor_common::validator::DEFAULT_MAX_AREA_SQ_KM;
use fair_predictor_common::{AreaPolicy, Deployment, PredictionConfig, ResolvedConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 推論サーバーのベースURLを上書きする環境変数
pub const ENDPOINT_ENV: &str = "FAIR_PREDICTOR_ENDPOINT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub prediction: PredictionConfig,
    pub max_area_sq_km: f64,
    /// 未設定ならトランスポート任せ
    pub timeout_seconds: Option<u64>,
    pub deployment: Deployment,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prediction: PredictionConfig::default(),
            max_area_sq_km: DEFAULT_MAX_AREA_SQ_KM,
            timeout_seconds: None,
            deployment: Deployment::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// ファイルが無ければ既定値
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PredictorError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("fair-predictor").join("config.json"))
    }

    pub fn area_policy(&self) -> Result<AreaPolicy> {
        if self.max_area_sq_km.is_nan() || self.max_area_sq_km <= 0.0 {
            return Err(PredictorError::Config(format!(
                "max_area_sq_km は正の値にしてください: {}",
                self.max_area_sq_km
            )));
        }
        Ok(AreaPolicy::new(self.max_area_sq_km))
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// サーバー・モデル名を解決する。未知の名前や範囲外の値はここで失敗
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        // 環境変数を優先
        let base_override = std::env::var(ENDPOINT_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty());
        let resolved = self
            .deployment
            .resolve_with_base(&self.prediction, base_override.as_deref())?;
        Ok(resolved)
    }
}
