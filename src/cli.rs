use crate::config::Config;
use clap::{Args, Parser, Subcommand};
use fair_predictor_common::BoundingBox;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fair-predictor")]
#[command(about = "矩形範囲を指定して建物検出推論を実行するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 範囲の面積を計算して上限チェックのみ行う
    Area {
        /// 範囲 (west,south,east,north)
        #[arg(long, allow_hyphen_values = true)]
        bbox: BoundingBox,

        /// 面積上限 [km²]
        #[arg(long)]
        max_area: Option<f64>,
    },

    /// 範囲を送信して建物ポリゴンをGeoJSONに保存
    Predict {
        /// 範囲 (west,south,east,north)
        #[arg(long, allow_hyphen_values = true)]
        bbox: BoundingBox,

        #[command(flatten)]
        options: PredictionArgs,

        /// 出力GeoJSONファイル（デフォルト: カレントに時刻付きファイル名）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 対話的に範囲の描画・削除・推論を繰り返す
    Interactive {
        #[command(flatten)]
        options: PredictionArgs,

        /// GeoJSONの出力ディレクトリ
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// 既定サーバー (dev/prod など)
        #[arg(long)]
        server: Option<String>,

        /// 既定モデル (ramp/yolov8v1/yolov8v2 など)
        #[arg(long)]
        model: Option<String>,

        /// 面積上限 [km²]
        #[arg(long)]
        max_area: Option<f64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 推論パラメータの一時上書き
#[derive(Args, Clone, Debug, Default)]
pub struct PredictionArgs {
    /// サーバー名
    #[arg(long)]
    pub server: Option<String>,

    /// モデル名
    #[arg(long)]
    pub model: Option<String>,

    /// 信頼度 (0-100)
    #[arg(long)]
    pub confidence: Option<f64>,

    /// 最小建物面積
    #[arg(long)]
    pub area_threshold: Option<f64>,

    /// ポリゴン簡略化の許容値
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// 直交化しない
    #[arg(long)]
    pub no_orthogonalize: bool,

    /// 面積上限 [km²]
    #[arg(long)]
    pub max_area: Option<f64>,

    /// タイムアウト秒数
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl PredictionArgs {
    /// 指定された項目だけ設定を上書き
    pub fn apply(&self, config: &mut Config) {
        let prediction = &mut config.prediction;
        if let Some(server) = &self.server {
            prediction.server = server.clone();
        }
        if let Some(model) = &self.model {
            prediction.model = model.clone();
        }
        if let Some(confidence) = self.confidence {
            prediction.confidence = confidence;
        }
        if let Some(area_threshold) = self.area_threshold {
            prediction.area_threshold = area_threshold;
        }
        if let Some(tolerance) = self.tolerance {
            prediction.tolerance = tolerance;
        }
        if self.no_orthogonalize {
            prediction.orthogonalize = false;
        }
        if let Some(max_area) = self.max_area {
            config.max_area_sq_km = max_area;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_seconds = Some(timeout);
        }
    }
}
