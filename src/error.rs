use fair_predictor_common::AreaRejection;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error(transparent)]
    Common(#[from] fair_predictor_common::Error),

    #[error("HTTPクライアント初期化エラー: {0}")]
    HttpClient(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("範囲が上限を超えているため送信しませんでした")]
    AreaRejected(AreaRejection),

    #[error("推論に失敗しました: {0}")]
    PredictionFailed(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

/// 推論サーバーとの通信エラー（応答が得られなかった場合のみ）
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to reach prediction server: {0}")]
    Send(#[source] reqwest::Error),

    #[error("failed to read prediction response: {0}")]
    ReadBody(#[source] reqwest::Error),

    #[error("prediction request timed out after {}s", .0.as_secs_f64())]
    TimedOut(Duration),
}

impl From<dialoguer::Error> for PredictorError {
    fn from(err: dialoguer::Error) -> Self {
        PredictorError::Prompt(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;
