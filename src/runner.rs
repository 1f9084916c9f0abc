use crate::client::{PredictionClient, PredictionTransport};
use crate::config::Config;
use crate::error::{PredictorError, Result};
use crate::terminal::{OverlayTarget, TerminalSurface};
use fair_predictor_common::{
    BoundingBox, DrawEvent, MapSurface, PredictionOutcome, PredictionSession, ResolvedConfig,
};
use std::path::PathBuf;

/// 実行要求を1回処理する
///
/// 送信できない状態（選択なし・送信中）なら `None`。送信した場合は応答を反映した後の結果を返す。
/// 途中で future が破棄されても、ガードが実行ボタンを元に戻す。
pub async fn run_prediction<S, T>(
    session: &mut PredictionSession<S>,
    client: &PredictionClient<T>,
    config: &ResolvedConfig,
) -> Option<PredictionOutcome>
where
    S: MapSurface,
    T: PredictionTransport,
{
    let guard = session.submit(config)?;
    let outcome = client.submit(guard.request(), &config.endpoint).await;
    guard.complete(outcome);
    session.outcome().cloned()
}

/// 一括実行の結果
#[derive(Debug, Clone)]
pub struct PredictionSummary {
    pub area_sq_km: f64,
    pub count: usize,
    pub output: Option<PathBuf>,
}

/// 範囲を選択して1回推論する（描画 → 検証 → 送信 → 書き出し）
pub async fn predict_area<T: PredictionTransport>(
    client: &PredictionClient<T>,
    config: &Config,
    bounds: BoundingBox,
    target: OverlayTarget,
) -> Result<PredictionSummary> {
    let resolved = config.resolve()?;
    let mut session = PredictionSession::new(config.area_policy()?, TerminalSurface::new(target));

    session.handle(DrawEvent::AreaDrawn(bounds));
    let Some(selection) = session.selection().copied() else {
        // 理由はサーフェスに表示済み
        return match session.last_rejection() {
            Some(rejection) => Err(PredictorError::AreaRejected(*rejection)),
            None => Err(PredictorError::PredictionFailed("no valid selection".into())),
        };
    };

    match run_prediction(&mut session, client, &resolved).await {
        Some(PredictionOutcome::Success { count, .. }) => Ok(PredictionSummary {
            area_sq_km: selection.area_sq_km,
            count,
            output: session.surface().written_path().map(|p| p.to_path_buf()),
        }),
        Some(PredictionOutcome::Failure(failure)) => {
            Err(PredictorError::PredictionFailed(failure.message))
        }
        _ => Err(PredictorError::PredictionFailed("prediction was not submitted".into())),
    }
}
