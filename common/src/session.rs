//! 選択 → 検証 → 送信 → 表示 の状態機械
//!
//! 選択状態と推論結果はこのセッションだけが保持し、描画イベント・実行要求・
//! レスポンス通知でのみ更新される。送信中は常に1件まで。
//!
//! ```text
//! Idle            --AreaDrawn(valid)-->    AreaSelected
//! *               --AreaDrawn(invalid)-->  AreaRejected
//! *               --AreaCleared-->         Idle
//! AreaSelected    --RunRequested-->        Submitting
//! Succeeded/Failed --RunRequested-->       Submitting
//! Submitting      --ResponseOk-->          Succeeded
//! Submitting      --ResponseError-->       Failed
//! ```
//!
//! 送信中の描画・削除は選択だけを更新し、状態は応答まで `Submitting` のまま。

use crate::bbox::BoundingBox;
use crate::deployment::ResolvedConfig;
use crate::outcome::{FailureKind, PredictionOutcome};
use crate::request::PredictionRequest;
use crate::selection::{Selection, SelectionChange, SelectionController};
use crate::surface::{DrawEvent, MapSurface, StatusMessage};
use crate::validator::{AreaPolicy, AreaRejection};

pub const NO_SELECTION_MESSAGE: &str = "Please draw a rectangle on the map first.";
pub const RUNNING_MESSAGE: &str = "Running prediction...";
const CANCELLED_MESSAGE: &str = "prediction request was cancelled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AreaSelected,
    AreaRejected,
    Submitting,
    Succeeded,
    Failed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::AreaSelected => "area-selected",
            SessionState::AreaRejected => "area-rejected",
            SessionState::Submitting => "submitting",
            SessionState::Succeeded => "succeeded",
            SessionState::Failed => "failed",
        }
    }

    /// 選択があれば実行できる状態
    fn accepts_run(&self) -> bool {
        matches!(
            self,
            SessionState::AreaSelected | SessionState::Succeeded | SessionState::Failed
        )
    }
}

/// 推論セッション
pub struct PredictionSession<S: MapSurface> {
    state: SessionState,
    selection: SelectionController,
    outcome: Option<PredictionOutcome>,
    surface: S,
}

impl<S: MapSurface> PredictionSession<S> {
    pub fn new(policy: AreaPolicy, mut surface: S) -> Self {
        surface.set_busy(false);
        surface.set_run_enabled(false);
        surface.hide_status();

        Self {
            state: SessionState::Idle,
            selection: SelectionController::new(policy),
            outcome: None,
            surface,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.current()
    }

    pub fn current_bounds(&self) -> Option<BoundingBox> {
        self.selection.current_bounds()
    }

    /// 直前の描画が上限超過で捨てられた場合の詳細
    pub fn last_rejection(&self) -> Option<&AreaRejection> {
        self.selection.last_rejection()
    }

    /// 直近の結果（新しい送信またはリセットで破棄）
    pub fn outcome(&self) -> Option<&PredictionOutcome> {
        self.outcome.as_ref()
    }

    pub fn policy(&self) -> &AreaPolicy {
        self.selection.policy()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// 実行ボタンは有効な選択がある `AreaSelected` / `Succeeded` / `Failed` でのみ有効
    pub fn is_run_enabled(&self) -> bool {
        self.state.accepts_run() && self.selection.has_valid_selection()
    }

    pub fn handle(&mut self, event: DrawEvent) {
        match event {
            DrawEvent::AreaDrawn(bounds) => self.on_area_drawn(bounds),
            DrawEvent::AreaCleared => self.on_area_cleared(),
        }
    }

    pub fn on_area_drawn(&mut self, bounds: BoundingBox) {
        let change = self.selection.on_area_drawn(bounds);
        let next = match &change {
            SelectionChange::Accepted(selection) => {
                self.surface.replace_shape(Some(&selection.bounds));
                SessionState::AreaSelected
            }
            _ => {
                self.surface.replace_shape(None);
                SessionState::AreaRejected
            }
        };
        if let SelectionChange::Rejected(rejection) = &change {
            tracing::info!(
                area_sq_km = rejection.area_sq_km,
                max_area_sq_km = rejection.max_area_sq_km,
                "area rejected"
            );
        }

        if self.state != SessionState::Submitting {
            self.state = next;
        }
        if let Some(status) = change.status() {
            self.surface.show_status(&status);
        }
        self.sync_run_action();
    }

    pub fn on_area_cleared(&mut self) {
        self.selection.on_area_cleared();
        self.surface.replace_shape(None);
        if self.state != SessionState::Submitting {
            self.state = SessionState::Idle;
        }
        self.surface.hide_status();
        self.sync_run_action();
    }

    /// 実行要求。送信に進む場合だけリクエストを返す
    ///
    /// 送信中の再要求は何もしない（キューにも積まない）。
    pub fn begin_submit(&mut self, config: &ResolvedConfig) -> Option<PredictionRequest> {
        if self.state == SessionState::Submitting {
            tracing::debug!("run requested while a prediction is in flight; ignored");
            return None;
        }

        let selection = match self.selection.current() {
            Some(selection) if selection.valid && self.state.accepts_run() => *selection,
            _ => {
                self.surface
                    .show_status(&StatusMessage::error(NO_SELECTION_MESSAGE));
                return None;
            }
        };

        let request = PredictionRequest::build(&selection, config);
        self.state = SessionState::Submitting;
        self.outcome = Some(PredictionOutcome::Pending);
        self.surface.show_status(&StatusMessage::info(RUNNING_MESSAGE));
        self.surface.set_busy(true);
        self.sync_run_action();

        tracing::info!(
            endpoint = %config.endpoint,
            bbox = ?request.bbox,
            checkpoint = %request.checkpoint,
            "prediction submitted"
        );
        Some(request)
    }

    /// 応答の反映。送信中でなければ無視する
    ///
    /// 状態遷移と実行ボタンの復帰を描画より先に行う。
    pub fn finish_submit(&mut self, outcome: PredictionOutcome) {
        if self.state != SessionState::Submitting {
            tracing::warn!(
                state = self.state.as_str(),
                "response arrived outside a submission; ignored"
            );
            return;
        }

        let outcome = match outcome {
            PredictionOutcome::Pending => PredictionOutcome::failure(
                FailureKind::Network,
                "prediction finished without a result",
            ),
            other => other,
        };

        self.state = match &outcome {
            PredictionOutcome::Success { .. } => SessionState::Succeeded,
            _ => SessionState::Failed,
        };
        self.release();

        match &outcome {
            PredictionOutcome::Success { collection, count } => {
                self.surface.clear_overlay();
                self.surface.render_overlay(collection);
                if let Some(extent) = collection.extent() {
                    self.surface.fit_bounds(&extent);
                }
                self.surface.show_status(&StatusMessage::success(format!(
                    "Success! Found {} building(s).",
                    count
                )));
                tracing::info!(count, "prediction succeeded");
            }
            PredictionOutcome::Failure(failure) => {
                self.surface
                    .show_status(&StatusMessage::error(format!("Error: {}", failure.message)));
                tracing::warn!(
                    kind = %failure.kind,
                    message = %failure.message,
                    "prediction failed"
                );
            }
            PredictionOutcome::Pending => {}
        }

        self.outcome = Some(outcome);
    }

    /// 送信を開始し、完了・キャンセルで必ず後始末するガードを返す
    pub fn submit(&mut self, config: &ResolvedConfig) -> Option<SubmitGuard<'_, S>> {
        let request = self.begin_submit(config)?;
        Some(SubmitGuard {
            session: self,
            request,
            settled: false,
        })
    }

    /// 選択・結果・表示を初期状態に戻す
    pub fn reset(&mut self) {
        self.selection.on_area_cleared();
        self.outcome = None;
        self.state = SessionState::Idle;
        self.surface.replace_shape(None);
        self.surface.clear_overlay();
        self.surface.hide_status();
        self.release();
    }

    fn release(&mut self) {
        self.surface.set_busy(false);
        self.sync_run_action();
    }

    fn sync_run_action(&mut self) {
        let enabled = self.is_run_enabled();
        self.surface.set_run_enabled(enabled);
    }
}

/// 送信中を表すスコープ
///
/// `complete` されずに破棄された場合（キャンセル・パニック）はネットワーク失敗として確定させる。
pub struct SubmitGuard<'a, S: MapSurface> {
    session: &'a mut PredictionSession<S>,
    request: PredictionRequest,
    settled: bool,
}

impl<S: MapSurface> SubmitGuard<'_, S> {
    pub fn request(&self) -> &PredictionRequest {
        &self.request
    }

    pub fn complete(mut self, outcome: PredictionOutcome) {
        self.settled = true;
        self.session.finish_submit(outcome);
    }
}

impl<S: MapSurface> Drop for SubmitGuard<'_, S> {
    fn drop(&mut self) {
        if !self.settled {
            self.settled = true;
            self.session
                .finish_submit(PredictionOutcome::failure(FailureKind::Network, CANCELLED_MESSAGE));
        }
    }
}
