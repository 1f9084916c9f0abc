//! テスト・ヘッドレス実行用の記録サーフェス

use crate::bbox::BoundingBox;
use crate::outcome::{Extent, FeatureCollection};
use crate::surface::{MapSurface, StatusMessage};

/// 表示要求をすべて記録する `MapSurface`
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub run_enabled: bool,
    pub busy: bool,
    /// 現在表示中のステータス
    pub status: Option<StatusMessage>,
    pub status_history: Vec<StatusMessage>,
    pub shape: Option<BoundingBox>,
    pub overlay: Option<FeatureCollection>,
    pub overlay_clears: usize,
    pub overlays_rendered: usize,
    pub view: Option<Extent>,
    pub busy_history: Vec<bool>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.text.as_str())
    }
}

impl MapSurface for RecordingSurface {
    fn set_run_enabled(&mut self, enabled: bool) {
        self.run_enabled = enabled;
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        self.busy_history.push(busy);
    }

    fn show_status(&mut self, status: &StatusMessage) {
        self.status = Some(status.clone());
        self.status_history.push(status.clone());
    }

    fn hide_status(&mut self) {
        self.status = None;
    }

    fn replace_shape(&mut self, bounds: Option<&BoundingBox>) {
        self.shape = bounds.copied();
    }

    fn clear_overlay(&mut self) {
        self.overlay = None;
        self.overlay_clears += 1;
    }

    fn render_overlay(&mut self, collection: &FeatureCollection) {
        self.overlay = Some(collection.clone());
        self.overlays_rendered += 1;
    }

    fn fit_bounds(&mut self, extent: &Extent) {
        self.view = Some(*extent);
    }
}
