//! 地図・描画UIとの境界
//!
//! セッションは具体的な地図ウィジェットを知らず、このトレイト経由で表示を更新する。
//! 入力側は `DrawEvent` を発行するだけで、選択状態を直接書き換えない。

use crate::bbox::BoundingBox;
use crate::outcome::{Extent, FeatureCollection};

/// 描画ツールからのイベント
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawEvent {
    /// 矩形の描画・編集が完了した
    AreaDrawn(BoundingBox),
    /// 矩形が削除された
    AreaCleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

/// ステータス表示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }
}

/// 地図側が提供する表示機能
pub trait MapSurface {
    /// 実行ボタンの有効/無効
    fn set_run_enabled(&mut self, enabled: bool);

    /// 処理中インジケータ
    fn set_busy(&mut self, busy: bool);

    fn show_status(&mut self, status: &StatusMessage);

    fn hide_status(&mut self);

    /// 表示中の矩形を置き換える（`None` で消去）
    fn replace_shape(&mut self, bounds: Option<&BoundingBox>);

    /// 推論結果レイヤーを消去
    fn clear_overlay(&mut self);

    fn render_overlay(&mut self, collection: &FeatureCollection);

    /// 表示範囲を合わせる
    fn fit_bounds(&mut self, extent: &Extent);
}

impl<S: MapSurface + ?Sized> MapSurface for &mut S {
    fn set_run_enabled(&mut self, enabled: bool) {
        (**self).set_run_enabled(enabled)
    }

    fn set_busy(&mut self, busy: bool) {
        (**self).set_busy(busy)
    }

    fn show_status(&mut self, status: &StatusMessage) {
        (**self).show_status(status)
    }

    fn hide_status(&mut self) {
        (**self).hide_status()
    }

    fn replace_shape(&mut self, bounds: Option<&BoundingBox>) {
        (**self).replace_shape(bounds)
    }

    fn clear_overlay(&mut self) {
        (**self).clear_overlay()
    }

    fn render_overlay(&mut self, collection: &FeatureCollection) {
        (**self).render_overlay(collection)
    }

    fn fit_bounds(&mut self, extent: &Extent) {
        (**self).fit_bounds(extent)
    }
}
