//! 端末向けの表示実装
//!
//! ステータスは標準出力へ、処理中はスピナー、推論結果はGeoJSONファイルへ書き出す。

use chrono::{DateTime, Local};
use fair_predictor_common::{
    BoundingBox, Extent, FeatureCollection, MapSurface, StatusLevel, StatusMessage,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 推論結果の書き出し先
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayTarget {
    /// 書き出さない（メモリ上のみ）
    Memory,
    /// 固定ファイル（毎回上書き）
    File(PathBuf),
    /// ディレクトリ内に時刻付きファイル名で書き出す
    Directory(PathBuf),
}

impl OverlayTarget {
    fn path_for(&self, now: DateTime<Local>) -> Option<PathBuf> {
        match self {
            OverlayTarget::Memory => None,
            OverlayTarget::File(path) => Some(path.clone()),
            OverlayTarget::Directory(dir) => Some(dir.join(timestamped_name(now))),
        }
    }
}

/// `predictions-YYYYMMDD-HHMMSS.geojson`
pub fn timestamped_name(now: DateTime<Local>) -> String {
    format!("predictions-{}.geojson", now.format("%Y%m%d-%H%M%S"))
}

pub struct TerminalSurface {
    target: OverlayTarget,
    spinner: Option<ProgressBar>,
    run_enabled: bool,
    overlay: Option<FeatureCollection>,
    written: Option<PathBuf>,
}

impl TerminalSurface {
    pub fn new(target: OverlayTarget) -> Self {
        Self {
            target,
            spinner: None,
            run_enabled: false,
            overlay: None,
            written: None,
        }
    }

    pub fn run_enabled(&self) -> bool {
        self.run_enabled
    }

    pub fn overlay(&self) -> Option<&FeatureCollection> {
        self.overlay.as_ref()
    }

    /// 最後に書き出したGeoJSONファイル
    pub fn written_path(&self) -> Option<&Path> {
        self.written.as_deref()
    }

    fn print(&self, line: &str) {
        match &self.spinner {
            Some(spinner) => spinner.println(line),
            None => println!("{}", line),
        }
    }
}

impl MapSurface for TerminalSurface {
    fn set_run_enabled(&mut self, enabled: bool) {
        self.run_enabled = enabled;
    }

    fn set_busy(&mut self, busy: bool) {
        if busy {
            if self.spinner.is_none() {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.cyan} {msg} [{elapsed}]")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                spinner.set_message("推論中...");
                spinner.enable_steady_tick(Duration::from_millis(100));
                self.spinner = Some(spinner);
            }
        } else if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn show_status(&mut self, status: &StatusMessage) {
        let mark = match status.level {
            StatusLevel::Info => "ℹ",
            StatusLevel::Success => "✔",
            StatusLevel::Error => "✖",
        };
        self.print(&format!("{} {}", mark, status.text));
    }

    fn hide_status(&mut self) {}

    fn replace_shape(&mut self, bounds: Option<&BoundingBox>) {
        match bounds {
            Some(bounds) => tracing::debug!(%bounds, "shape displayed"),
            None => tracing::debug!("shape removed"),
        }
    }

    fn clear_overlay(&mut self) {
        self.overlay = None;
    }

    fn render_overlay(&mut self, collection: &FeatureCollection) {
        self.overlay = Some(collection.clone());

        let Some(path) = self.target.path_for(Local::now()) else {
            return;
        };
        let written = serde_json::to_string_pretty(collection)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => {
                self.print(&format!("  → {}", path.display()));
                self.written = Some(path);
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to write overlay");
                self.print(&format!("✖ GeoJSONの書き出しに失敗: {} ({})", path.display(), e));
            }
        }
    }

    fn fit_bounds(&mut self, extent: &Extent) {
        self.print(&format!("  表示範囲: {}", extent));
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}
