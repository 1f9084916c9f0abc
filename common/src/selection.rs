//! 選択範囲の管理
//!
//! 選択は常に高々1つ。新しい描画は前の選択を捨ててから評価する。

use crate::bbox::BoundingBox;
use crate::geodesic::compute_area_sq_km;
use crate::surface::StatusMessage;
use crate::validator::{accepted_message, AreaPolicy, AreaRejection, AreaVerdict};

/// 現在の選択範囲
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub bounds: BoundingBox,
    pub area_sq_km: f64,
    pub valid: bool,
}

/// 描画イベントの評価結果
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionChange {
    Accepted(Selection),
    Rejected(AreaRejection),
    Cleared,
}

impl SelectionChange {
    /// 表示するステータス（`None` は非表示）
    pub fn status(&self) -> Option<StatusMessage> {
        match self {
            SelectionChange::Accepted(selection) => {
                Some(StatusMessage::info(accepted_message(selection.area_sq_km)))
            }
            SelectionChange::Rejected(rejection) => {
                Some(StatusMessage::error(rejection.to_string()))
            }
            SelectionChange::Cleared => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    policy: AreaPolicy,
    current: Option<Selection>,
    /// 直前の描画が上限超過だった場合の詳細
    rejection: Option<AreaRejection>,
}

impl SelectionController {
    pub fn new(policy: AreaPolicy) -> Self {
        Self {
            policy,
            current: None,
            rejection: None,
        }
    }

    pub fn policy(&self) -> &AreaPolicy {
        &self.policy
    }

    pub fn on_area_drawn(&mut self, bounds: BoundingBox) -> SelectionChange {
        self.current = None;
        self.rejection = None;

        let area_sq_km = compute_area_sq_km(&bounds);
        match self.policy.validate(area_sq_km) {
            AreaVerdict::Valid { area_sq_km } => {
                let selection = Selection {
                    bounds,
                    area_sq_km,
                    valid: true,
                };
                self.current = Some(selection);
                SelectionChange::Accepted(selection)
            }
            AreaVerdict::Rejected(rejection) => {
                self.rejection = Some(rejection);
                SelectionChange::Rejected(rejection)
            }
        }
    }

    pub fn on_area_cleared(&mut self) -> SelectionChange {
        self.current = None;
        self.rejection = None;
        SelectionChange::Cleared
    }

    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    pub fn current_bounds(&self) -> Option<BoundingBox> {
        self.current.map(|s| s.bounds)
    }

    pub fn last_rejection(&self) -> Option<&AreaRejection> {
        self.rejection.as_ref()
    }

    /// 実行可能な選択があるか
    pub fn has_valid_selection(&self) -> bool {
        self.current.map(|s| s.valid).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::StatusLevel;

    fn small() -> BoundingBox {
        BoundingBox::new(2.0, 48.0, 2.01, 48.01).unwrap()
    }

    fn huge() -> BoundingBox {
        BoundingBox::new(0.0, 45.0, 5.0, 45.01).unwrap()
    }

    #[test]
    fn test_accepts_small_area() {
        let mut controller = SelectionController::default();
        let change = controller.on_area_drawn(small());

        assert!(matches!(change, SelectionChange::Accepted(_)));
        assert!(controller.has_valid_selection());
        assert_eq!(controller.current_bounds(), Some(small()));

        let status = change.status().unwrap();
        assert_eq!(status.level, StatusLevel::Info);
        assert!(status.text.contains("0.827 km²"));
    }

    #[test]
    fn test_rejection_discards_previous_selection() {
        let mut controller = SelectionController::default();
        controller.on_area_drawn(small());
        let change = controller.on_area_drawn(huge());

        assert!(matches!(change, SelectionChange::Rejected(_)));
        assert!(controller.current().is_none());
        assert!(!controller.has_valid_selection());

        let status = change.status().unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.text.contains("maximum 3 km²"));

        let rejection = controller.last_rejection().unwrap();
        assert!(rejection.area_sq_km > 3.0);
        assert_eq!(rejection.max_area_sq_km, 3.0);
    }

    #[test]
    fn test_rejection_is_forgotten_on_redraw_and_clear() {
        let mut controller = SelectionController::default();
        controller.on_area_drawn(huge());
        controller.on_area_drawn(small());
        assert!(controller.last_rejection().is_none());

        controller.on_area_drawn(huge());
        controller.on_area_cleared();
        assert!(controller.last_rejection().is_none());
    }

    #[test]
    fn test_redraw_replaces_selection() {
        let mut controller = SelectionController::default();
        controller.on_area_drawn(small());
        let other = BoundingBox::new(-0.13, 51.5, -0.12, 51.51).unwrap();
        controller.on_area_drawn(other);

        assert_eq!(controller.current_bounds(), Some(other));
    }

    #[test]
    fn test_clear() {
        let mut controller = SelectionController::default();
        controller.on_area_drawn(small());
        let change = controller.on_area_cleared();

        assert_eq!(change, SelectionChange::Cleared);
        assert!(change.status().is_none());
        assert!(controller.current().is_none());
    }

    #[test]
    fn test_half_globe_box_is_measured_and_rejected() {
        // 経度幅の上限ちょうどの矩形は大円距離でも正しく測れる
        let mut controller = SelectionController::default();
        let wide = BoundingBox::new(-90.0, 0.0, 90.0, 0.01).unwrap();
        let SelectionChange::Rejected(rejection) = controller.on_area_drawn(wide) else {
            panic!("expected rejection");
        };
        assert!(rejection.area_sq_km > 1000.0);
        assert!(!controller.has_valid_selection());
    }

    #[test]
    fn test_unmeasurable_boxes_never_reach_the_controller() {
        for (w, s, e, n) in [
            (-180.0, 0.0, 180.0, 90.0),
            (-179.99, 48.0, 179.99, 48.01),
            (-180.0, -10.0, 180.0, 10.0),
        ] {
            assert!(BoundingBox::new(w, s, e, n).is_err(), "{},{},{},{}", w, s, e, n);
        }
    }

    #[test]
    fn test_policy_is_configurable() {
        let mut controller = SelectionController::new(AreaPolicy::new(0.5));
        assert!(matches!(
            controller.on_area_drawn(small()),
            SelectionChange::Rejected(_)
        ));
        assert_eq!(controller.policy().max_area_sq_km, 0.5);
    }
}
