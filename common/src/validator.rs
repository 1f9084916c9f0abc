//! 選択面積の上限チェック

use serde::{Deserialize, Serialize};
use std::fmt;

/// 面積上限の既定値 [km²]
pub const DEFAULT_MAX_AREA_SQ_KM: f64 = 3.0;

/// 面積ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaPolicy {
    pub max_area_sq_km: f64,
}

impl Default for AreaPolicy {
    fn default() -> Self {
        Self {
            max_area_sq_km: DEFAULT_MAX_AREA_SQ_KM,
        }
    }
}

/// 判定結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AreaVerdict {
    Valid { area_sq_km: f64 },
    Rejected(AreaRejection),
}

/// 上限超過の詳細（表示用に実測値と上限を保持）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaRejection {
    pub area_sq_km: f64,
    pub max_area_sq_km: f64,
}

impl fmt::Display for AreaRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Area too large: {:.2} km² (maximum {} km²).",
            self.area_sq_km, self.max_area_sq_km
        )
    }
}

impl AreaPolicy {
    pub fn new(max_area_sq_km: f64) -> Self {
        Self { max_area_sq_km }
    }

    /// 上限ちょうどは有効
    pub fn validate(&self, area_sq_km: f64) -> AreaVerdict {
        if area_sq_km > self.max_area_sq_km {
            AreaVerdict::Rejected(AreaRejection {
                area_sq_km,
                max_area_sq_km: self.max_area_sq_km,
            })
        } else {
            AreaVerdict::Valid { area_sq_km }
        }
    }
}

/// 受理時のステータス文言
pub fn accepted_message(area_sq_km: f64) -> String {
    format!(
        "Area selected ({:.3} km²). Run the prediction to proceed.",
        area_sq_km
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_partition() {
        let policy = AreaPolicy::default();
        assert!(matches!(policy.validate(0.0), AreaVerdict::Valid { .. }));
        assert!(matches!(policy.validate(2.999), AreaVerdict::Valid { .. }));
        assert!(matches!(policy.validate(3.0), AreaVerdict::Valid { .. }));
        assert!(matches!(policy.validate(3.000_001), AreaVerdict::Rejected(_)));
        assert!(matches!(policy.validate(413.5), AreaVerdict::Rejected(_)));
    }

    #[test]
    fn test_configurable_ceiling() {
        let policy = AreaPolicy::new(0.5);
        assert!(matches!(policy.validate(0.827), AreaVerdict::Rejected(_)));
        assert!(matches!(AreaPolicy::new(1.0).validate(0.827), AreaVerdict::Valid { .. }));
    }

    #[test]
    fn test_rejection_message() {
        let AreaVerdict::Rejected(rejection) = AreaPolicy::default().validate(413.514) else {
            panic!("expected rejection");
        };
        let text = rejection.to_string();
        assert_eq!(text, "Area too large: 413.51 km² (maximum 3 km²).");
    }

    #[test]
    fn test_accepted_message_uses_three_decimals() {
        assert_eq!(
            accepted_message(0.827_173),
            "Area selected (0.827 km²). Run the prediction to proceed."
        );
    }
}
