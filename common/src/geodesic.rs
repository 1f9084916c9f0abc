//! 矩形範囲の地表面積
//!
//! 北東の角から西辺・南辺への大円距離を幅・高さとし、その積を面積とする。
//! 楕円体上の正確なポリゴン面積ではなく平面近似であり、上限 (数 km²) 程度の
//! 小さな範囲でのみ誤差が無視できる。

use crate::bbox::BoundingBox;

/// 地球半径 [m]（球近似、地図ライブラリの距離計算と同じ値）
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const SQ_M_PER_SQ_KM: f64 = 1_000_000.0;

/// 2点間の大円距離 [m]（haversine）
pub fn distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// 矩形の面積 [km²]
pub fn compute_area_sq_km(bounds: &BoundingBox) -> f64 {
    let width = distance_m(bounds.north(), bounds.east(), bounds.north(), bounds.west());
    let height = distance_m(bounds.north(), bounds.east(), bounds.south(), bounds.east());
    (width * height) / SQ_M_PER_SQ_KM
}
