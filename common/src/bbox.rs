//! 緯度経度に沿った矩形範囲（WGS84）

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Web メルカトル地図で描ける緯度の上限 [deg]
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// 1つの矩形が跨げる経度幅の上限 [deg]
pub const MAX_LONGITUDE_SPAN: f64 = 180.0;

/// 選択範囲の矩形
///
/// 生成後は不変。再描画時は作り直す。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

impl BoundingBox {
    /// 検証付きで矩形を生成
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self> {
        if ![west, south, east, north].iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidBounds("coordinates must be finite".into()));
        }
        let latitude = -MAX_LATITUDE..=MAX_LATITUDE;
        if !latitude.contains(&south) || !latitude.contains(&north) {
            return Err(Error::InvalidBounds(format!(
                "latitude out of range: south={}, north={}",
                south, north
            )));
        }
        if !(-180.0..=180.0).contains(&west) || !(-180.0..=180.0).contains(&east) {
            return Err(Error::InvalidBounds(format!(
                "longitude out of range: west={}, east={}",
                west, east
            )));
        }
        if west >= east {
            return Err(Error::InvalidBounds(format!("west ({}) must be < east ({})", west, east)));
        }
        // 幅は大円距離で測るため、半周を超える矩形は面積を測れない
        if east - west > MAX_LONGITUDE_SPAN {
            return Err(Error::InvalidBounds(format!(
                "longitude span too wide: {} (maximum {})",
                east - west,
                MAX_LONGITUDE_SPAN
            )));
        }
        if south >= north {
            return Err(Error::InvalidBounds(format!(
                "south ({}) must be < north ({})",
                south, north
            )));
        }
        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    /// 送信用の `[west, south, east, north]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }

    /// 中心座標 (lat, lon)
    pub fn center(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }

    /// `other` が完全に内側にあるか（境界を含む）
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.west <= other.west
            && self.south <= other.south
            && self.east >= other.east
            && self.north >= other.north
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

/// `"west,south,east,north"` 形式
impl FromStr for BoundingBox {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|e| Error::InvalidBounds(format!("'{}': {}", part.trim(), e)))
            })
            .collect::<Result<Vec<f64>>>()?;

        match values.as_slice() {
            [west, south, east, north] => Self::new(*west, *south, *east, *north),
            _ => Err(Error::InvalidBounds(format!(
                "expected 4 values (west,south,east,north), got {}",
                values.len()
            ))),
        }
    }
}
