//! 推論結果（GeoJSON）と結果状態

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// 建物ポリゴンの FeatureCollection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

fn feature_type() -> String {
    "Feature".to_string()
}

impl FeatureCollection {
    /// レスポンス本文をパース
    pub fn from_json(text: &str) -> Result<Self> {
        let collection: FeatureCollection = serde_json::from_str(text)?;
        if collection.kind != "FeatureCollection" {
            return Err(Error::InvalidGeoJson(format!(
                "expected FeatureCollection, got {}",
                collection.kind
            )));
        }
        Ok(collection)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// 全ジオメトリの外接範囲。座標が1つも無ければ `None`
    pub fn extent(&self) -> Option<Extent> {
        let mut acc: Option<[f64; 4]> = None;
        for geometry in self.features.iter().filter_map(|f| f.geometry.as_ref()) {
            collect_positions(&geometry.coordinates, &mut acc);
        }
        let [west, south, east, north] = acc?;
        Some(Extent {
            west,
            south,
            east,
            north,
        })
    }
}

/// 推論結果の外接範囲
///
/// 選択範囲と違い幅・高さゼロ（1点や一直線）も許す。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Extent {
    pub fn to_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }

    /// 中心座標 (lat, lon)
    pub fn center(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }

    pub fn is_point(&self) -> bool {
        self.west == self.east && self.south == self.north
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

/// 入れ子の座標配列を辿って [lon, lat] を集める
fn collect_positions(value: &Value, acc: &mut Option<[f64; 4]>) {
    let Value::Array(items) = value else {
        return;
    };

    if let [Value::Number(lon), Value::Number(lat), ..] = items.as_slice() {
        if let (Some(lon), Some(lat)) = (lon.as_f64(), lat.as_f64()) {
            let extent = acc.get_or_insert([lon, lat, lon, lat]);
            extent[0] = extent[0].min(lon);
            extent[1] = extent[1].min(lat);
            extent[2] = extent[2].max(lon);
            extent[3] = extent[3].max(lat);
        }
        return;
    }

    for item in items {
        collect_positions(item, acc);
    }
}

/// 失敗の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 通信失敗・タイムアウト・キャンセル
    Network,
    /// 2xx 以外のステータス
    Http,
    /// レスポンス本文が不正
    Parse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network"),
            FailureKind::Http => write!(f, "http"),
            FailureKind::Parse => write!(f, "parse"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl fmt::Display for PredictionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// 1回の推論リクエストの結果
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Pending,
    Success {
        collection: FeatureCollection,
        count: usize,
    },
    Failure(PredictionFailure),
}

impl PredictionOutcome {
    pub fn success(collection: FeatureCollection) -> Self {
        let count = collection.len();
        PredictionOutcome::Success { collection, count }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        PredictionOutcome::Failure(PredictionFailure {
            kind,
            message: message.into(),
        })
    }

    /// 2xx 以外のレスポンス
    pub fn http_error(status: u16, body: &str) -> Self {
        Self::failure(FailureKind::Http, format!("HTTP {}: {}", status, body))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, PredictionOutcome::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BUILDINGS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"id": 1},
             "geometry": {"type": "Polygon", "coordinates": [[[2.001, 48.001], [2.002, 48.001], [2.002, 48.002], [2.001, 48.001]]]}},
            {"type": "Feature", "properties": {"id": 2},
             "geometry": {"type": "Polygon", "coordinates": [[[2.005, 48.006], [2.007, 48.006], [2.007, 48.008], [2.005, 48.006]]]}}
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let collection = FeatureCollection::from_json(TWO_BUILDINGS).unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.features[0].properties["id"], 1);
    }

    #[test]
    fn test_parse_without_features_counts_zero() {
        let collection = FeatureCollection::from_json(r#"{"type":"FeatureCollection"}"#).unwrap();
        assert!(collection.is_empty());
        assert!(collection.extent().is_none());
    }

    #[test]
    fn test_parse_rejects_other_payloads() {
        assert!(FeatureCollection::from_json("not json").is_err());
        assert!(FeatureCollection::from_json(r#"{"detail":"ok"}"#).is_err());
        assert!(FeatureCollection::from_json(r#"{"type":"Point","coordinates":[0,0]}"#).is_err());
    }

    #[test]
    fn test_extent_covers_all_polygons() {
        let extent = FeatureCollection::from_json(TWO_BUILDINGS)
            .unwrap()
            .extent()
            .unwrap();
        assert_eq!(extent.to_array(), [2.001, 48.001, 2.007, 48.008]);
    }

    #[test]
    fn test_extent_handles_multipolygon_and_null_geometry() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":null,"properties":{}},
            {"type":"Feature","properties":{},"geometry":{"type":"MultiPolygon","coordinates":
                [[[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,0.0]]],[[[3.0,2.0],[4.0,2.0],[4.0,3.0],[3.0,2.0]]]]}}
        ]}"#;
        let extent = FeatureCollection::from_json(text).unwrap().extent().unwrap();
        assert_eq!(extent.to_array(), [0.0, 0.0, 4.0, 3.0]);
    }

    #[test]
    fn test_extent_of_single_point() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[2.0,48.0]}}
        ]}"#;
        let extent = FeatureCollection::from_json(text).unwrap().extent().unwrap();
        assert!(extent.is_point());
        assert_eq!(extent.center(), (48.0, 2.0));
    }

    #[test]
    fn test_extent_of_features_on_one_line() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[2.0,48.0]}},
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[2.5,48.0]}}
        ]}"#;
        let extent = FeatureCollection::from_json(text).unwrap().extent().unwrap();
        assert!(!extent.is_point());
        assert_eq!(extent.to_array(), [2.0, 48.0, 2.5, 48.0]);
    }

    #[test]
    fn test_http_error_message() {
        let outcome = PredictionOutcome::http_error(500, "model load failed");
        let PredictionOutcome::Failure(failure) = outcome else {
            panic!("expected failure");
        };
        assert_eq!(failure.kind, FailureKind::Http);
        assert_eq!(failure.message, "HTTP 500: model load failed");
    }
}
