//! fAIr Predictor Common Library
//!
//! 範囲選択・面積検証・推論リクエスト・セッション状態機械。
//! 入出力を持たず、CLI や他のフロントエンドから共有される。

pub mod bbox;
pub mod deployment;
pub mod error;
pub mod geodesic;
pub mod outcome;
pub mod request;
pub mod selection;
pub mod session;
pub mod surface;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod validator;

pub use bbox::BoundingBox;
pub use deployment::{Deployment, ResolvedConfig};
pub use error::{Error, Result};
pub use geodesic::{compute_area_sq_km, distance_m};
pub use outcome::{
    Extent, FailureKind, Feature, FeatureCollection, PredictionFailure, PredictionOutcome,
};
pub use request::{PredictionConfig, PredictionRequest};
pub use selection::{Selection, SelectionChange, SelectionController};
pub use session::{PredictionSession, SessionState, SubmitGuard};
pub use surface::{DrawEvent, MapSurface, StatusLevel, StatusMessage};
pub use validator::{AreaPolicy, AreaRejection, AreaVerdict};
