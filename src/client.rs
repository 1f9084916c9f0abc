//! 推論サーバーへの送信
//!
//! すべての失敗は `PredictionOutcome::Failure` に変換し、呼び出し側には返さない。

use crate::error::{PredictorError, Result, TransportError};
use async_trait::async_trait;
use fair_predictor_common::{FailureKind, FeatureCollection, PredictionOutcome, PredictionRequest};
use std::time::Duration;

/// HTTPレスポンス（ステータスと本文）
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait PredictionTransport: Send + Sync {
    /// リクエストをJSONで POST する。ステータスに関わらず応答があれば `Ok`
    async fn post_json(
        &self,
        url: &str,
        request: &PredictionRequest,
    ) -> std::result::Result<RawResponse, TransportError>;
}

/// reqwest による実装
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fair-predictor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PredictorError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PredictionTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        request: &PredictionRequest,
    ) -> std::result::Result<RawResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(TransportError::Send)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(TransportError::ReadBody)?;

        Ok(RawResponse { status, body })
    }
}

/// 推論クライアント
pub struct PredictionClient<T: PredictionTransport = HttpTransport> {
    transport: T,
    deadline: Option<Duration>,
}

impl PredictionClient<HttpTransport> {
    pub fn http() -> Result<Self> {
        Ok(Self::new(HttpTransport::new()?))
    }
}

impl<T: PredictionTransport> PredictionClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            deadline: None,
        }
    }

    /// 明示的な締め切りを設定
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn submit(&self, request: &PredictionRequest, endpoint: &str) -> PredictionOutcome {
        let call = self.transport.post_json(endpoint, request);
        let result = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, call)
                .await
                .unwrap_or(Err(TransportError::TimedOut(deadline))),
            None => call.await,
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(endpoint, error = %e, "prediction transport failed");
                return PredictionOutcome::failure(FailureKind::Network, e.to_string());
            }
        };

        tracing::debug!(
            status = response.status,
            bytes = response.body.len(),
            "prediction response"
        );

        if !(200..300).contains(&response.status) {
            return PredictionOutcome::http_error(response.status, &response.body);
        }

        match FeatureCollection::from_json(&response.body) {
            Ok(collection) => PredictionOutcome::success(collection),
            Err(e) => PredictionOutcome::failure(
                FailureKind::Parse,
                format!("invalid prediction response: {}", e),
            ),
        }
    }
}
