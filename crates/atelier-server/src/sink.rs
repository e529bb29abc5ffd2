//! Analytics sink that forwards batches to an HTTP collector.

use std::time::Duration;

use async_trait::async_trait;

use atelier_core::analytics::{AnalyticsSink, EventBatch};
use atelier_core::error::AnalyticsError;

const FORWARD_TIMEOUT: Duration = Duration::from_secs(5);

/// POSTs each batch as JSON to a collector URL.
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    url: String,
}

impl HttpSink {
    /// Sink forwarding to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::SinkFailure`] if the HTTP client cannot be
    /// built.
    pub fn new(url: impl Into<String>) -> Result<Self, AnalyticsError> {
        let client = reqwest::Client::builder()
            .timeout(FORWARD_TIMEOUT)
            .user_agent(concat!("atelier/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AnalyticsError::SinkFailure {
                sink: "http".to_owned(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl AnalyticsSink for HttpSink {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, batch: &EventBatch) -> Result<(), AnalyticsError> {
        let failure = |reason: String| AnalyticsError::SinkFailure {
            sink: "http".to_owned(),
            reason,
        };

        let response = self
            .client
            .post(&self.url)
            .json(batch)
            .send()
            .await
            .map_err(|e| failure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failure(format!("collector returned {status}")));
        }

        tracing::debug!(batch_id = %batch.id, events = batch.events.len(), "analytics batch forwarded");
        Ok(())
    }
}
