//! Analytics event batching.
//!
//! Events submitted by pages are validated, queued, and delivered to an
//! [`AnalyticsSink`] in batches. A failed delivery puts the batch back at
//! the front of the queue so it goes out first on the next flush; events
//! are never surfaced as errors to the visitor.
//!
//! # Thread safety
//!
//! The queue sits behind a `tokio::sync::Mutex`. The lock is held only to
//! move events in or out, never across a sink call.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify, watch};
use uuid::Uuid;

use crate::error::AnalyticsError;

/// Longest accepted event name.
pub const MAX_EVENT_NAME_LEN: usize = 64;

/// Most properties one event may carry.
pub const MAX_PROPERTIES: usize = 20;

/// Most events accepted in one client submission.
pub const MAX_EVENTS_PER_SUBMISSION: usize = 100;

/// A single client-side interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: String,
    pub path: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

impl AnalyticsEvent {
    /// Check name, path and property limits.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidEvent`] describing the first violation.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        let invalid = |reason: String| AnalyticsError::InvalidEvent { reason };

        if self.name.is_empty() || self.name.len() > MAX_EVENT_NAME_LEN {
            return Err(invalid(format!(
                "name must be 1-{MAX_EVENT_NAME_LEN} characters"
            )));
        }
        if !self
            .name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "_.:-".contains(c))
        {
            return Err(invalid(format!("name '{}' has invalid characters", self.name)));
        }
        if !self.path.starts_with('/') {
            return Err(invalid(format!("path '{}' must start with '/'", self.path)));
        }
        if self.properties.len() > MAX_PROPERTIES {
            return Err(invalid(format!(
                "{} properties exceeds limit of {MAX_PROPERTIES}",
                self.properties.len()
            )));
        }
        Ok(())
    }
}

/// Events delivered together.
#[derive(Debug, Clone, Serialize)]
pub struct EventBatch {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub events: Vec<AnalyticsEvent>,
}

/// Destination for batches.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    /// Human-readable sink name (for logs).
    fn name(&self) -> &str;

    /// Deliver a batch.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::SinkFailure`] if delivery failed; the
    /// batcher re-queues the events.
    async fn send(&self, batch: &EventBatch) -> Result<(), AnalyticsError>;
}

/// Sink that writes each batch to the log.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl AnalyticsSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, batch: &EventBatch) -> Result<(), AnalyticsError> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for event in &batch.events {
            *counts.entry(event.name.as_str()).or_default() += 1;
        }
        tracing::info!(
            batch_id = %batch.id,
            events = batch.events.len(),
            by_name = ?counts,
            "analytics batch"
        );
        Ok(())
    }
}

/// Batcher tuning.
#[derive(Debug, Clone, Copy)]
pub struct BatcherConfig {
    /// Events per sink call.
    pub batch_size: usize,
    /// Queue bound; the oldest events are dropped beyond it.
    pub max_queue: usize,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            batch_size: 20,
            max_queue: 1000,
        }
    }
}

/// Counters exposed for monitoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatcherStats {
    pub queued: usize,
    pub accepted: u64,
    pub sent: u64,
    pub dropped: u64,
    pub failed_flushes: u64,
}

/// Queue of pending events with a pluggable sink.
pub struct EventBatcher {
    config: BatcherConfig,
    sink: Arc<dyn AnalyticsSink>,
    queue: Mutex<VecDeque<AnalyticsEvent>>,
    ready: Notify,
    accepted: AtomicU64,
    sent: AtomicU64,
    dropped: AtomicU64,
    failed_flushes: AtomicU64,
}

impl std::fmt::Debug for EventBatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBatcher")
            .field("config", &self.config)
            .field("sink", &self.sink.name())
            .finish_non_exhaustive()
    }
}

impl EventBatcher {
    #[must_use]
    pub fn new(config: BatcherConfig, sink: Arc<dyn AnalyticsSink>) -> Self {
        let config = BatcherConfig {
            batch_size: config.batch_size.max(1),
            max_queue: config.max_queue.max(1),
        };
        Self {
            config,
            sink,
            queue: Mutex::new(VecDeque::new()),
            ready: Notify::new(),
            accepted: AtomicU64::new(0),
            sent: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            failed_flushes: AtomicU64::new(0),
        }
    }

    /// Queue validated events. Returns how many were accepted.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::BatchTooLarge`] for oversized submissions
    /// and [`AnalyticsError::InvalidEvent`] if any event fails validation;
    /// in both cases nothing is queued.
    pub async fn submit(&self, events: Vec<AnalyticsEvent>) -> Result<usize, AnalyticsError> {
        if events.len() > MAX_EVENTS_PER_SUBMISSION {
            return Err(AnalyticsError::BatchTooLarge {
                count: events.len(),
                limit: MAX_EVENTS_PER_SUBMISSION,
            });
        }
        for event in &events {
            event.validate()?;
        }
        let count = events.len();
        for event in events {
            self.push(event).await;
        }
        Ok(count)
    }

    /// Queue one event, dropping the oldest if the queue is full.
    pub async fn push(&self, event: AnalyticsEvent) {
        let len = {
            let mut queue = self.queue.lock().await;
            if queue.len() >= self.config.max_queue {
                queue.pop_front();
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
            queue.push_back(event);
            queue.len()
        };
        self.accepted.fetch_add(1, Ordering::Relaxed);
        if len >= self.config.batch_size {
            self.ready.notify_one();
        }
    }

    /// Send every full-or-partial batch currently queued.
    ///
    /// Stops at the first sink failure; the failed batch goes back to the
    /// front of the queue. Returns the number of events delivered.
    pub async fn flush(&self) -> usize {
        self.flush_batches().await.delivered
    }

    async fn flush_batches(&self) -> FlushOutcome {
        let mut delivered = 0;
        loop {
            let events: Vec<AnalyticsEvent> = {
                let mut queue = self.queue.lock().await;
                let n = queue.len().min(self.config.batch_size);
                queue.drain(..n).collect()
            };
            if events.is_empty() {
                return FlushOutcome {
                    delivered,
                    failed: false,
                };
            }

            let batch = EventBatch {
                id: Uuid::new_v4(),
                created_at: Utc::now(),
                events,
            };

            match self.sink.send(&batch).await {
                Ok(()) => {
                    let n = batch.events.len();
                    delivered += n;
                    self.sent.fetch_add(n as u64, Ordering::Relaxed);
                }
                Err(e) => {
                    self.failed_flushes.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(
                        sink = %self.sink.name(),
                        batch_id = %batch.id,
                        events = batch.events.len(),
                        error = %e,
                        "analytics flush failed, re-queueing"
                    );
                    self.requeue(batch.events).await;
                    return FlushOutcome {
                        delivered,
                        failed: true,
                    };
                }
            }
        }
    }

    /// Put undelivered events back at the front, preserving order.
    async fn requeue(&self, events: Vec<AnalyticsEvent>) {
        let mut queue = self.queue.lock().await;
        for event in events.into_iter().rev() {
            queue.push_front(event);
        }
        while queue.len() > self.config.max_queue {
            queue.pop_back();
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Current counters.
    pub async fn stats(&self) -> BatcherStats {
        BatcherStats {
            queued: self.queue.lock().await.len(),
            accepted: self.accepted.load(Ordering::Relaxed),
            sent: self.sent.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            failed_flushes: self.failed_flushes.load(Ordering::Relaxed),
        }
    }

    /// Flush loop: every `interval`, or early when a full batch is waiting.
    /// After a failed delivery, early flushes wait for the next tick.
    /// Drains once more when `shutdown` fires.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        let mut backoff = false;
        tracing::info!(
            interval_secs = interval.as_secs(),
            batch_size = self.config.batch_size,
            sink = %self.sink.name(),
            "analytics flush worker started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = self.flush_batches().await;
                    backoff = outcome.failed;
                    if outcome.delivered > 0 {
                        tracing::debug!(delivered = outcome.delivered, "analytics flush tick");
                    }
                }
                () = self.ready.notified() => {
                    if backoff {
                        continue;
                    }
                    backoff = self.flush_batches().await.failed;
                }
                _ = shutdown.changed() => {
                    let n = self.flush().await;
                    tracing::info!(delivered = n, "analytics flush worker shutting down");
                    return;
                }
            }
        }
    }
}

struct FlushOutcome {
    delivered: usize,
    failed: bool,
}
