// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

use crate::channel::{
    run_agent_channel, run_command_channel, run_span_channel, run_stat_channel, MetadataItem,
    METADATA_BUFFER,
};
use crate::config::AgentConfig;
use crate::encode::epoch_millis;
use crate::error::{AgentError, Result};
use crate::model::{RuntimeObserver, SampleKind, Span, ThreadSnapshotSource, TransactionId};
use crate::stats::{ActiveSpanRegistry, StatsAggregator, StatsCollector};
use crate::transport::{AgentMeta, ConnectionSupervisor};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// The assembled agent: configuration plus the runtime seams the embedding
/// process plugs in.
pub struct Agent {
    config: AgentConfig,
    observer: Arc<dyn RuntimeObserver>,
    threads: Arc<dyn ThreadSnapshotSource>,
}

impl Agent {
    pub fn new(
        config: AgentConfig,
        observer: Arc<dyn RuntimeObserver>,
        threads: Arc<dyn ThreadSnapshotSource>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            observer,
            threads,
        })
    }

    /// Spawn the four channel drivers and hand back the instrumentation
    /// handle.
    ///
    /// Returns immediately; the drivers dial the collector in the background
    /// and keep retrying under backoff, so an unreachable collector never
    /// stalls the host process.
    pub async fn start(self) -> Result<AgentHandle> {
        let config = Arc::new(self.config);
        let start_time_ms = epoch_millis(SystemTime::now());
        let meta = Arc::new(AgentMeta::new(&config, start_time_ms)?);

        // agent and command share the collector's agent port; span and stat
        // get their own connections.
        let agent_supervisor = ConnectionSupervisor::new(config.endpoint(config.agent_port))?;
        let command_supervisor = ConnectionSupervisor::new(config.endpoint(config.agent_port))?;
        let span_supervisor = ConnectionSupervisor::new(config.endpoint(config.span_port))?;
        let stat_supervisor = ConnectionSupervisor::new(config.endpoint(config.stat_port))?;

        let aggregator = Arc::new(StatsAggregator::new());
        let registry = Arc::new(ActiveSpanRegistry::new());
        let collector = StatsCollector::new(
            Arc::clone(&self.observer),
            Arc::clone(&aggregator),
            Arc::clone(&registry),
        );

        // bounded queue between instrumentation and the span uploader;
        // submissions never block, a full queue sheds instead.
        let (span_tx, span_rx) = mpsc::channel(config.span_queue_size);
        // descriptor registrations ride the agent channel under the same
        // shed-not-block rule
        let (metadata_tx, metadata_rx) = mpsc::channel(METADATA_BUFFER);
        let shutdown = CancellationToken::new();

        let drivers = vec![
            tokio::spawn(run_agent_channel(
                agent_supervisor,
                Arc::clone(&meta),
                Arc::clone(&config),
                metadata_rx,
                shutdown.clone(),
            )),
            tokio::spawn(run_span_channel(
                span_supervisor,
                Arc::clone(&meta),
                span_rx,
                config.application_type,
                shutdown.clone(),
            )),
            tokio::spawn(run_stat_channel(
                stat_supervisor,
                Arc::clone(&meta),
                collector,
                config.collect_interval_ms,
                config.stat_batch_count,
                shutdown.clone(),
            )),
            tokio::spawn(run_command_channel(
                command_supervisor,
                Arc::clone(&meta),
                Arc::clone(&registry),
                Arc::clone(&self.threads),
                shutdown.clone(),
            )),
        ];

        info!(
            "Agent {} started for application {}",
            config.agent_id, config.application_name
        );

        Ok(AgentHandle {
            inner: Arc::new(HandleInner {
                agent_id: config.agent_id.clone(),
                start_time_ms,
                span_tx,
                metadata_tx,
                aggregator,
                registry,
                sequence: AtomicI64::new(0),
                shutdown,
                drivers: tokio::sync::Mutex::new(drivers),
            }),
        })
    }
}

struct HandleInner {
    agent_id: String,
    start_time_ms: i64,
    span_tx: mpsc::Sender<Span>,
    metadata_tx: mpsc::Sender<MetadataItem>,
    aggregator: Arc<StatsAggregator>,
    registry: Arc<ActiveSpanRegistry>,
    sequence: AtomicI64,
    shutdown: CancellationToken,
    drivers: tokio::sync::Mutex<Vec<JoinHandle<()>>>,
}

/// Cheaply cloneable entry point for instrumentation.
///
/// Every method is non-blocking and safe to call from any task; telemetry is
/// shed rather than backpressured when the pipeline cannot keep up.
#[derive(Clone)]
pub struct AgentHandle {
    inner: Arc<HandleInner>,
}

impl AgentHandle {
    pub fn agent_id(&self) -> &str {
        &self.inner.agent_id
    }

    /// Agent start time, milliseconds since the Unix epoch. Embedded in
    /// every transaction id this handle issues.
    pub fn start_time_ms(&self) -> i64 {
        self.inner.start_time_ms
    }

    /// Issue the next transaction id. Sequences start at 1 and never repeat
    /// within one agent lifetime.
    pub fn next_transaction_id(&self) -> TransactionId {
        let sequence = self.inner.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        TransactionId {
            agent_id: self.inner.agent_id.clone(),
            start_time: self.inner.start_time_ms,
            sequence,
        }
    }

    /// Queue a finished span for upload.
    pub fn enqueue_span(&self, span: Span) -> Result<()> {
        match self.inner.span_tx.try_send(span) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(AgentError::QueueFull),
            Err(TrySendError::Closed(_)) => Err(AgentError::Unavailable("span")),
        }
    }

    /// [`enqueue_span`](Self::enqueue_span) for callers that only care
    /// whether the span was accepted; drops are logged.
    pub fn try_enqueue_span(&self, span: Span) -> bool {
        let span_id = span.span_id;
        match self.enqueue_span(span) {
            Ok(()) => true,
            Err(e) => {
                warn!("Span {span_id} dropped: {e}");
                false
            }
        }
    }

    /// Announce the descriptor behind an api id so spans can reference it
    /// by id. Best effort: the announcement rides the agent channel and is
    /// dropped, not retried, when the queue is full or shutdown has begun.
    pub fn register_api_metadata(
        &self,
        api_id: i32,
        descriptor: impl Into<String>,
        line: i32,
        api_type: i32,
    ) {
        self.submit_metadata(MetadataItem::Api {
            api_id,
            descriptor: descriptor.into(),
            line,
            api_type,
        });
    }

    /// Announce the normalized statement behind a sql id. Same best-effort
    /// contract as [`register_api_metadata`](Self::register_api_metadata).
    pub fn register_sql_metadata(&self, sql_id: i32, sql: impl Into<String>) {
        self.submit_metadata(MetadataItem::Sql {
            sql_id,
            sql: sql.into(),
        });
    }

    /// Announce the interned string behind a string id. Same best-effort
    /// contract as [`register_api_metadata`](Self::register_api_metadata).
    pub fn register_string_metadata(&self, string_id: i32, value: impl Into<String>) {
        self.submit_metadata(MetadataItem::Str {
            string_id,
            value: value.into(),
        });
    }

    fn submit_metadata(&self, item: MetadataItem) {
        if let Err(e) = self.inner.metadata_tx.try_send(item) {
            debug!("Metadata registration dropped: {e}");
        }
    }

    /// Record one completed transaction's response time in milliseconds.
    pub fn record_response_time(&self, millis: i64) {
        self.inner.aggregator.record_response_time(millis);
    }

    /// Record one sampling decision.
    pub fn record_sample_decision(&self, kind: SampleKind) {
        self.inner.aggregator.record_sample(kind);
    }

    /// Register a span as in flight. Pair with
    /// [`span_ended`](Self::span_ended).
    pub fn span_started(&self, span_id: i64) {
        self.inner.registry.add(span_id, Instant::now());
    }

    pub fn span_ended(&self, span_id: i64) {
        self.inner.registry.remove(span_id);
    }

    /// Current in-flight span ages: under 1s, 1-3s, 3-5s, 5s and over.
    pub fn active_span_histogram(&self) -> [i32; 4] {
        self.inner.registry.histogram(Instant::now())
    }

    /// False once shutdown has begun; telemetry submitted after that is
    /// dropped.
    pub fn is_enabled(&self) -> bool {
        !self.inner.shutdown.is_cancelled()
    }

    /// Stop every channel driver and wait for them to finish. Idempotent;
    /// later calls return once the first completes.
    pub async fn shutdown(&self) {
        self.inner.shutdown.cancel();
        // the lock is held across the joins so a concurrent shutdown cannot
        // return before the drivers are actually down
        let mut drivers = self.inner.drivers.lock().await;
        if drivers.is_empty() {
            return;
        }
        for driver in drivers.drain(..) {
            if let Err(e) = driver.await {
                warn!("A channel driver ended abnormally: {e}");
            }
        }
        info!("Agent {} stopped", self.inner.agent_id);
    }
}
