// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

//! Transport and telemetry core of the lookout APM agent.
//!
//! The crate keeps four independent streaming channels to a collector alive
//! (agent identity + keepalive ping, span upload, stat upload, and the
//! bidirectional command session), encodes the internal span/stat/command
//! model onto the wire, and aggregates runtime metrics without blocking the
//! instrumented application.
//!
//! The embedding process supplies an [`AgentConfig`] plus implementations of
//! the [`RuntimeObserver`] and [`ThreadSnapshotSource`] seams, then calls
//! [`Agent::start`]. Instrumentation feeds the returned [`AgentHandle`]:
//! completed spans, response times, sampling decisions, span start/end
//! events, and the api/sql/string descriptors behind the ids spans carry.
//! Telemetry delivery is best effort by design; a collector outage costs
//! data, never application latency.

mod agent;
mod channel;
pub mod config;
pub mod encode;
pub mod error;
pub mod model;
pub mod stats;
pub mod transport;

pub use agent::{Agent, AgentHandle};
pub use config::AgentConfig;
pub use error::{AgentError, Result};
pub use model::{
    Annotation, AnnotationValue, Exception, RateSnapshot, RuntimeObserver, RuntimeReading,
    SampleKind, Span, SpanEvent, StatSample, TaskState, ThreadInfo, ThreadSnapshot,
    ThreadSnapshotSource, TransactionId,
};
pub use stats::{ActiveSpanRegistry, StatsAggregator};

/// Agent version reported in identity registration and thread dumps.
pub const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");
