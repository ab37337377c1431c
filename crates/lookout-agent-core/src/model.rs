// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

//! Internal telemetry model produced by instrumentation and consumed by the
//! wire encoders.

use std::fmt;
use std::time::{Duration, SystemTime};

/// Annotation key carrying an operation name when no registered api id
/// exists for it.
pub const ANNOTATION_API: i32 = 12;

/// Identity of one traced transaction, unique across agent restarts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionId {
    pub agent_id: String,
    /// Agent start time, milliseconds since the Unix epoch.
    pub start_time: i64,
    pub sequence: i64,
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}^{}^{}", self.agent_id, self.start_time, self.sequence)
    }
}

/// A completed unit of traced work.
///
/// `async_id == 0` marks the root of a transaction; any other value marks a
/// branch that ran asynchronously and is reported as a chunk.
#[derive(Debug, Clone)]
pub struct Span {
    pub transaction_id: TransactionId,
    pub span_id: i64,
    /// 0 when this span starts the transaction.
    pub parent_span_id: i64,
    pub service_type: i32,
    /// Registered operation id; 0 means `operation_name` travels as an
    /// annotation instead.
    pub api_id: i32,
    pub operation_name: String,
    pub rpc_name: String,
    pub end_point: String,
    pub remote_addr: String,
    pub parent_application_name: String,
    pub parent_application_type: i32,
    pub acceptor_host: String,
    pub start_time: SystemTime,
    pub duration: Duration,
    pub flags: i32,
    pub err: i32,
    pub logging_info: i32,
    pub annotations: Vec<Annotation>,
    pub events: Vec<SpanEvent>,
    pub async_id: i32,
    pub async_sequence: i32,
}

impl Span {
    pub fn new(transaction_id: TransactionId, span_id: i64) -> Self {
        Self {
            transaction_id,
            span_id,
            parent_span_id: 0,
            service_type: 0,
            api_id: 0,
            operation_name: String::new(),
            rpc_name: String::new(),
            end_point: String::new(),
            remote_addr: String::new(),
            parent_application_name: String::new(),
            parent_application_type: 0,
            acceptor_host: String::new(),
            start_time: SystemTime::now(),
            duration: Duration::ZERO,
            flags: 0,
            err: 0,
            logging_info: 0,
            annotations: Vec::new(),
            events: Vec::new(),
            async_id: 0,
            async_sequence: 0,
        }
    }
}

/// One instrumented operation inside a span.
#[derive(Debug, Clone, Default)]
pub struct SpanEvent {
    pub sequence: i32,
    pub depth: i32,
    /// Offset from the owning span's start, milliseconds.
    pub start_elapsed_ms: i32,
    pub duration_ms: i32,
    pub service_type: i32,
    pub api_id: i32,
    pub operation_name: String,
    pub annotations: Vec<Annotation>,
    pub exception: Option<Exception>,
    /// Span id handed to the downstream callee, when one exists.
    pub next_span_id: i64,
    pub end_point: String,
    /// Non-empty when this event handed work to a remote destination.
    pub destination_id: String,
    /// Async branch id spawned by this event, or 0.
    pub async_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exception {
    pub func_id: i32,
    pub message: String,
}

/// One key/value attached to a span or span event. The containing list keeps
/// insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub key: i32,
    pub value: AnnotationValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Int(i32),
    Str(String),
    StrStr(String, String),
    IntStrStr(i32, String, String),
    LongIntIntByteByteStr(i64, i32, i32, i32, i32, String),
}

impl Annotation {
    pub fn int(key: i32, value: i32) -> Self {
        Self {
            key,
            value: AnnotationValue::Int(value),
        }
    }

    pub fn string(key: i32, value: impl Into<String>) -> Self {
        Self {
            key,
            value: AnnotationValue::Str(value.into()),
        }
    }

    pub fn string_string(key: i32, first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            key,
            value: AnnotationValue::StrStr(first.into(), second.into()),
        }
    }

    pub fn int_string_string(
        key: i32,
        int_value: i32,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self {
            key,
            value: AnnotationValue::IntStrStr(int_value, first.into(), second.into()),
        }
    }

    pub fn long_int_int_byte_byte_string(
        key: i32,
        long_value: i64,
        int1: i32,
        int2: i32,
        byte1: i32,
        byte2: i32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            key,
            value: AnnotationValue::LongIntIntByteByteStr(
                long_value,
                int1,
                int2,
                byte1,
                byte2,
                text.into(),
            ),
        }
    }
}

/// Outcome of one transaction sampling decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    SampledNew,
    SampledContinuation,
    UnsampledNew,
    UnsampledContinuation,
    SkippedNew,
    SkippedContinuation,
}

/// Reset-on-read output of the stats aggregator. Counter fields are
/// per-second rates over the snapshot window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateSnapshot {
    pub response_avg_ms: i64,
    pub response_max_ms: i64,
    pub sampled_new: i64,
    pub sampled_continuation: i64,
    pub unsampled_new: i64,
    pub unsampled_continuation: i64,
    pub skipped_new: i64,
    pub skipped_continuation: i64,
}

/// One runtime-metrics sample, produced per collection tick and uploaded in
/// batches.
#[derive(Debug, Clone)]
pub struct StatSample {
    pub sample_time: SystemTime,
    /// Percent of one machine (0-100), normalized over all CPUs.
    pub user_cpu_percent: f64,
    pub system_cpu_percent: f64,
    pub heap_used: i64,
    pub heap_max: i64,
    pub non_heap_used: i64,
    pub non_heap_max: i64,
    /// Collections during this interval.
    pub gc_count: i64,
    /// Milliseconds spent collecting during this interval.
    pub gc_time_ms: i64,
    pub rates: RateSnapshot,
    /// In-flight span ages: under 1s, 1-3s, 3-5s, 5s and over.
    pub active_span_histogram: [i32; 4],
}

/// Cumulative process counters as read from the runtime. The collector turns
/// consecutive readings into per-interval deltas.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeReading {
    pub user_cpu_time: Duration,
    pub system_cpu_time: Duration,
    pub heap_used: i64,
    pub heap_max: i64,
    pub non_heap_used: i64,
    pub non_heap_max: i64,
    pub gc_count: i64,
    pub gc_time_ms: i64,
}

/// Source of raw runtime counters. Implementations must be cheap; the
/// collector calls this once per collection tick.
pub trait RuntimeObserver: Send + Sync {
    fn read(&self) -> RuntimeReading;
}

/// Lifecycle state of one task or thread, as the embedding runtime reports
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Running,
    WaitingOnChannel,
    WaitingOnIo,
    WaitingOnSelect,
    Sleeping,
    Other,
}

#[derive(Debug, Clone)]
pub struct ThreadInfo {
    pub id: i64,
    pub name: String,
    pub state: TaskState,
    pub frames: Vec<String>,
}

/// Point-in-time view of the process's threads or tasks, in the source's
/// native order.
#[derive(Debug, Clone, Default)]
pub struct ThreadSnapshot {
    pub threads: Vec<ThreadInfo>,
}

impl ThreadSnapshot {
    /// Exact-name lookup.
    pub fn find(&self, name: &str) -> Option<&ThreadInfo> {
        self.threads.iter().find(|t| t.name == name)
    }
}

/// Source of on-demand thread snapshots for diagnostic commands.
pub trait ThreadSnapshotSource: Send + Sync {
    fn snapshot(&self) -> ThreadSnapshot;
}
