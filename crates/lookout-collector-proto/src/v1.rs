// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

//! Message types for the `lookout.v1` collector protocol.
//!
//! Hand-maintained mirror of the protocol schema, kept in the shape `prost`
//! code generation produces so the wire format stays obvious at a glance.

/// Identity of one traced transaction, unique across agent restarts.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionId {
    #[prost(string, tag = "1")]
    pub agent_id: ::prost::alloc::string::String,
    /// Agent start time, milliseconds since the Unix epoch.
    #[prost(int64, tag = "2")]
    pub agent_start_time: i64,
    #[prost(int64, tag = "3")]
    pub sequence: i64,
}
/// A completed root span, reported once per traced transaction.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Span {
    /// Span format version, currently always 1.
    #[prost(int32, tag = "1")]
    pub version: i32,
    #[prost(message, optional, tag = "2")]
    pub transaction_id: ::core::option::Option<TransactionId>,
    #[prost(int64, tag = "3")]
    pub span_id: i64,
    /// Parent span id, or 0 when this span starts the transaction.
    #[prost(int64, tag = "4")]
    pub parent_span_id: i64,
    /// Wall-clock start, milliseconds since the Unix epoch.
    #[prost(int64, tag = "5")]
    pub start_time: i64,
    /// Total elapsed time in milliseconds.
    #[prost(int32, tag = "6")]
    pub elapsed: i32,
    /// Registered operation id, or 0 when the operation name travels as an
    /// annotation instead.
    #[prost(int32, tag = "7")]
    pub api_id: i32,
    #[prost(int32, tag = "8")]
    pub service_type: i32,
    #[prost(message, optional, tag = "9")]
    pub accept_event: ::core::option::Option<AcceptEvent>,
    #[prost(message, repeated, tag = "10")]
    pub annotation: ::prost::alloc::vec::Vec<Annotation>,
    #[prost(int32, tag = "11")]
    pub flag: i32,
    /// 1 when the transaction finished with an error, 0 otherwise.
    #[prost(int32, tag = "12")]
    pub err: i32,
    #[prost(message, repeated, tag = "13")]
    pub span_event: ::prost::alloc::vec::Vec<SpanEvent>,
    #[prost(int32, tag = "14")]
    pub application_service_type: i32,
    #[prost(int32, tag = "15")]
    pub logging_info: i32,
}
/// How a transaction entered this process.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AcceptEvent {
    #[prost(string, tag = "1")]
    pub rpc: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub end_point: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub remote_addr: ::prost::alloc::string::String,
    /// Present only for transactions continued from an upstream caller.
    #[prost(message, optional, tag = "4")]
    pub parent_info: ::core::option::Option<ParentInfo>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ParentInfo {
    #[prost(string, tag = "1")]
    pub parent_application_name: ::prost::alloc::string::String,
    #[prost(int32, tag = "2")]
    pub parent_application_type: i32,
    #[prost(string, tag = "3")]
    pub acceptor_host: ::prost::alloc::string::String,
}
/// Events recorded on an asynchronous branch of a transaction, reported
/// separately from the root span.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SpanChunk {
    #[prost(int32, tag = "1")]
    pub version: i32,
    #[prost(message, optional, tag = "2")]
    pub transaction_id: ::core::option::Option<TransactionId>,
    #[prost(int64, tag = "3")]
    pub span_id: i64,
    /// Reference time for the relative offsets in `span_event`.
    #[prost(int64, tag = "4")]
    pub key_time: i64,
    #[prost(string, tag = "5")]
    pub end_point: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "6")]
    pub span_event: ::prost::alloc::vec::Vec<SpanEvent>,
    #[prost(int32, tag = "7")]
    pub application_service_type: i32,
    #[prost(message, optional, tag = "8")]
    pub local_async_id: ::core::option::Option<LocalAsyncId>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LocalAsyncId {
    #[prost(int32, tag = "1")]
    pub async_id: i32,
    #[prost(int32, tag = "2")]
    pub sequence: i32,
}
/// One instrumented operation inside a span.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SpanEvent {
    #[prost(int32, tag = "1")]
    pub sequence: i32,
    #[prost(int32, tag = "2")]
    pub depth: i32,
    /// Start offset from the owning span's start, milliseconds.
    #[prost(int32, tag = "3")]
    pub start_elapsed: i32,
    #[prost(int32, tag = "4")]
    pub end_elapsed: i32,
    #[prost(int32, tag = "5")]
    pub service_type: i32,
    #[prost(message, repeated, tag = "6")]
    pub annotation: ::prost::alloc::vec::Vec<Annotation>,
    #[prost(int32, tag = "7")]
    pub api_id: i32,
    #[prost(message, optional, tag = "8")]
    pub exception_info: ::core::option::Option<IntStringValue>,
    #[prost(message, optional, tag = "9")]
    pub next_event: ::core::option::Option<NextEvent>,
    /// Async branch id spawned by this event, or 0.
    #[prost(int32, tag = "10")]
    pub async_event: i32,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IntStringValue {
    #[prost(int32, tag = "1")]
    pub int_value: i32,
    #[prost(string, tag = "2")]
    pub string_value: ::prost::alloc::string::String,
}
/// Where control flow left this event for a downstream destination.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NextEvent {
    #[prost(oneof = "next_event::Field", tags = "1")]
    pub field: ::core::option::Option<next_event::Field>,
}
/// Nested message and enum types in `NextEvent`.
pub mod next_event {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Field {
        #[prost(message, tag = "1")]
        MessageEvent(super::MessageEvent),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessageEvent {
    #[prost(int64, tag = "1")]
    pub next_span_id: i64,
    #[prost(string, tag = "2")]
    pub end_point: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub destination_id: ::prost::alloc::string::String,
}
/// A single key/value attached to a span or span event. Order of the
/// containing list is meaningful and preserved.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Annotation {
    #[prost(int32, tag = "1")]
    pub key: i32,
    #[prost(message, optional, tag = "2")]
    pub value: ::core::option::Option<AnnotationValue>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AnnotationValue {
    #[prost(oneof = "annotation_value::Field", tags = "1, 2, 3, 4, 5")]
    pub field: ::core::option::Option<annotation_value::Field>,
}
/// Nested message and enum types in `AnnotationValue`.
pub mod annotation_value {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Field {
        #[prost(int32, tag = "1")]
        IntValue(i32),
        #[prost(string, tag = "2")]
        StringValue(::prost::alloc::string::String),
        #[prost(message, tag = "3")]
        StringStringValue(super::StringStringValue),
        #[prost(message, tag = "4")]
        IntStringStringValue(super::IntStringStringValue),
        #[prost(message, tag = "5")]
        LongIntIntByteByteStringValue(super::LongIntIntByteByteStringValue),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StringStringValue {
    #[prost(string, tag = "1")]
    pub string_value1: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub string_value2: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IntStringStringValue {
    #[prost(int32, tag = "1")]
    pub int_value: i32,
    #[prost(string, tag = "2")]
    pub string_value1: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub string_value2: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LongIntIntByteByteStringValue {
    #[prost(int64, tag = "1")]
    pub long_value: i64,
    #[prost(int32, tag = "2")]
    pub int_value1: i32,
    #[prost(int32, tag = "3")]
    pub int_value2: i32,
    #[prost(int32, tag = "4")]
    pub byte_value1: i32,
    #[prost(int32, tag = "5")]
    pub byte_value2: i32,
    #[prost(string, tag = "6")]
    pub string_value: ::prost::alloc::string::String,
}
/// Envelope for the span upload stream.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SpanMessage {
    #[prost(oneof = "span_message::Field", tags = "1, 2")]
    pub field: ::core::option::Option<span_message::Field>,
}
/// Nested message and enum types in `SpanMessage`.
pub mod span_message {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Field {
        #[prost(message, tag = "1")]
        Span(super::Span),
        #[prost(message, tag = "2")]
        SpanChunk(super::SpanChunk),
    }
}
/// Envelope for the stat upload stream.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StatMessage {
    #[prost(oneof = "stat_message::Field", tags = "1, 2")]
    pub field: ::core::option::Option<stat_message::Field>,
}
/// Nested message and enum types in `StatMessage`.
pub mod stat_message {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Field {
        #[prost(message, tag = "1")]
        AgentStat(super::AgentStat),
        #[prost(message, tag = "2")]
        AgentStatBatch(super::AgentStatBatch),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AgentStatBatch {
    #[prost(message, repeated, tag = "1")]
    pub agent_stat: ::prost::alloc::vec::Vec<AgentStat>,
}
/// One runtime-metrics sample.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AgentStat {
    /// Sample time, milliseconds since the Unix epoch.
    #[prost(int64, tag = "1")]
    pub timestamp: i64,
    /// Configured collection interval in milliseconds.
    #[prost(int64, tag = "2")]
    pub collect_interval: i64,
    #[prost(message, optional, tag = "3")]
    pub gc: ::core::option::Option<GcStat>,
    #[prost(message, optional, tag = "4")]
    pub cpu_load: ::core::option::Option<CpuLoad>,
    #[prost(message, optional, tag = "5")]
    pub transaction: ::core::option::Option<TransactionStat>,
    #[prost(message, optional, tag = "6")]
    pub active_trace: ::core::option::Option<ActiveTrace>,
    #[prost(message, optional, tag = "7")]
    pub response_time: ::core::option::Option<ResponseTime>,
}
/// Memory and garbage-collection counters. Counts and times are deltas over
/// the collection interval.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GcStat {
    #[prost(int32, tag = "1")]
    pub gc_type: i32,
    #[prost(int64, tag = "2")]
    pub heap_used: i64,
    #[prost(int64, tag = "3")]
    pub heap_max: i64,
    #[prost(int64, tag = "4")]
    pub non_heap_used: i64,
    #[prost(int64, tag = "5")]
    pub non_heap_max: i64,
    #[prost(int64, tag = "6")]
    pub gc_count: i64,
    /// Milliseconds spent collecting during the interval.
    #[prost(int64, tag = "7")]
    pub gc_time: i64,
}
/// Process CPU utilisation, percent of one machine (0-100).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CpuLoad {
    #[prost(double, tag = "1")]
    pub user_cpu_load: f64,
    #[prost(double, tag = "2")]
    pub system_cpu_load: f64,
}
/// Per-second transaction sampling rates over the collection interval.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionStat {
    #[prost(int64, tag = "1")]
    pub sampled_new_count: i64,
    #[prost(int64, tag = "2")]
    pub sampled_continuation_count: i64,
    #[prost(int64, tag = "3")]
    pub unsampled_new_count: i64,
    #[prost(int64, tag = "4")]
    pub unsampled_continuation_count: i64,
    #[prost(int64, tag = "5")]
    pub skipped_new_count: i64,
    #[prost(int64, tag = "6")]
    pub skipped_continuation_count: i64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActiveTrace {
    #[prost(message, optional, tag = "1")]
    pub histogram: ::core::option::Option<ActiveTraceHistogram>,
}
/// Age distribution of in-flight transactions.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActiveTraceHistogram {
    #[prost(int32, tag = "1")]
    pub version: i32,
    #[prost(int32, tag = "2")]
    pub histogram_schema_type: i32,
    /// Bucket counts: under 1s, 1-3s, 3-5s, 5s and over.
    #[prost(int32, repeated, tag = "3")]
    pub active_trace_count: ::prost::alloc::vec::Vec<i32>,
}
/// Transaction response times over the collection interval, milliseconds.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResponseTime {
    #[prost(int64, tag = "1")]
    pub avg: i64,
    #[prost(int64, tag = "2")]
    pub max: i64,
}
/// Agent identity, registered once per connection lifetime.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AgentInfo {
    #[prost(string, tag = "1")]
    pub hostname: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub ip: ::prost::alloc::string::String,
    #[prost(int32, tag = "3")]
    pub service_type: i32,
    #[prost(int32, tag = "4")]
    pub pid: i32,
    #[prost(string, tag = "5")]
    pub agent_version: ::prost::alloc::string::String,
    #[prost(bool, tag = "6")]
    pub container: bool,
    #[prost(message, optional, tag = "7")]
    pub server_meta: ::core::option::Option<ServerMeta>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServerMeta {
    #[prost(string, tag = "1")]
    pub server_info: ::prost::alloc::string::String,
}
/// Keepalive beacon. Liveness is carried entirely by the enclosing stream.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Ping {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AckResult {
    #[prost(bool, tag = "1")]
    pub success: bool,
    #[prost(string, tag = "2")]
    pub message: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Empty {}
/// Descriptor behind a registered api id, announced once when the id is
/// issued. Spans reference the descriptor by id thereafter.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ApiMetadata {
    #[prost(int32, tag = "1")]
    pub api_id: i32,
    #[prost(string, tag = "2")]
    pub api_info: ::prost::alloc::string::String,
    #[prost(int32, tag = "3")]
    pub line: i32,
    #[prost(int32, tag = "4")]
    pub api_type: i32,
}
/// Normalized statement behind a registered sql id.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SqlMetadata {
    #[prost(int32, tag = "1")]
    pub sql_id: i32,
    #[prost(string, tag = "2")]
    pub sql: ::prost::alloc::string::String,
}
/// Interned string behind a registered string id.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StringMetadata {
    #[prost(int32, tag = "1")]
    pub string_id: i32,
    #[prost(string, tag = "2")]
    pub string_value: ::prost::alloc::string::String,
}
/// Agent-to-collector half of the command session.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CmdMessage {
    #[prost(oneof = "cmd_message::Message", tags = "1")]
    pub message: ::core::option::Option<cmd_message::Message>,
}
/// Nested message and enum types in `CmdMessage`.
pub mod cmd_message {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Message {
        #[prost(message, tag = "1")]
        Handshake(super::CmdHandshake),
    }
}
/// Capability declaration sent when a command session opens.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CmdHandshake {
    /// `CommandType` values the agent can serve.
    #[prost(int32, repeated, tag = "1")]
    pub supported_commands: ::prost::alloc::vec::Vec<i32>,
}
/// Collector-to-agent half of the command session.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CmdRequest {
    #[prost(int32, tag = "1")]
    pub request_id: i32,
    #[prost(oneof = "cmd_request::Command", tags = "2, 3, 4, 5")]
    pub command: ::core::option::Option<cmd_request::Command>,
}
/// Nested message and enum types in `CmdRequest`.
pub mod cmd_request {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Command {
        #[prost(message, tag = "2")]
        Echo(super::CmdEcho),
        #[prost(message, tag = "3")]
        ActiveThreadCount(super::CmdActiveThreadCount),
        #[prost(message, tag = "4")]
        ActiveThreadDump(super::CmdActiveThreadDump),
        #[prost(message, tag = "5")]
        ActiveThreadLightDump(super::CmdActiveThreadLightDump),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CmdEcho {
    #[prost(string, tag = "1")]
    pub message: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CmdActiveThreadCount {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CmdActiveThreadDump {
    /// Maximum dumps to return; 0 or negative means no limit.
    #[prost(int32, tag = "1")]
    pub limit: i32,
    /// Exact thread names to include; an empty filter selects nothing.
    #[prost(string, repeated, tag = "2")]
    pub thread_name: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(int64, repeated, tag = "3")]
    pub local_trace_id: ::prost::alloc::vec::Vec<i64>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CmdActiveThreadLightDump {
    #[prost(int32, tag = "1")]
    pub limit: i32,
}
/// Shared header for unary command responses.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CmdResponse {
    #[prost(int32, tag = "1")]
    pub response_id: i32,
    #[prost(int32, tag = "2")]
    pub status: i32,
    #[prost(string, tag = "3")]
    pub message: ::prost::alloc::string::String,
}
/// Shared header for streamed command responses.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CmdStreamResponse {
    #[prost(int32, tag = "1")]
    pub response_id: i32,
    #[prost(int32, tag = "2")]
    pub sequence_id: i32,
    #[prost(string, tag = "3")]
    pub message: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CmdEchoResponse {
    #[prost(message, optional, tag = "1")]
    pub common_response: ::core::option::Option<CmdResponse>,
    #[prost(string, tag = "2")]
    pub message: ::prost::alloc::string::String,
}
/// One push on an active-thread-count stream.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CmdActiveThreadCountRes {
    #[prost(message, optional, tag = "1")]
    pub common_stream_response: ::core::option::Option<CmdStreamResponse>,
    #[prost(int32, tag = "2")]
    pub histogram_schema_type: i32,
    #[prost(int32, repeated, tag = "3")]
    pub active_thread_count: ::prost::alloc::vec::Vec<i32>,
    #[prost(int64, tag = "4")]
    pub timestamp: i64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CmdActiveThreadDumpRes {
    #[prost(message, optional, tag = "1")]
    pub common_response: ::core::option::Option<CmdResponse>,
    #[prost(message, repeated, tag = "2")]
    pub thread_dump: ::prost::alloc::vec::Vec<ActiveThreadDump>,
    /// Agent runtime, e.g. "Rust".
    #[prost(string, tag = "3")]
    pub agent_type: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub sub_type: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub version: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CmdActiveThreadLightDumpRes {
    #[prost(message, optional, tag = "1")]
    pub common_response: ::core::option::Option<CmdResponse>,
    #[prost(message, repeated, tag = "2")]
    pub thread_dump: ::prost::alloc::vec::Vec<ActiveThreadLightDump>,
    #[prost(string, tag = "3")]
    pub agent_type: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub sub_type: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub version: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActiveThreadDump {
    #[prost(int64, tag = "1")]
    pub start_time: i64,
    #[prost(int64, tag = "2")]
    pub local_trace_id: i64,
    #[prost(message, optional, tag = "3")]
    pub thread_dump: ::core::option::Option<ThreadDump>,
    #[prost(bool, tag = "4")]
    pub sampled: bool,
    #[prost(string, tag = "5")]
    pub transaction_id: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub entry_point: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActiveThreadLightDump {
    #[prost(int64, tag = "1")]
    pub start_time: i64,
    #[prost(int64, tag = "2")]
    pub local_trace_id: i64,
    #[prost(message, optional, tag = "3")]
    pub thread_dump: ::core::option::Option<ThreadLightDump>,
    #[prost(bool, tag = "4")]
    pub sampled: bool,
    #[prost(string, tag = "5")]
    pub transaction_id: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub entry_point: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ThreadDump {
    #[prost(string, tag = "1")]
    pub thread_name: ::prost::alloc::string::String,
    #[prost(int64, tag = "2")]
    pub thread_id: i64,
    #[prost(enumeration = "ThreadState", tag = "3")]
    pub thread_state: i32,
    #[prost(string, repeated, tag = "4")]
    pub stack_trace: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ThreadLightDump {
    #[prost(string, tag = "1")]
    pub thread_name: ::prost::alloc::string::String,
    #[prost(int64, tag = "2")]
    pub thread_id: i64,
    #[prost(enumeration = "ThreadState", tag = "3")]
    pub thread_state: i32,
}
/// Coarse lifecycle state of a reported thread or task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ThreadState {
    Unknown = 0,
    Runnable = 1,
    Waiting = 2,
    Blocked = 3,
}
impl ThreadState {
    /// String value of the enum field names used in the ProtoBuf definition.
    ///
    /// The values are not transformed in any way and thus are considered stable
    /// (if the ProtoBuf definition does not change) and safe for programmatic use.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            ThreadState::Unknown => "THREAD_STATE_UNKNOWN",
            ThreadState::Runnable => "THREAD_STATE_RUNNABLE",
            ThreadState::Waiting => "THREAD_STATE_WAITING",
            ThreadState::Blocked => "THREAD_STATE_BLOCKED",
        }
    }
}
/// On-demand commands the collector may issue over the command session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum CommandType {
    Unspecified = 0,
    Echo = 710,
    ActiveThreadCount = 730,
    ActiveThreadDump = 740,
    ActiveThreadLightDump = 750,
}
impl CommandType {
    /// String value of the enum field names used in the ProtoBuf definition.
    ///
    /// The values are not transformed in any way and thus are considered stable
    /// (if the ProtoBuf definition does not change) and safe for programmatic use.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            CommandType::Unspecified => "COMMAND_TYPE_UNSPECIFIED",
            CommandType::Echo => "COMMAND_TYPE_ECHO",
            CommandType::ActiveThreadCount => "COMMAND_TYPE_ACTIVE_THREAD_COUNT",
            CommandType::ActiveThreadDump => "COMMAND_TYPE_ACTIVE_THREAD_DUMP",
            CommandType::ActiveThreadLightDump => "COMMAND_TYPE_ACTIVE_THREAD_LIGHT_DUMP",
        }
    }
}
