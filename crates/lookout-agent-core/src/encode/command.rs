// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

//! Command wire encoding: the session handshake and the response messages
//! for every command the agent can serve.

use crate::model::{TaskState, ThreadSnapshot};
use crate::AGENT_VERSION;
use lookout_collector_proto::v1;

/// Commands declared in the session handshake.
pub const SUPPORTED_COMMANDS: [v1::CommandType; 4] = [
    v1::CommandType::Echo,
    v1::CommandType::ActiveThreadCount,
    v1::CommandType::ActiveThreadDump,
    v1::CommandType::ActiveThreadLightDump,
];

/// Runtime identifier reported with thread dumps.
const AGENT_TYPE: &str = "Rust";

/// Histogram layout identifier understood by the collector.
const HISTOGRAM_SCHEMA_TYPE: i32 = 2;

pub fn handshake() -> v1::CmdMessage {
    v1::CmdMessage {
        message: Some(v1::cmd_message::Message::Handshake(v1::CmdHandshake {
            supported_commands: SUPPORTED_COMMANDS.iter().map(|c| *c as i32).collect(),
        })),
    }
}

pub fn echo_response(request_id: i32, message: impl Into<String>) -> v1::CmdEchoResponse {
    v1::CmdEchoResponse {
        common_response: Some(common_response(request_id)),
        message: message.into(),
    }
}

/// One push on an active-thread-count stream. `sequence_id` starts at 1 and
/// increases per push within the request's session.
pub fn active_thread_count_response(
    request_id: i32,
    sequence_id: i32,
    histogram: [i32; 4],
    now_ms: i64,
) -> v1::CmdActiveThreadCountRes {
    v1::CmdActiveThreadCountRes {
        common_stream_response: Some(v1::CmdStreamResponse {
            response_id: request_id,
            sequence_id,
            message: String::new(),
        }),
        histogram_schema_type: HISTOGRAM_SCHEMA_TYPE,
        active_thread_count: histogram.to_vec(),
        timestamp: now_ms,
    }
}

/// Full dump response. Threads are selected by exact name in filter order;
/// names missing from the snapshot are skipped. A limit under 1 means the
/// whole snapshot size.
pub fn thread_dump_response(
    request_id: i32,
    limit: i32,
    thread_names: &[String],
    snapshot: &ThreadSnapshot,
    now_ms: i64,
) -> v1::CmdActiveThreadDumpRes {
    let limit = effective_limit(limit, snapshot);

    let thread_dump = thread_names
        .iter()
        .filter_map(|name| snapshot.find(name))
        .take(limit)
        .map(|thread| v1::ActiveThreadDump {
            start_time: now_ms,
            local_trace_id: 0,
            thread_dump: Some(v1::ThreadDump {
                thread_name: thread.name.clone(),
                thread_id: thread.id,
                thread_state: wire_thread_state(thread.state) as i32,
                stack_trace: thread.frames.clone(),
            }),
            sampled: false,
            transaction_id: String::new(),
            entry_point: String::new(),
        })
        .collect();

    v1::CmdActiveThreadDumpRes {
        common_response: Some(common_response(request_id)),
        thread_dump,
        agent_type: AGENT_TYPE.to_string(),
        sub_type: String::new(),
        version: AGENT_VERSION.to_string(),
    }
}

/// Light dump response: no stack frames, snapshot order, same limit rule.
pub fn thread_light_dump_response(
    request_id: i32,
    limit: i32,
    snapshot: &ThreadSnapshot,
    now_ms: i64,
) -> v1::CmdActiveThreadLightDumpRes {
    let limit = effective_limit(limit, snapshot);

    let thread_dump = snapshot
        .threads
        .iter()
        .take(limit)
        .map(|thread| v1::ActiveThreadLightDump {
            start_time: now_ms,
            local_trace_id: 0,
            thread_dump: Some(v1::ThreadLightDump {
                thread_name: thread.name.clone(),
                thread_id: thread.id,
                thread_state: wire_thread_state(thread.state) as i32,
            }),
            sampled: false,
            transaction_id: String::new(),
            entry_point: String::new(),
        })
        .collect();

    v1::CmdActiveThreadLightDumpRes {
        common_response: Some(common_response(request_id)),
        thread_dump,
        agent_type: AGENT_TYPE.to_string(),
        sub_type: String::new(),
        version: AGENT_VERSION.to_string(),
    }
}

/// Map a runtime task state into the coarse wire vocabulary.
pub fn wire_thread_state(state: TaskState) -> v1::ThreadState {
    match state {
        TaskState::Running => v1::ThreadState::Runnable,
        TaskState::WaitingOnChannel | TaskState::WaitingOnIo | TaskState::WaitingOnSelect => {
            v1::ThreadState::Waiting
        }
        TaskState::Sleeping => v1::ThreadState::Blocked,
        TaskState::Other => v1::ThreadState::Unknown,
    }
}

fn effective_limit(limit: i32, snapshot: &ThreadSnapshot) -> usize {
    if limit < 1 {
        snapshot.threads.len()
    } else {
        limit as usize
    }
}

fn common_response(request_id: i32) -> v1::CmdResponse {
    // status/message report errors; every served command answers success
    v1::CmdResponse {
        response_id: request_id,
        status: 0,
        message: String::new(),
    }
}
