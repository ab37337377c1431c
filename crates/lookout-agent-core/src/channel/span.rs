// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

use crate::channel::{ClientStream, STREAM_BUFFER};
use crate::encode;
use crate::model::Span;
use crate::transport::{AgentMeta, BackoffPolicy, ConnectionSupervisor};
use lookout_collector_proto::{v1, SpanServiceClient};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tonic::Request;
use tracing::warn;

fn open_span_stream(client: &SpanServiceClient, meta: &AgentMeta) -> ClientStream<v1::SpanMessage> {
    let (tx, rx) = mpsc::channel(STREAM_BUFFER);
    let request = meta.stamp(Request::new(ReceiverStream::new(rx)));
    let mut client = client.clone();
    let ack = tokio::spawn(async move { client.send_span(request).await });
    ClientStream::connected("span", tx, ack)
}

/// Drain the span queue into the collector for the life of the agent.
///
/// A span that hits a broken stream is lost; the queue keeps absorbing
/// submissions while the stream is reopened under backoff.
pub(crate) async fn run_span_channel(
    supervisor: ConnectionSupervisor,
    meta: Arc<AgentMeta>,
    mut queue: mpsc::Receiver<Span>,
    application_type: i32,
    shutdown: CancellationToken,
) {
    let channel = match supervisor.connect_with_retry(&shutdown).await {
        Ok(channel) => channel,
        Err(_) => return,
    };
    let client = SpanServiceClient::new(channel);
    let backoff = BackoffPolicy::default();
    let mut attempt: u32 = 0;
    let mut stream = open_span_stream(&client, &meta);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                stream.close().await;
                return;
            }
            received = queue.recv() => {
                let Some(span) = received else {
                    stream.close().await;
                    return;
                };
                let span_id = span.span_id;
                let message = encode::span::span_message(&span, application_type);
                match stream.send(message).await {
                    Ok(()) => attempt = 0,
                    Err(e) => {
                        warn!("Span {span_id} lost: {e}; reopening the span stream");
                        stream.close().await;
                        let delay = backoff.jittered(attempt);
                        attempt = attempt.saturating_add(1);
                        tokio::select! {
                            _ = shutdown.cancelled() => return,
                            _ = tokio::time::sleep(delay) => {}
                        }
                        stream = open_span_stream(&client, &meta);
                    }
                }
            }
        }
    }
}
