// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

use crate::channel::{ClientStream, STREAM_BUFFER};
use crate::encode;
use crate::model::StatSample;
use crate::stats::StatsCollector;
use crate::transport::{AgentMeta, BackoffPolicy, ConnectionSupervisor};
use lookout_collector_proto::{v1, StatServiceClient};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tonic::Request;
use tracing::warn;

fn open_stat_stream(client: &StatServiceClient, meta: &AgentMeta) -> ClientStream<v1::StatMessage> {
    let (tx, rx) = mpsc::channel(STREAM_BUFFER);
    let request = meta.stamp(Request::new(ReceiverStream::new(rx)));
    let mut client = client.clone();
    let ack = tokio::spawn(async move { client.send_agent_stat(request).await });
    ClientStream::connected("stat", tx, ack)
}

/// Collect one runtime sample per interval and upload them in fixed-size
/// batches.
///
/// The first sample lands one full interval after start. A batch that hits a
/// broken stream is dropped; collection resumes once the stream is reopened
/// under backoff.
pub(crate) async fn run_stat_channel(
    supervisor: ConnectionSupervisor,
    meta: Arc<AgentMeta>,
    mut collector: StatsCollector,
    collect_interval_ms: u64,
    batch_count: usize,
    shutdown: CancellationToken,
) {
    let channel = match supervisor.connect_with_retry(&shutdown).await {
        Ok(channel) => channel,
        Err(_) => return,
    };
    let client = StatServiceClient::new(channel);
    let backoff = BackoffPolicy::default();
    let mut attempt: u32 = 0;
    let mut stream = open_stat_stream(&client, &meta);
    let interval = Duration::from_millis(collect_interval_ms);
    let mut samples: Vec<StatSample> = Vec::with_capacity(batch_count);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                stream.close().await;
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }

        samples.push(collector.collect(SystemTime::now(), Instant::now()));
        if samples.len() < batch_count {
            continue;
        }

        let message = encode::stat::stat_batch(&samples, collect_interval_ms);
        samples.clear();
        match stream.send(message).await {
            Ok(()) => attempt = 0,
            Err(e) => {
                warn!("Dropping {batch_count} stat samples: {e}; reopening the stat stream");
                stream.close().await;
                let delay = backoff.jittered(attempt);
                attempt = attempt.saturating_add(1);
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    _ = tokio::time::sleep(delay) => {}
                }
                stream = open_stat_stream(&client, &meta);
            }
        }
    }
}
