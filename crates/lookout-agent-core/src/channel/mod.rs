// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

//! The four collector channels and their driver loops: agent identity +
//! keepalive ping, span upload, stat upload, and the bidirectional command
//! session. Each driver owns its stream, survives collector outages, and
//! exits only on cancellation.

mod agent;
mod command;
mod span;
mod stat;

pub(crate) use agent::{run_agent_channel, MetadataItem, METADATA_BUFFER};
pub(crate) use command::run_command_channel;
pub(crate) use span::run_span_channel;
pub(crate) use stat::run_stat_channel;

use crate::error::{AgentError, Result};
use crate::transport::UNARY_DEADLINE;
use lookout_collector_proto::v1;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Number of encoded messages a stream buffers ahead of the transport.
const STREAM_BUFFER: usize = 32;

type StreamAck = JoinHandle<std::result::Result<tonic::Response<v1::Empty>, tonic::Status>>;

/// Handle to one client-streaming upload.
///
/// Messages flow through an mpsc sender into the request body while a spawned
/// task owns the RPC future (the ack arrives only once the stream ends). The
/// disconnected state is explicit: a handle starts or ends up without a
/// sender, and sending on it fails fast instead of blocking.
pub(crate) struct ClientStream<M> {
    what: &'static str,
    tx: Option<mpsc::Sender<M>>,
    ack: Option<StreamAck>,
}

impl<M> ClientStream<M> {
    pub(crate) fn disconnected(what: &'static str) -> Self {
        Self {
            what,
            tx: None,
            ack: None,
        }
    }

    pub(crate) fn connected(what: &'static str, tx: mpsc::Sender<M>, ack: StreamAck) -> Self {
        Self {
            what,
            tx: Some(tx),
            ack: Some(ack),
        }
    }

    /// Queue one message onto the stream.
    ///
    /// Fails with [`AgentError::Unavailable`] when the handle is
    /// disconnected, when the RPC has already ended (finished ack), or when
    /// the transport dropped the request body.
    pub(crate) async fn send(&self, message: M) -> Result<()> {
        let Some(tx) = &self.tx else {
            return Err(AgentError::Unavailable(self.what));
        };
        if let Some(ack) = &self.ack {
            if ack.is_finished() {
                return Err(AgentError::Unavailable(self.what));
            }
        }
        tx.send(message)
            .await
            .map_err(|_| AgentError::Unavailable(self.what))
    }

    /// Half-close the stream and wait briefly for the collector's ack,
    /// leaving the handle disconnected.
    pub(crate) async fn close(&mut self) {
        self.tx = None;
        let Some(ack) = self.ack.take() else {
            return;
        };
        let abort = ack.abort_handle();
        match tokio::time::timeout(UNARY_DEADLINE, ack).await {
            Ok(Ok(Ok(_))) => debug!("The {} stream was acknowledged", self.what),
            Ok(Ok(Err(status))) => debug!("The {} stream closed: {status}", self.what),
            Ok(Err(_)) => {}
            Err(_) => {
                debug!("The {} stream ack timed out", self.what);
                abort.abort();
            }
        }
    }
}
