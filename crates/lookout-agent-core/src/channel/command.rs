// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

use crate::channel::{ClientStream, STREAM_BUFFER};
use crate::encode::{self, epoch_millis};
use crate::error::{AgentError, Result};
use crate::model::ThreadSnapshotSource;
use crate::stats::ActiveSpanRegistry;
use crate::transport::{AgentMeta, BackoffPolicy, ConnectionSupervisor, UNARY_DEADLINE};
use lookout_collector_proto::{v1, CommandServiceClient};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tonic::Request;
use tracing::{debug, info, warn};

/// Cadence of pushes on an active-thread-count stream.
const COUNT_PUSH_INTERVAL: Duration = Duration::from_secs(1);

/// Lifecycle of one command session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Disconnected,
    Connecting,
    Handshaken,
    Serving,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting => "connecting",
            SessionState::Handshaken => "handshaken",
            SessionState::Serving => "serving",
        })
    }
}

/// The bidirectional command session.
///
/// The agent speaks first: opening the stream immediately sends a handshake
/// declaring the supported command types, and only then do collector requests
/// flow back. The outbound sender stays alive for the session's lifetime to
/// keep the agent half of the stream open.
struct CommandSession {
    state: SessionState,
    outbound: Option<mpsc::Sender<v1::CmdMessage>>,
    inbound: Option<tonic::Streaming<v1::CmdRequest>>,
}

impl CommandSession {
    fn disconnected() -> Self {
        Self {
            state: SessionState::Disconnected,
            outbound: None,
            inbound: None,
        }
    }

    fn set_state(&mut self, next: SessionState) {
        if self.state != next {
            debug!("Command session {} -> {next}", self.state);
            self.state = next;
        }
    }

    /// Open the stream and perform the handshake.
    async fn open(&mut self, client: &CommandServiceClient, meta: &AgentMeta) -> Result<()> {
        self.set_state(SessionState::Connecting);

        let (tx, rx) = mpsc::channel(1);
        let request = meta.stamp_with_socket(Request::new(ReceiverStream::new(rx)));
        let mut client = client.clone();
        let inbound = match client.handle_command(request).await {
            Ok(response) => response.into_inner(),
            Err(status) => {
                self.set_state(SessionState::Disconnected);
                return Err(status.into());
            }
        };
        if tx.send(encode::command::handshake()).await.is_err() {
            self.set_state(SessionState::Disconnected);
            return Err(AgentError::Unavailable("command"));
        }

        self.outbound = Some(tx);
        self.inbound = Some(inbound);
        self.set_state(SessionState::Handshaken);
        Ok(())
    }

    async fn open_with_retry(
        &mut self,
        client: &CommandServiceClient,
        meta: &AgentMeta,
        backoff: &BackoffPolicy,
        shutdown: &CancellationToken,
    ) -> Result<()> {
        let mut attempt: u32 = 0;
        loop {
            if shutdown.is_cancelled() {
                return Err(AgentError::Shutdown);
            }
            match self.open(client, meta).await {
                Ok(()) => {
                    if attempt > 0 {
                        info!("Command session opened after {attempt} failed attempts");
                    }
                    return Ok(());
                }
                Err(e) => {
                    let delay = backoff.jittered(attempt);
                    warn!("Opening command session failed: {e}; retrying in {delay:?}");
                    attempt = attempt.saturating_add(1);
                    tokio::select! {
                        _ = shutdown.cancelled() => return Err(AgentError::Shutdown),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    /// Wait for the next collector request. `Ok(None)` means the collector
    /// half-closed the session.
    async fn recv(&mut self) -> Result<Option<v1::CmdRequest>> {
        let Some(inbound) = self.inbound.as_mut() else {
            return Err(AgentError::Unavailable("command"));
        };
        match inbound.message().await {
            Ok(Some(request)) => {
                self.set_state(SessionState::Serving);
                Ok(Some(request))
            }
            Ok(None) => Ok(None),
            Err(status) => Err(status.into()),
        }
    }

    fn close(&mut self) {
        self.outbound = None;
        self.inbound = None;
        self.set_state(SessionState::Disconnected);
    }
}

/// Serve collector commands for the life of the agent, re-opening the
/// session (handshake included) whenever it breaks.
pub(crate) async fn run_command_channel(
    supervisor: ConnectionSupervisor,
    meta: Arc<AgentMeta>,
    registry: Arc<ActiveSpanRegistry>,
    threads: Arc<dyn ThreadSnapshotSource>,
    shutdown: CancellationToken,
) {
    let channel = match supervisor.connect_with_retry(&shutdown).await {
        Ok(channel) => channel,
        Err(_) => return,
    };
    let client = CommandServiceClient::new(channel);
    let backoff = BackoffPolicy::default();
    let mut session = CommandSession::disconnected();

    loop {
        if session
            .open_with_retry(&client, &meta, &backoff, &shutdown)
            .await
            .is_err()
        {
            return;
        }

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    session.close();
                    return;
                }
                received = session.recv() => match received {
                    Ok(Some(request)) => {
                        dispatch(&client, &meta, &registry, &threads, request, &shutdown).await;
                    }
                    Ok(None) => {
                        info!("The collector closed the command session; reopening");
                        break;
                    }
                    Err(e) => {
                        warn!("Command session failed: {e}; reopening");
                        break;
                    }
                }
            }
        }
        session.close();
    }
}

/// Route one collector request to its handler. Responses are best effort;
/// a failed response never tears down the session that carried the request.
async fn dispatch(
    client: &CommandServiceClient,
    meta: &Arc<AgentMeta>,
    registry: &Arc<ActiveSpanRegistry>,
    threads: &Arc<dyn ThreadSnapshotSource>,
    request: v1::CmdRequest,
    shutdown: &CancellationToken,
) {
    let request_id = request.request_id;
    let Some(command) = request.command else {
        debug!("Ignoring command request {request_id} without a command");
        return;
    };

    match command {
        v1::cmd_request::Command::Echo(echo) => {
            let response = encode::command::echo_response(request_id, echo.message);
            let request = meta.stamp(Request::new(response));
            let mut client = client.clone();
            log_response(
                "echo",
                request_id,
                tokio::time::timeout(UNARY_DEADLINE, client.respond_echo(request)).await,
            );
        }
        v1::cmd_request::Command::ActiveThreadCount(_) => {
            spawn_count_stream(client, meta, registry, request_id, shutdown);
        }
        v1::cmd_request::Command::ActiveThreadDump(dump) => {
            let response = encode::command::thread_dump_response(
                request_id,
                dump.limit,
                &dump.thread_name,
                &threads.snapshot(),
                epoch_millis(SystemTime::now()),
            );
            let request = meta.stamp(Request::new(response));
            let mut client = client.clone();
            log_response(
                "thread dump",
                request_id,
                tokio::time::timeout(UNARY_DEADLINE, client.respond_active_thread_dump(request))
                    .await,
            );
        }
        v1::cmd_request::Command::ActiveThreadLightDump(dump) => {
            let response = encode::command::thread_light_dump_response(
                request_id,
                dump.limit,
                &threads.snapshot(),
                epoch_millis(SystemTime::now()),
            );
            let request = meta.stamp(Request::new(response));
            let mut client = client.clone();
            log_response(
                "thread light dump",
                request_id,
                tokio::time::timeout(
                    UNARY_DEADLINE,
                    client.respond_active_thread_light_dump(request),
                )
                .await,
            );
        }
    }
}

fn log_response<T>(
    what: &str,
    request_id: i32,
    outcome: std::result::Result<
        std::result::Result<tonic::Response<T>, tonic::Status>,
        tokio::time::error::Elapsed,
    >,
) {
    match outcome {
        Ok(Ok(_)) => debug!("Answered {what} request {request_id}"),
        Ok(Err(status)) => warn!("The {what} response for request {request_id} failed: {status}"),
        Err(_) => warn!("The {what} response for request {request_id} timed out"),
    }
}

/// Open an independent push stream for one active-thread-count request and
/// feed it the live span-age histogram once a second until it dies.
fn spawn_count_stream(
    client: &CommandServiceClient,
    meta: &Arc<AgentMeta>,
    registry: &Arc<ActiveSpanRegistry>,
    request_id: i32,
    shutdown: &CancellationToken,
) {
    let mut client = client.clone();
    let meta = Arc::clone(meta);
    let registry = Arc::clone(registry);
    let shutdown = shutdown.clone();

    tokio::spawn(async move {
        debug!("Opening an active-thread-count stream for request {request_id}");
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let request = meta.stamp_with_socket(Request::new(ReceiverStream::new(rx)));
        let ack = tokio::spawn(async move { client.stream_active_thread_count(request).await });
        let mut stream = ClientStream::connected("active-thread-count", tx, ack);

        let mut sequence = 0;
        let mut ticker = tokio::time::interval(COUNT_PUSH_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }
            sequence += 1;
            let push = encode::command::active_thread_count_response(
                request_id,
                sequence,
                registry.histogram(Instant::now()),
                epoch_millis(SystemTime::now()),
            );
            if let Err(e) = stream.send(push).await {
                debug!("Active-thread-count stream for request {request_id} ended: {e}");
                break;
            }
        }
        stream.close().await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disconnected_session_fails_fast() {
        let mut session = CommandSession::disconnected();
        let err = session.recv().await.unwrap_err();
        assert!(matches!(err, AgentError::Unavailable("command")));
    }

    #[tokio::test]
    async fn close_drops_both_stream_halves() {
        let (tx, _rx) = mpsc::channel(1);
        let mut session = CommandSession {
            state: SessionState::Handshaken,
            outbound: Some(tx),
            inbound: None,
        };

        session.close();
        assert_eq!(session.state, SessionState::Disconnected);
        assert!(session.outbound.is_none());
        assert!(session.recv().await.is_err());
    }

    #[test]
    fn state_names_read_plainly() {
        assert_eq!(SessionState::Disconnected.to_string(), "disconnected");
        assert_eq!(SessionState::Connecting.to_string(), "connecting");
        assert_eq!(SessionState::Handshaken.to_string(), "handshaken");
        assert_eq!(SessionState::Serving.to_string(), "serving");
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits_session_open() {
        // Lazy channel: nothing is dialed, the token check comes first.
        let channel =
            tonic::transport::Endpoint::from_static("http://127.0.0.1:1").connect_lazy();
        let client = CommandServiceClient::new(channel);
        let meta = AgentMeta::new(&crate::config::AgentConfig::new("web-1", "shop"), 0).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let mut session = CommandSession::disconnected();
        let result = session
            .open_with_retry(&client, &meta, &BackoffPolicy::default(), &token)
            .await;
        assert!(matches!(result, Err(AgentError::Shutdown)));
        assert_eq!(session.state, SessionState::Disconnected);
    }
}
