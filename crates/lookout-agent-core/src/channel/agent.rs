// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::transport::{AgentMeta, BackoffPolicy, ConnectionSupervisor, UNARY_DEADLINE};
use lookout_collector_proto::{v1, AgentServiceClient, MetadataServiceClient};
use std::env;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tonic::Request;
use tracing::{debug, info, warn};

const SERVER_INFO: &str = "Rust Agent";

/// Registrations waiting for the agent channel. Low volume; instrumentation
/// issues each id once.
pub(crate) const METADATA_BUFFER: usize = 256;

/// One id-to-descriptor registration, announced to the collector so spans
/// can reference the descriptor by id.
#[derive(Debug, Clone)]
pub(crate) enum MetadataItem {
    Api {
        api_id: i32,
        descriptor: String,
        line: i32,
        api_type: i32,
    },
    Sql {
        sql_id: i32,
        sql: String,
    },
    Str {
        string_id: i32,
        value: String,
    },
}

/// The keepalive ping stream. Inbound echoes are drained by a spawned task so
/// the session never stalls on flow control.
pub(crate) struct PingSession {
    tx: Option<mpsc::Sender<v1::Ping>>,
    drain: Option<JoinHandle<()>>,
}

impl PingSession {
    pub(crate) fn disconnected() -> Self {
        Self {
            tx: None,
            drain: None,
        }
    }

    pub(crate) async fn open(client: &AgentServiceClient, meta: &AgentMeta) -> Result<Self> {
        let (tx, rx) = mpsc::channel(1);
        let request = meta.stamp_with_socket(Request::new(ReceiverStream::new(rx)));
        let mut client = client.clone();
        let mut inbound = client.ping_session(request).await?.into_inner();
        let drain = tokio::spawn(async move { while let Ok(Some(_)) = inbound.message().await {} });
        Ok(Self {
            tx: Some(tx),
            drain: Some(drain),
        })
    }

    pub(crate) async fn open_with_retry(
        client: &AgentServiceClient,
        meta: &AgentMeta,
        backoff: &BackoffPolicy,
        shutdown: &CancellationToken,
    ) -> Result<Self> {
        let mut attempt: u32 = 0;
        loop {
            if shutdown.is_cancelled() {
                return Err(AgentError::Shutdown);
            }
            match Self::open(client, meta).await {
                Ok(session) => {
                    if attempt > 0 {
                        info!("Ping session opened after {attempt} failed attempts");
                    }
                    return Ok(session);
                }
                Err(e) => {
                    let delay = backoff.jittered(attempt);
                    warn!("Opening ping session failed: {e}; retrying in {delay:?}");
                    attempt = attempt.saturating_add(1);
                    tokio::select! {
                        _ = shutdown.cancelled() => return Err(AgentError::Shutdown),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    pub(crate) async fn send_ping(&self) -> Result<()> {
        match &self.tx {
            Some(tx) => tx
                .send(v1::Ping {})
                .await
                .map_err(|_| AgentError::Unavailable("ping")),
            None => Err(AgentError::Unavailable("ping")),
        }
    }

    pub(crate) fn close(&mut self) {
        self.tx = None;
        if let Some(drain) = self.drain.take() {
            drain.abort();
        }
    }
}

/// Identity announcement sent at startup and after every ping-session reopen.
fn agent_info(config: &AgentConfig) -> v1::AgentInfo {
    v1::AgentInfo {
        hostname: hostname(),
        ip: outbound_ip(),
        service_type: config.application_type,
        pid: std::process::id() as i32,
        agent_version: crate::AGENT_VERSION.to_string(),
        container: config.is_container,
        server_meta: Some(v1::ServerMeta {
            server_info: SERVER_INFO.to_string(),
        }),
    }
}

fn hostname() -> String {
    env::var("HOSTNAME")
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Local address a packet toward a public host would leave from. Nothing is
/// sent; connecting a UDP socket only resolves the route.
fn outbound_ip() -> String {
    fn detect() -> std::io::Result<std::net::IpAddr> {
        let socket = std::net::UdpSocket::bind("0.0.0.0:0")?;
        socket.connect("8.8.8.8:80")?;
        Ok(socket.local_addr()?.ip())
    }
    match detect() {
        Ok(ip) => ip.to_string(),
        Err(_) => "127.0.0.1".to_string(),
    }
}

/// Best-effort unary registration: failures are logged, never fatal, and the
/// next session reopen repeats the announcement.
async fn register_agent(client: &mut AgentServiceClient, meta: &AgentMeta, info: v1::AgentInfo) {
    let request = meta.stamp(Request::new(info));
    match tokio::time::timeout(UNARY_DEADLINE, client.register_agent(request)).await {
        Ok(Ok(response)) => {
            let ack = response.into_inner();
            if ack.success {
                debug!("Agent registered with the collector");
            } else {
                warn!("Collector refused agent registration: {}", ack.message);
            }
        }
        Ok(Err(status)) => warn!("Agent registration failed: {status}"),
        Err(_) => warn!("Agent registration timed out"),
    }
}

/// Same contract as [`register_agent`]: unary, 5 s deadline, failures are
/// logged and the item is lost.
async fn send_metadata(client: &mut MetadataServiceClient, meta: &AgentMeta, item: MetadataItem) {
    let sent = match item {
        MetadataItem::Api {
            api_id,
            descriptor,
            line,
            api_type,
        } => {
            let request = meta.stamp(Request::new(v1::ApiMetadata {
                api_id,
                api_info: descriptor,
                line,
                api_type,
            }));
            tokio::time::timeout(UNARY_DEADLINE, client.send_api_metadata(request)).await
        }
        MetadataItem::Sql { sql_id, sql } => {
            let request = meta.stamp(Request::new(v1::SqlMetadata { sql_id, sql }));
            tokio::time::timeout(UNARY_DEADLINE, client.send_sql_metadata(request)).await
        }
        MetadataItem::Str { string_id, value } => {
            let request = meta.stamp(Request::new(v1::StringMetadata {
                string_id,
                string_value: value,
            }));
            tokio::time::timeout(UNARY_DEADLINE, client.send_string_metadata(request)).await
        }
    };
    match sent {
        Ok(Ok(_)) => debug!("Metadata registered with the collector"),
        Ok(Err(status)) => warn!("Metadata registration failed: {status}"),
        Err(_) => warn!("Metadata registration timed out"),
    }
}

/// Announce the agent, then keep a ping session alive for the life of the
/// agent, re-announcing identity whenever the session has to be rebuilt.
pub(crate) async fn run_agent_channel(
    supervisor: ConnectionSupervisor,
    meta: Arc<AgentMeta>,
    config: Arc<AgentConfig>,
    mut registrations: mpsc::Receiver<MetadataItem>,
    shutdown: CancellationToken,
) {
    let channel = match supervisor.connect_with_retry(&shutdown).await {
        Ok(channel) => channel,
        Err(_) => return,
    };
    let mut client = AgentServiceClient::new(channel.clone());
    let mut metadata_client = MetadataServiceClient::new(channel);
    let info = agent_info(&config);
    register_agent(&mut client, &meta, info.clone()).await;

    let backoff = BackoffPolicy::default();
    let mut session = match PingSession::open_with_retry(&client, &meta, &backoff, &shutdown).await
    {
        Ok(session) => session,
        Err(_) => return,
    };

    let mut ticker = tokio::time::interval(config.ping_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut registrations_open = true;
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                session.close();
                return;
            }
            _ = ticker.tick() => {
                if let Err(e) = session.send_ping().await {
                    warn!("Ping failed: {e}; reopening the ping session");
                    session.close();
                    session = match PingSession::open_with_retry(&client, &meta, &backoff, &shutdown).await {
                        Ok(session) => session,
                        Err(_) => return,
                    };
                    register_agent(&mut client, &meta, info.clone()).await;
                }
            }
            item = registrations.recv(), if registrations_open => match item {
                Some(item) => send_metadata(&mut metadata_client, &meta, item).await,
                // every handle is gone; pings still keep the channel warm
                None => registrations_open = false,
            }
        }
    }
}
