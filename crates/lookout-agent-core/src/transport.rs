// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

//! Collector connection management: per-service channels, identity metadata,
//! and the jittered exponential backoff used whenever a dial fails.

use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use rand::Rng;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Channel, Endpoint};
use tonic::Request;
use tracing::{info, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(5 * 60);
const KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
const BACKOFF_BASE: Duration = Duration::from_secs(1);
const BACKOFF_CAP: Duration = Duration::from_secs(60);

/// Deadline applied to unary collector calls. Streams are never bounded this
/// way; they live as long as the channel does.
pub(crate) const UNARY_DEADLINE: Duration = Duration::from_secs(5);

/// Exponential backoff with uniform jitter.
///
/// The delay for attempt `n` is `base * 2^n` capped at `cap`, and the jittered
/// value is drawn uniformly from `[base, delay]`. Attempt zero therefore
/// always waits exactly `base`.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    base: Duration,
    cap: Duration,
}

impl BackoffPolicy {
    pub const fn new(base: Duration, cap: Duration) -> Self {
        Self { base, cap }
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        match 2u32.checked_pow(attempt) {
            Some(factor) => self.base.saturating_mul(factor).min(self.cap),
            None => self.cap,
        }
    }

    pub fn jittered(&self, attempt: u32) -> Duration {
        let delay = self.delay(attempt);
        if delay <= self.base {
            return self.base;
        }
        rand::thread_rng().gen_range(self.base..=delay)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(BACKOFF_BASE, BACKOFF_CAP)
    }
}

/// Identity metadata stamped onto every collector rpc.
///
/// Header values are validated once at construction so the send paths never
/// hit a metadata error. Session streams additionally carry a `socketid`
/// drawn from one shared counter, letting the collector tell a reconnected
/// stream from its predecessor.
pub struct AgentMeta {
    agent_id: MetadataValue<Ascii>,
    application_name: MetadataValue<Ascii>,
    start_time: MetadataValue<Ascii>,
    socket_seq: AtomicI64,
}

impl AgentMeta {
    pub fn new(config: &AgentConfig, start_time_ms: i64) -> Result<Self> {
        Ok(Self {
            agent_id: MetadataValue::try_from(config.agent_id.as_str())?,
            application_name: MetadataValue::try_from(config.application_name.as_str())?,
            start_time: MetadataValue::from(start_time_ms),
            socket_seq: AtomicI64::new(0),
        })
    }

    pub fn stamp<T>(&self, mut request: Request<T>) -> Request<T> {
        let meta = request.metadata_mut();
        meta.insert("agentid", self.agent_id.clone());
        meta.insert("applicationname", self.application_name.clone());
        meta.insert("starttime", self.start_time.clone());
        request
    }

    /// Stamp identity headers plus a fresh `socketid`.
    pub fn stamp_with_socket<T>(&self, request: Request<T>) -> Request<T> {
        let socket_id = self.socket_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let mut request = self.stamp(request);
        request
            .metadata_mut()
            .insert("socketid", MetadataValue::from(socket_id));
        request
    }
}

/// Owns the endpoint for one collector service and re-dials it on demand.
pub struct ConnectionSupervisor {
    endpoint: Endpoint,
    backoff: BackoffPolicy,
}

impl ConnectionSupervisor {
    pub fn new(endpoint_uri: String) -> Result<Self> {
        let endpoint = Endpoint::from_shared(endpoint_uri)?
            .connect_timeout(CONNECT_TIMEOUT)
            .http2_keep_alive_interval(KEEPALIVE_INTERVAL)
            .keep_alive_timeout(KEEPALIVE_TIMEOUT)
            .keep_alive_while_idle(true);
        Ok(Self {
            endpoint,
            backoff: BackoffPolicy::default(),
        })
    }

    /// Dial until a connection lands or `shutdown` fires.
    ///
    /// Never returns a transport error to the caller; failures only feed the
    /// backoff schedule.
    pub async fn connect_with_retry(&self, shutdown: &CancellationToken) -> Result<Channel> {
        let mut attempt: u32 = 0;
        loop {
            if shutdown.is_cancelled() {
                return Err(AgentError::Shutdown);
            }
            match self.endpoint.connect().await {
                Ok(channel) => {
                    if attempt > 0 {
                        info!(
                            "Connected to {} after {} failed attempts",
                            self.endpoint.uri(),
                            attempt
                        );
                    }
                    return Ok(channel);
                }
                Err(e) => {
                    let delay = self.backoff.jittered(attempt);
                    warn!(
                        "Connect to {} failed: {e}; retrying in {:?}",
                        self.endpoint.uri(),
                        delay
                    );
                    attempt = attempt.saturating_add(1);
                    tokio::select! {
                        _ = shutdown.cancelled() => return Err(AgentError::Shutdown),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_config() -> AgentConfig {
        AgentConfig::new("web-1", "shop")
    }

    #[test]
    fn backoff_doubles_up_to_the_cap() {
        let backoff = BackoffPolicy::default();
        assert_eq!(backoff.delay(0), Duration::from_secs(1));
        assert_eq!(backoff.delay(1), Duration::from_secs(2));
        assert_eq!(backoff.delay(5), Duration::from_secs(32));
        assert_eq!(backoff.delay(6), Duration::from_secs(60));
        assert_eq!(backoff.delay(40), Duration::from_secs(60));
    }

    #[test]
    fn backoff_delays_never_shrink() {
        let backoff = BackoffPolicy::default();
        let mut previous = Duration::ZERO;
        for attempt in 0..64 {
            let delay = backoff.delay(attempt);
            assert!(delay >= previous);
            previous = delay;
        }
    }

    #[test]
    fn first_jittered_delay_is_exactly_the_base() {
        let backoff = BackoffPolicy::default();
        assert_eq!(backoff.jittered(0), Duration::from_secs(1));
    }

    proptest! {
        #[test]
        fn jitter_stays_between_base_and_delay(attempt in 0u32..128) {
            let backoff = BackoffPolicy::default();
            let jittered = backoff.jittered(attempt);
            prop_assert!(jittered >= Duration::from_secs(1));
            prop_assert!(jittered <= backoff.delay(attempt));
        }
    }

    #[test]
    fn stamp_carries_the_identity_headers() {
        let meta = AgentMeta::new(&test_config(), 1_700_000_000_000).unwrap();
        let request = meta.stamp(Request::new(()));

        let headers = request.metadata();
        assert_eq!(headers.get("agentid").unwrap(), "web-1");
        assert_eq!(headers.get("applicationname").unwrap(), "shop");
        assert_eq!(headers.get("starttime").unwrap(), "1700000000000");
        assert!(headers.get("socketid").is_none());
    }

    #[test]
    fn socket_ids_increment_per_stream() {
        let meta = AgentMeta::new(&test_config(), 1_700_000_000_000).unwrap();

        let first = meta.stamp_with_socket(Request::new(()));
        let second = meta.stamp_with_socket(Request::new(()));
        assert_eq!(first.metadata().get("socketid").unwrap(), "1");
        assert_eq!(second.metadata().get("socketid").unwrap(), "2");
    }

    #[test]
    fn non_ascii_identity_is_rejected_up_front() {
        let mut config = test_config();
        config.agent_id = "caf\u{e9}".to_string();
        let result = AgentMeta::new(&config, 0);
        assert!(matches!(result, Err(AgentError::Metadata(_))));
    }

    #[test]
    fn supervisor_rejects_malformed_endpoints() {
        assert!(ConnectionSupervisor::new("::not a uri::".to_string()).is_err());
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits_the_dial_loop() {
        let supervisor = ConnectionSupervisor::new("http://127.0.0.1:1".to_string()).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let result = supervisor.connect_with_retry(&token).await;
        assert!(matches!(result, Err(AgentError::Shutdown)));
    }

    #[tokio::test]
    async fn cancellation_interrupts_the_backoff_sleep() {
        let supervisor = ConnectionSupervisor::new("http://127.0.0.1:1".to_string()).unwrap();
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let result = supervisor.connect_with_retry(&token).await;
        assert!(matches!(result, Err(AgentError::Shutdown)));
    }
}
