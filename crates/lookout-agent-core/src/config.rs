// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::AgentError;
use std::env;
use std::time::Duration;

/// Longest agent id the collector accepts.
pub const MAX_AGENT_ID_LEN: usize = 23;
/// Longest application name the collector accepts.
pub const MAX_APPLICATION_NAME_LEN: usize = 24;

/// Service type reported for a plain application process.
pub const SERVICE_TYPE_APP: i32 = 1800;

/// Configuration for the agent transport and telemetry pipeline.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Unique id of this agent instance, at most [`MAX_AGENT_ID_LEN`] chars
    pub agent_id: String,
    /// Logical application this process belongs to
    pub application_name: String,
    /// Service type code reported to the collector
    pub application_type: i32,
    /// Collector hostname or address
    pub collector_host: String,
    /// Collector port for the agent and command channels
    pub agent_port: u16,
    /// Collector port for the span channel
    pub span_port: u16,
    /// Collector port for the stat channel
    pub stat_port: u16,
    /// Runtime-metrics collection interval in milliseconds
    pub collect_interval_ms: u64,
    /// Number of stat samples batched into one upload
    pub stat_batch_count: usize,
    /// Capacity of the bounded span upload queue
    pub span_queue_size: usize,
    /// Keepalive ping interval in milliseconds
    pub ping_interval_ms: u64,
    /// Whether this process runs inside a container
    pub is_container: bool,
}

impl AgentConfig {
    /// Create a configuration with the given identity and default transport
    /// settings.
    pub fn new(agent_id: impl Into<String>, application_name: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            application_name: application_name.into(),
            application_type: SERVICE_TYPE_APP,
            collector_host: "localhost".to_string(),
            agent_port: 9991,
            span_port: 9993,
            stat_port: 9992,
            collect_interval_ms: 5000,
            stat_batch_count: 6,
            span_queue_size: 1024,
            ping_interval_ms: 60_000,
            is_container: false,
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, AgentError> {
        let agent_id = env::var("LOOKOUT_AGENT_ID").map_err(|_| {
            AgentError::InvalidConfig("LOOKOUT_AGENT_ID must be set".to_string())
        })?;
        let application_name = env::var("LOOKOUT_APPLICATION_NAME").map_err(|_| {
            AgentError::InvalidConfig("LOOKOUT_APPLICATION_NAME must be set".to_string())
        })?;

        let mut config = Self::new(agent_id, application_name);

        if let Ok(host) = env::var("LOOKOUT_COLLECTOR_HOST") {
            config.collector_host = host;
        }
        config.application_type = env::var("LOOKOUT_APPLICATION_TYPE")
            .ok()
            .and_then(|val| val.parse::<i32>().ok())
            .unwrap_or(config.application_type);
        config.agent_port = env::var("LOOKOUT_AGENT_PORT")
            .ok()
            .and_then(|port| port.parse::<u16>().ok())
            .unwrap_or(config.agent_port);
        config.span_port = env::var("LOOKOUT_SPAN_PORT")
            .ok()
            .and_then(|port| port.parse::<u16>().ok())
            .unwrap_or(config.span_port);
        config.stat_port = env::var("LOOKOUT_STAT_PORT")
            .ok()
            .and_then(|port| port.parse::<u16>().ok())
            .unwrap_or(config.stat_port);
        config.collect_interval_ms = env::var("LOOKOUT_STAT_COLLECT_INTERVAL_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(config.collect_interval_ms);
        config.stat_batch_count = env::var("LOOKOUT_STAT_BATCH_COUNT")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(config.stat_batch_count);
        config.span_queue_size = env::var("LOOKOUT_SPAN_QUEUE_SIZE")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(config.span_queue_size);
        config.ping_interval_ms = env::var("LOOKOUT_PING_INTERVAL_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(config.ping_interval_ms);
        config.is_container = env::var("LOOKOUT_CONTAINER")
            .map(|val| val.to_lowercase() == "true")
            .unwrap_or(config.is_container);

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.agent_id.trim().is_empty() {
            return Err(AgentError::InvalidConfig(
                "agent id cannot be empty".to_string(),
            ));
        }
        if self.agent_id.len() > MAX_AGENT_ID_LEN {
            return Err(AgentError::InvalidConfig(format!(
                "agent id '{}' exceeds {} characters",
                self.agent_id, MAX_AGENT_ID_LEN
            )));
        }
        if self.application_name.trim().is_empty() {
            return Err(AgentError::InvalidConfig(
                "application name cannot be empty".to_string(),
            ));
        }
        if self.application_name.len() > MAX_APPLICATION_NAME_LEN {
            return Err(AgentError::InvalidConfig(format!(
                "application name '{}' exceeds {} characters",
                self.application_name, MAX_APPLICATION_NAME_LEN
            )));
        }
        if self.collector_host.trim().is_empty() {
            return Err(AgentError::InvalidConfig(
                "collector host cannot be empty".to_string(),
            ));
        }
        if self.agent_port == 0 || self.span_port == 0 || self.stat_port == 0 {
            return Err(AgentError::InvalidConfig(
                "collector ports must be greater than 0".to_string(),
            ));
        }
        if self.collect_interval_ms < 1000 {
            return Err(AgentError::InvalidConfig(
                "stat collect interval must be at least 1000 ms".to_string(),
            ));
        }
        if self.stat_batch_count == 0 {
            return Err(AgentError::InvalidConfig(
                "stat batch count must be greater than 0".to_string(),
            ));
        }
        if self.span_queue_size == 0 {
            return Err(AgentError::InvalidConfig(
                "span queue size must be greater than 0".to_string(),
            ));
        }
        if self.ping_interval_ms == 0 {
            return Err(AgentError::InvalidConfig(
                "ping interval must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn collect_interval(&self) -> Duration {
        Duration::from_millis(self.collect_interval_ms)
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval_ms)
    }

    /// Collector endpoint for the given port.
    pub fn endpoint(&self, port: u16) -> String {
        format!("http://{}:{}", self.collector_host, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_new_config_is_valid() {
        let config = AgentConfig::new("web-1", "shop");
        assert!(config.validate().is_ok());
        assert_eq!(config.agent_port, 9991);
        assert_eq!(config.stat_port, 9992);
        assert_eq!(config.span_port, 9993);
        assert_eq!(config.collect_interval_ms, 5000);
        assert_eq!(config.stat_batch_count, 6);
    }

    #[test]
    fn test_validate_empty_agent_id() {
        let config = AgentConfig::new("", "shop");
        assert!(config.validate().is_err());

        let config = AgentConfig::new("   ", "shop");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_overlong_agent_id() {
        let config = AgentConfig::new("a".repeat(MAX_AGENT_ID_LEN + 1), "shop");
        assert!(config.validate().is_err());

        let config = AgentConfig::new("a".repeat(MAX_AGENT_ID_LEN), "shop");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_overlong_application_name() {
        let config = AgentConfig::new("web-1", "a".repeat(MAX_APPLICATION_NAME_LEN + 1));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_ports() {
        let mut config = AgentConfig::new("web-1", "shop");
        config.span_port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_short_collect_interval() {
        let mut config = AgentConfig::new("web-1", "shop");
        config.collect_interval_ms = 999;
        assert!(config.validate().is_err());

        config.collect_interval_ms = 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_batch_count() {
        let mut config = AgentConfig::new("web-1", "shop");
        config.stat_batch_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_format() {
        let config = AgentConfig::new("web-1", "shop");
        assert_eq!(config.endpoint(config.span_port), "http://localhost:9993");
    }

    #[test]
    #[serial]
    fn test_from_env_requires_identity() {
        env::remove_var("LOOKOUT_AGENT_ID");
        env::remove_var("LOOKOUT_APPLICATION_NAME");
        assert!(AgentConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        env::set_var("LOOKOUT_AGENT_ID", "web-1");
        env::set_var("LOOKOUT_APPLICATION_NAME", "shop");
        env::set_var("LOOKOUT_COLLECTOR_HOST", "collector.internal");
        env::set_var("LOOKOUT_SPAN_PORT", "19993");
        env::set_var("LOOKOUT_STAT_BATCH_COUNT", "3");
        env::set_var("LOOKOUT_CONTAINER", "TRUE");

        let config = AgentConfig::from_env().unwrap();
        assert_eq!(config.agent_id, "web-1");
        assert_eq!(config.collector_host, "collector.internal");
        assert_eq!(config.span_port, 19993);
        assert_eq!(config.agent_port, 9991);
        assert_eq!(config.stat_batch_count, 3);
        assert!(config.is_container);

        env::remove_var("LOOKOUT_AGENT_ID");
        env::remove_var("LOOKOUT_APPLICATION_NAME");
        env::remove_var("LOOKOUT_COLLECTOR_HOST");
        env::remove_var("LOOKOUT_SPAN_PORT");
        env::remove_var("LOOKOUT_STAT_BATCH_COUNT");
        env::remove_var("LOOKOUT_CONTAINER");
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_unparseable_numbers() {
        env::set_var("LOOKOUT_AGENT_ID", "web-1");
        env::set_var("LOOKOUT_APPLICATION_NAME", "shop");
        env::set_var("LOOKOUT_STAT_PORT", "not-a-port");

        let config = AgentConfig::from_env().unwrap();
        assert_eq!(config.stat_port, 9992);

        env::remove_var("LOOKOUT_AGENT_ID");
        env::remove_var("LOOKOUT_APPLICATION_NAME");
        env::remove_var("LOOKOUT_STAT_PORT");
    }
}
