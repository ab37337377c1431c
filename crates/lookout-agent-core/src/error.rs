// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

use tonic::metadata::errors::InvalidMetadataValue;

/// Errors that can occur in the agent transport and telemetry pipeline
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid agent metadata: {0}")]
    Metadata(#[from] InvalidMetadataValue),

    #[error("Channel unavailable: {0}")]
    Unavailable(&'static str),

    #[error("Span queue full")]
    QueueFull,

    #[error("Transport failure: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("Rpc failure: {0}")]
    Rpc(#[from] tonic::Status),

    #[error("Agent shut down")]
    Shutdown,
}

pub type Result<T> = std::result::Result<T, AgentError>;
