// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

//! Wire protocol for the lookout collector.
//!
//! `v1` holds the protobuf message types; `client` holds one thin gRPC
//! client per collector service.

pub mod client;
pub mod v1;

pub use client::{
    AgentServiceClient, CommandServiceClient, MetadataServiceClient, SpanServiceClient,
    StatServiceClient,
};
