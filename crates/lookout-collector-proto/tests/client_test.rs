// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

use lookout_collector_proto::{v1, AgentServiceClient, MetadataServiceClient};
use tonic::transport::{Channel, Endpoint};
use tonic::Code;

/// Nothing listens on port 1; the lazy channel only fails once a call
/// actually dials.
fn unreachable_channel() -> Channel {
    Endpoint::from_static("http://127.0.0.1:1").connect_lazy()
}

#[tokio::test]
async fn register_agent_surfaces_transport_failure_as_status() {
    let mut client = AgentServiceClient::new(unreachable_channel());
    let err = client
        .register_agent(v1::AgentInfo::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::Unavailable);
}

#[tokio::test]
async fn metadata_requests_surface_transport_failure_as_status() {
    let mut client = MetadataServiceClient::new(unreachable_channel());

    let err = client
        .send_api_metadata(v1::ApiMetadata {
            api_id: 1,
            api_info: "GET /users".into(),
            line: 0,
            api_type: 1800,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::Unavailable);

    let err = client
        .send_sql_metadata(v1::SqlMetadata::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::Unavailable);

    let err = client
        .send_string_metadata(v1::StringMetadata::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::Unavailable);
}
