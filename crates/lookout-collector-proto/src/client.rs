// Copyright 2024-Present Lookout Observability, Inc. https://www.lookout-apm.com/
// SPDX-License-Identifier: Apache-2.0

//! Thin clients for the `lookout.v1` collector services, one struct per
//! service. Each method mirrors the stock tonic call sequence for its RPC
//! shape over a concrete transport channel.

use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;

use crate::v1;

/// Client for `lookout.v1.AgentService`: identity registration and the
/// keepalive ping session.
#[derive(Debug, Clone)]
pub struct AgentServiceClient {
    inner: tonic::client::Grpc<Channel>,
}

impl AgentServiceClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    pub async fn register_agent(
        &mut self,
        request: impl tonic::IntoRequest<v1::AgentInfo>,
    ) -> Result<tonic::Response<v1::AckResult>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec = tonic::codec::ProstCodec::default();
        let path = PathAndQuery::from_static("/lookout.v1.AgentService/RegisterAgent");
        self.inner.unary(request.into_request(), path, codec).await
    }

    pub async fn ping_session(
        &mut self,
        request: impl tonic::IntoStreamingRequest<Message = v1::Ping>,
    ) -> Result<tonic::Response<tonic::Streaming<v1::Ping>>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec = tonic::codec::ProstCodec::default();
        let path = PathAndQuery::from_static("/lookout.v1.AgentService/PingSession");
        self.inner
            .streaming(request.into_streaming_request(), path, codec)
            .await
    }
}

/// Client for `lookout.v1.MetadataService`: id-to-descriptor registrations,
/// carried on the same connection as the agent service.
#[derive(Debug, Clone)]
pub struct MetadataServiceClient {
    inner: tonic::client::Grpc<Channel>,
}

impl MetadataServiceClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    pub async fn send_api_metadata(
        &mut self,
        request: impl tonic::IntoRequest<v1::ApiMetadata>,
    ) -> Result<tonic::Response<v1::AckResult>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec = tonic::codec::ProstCodec::default();
        let path = PathAndQuery::from_static("/lookout.v1.MetadataService/SendApiMetadata");
        self.inner.unary(request.into_request(), path, codec).await
    }

    pub async fn send_sql_metadata(
        &mut self,
        request: impl tonic::IntoRequest<v1::SqlMetadata>,
    ) -> Result<tonic::Response<v1::AckResult>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec = tonic::codec::ProstCodec::default();
        let path = PathAndQuery::from_static("/lookout.v1.MetadataService/SendSqlMetadata");
        self.inner.unary(request.into_request(), path, codec).await
    }

    pub async fn send_string_metadata(
        &mut self,
        request: impl tonic::IntoRequest<v1::StringMetadata>,
    ) -> Result<tonic::Response<v1::AckResult>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec = tonic::codec::ProstCodec::default();
        let path = PathAndQuery::from_static("/lookout.v1.MetadataService/SendStringMetadata");
        self.inner.unary(request.into_request(), path, codec).await
    }
}

/// Client for `lookout.v1.SpanService`.
#[derive(Debug, Clone)]
pub struct SpanServiceClient {
    inner: tonic::client::Grpc<Channel>,
}

impl SpanServiceClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    pub async fn send_span(
        &mut self,
        request: impl tonic::IntoStreamingRequest<Message = v1::SpanMessage>,
    ) -> Result<tonic::Response<v1::Empty>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec = tonic::codec::ProstCodec::default();
        let path = PathAndQuery::from_static("/lookout.v1.SpanService/SendSpan");
        self.inner
            .client_streaming(request.into_streaming_request(), path, codec)
            .await
    }
}

/// Client for `lookout.v1.StatService`.
#[derive(Debug, Clone)]
pub struct StatServiceClient {
    inner: tonic::client::Grpc<Channel>,
}

impl StatServiceClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    pub async fn send_agent_stat(
        &mut self,
        request: impl tonic::IntoStreamingRequest<Message = v1::StatMessage>,
    ) -> Result<tonic::Response<v1::Empty>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec = tonic::codec::ProstCodec::default();
        let path = PathAndQuery::from_static("/lookout.v1.StatService/SendAgentStat");
        self.inner
            .client_streaming(request.into_streaming_request(), path, codec)
            .await
    }
}

/// Client for `lookout.v1.CommandService`: the bidirectional command session
/// plus the response RPCs its requests are answered on.
#[derive(Debug, Clone)]
pub struct CommandServiceClient {
    inner: tonic::client::Grpc<Channel>,
}

impl CommandServiceClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    pub async fn handle_command(
        &mut self,
        request: impl tonic::IntoStreamingRequest<Message = v1::CmdMessage>,
    ) -> Result<tonic::Response<tonic::Streaming<v1::CmdRequest>>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec = tonic::codec::ProstCodec::default();
        let path = PathAndQuery::from_static("/lookout.v1.CommandService/HandleCommand");
        self.inner
            .streaming(request.into_streaming_request(), path, codec)
            .await
    }

    pub async fn respond_echo(
        &mut self,
        request: impl tonic::IntoRequest<v1::CmdEchoResponse>,
    ) -> Result<tonic::Response<v1::Empty>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec = tonic::codec::ProstCodec::default();
        let path = PathAndQuery::from_static("/lookout.v1.CommandService/RespondEcho");
        self.inner.unary(request.into_request(), path, codec).await
    }

    pub async fn respond_active_thread_dump(
        &mut self,
        request: impl tonic::IntoRequest<v1::CmdActiveThreadDumpRes>,
    ) -> Result<tonic::Response<v1::Empty>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec = tonic::codec::ProstCodec::default();
        let path =
            PathAndQuery::from_static("/lookout.v1.CommandService/RespondActiveThreadDump");
        self.inner.unary(request.into_request(), path, codec).await
    }

    pub async fn respond_active_thread_light_dump(
        &mut self,
        request: impl tonic::IntoRequest<v1::CmdActiveThreadLightDumpRes>,
    ) -> Result<tonic::Response<v1::Empty>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec = tonic::codec::ProstCodec::default();
        let path =
            PathAndQuery::from_static("/lookout.v1.CommandService/RespondActiveThreadLightDump");
        self.inner.unary(request.into_request(), path, codec).await
    }

    pub async fn stream_active_thread_count(
        &mut self,
        request: impl tonic::IntoStreamingRequest<Message = v1::CmdActiveThreadCountRes>,
    ) -> Result<tonic::Response<v1::Empty>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {e}")))?;
        let codec = tonic::codec::ProstCodec::default();
        let path =
            PathAndQuery::from_static("/lookout.v1.CommandService/StreamActiveThreadCount");
        self.inner
            .client_streaming(request.into_streaming_request(), path, codec)
            .await
    }
}
