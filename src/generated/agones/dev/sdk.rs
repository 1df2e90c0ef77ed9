/// I am Empty
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct Empty {}
/// Key, Value entry
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct KeyValue {
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "crate::generated::is_default")]
    pub key: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "crate::generated::is_default")]
    pub value: ::prost::alloc::string::String,
}
/// time duration, in seconds
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct Duration {
    #[prost(int64, tag = "1")]
    #[serde(with = "crate::generated::int64", skip_serializing_if = "crate::generated::is_default")]
    pub seconds: i64,
}
/// A GameServer Custom Resource Definition object
/// We will only export those resources that make the most
/// sense. Can always expand to more as needed.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct GameServer {
    #[prost(message, optional, tag = "1")]
    #[serde(alias = "objectMeta", skip_serializing_if = "::core::option::Option::is_none")]
    pub object_meta: ::core::option::Option<game_server::ObjectMeta>,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "::core::option::Option::is_none")]
    pub spec: ::core::option::Option<game_server::Spec>,
    #[prost(message, optional, tag = "3")]
    #[serde(skip_serializing_if = "::core::option::Option::is_none")]
    pub status: ::core::option::Option<game_server::Status>,
}
/// Nested message and enum types in `GameServer`.
pub mod game_server {
    /// representation of the K8s ObjectMeta resource
    #[allow(clippy::derive_partial_eq_without_eq)]
    #[derive(Clone, PartialEq, ::prost::Message)]
    #[derive(::serde::Serialize, ::serde::Deserialize)]
    #[serde(default)]
    pub struct ObjectMeta {
        #[prost(string, tag = "1")]
        #[serde(skip_serializing_if = "crate::generated::is_default")]
        pub name: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        #[serde(skip_serializing_if = "crate::generated::is_default")]
        pub namespace: ::prost::alloc::string::String,
        #[prost(string, tag = "3")]
        #[serde(skip_serializing_if = "crate::generated::is_default")]
        pub uid: ::prost::alloc::string::String,
        #[prost(string, tag = "4")]
        #[serde(alias = "resourceVersion", skip_serializing_if = "crate::generated::is_default")]
        pub resource_version: ::prost::alloc::string::String,
        #[prost(int64, tag = "5")]
        #[serde(with = "crate::generated::int64", skip_serializing_if = "crate::generated::is_default")]
        pub generation: i64,
        /// timestamp is in Epoch format, unit: seconds
        #[prost(int64, tag = "6")]
        #[serde(alias = "creationTimestamp", with = "crate::generated::int64", skip_serializing_if = "crate::generated::is_default")]
        pub creation_timestamp: i64,
        /// optional deletion timestamp in Epoch format, unit: seconds
        #[prost(int64, tag = "7")]
        #[serde(alias = "deletionTimestamp", with = "crate::generated::int64", skip_serializing_if = "crate::generated::is_default")]
        pub deletion_timestamp: i64,
        #[prost(map = "string, string", tag = "8")]
        #[serde(skip_serializing_if = "crate::generated::is_default")]
        pub annotations: ::std::collections::HashMap<
            ::prost::alloc::string::String,
            ::prost::alloc::string::String,
        >,
        #[prost(map = "string, string", tag = "9")]
        #[serde(skip_serializing_if = "crate::generated::is_default")]
        pub labels: ::std::collections::HashMap<
            ::prost::alloc::string::String,
            ::prost::alloc::string::String,
        >,
    }
    #[allow(clippy::derive_partial_eq_without_eq)]
    #[derive(Clone, PartialEq, ::prost::Message)]
    #[derive(::serde::Serialize, ::serde::Deserialize)]
    #[serde(default)]
    pub struct Spec {
        #[prost(message, optional, tag = "1")]
        #[serde(skip_serializing_if = "::core::option::Option::is_none")]
        pub health: ::core::option::Option<spec::Health>,
    }
    /// Nested message and enum types in `Spec`.
    pub mod spec {
        #[allow(clippy::derive_partial_eq_without_eq)]
        #[derive(Clone, PartialEq, ::prost::Message)]
        #[derive(::serde::Serialize, ::serde::Deserialize)]
        #[serde(default)]
        pub struct Health {
            #[prost(bool, tag = "1")]
            #[serde(skip_serializing_if = "crate::generated::is_default")]
            pub disabled: bool,
            #[prost(int32, tag = "2")]
            #[serde(alias = "periodSeconds", skip_serializing_if = "crate::generated::is_default")]
            pub period_seconds: i32,
            #[prost(int32, tag = "3")]
            #[serde(alias = "failureThreshold", skip_serializing_if = "crate::generated::is_default")]
            pub failure_threshold: i32,
            #[prost(int32, tag = "4")]
            #[serde(alias = "initialDelaySeconds", skip_serializing_if = "crate::generated::is_default")]
            pub initial_delay_seconds: i32,
        }
    }
    #[allow(clippy::derive_partial_eq_without_eq)]
    #[derive(Clone, PartialEq, ::prost::Message)]
    #[derive(::serde::Serialize, ::serde::Deserialize)]
    #[serde(default)]
    pub struct Status {
        #[prost(string, tag = "1")]
        #[serde(skip_serializing_if = "crate::generated::is_default")]
        pub state: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        #[serde(skip_serializing_if = "crate::generated::is_default")]
        pub address: ::prost::alloc::string::String,
        #[prost(message, repeated, tag = "7")]
        #[serde(skip_serializing_if = "crate::generated::is_default")]
        pub addresses: ::prost::alloc::vec::Vec<status::Address>,
        #[prost(message, repeated, tag = "3")]
        #[serde(skip_serializing_if = "crate::generated::is_default")]
        pub ports: ::prost::alloc::vec::Vec<status::Port>,
        /// \[Stage:Alpha\]
        /// \[FeatureFlag:PlayerTracking\]
        #[prost(message, optional, tag = "4")]
        #[serde(skip_serializing_if = "::core::option::Option::is_none")]
        pub players: ::core::option::Option<status::PlayerStatus>,
        /// \[Stage:Beta\]
        /// \[FeatureFlag:CountsAndLists\]
        #[prost(map = "string, message", tag = "5")]
        #[serde(skip_serializing_if = "crate::generated::is_default")]
        pub counters: ::std::collections::HashMap<
            ::prost::alloc::string::String,
            status::CounterStatus,
        >,
        /// \[Stage:Beta\]
        /// \[FeatureFlag:CountsAndLists\]
        #[prost(map = "string, message", tag = "6")]
        #[serde(skip_serializing_if = "crate::generated::is_default")]
        pub lists: ::std::collections::HashMap<
            ::prost::alloc::string::String,
            status::ListStatus,
        >,
    }
    /// Nested message and enum types in `Status`.
    pub mod status {
        #[allow(clippy::derive_partial_eq_without_eq)]
        #[derive(Clone, PartialEq, ::prost::Message)]
        #[derive(::serde::Serialize, ::serde::Deserialize)]
        #[serde(default)]
        pub struct Address {
            #[prost(string, tag = "1")]
            #[serde(skip_serializing_if = "crate::generated::is_default")]
            pub r#type: ::prost::alloc::string::String,
            #[prost(string, tag = "2")]
            #[serde(skip_serializing_if = "crate::generated::is_default")]
            pub address: ::prost::alloc::string::String,
        }
        #[allow(clippy::derive_partial_eq_without_eq)]
        #[derive(Clone, PartialEq, ::prost::Message)]
        #[derive(::serde::Serialize, ::serde::Deserialize)]
        #[serde(default)]
        pub struct Port {
            #[prost(string, tag = "1")]
            #[serde(skip_serializing_if = "crate::generated::is_default")]
            pub name: ::prost::alloc::string::String,
            #[prost(int32, tag = "2")]
            #[serde(skip_serializing_if = "crate::generated::is_default")]
            pub port: i32,
        }
        /// \[Stage:Alpha\]
        /// \[FeatureFlag:PlayerTracking\]
        #[allow(clippy::derive_partial_eq_without_eq)]
        #[derive(Clone, PartialEq, ::prost::Message)]
        #[derive(::serde::Serialize, ::serde::Deserialize)]
        #[serde(default)]
        pub struct PlayerStatus {
            #[prost(int64, tag = "1")]
            #[serde(with = "crate::generated::int64", skip_serializing_if = "crate::generated::is_default")]
            pub count: i64,
            #[prost(int64, tag = "2")]
            #[serde(with = "crate::generated::int64", skip_serializing_if = "crate::generated::is_default")]
            pub capacity: i64,
            #[prost(string, repeated, tag = "3")]
            #[serde(skip_serializing_if = "crate::generated::is_default")]
            pub ids: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
        }
        /// \[Stage:Beta\]
        /// \[FeatureFlag:CountsAndLists\]
        #[allow(clippy::derive_partial_eq_without_eq)]
        #[derive(Clone, PartialEq, ::prost::Message)]
        #[derive(::serde::Serialize, ::serde::Deserialize)]
        #[serde(default)]
        pub struct CounterStatus {
            #[prost(int64, tag = "1")]
            #[serde(with = "crate::generated::int64", skip_serializing_if = "crate::generated::is_default")]
            pub count: i64,
            #[prost(int64, tag = "2")]
            #[serde(with = "crate::generated::int64", skip_serializing_if = "crate::generated::is_default")]
            pub capacity: i64,
        }
        /// \[Stage:Beta\]
        /// \[FeatureFlag:CountsAndLists\]
        #[allow(clippy::derive_partial_eq_without_eq)]
        #[derive(Clone, PartialEq, ::prost::Message)]
        #[derive(::serde::Serialize, ::serde::Deserialize)]
        #[serde(default)]
        pub struct ListStatus {
            #[prost(int64, tag = "1")]
            #[serde(with = "crate::generated::int64", skip_serializing_if = "crate::generated::is_default")]
            pub capacity: i64,
            #[prost(string, repeated, tag = "2")]
            #[serde(skip_serializing_if = "crate::generated::is_default")]
            pub values: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
        }
    }
}
/// Generated client implementations.
pub mod sdk_client {
    #![allow(unused_variables, dead_code, missing_docs, clippy::let_unit_value)]
    use tonic::codegen::*;
    use tonic::codegen::http::Uri;
    /// SDK service to be used in the GameServer SDK to the Pod Sidecar
    #[derive(Debug, Clone)]
    pub struct SdkClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl SdkClient<tonic::transport::Channel> {
        /// Attempt to create a new client by connecting to a given endpoint.
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> SdkClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_origin(inner: T, origin: Uri) -> Self {
            let inner = tonic::client::Grpc::with_origin(inner, origin);
            Self { inner }
        }
        pub fn with_interceptor<F>(
            inner: T,
            interceptor: F,
        ) -> SdkClient<InterceptedService<T, F>>
        where
            F: tonic::service::Interceptor,
            T::ResponseBody: Default,
            T: tonic::codegen::Service<
                http::Request<tonic::body::BoxBody>,
                Response = http::Response<
                    <T as tonic::client::GrpcService<tonic::body::BoxBody>>::ResponseBody,
                >,
            >,
            <T as tonic::codegen::Service<
                http::Request<tonic::body::BoxBody>,
            >>::Error: Into<StdError> + Send + Sync,
        {
            SdkClient::new(InterceptedService::new(inner, interceptor))
        }
        /// Compress requests with the given encoding.
        ///
        /// This requires the server to support it otherwise it might respond with an
        /// error.
        #[must_use]
        pub fn send_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.inner = self.inner.send_compressed(encoding);
            self
        }
        /// Enable decompressing responses.
        #[must_use]
        pub fn accept_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.inner = self.inner.accept_compressed(encoding);
            self
        }
        /// Limits the maximum size of a decoded message.
        ///
        /// Default: `4MB`
        #[must_use]
        pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
            self.inner = self.inner.max_decoding_message_size(limit);
            self
        }
        /// Limits the maximum size of an encoded message.
        ///
        /// Default: `usize::MAX`
        #[must_use]
        pub fn max_encoding_message_size(mut self, limit: usize) -> Self {
            self.inner = self.inner.max_encoding_message_size(limit);
            self
        }
        /// Call when the GameServer is ready
        pub async fn ready(
            &mut self,
            request: impl tonic::IntoRequest<super::Empty>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status> {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::new(
                        tonic::Code::Unknown,
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/agones.dev.sdk.SDK/Ready",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("agones.dev.sdk.SDK", "Ready"));
            self.inner.unary(req, path, codec).await
        }
        /// Call to self Allocation the GameServer
        pub async fn allocate(
            &mut self,
            request: impl tonic::IntoRequest<super::Empty>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status> {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::new(
                        tonic::Code::Unknown,
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/agones.dev.sdk.SDK/Allocate",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("agones.dev.sdk.SDK", "Allocate"));
            self.inner.unary(req, path, codec).await
        }
        /// Call when the GameServer is shutting down
        pub async fn shutdown(
            &mut self,
            request: impl tonic::IntoRequest<super::Empty>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status> {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::new(
                        tonic::Code::Unknown,
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/agones.dev.sdk.SDK/Shutdown",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("agones.dev.sdk.SDK", "Shutdown"));
            self.inner.unary(req, path, codec).await
        }
        /// Send a Empty every d Duration to declare that this GameSever is healthy
        pub async fn health(
            &mut self,
            request: impl tonic::IntoStreamingRequest<Message = super::Empty>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status> {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::new(
                        tonic::Code::Unknown,
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/agones.dev.sdk.SDK/Health",
            );
            let mut req = request.into_streaming_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("agones.dev.sdk.SDK", "Health"));
            self.inner.client_streaming(req, path, codec).await
        }
        /// Retrieve the current GameServer data
        pub async fn get_game_server(
            &mut self,
            request: impl tonic::IntoRequest<super::Empty>,
        ) -> std::result::Result<tonic::Response<super::GameServer>, tonic::Status> {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::new(
                        tonic::Code::Unknown,
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/agones.dev.sdk.SDK/GetGameServer",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("agones.dev.sdk.SDK", "GetGameServer"));
            self.inner.unary(req, path, codec).await
        }
        /// Send GameServer details whenever the GameServer is updated
        pub async fn watch_game_server(
            &mut self,
            request: impl tonic::IntoRequest<super::Empty>,
        ) -> std::result::Result<
            tonic::Response<tonic::codec::Streaming<super::GameServer>>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::new(
                        tonic::Code::Unknown,
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/agones.dev.sdk.SDK/WatchGameServer",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("agones.dev.sdk.SDK", "WatchGameServer"));
            self.inner.server_streaming(req, path, codec).await
        }
        /// Apply a Label to the backing GameServer metadata
        pub async fn set_label(
            &mut self,
            request: impl tonic::IntoRequest<super::KeyValue>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status> {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::new(
                        tonic::Code::Unknown,
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/agones.dev.sdk.SDK/SetLabel",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("agones.dev.sdk.SDK", "SetLabel"));
            self.inner.unary(req, path, codec).await
        }
        /// Apply a Annotation to the backing GameServer metadata
        pub async fn set_annotation(
            &mut self,
            request: impl tonic::IntoRequest<super::KeyValue>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status> {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::new(
                        tonic::Code::Unknown,
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/agones.dev.sdk.SDK/SetAnnotation",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("agones.dev.sdk.SDK", "SetAnnotation"));
            self.inner.unary(req, path, codec).await
        }
        /// Marks the GameServer as the Reserved state for Duration
        pub async fn reserve(
            &mut self,
            request: impl tonic::IntoRequest<super::Duration>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status> {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::new(
                        tonic::Code::Unknown,
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/agones.dev.sdk.SDK/Reserve",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("agones.dev.sdk.SDK", "Reserve"));
            self.inner.unary(req, path, codec).await
        }
    }
}
/// Generated server implementations.
pub mod sdk_server {
    #![allow(unused_variables, dead_code, missing_docs, clippy::let_unit_value)]
    use tonic::codegen::*;
    /// Generated trait containing gRPC methods that should be implemented for use with SdkServer.
    #[async_trait]
    pub trait Sdk: Send + Sync + 'static {
        /// Call when the GameServer is ready
        async fn ready(
            &self,
            request: tonic::Request<super::Empty>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status>;
        /// Call to self Allocation the GameServer
        async fn allocate(
            &self,
            request: tonic::Request<super::Empty>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status>;
        /// Call when the GameServer is shutting down
        async fn shutdown(
            &self,
            request: tonic::Request<super::Empty>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status>;
        /// Send a Empty every d Duration to declare that this GameSever is healthy
        async fn health(
            &self,
            request: tonic::Request<tonic::Streaming<super::Empty>>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status>;
        /// Retrieve the current GameServer data
        async fn get_game_server(
            &self,
            request: tonic::Request<super::Empty>,
        ) -> std::result::Result<tonic::Response<super::GameServer>, tonic::Status>;
        /// Server streaming response type for the WatchGameServer method.
        type WatchGameServerStream: tonic::codegen::tokio_stream::Stream<
                Item = std::result::Result<super::GameServer, tonic::Status>,
            >
            + Send
            + 'static;
        /// Send GameServer details whenever the GameServer is updated
        async fn watch_game_server(
            &self,
            request: tonic::Request<super::Empty>,
        ) -> std::result::Result<tonic::Response<Self::WatchGameServerStream>, tonic::Status>;
        /// Apply a Label to the backing GameServer metadata
        async fn set_label(
            &self,
            request: tonic::Request<super::KeyValue>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status>;
        /// Apply a Annotation to the backing GameServer metadata
        async fn set_annotation(
            &self,
            request: tonic::Request<super::KeyValue>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status>;
        /// Marks the GameServer as the Reserved state for Duration
        async fn reserve(
            &self,
            request: tonic::Request<super::Duration>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status>;
    }
    /// SDK service to be used in the GameServer SDK to the Pod Sidecar
    #[derive(Debug)]
    pub struct SdkServer<T: Sdk> {
        inner: _Inner<T>,
        accept_compression_encodings: EnabledCompressionEncodings,
        send_compression_encodings: EnabledCompressionEncodings,
        max_decoding_message_size: Option<usize>,
        max_encoding_message_size: Option<usize>,
    }
    struct _Inner<T>(Arc<T>);
    impl<T: Sdk> SdkServer<T> {
        pub fn new(inner: T) -> Self {
            Self::from_arc(Arc::new(inner))
        }
        pub fn from_arc(inner: Arc<T>) -> Self {
            let inner = _Inner(inner);
            Self {
                inner,
                accept_compression_encodings: Default::default(),
                send_compression_encodings: Default::default(),
                max_decoding_message_size: None,
                max_encoding_message_size: None,
            }
        }
        pub fn with_interceptor<F>(
            inner: T,
            interceptor: F,
        ) -> InterceptedService<Self, F>
        where
            F: tonic::service::Interceptor,
        {
            InterceptedService::new(Self::new(inner), interceptor)
        }
        /// Enable decompressing requests with the given encoding.
        #[must_use]
        pub fn accept_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.accept_compression_encodings.enable(encoding);
            self
        }
        /// Compress responses with the given encoding, if the client supports it.
        #[must_use]
        pub fn send_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.send_compression_encodings.enable(encoding);
            self
        }
        /// Limits the maximum size of a decoded message.
        ///
        /// Default: `4MB`
        #[must_use]
        pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
            self.max_decoding_message_size = Some(limit);
            self
        }
        /// Limits the maximum size of an encoded message.
        ///
        /// Default: `usize::MAX`
        #[must_use]
        pub fn max_encoding_message_size(mut self, limit: usize) -> Self {
            self.max_encoding_message_size = Some(limit);
            self
        }
    }
    impl<T, B> tonic::codegen::Service<http::Request<B>> for SdkServer<T>
    where
        T: Sdk,
        B: Body + Send + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(
            &mut self,
            _cx: &mut Context<'_>,
        ) -> Poll<std::result::Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/agones.dev.sdk.SDK/Ready" => {
                    #[allow(non_camel_case_types)]
                    struct ReadySvc<T: Sdk>(pub Arc<T>);
                    impl<T: Sdk> tonic::server::UnaryService<super::Empty>
                    for ReadySvc<T> {
                        type Response = super::Empty;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::Empty>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as Sdk>::ready(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let inner = inner.0;
                        let method = ReadySvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/agones.dev.sdk.SDK/Allocate" => {
                    #[allow(non_camel_case_types)]
                    struct AllocateSvc<T: Sdk>(pub Arc<T>);
                    impl<T: Sdk> tonic::server::UnaryService<super::Empty>
                    for AllocateSvc<T> {
                        type Response = super::Empty;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::Empty>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as Sdk>::allocate(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let inner = inner.0;
                        let method = AllocateSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/agones.dev.sdk.SDK/Shutdown" => {
                    #[allow(non_camel_case_types)]
                    struct ShutdownSvc<T: Sdk>(pub Arc<T>);
                    impl<T: Sdk> tonic::server::UnaryService<super::Empty>
                    for ShutdownSvc<T> {
                        type Response = super::Empty;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::Empty>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as Sdk>::shutdown(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let inner = inner.0;
                        let method = ShutdownSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/agones.dev.sdk.SDK/Health" => {
                    #[allow(non_camel_case_types)]
                    struct HealthSvc<T: Sdk>(pub Arc<T>);
                    impl<T: Sdk> tonic::server::ClientStreamingService<super::Empty>
                    for HealthSvc<T> {
                        type Response = super::Empty;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<tonic::Streaming<super::Empty>>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as Sdk>::health(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let inner = inner.0;
                        let method = HealthSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.client_streaming(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/agones.dev.sdk.SDK/GetGameServer" => {
                    #[allow(non_camel_case_types)]
                    struct GetGameServerSvc<T: Sdk>(pub Arc<T>);
                    impl<T: Sdk> tonic::server::UnaryService<super::Empty>
                    for GetGameServerSvc<T> {
                        type Response = super::GameServer;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::Empty>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as Sdk>::get_game_server(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let inner = inner.0;
                        let method = GetGameServerSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/agones.dev.sdk.SDK/WatchGameServer" => {
                    #[allow(non_camel_case_types)]
                    struct WatchGameServerSvc<T: Sdk>(pub Arc<T>);
                    impl<T: Sdk> tonic::server::ServerStreamingService<super::Empty>
                    for WatchGameServerSvc<T> {
                        type Response = super::GameServer;
                        type ResponseStream = T::WatchGameServerStream;
                        type Future = BoxFuture<
                            tonic::Response<Self::ResponseStream>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::Empty>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as Sdk>::watch_game_server(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let inner = inner.0;
                        let method = WatchGameServerSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.server_streaming(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/agones.dev.sdk.SDK/SetLabel" => {
                    #[allow(non_camel_case_types)]
                    struct SetLabelSvc<T: Sdk>(pub Arc<T>);
                    impl<T: Sdk> tonic::server::UnaryService<super::KeyValue>
                    for SetLabelSvc<T> {
                        type Response = super::Empty;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::KeyValue>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as Sdk>::set_label(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let inner = inner.0;
                        let method = SetLabelSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/agones.dev.sdk.SDK/SetAnnotation" => {
                    #[allow(non_camel_case_types)]
                    struct SetAnnotationSvc<T: Sdk>(pub Arc<T>);
                    impl<T: Sdk> tonic::server::UnaryService<super::KeyValue>
                    for SetAnnotationSvc<T> {
                        type Response = super::Empty;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::KeyValue>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as Sdk>::set_annotation(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let inner = inner.0;
                        let method = SetAnnotationSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/agones.dev.sdk.SDK/Reserve" => {
                    #[allow(non_camel_case_types)]
                    struct ReserveSvc<T: Sdk>(pub Arc<T>);
                    impl<T: Sdk> tonic::server::UnaryService<super::Duration>
                    for ReserveSvc<T> {
                        type Response = super::Empty;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::Duration>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as Sdk>::reserve(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let inner = inner.0;
                        let method = ReserveSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => {
                    Box::pin(async move {
                        Ok(
                            http::Response::builder()
                                .status(200)
                                .header("grpc-status", "12")
                                .header("content-type", "application/grpc")
                                .body(empty_body())
                                .unwrap(),
                        )
                    })
                }
            }
        }
    }
    impl<T: Sdk> Clone for SdkServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self {
                inner,
                accept_compression_encodings: self.accept_compression_encodings,
                send_compression_encodings: self.send_compression_encodings,
                max_decoding_message_size: self.max_decoding_message_size,
                max_encoding_message_size: self.max_encoding_message_size,
            }
        }
    }
    impl<T: Sdk> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(Arc::clone(&self.0))
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: Sdk> tonic::server::NamedService for SdkServer<T> {
        const NAME: &'static str = "agones.dev.sdk.SDK";
    }
}
