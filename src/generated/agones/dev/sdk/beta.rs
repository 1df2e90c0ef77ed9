/// A representation of a Counter.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct Counter {
    /// The name of the Counter
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "crate::generated::is_default")]
    pub name: ::prost::alloc::string::String,
    /// The current count of the Counter
    #[prost(int64, tag = "2")]
    #[serde(with = "crate::generated::int64", skip_serializing_if = "crate::generated::is_default")]
    pub count: i64,
    /// The maximum capacity of the Counter
    #[prost(int64, tag = "3")]
    #[serde(with = "crate::generated::int64", skip_serializing_if = "crate::generated::is_default")]
    pub capacity: i64,
}
/// A representation of a Counter Update Request.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct CounterUpdateRequest {
    /// The name of the Counter to update
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "crate::generated::is_default")]
    pub name: ::prost::alloc::string::String,
    /// The value to set the Counter Count
    #[prost(message, optional, tag = "2")]
    #[serde(with = "crate::generated::int64::option", skip_serializing_if = "::core::option::Option::is_none")]
    pub count: ::core::option::Option<i64>,
    /// The value to set the Counter Capacity
    #[prost(message, optional, tag = "3")]
    #[serde(with = "crate::generated::int64::option", skip_serializing_if = "::core::option::Option::is_none")]
    pub capacity: ::core::option::Option<i64>,
    /// countDiff tracks if a Counter Update Request is CountIncrement (positive), CountDecrement
    /// (negative), 0 if a CountSet or CapacitySet request
    #[prost(int64, tag = "4")]
    #[serde(alias = "countDiff", with = "crate::generated::int64", skip_serializing_if = "crate::generated::is_default")]
    pub count_diff: i64,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct GetCounterRequest {
    /// The name of the Counter to get
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "crate::generated::is_default")]
    pub name: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct UpdateCounterRequest {
    /// The requested update to make to the Counter
    #[prost(message, optional, tag = "1")]
    #[serde(alias = "counterUpdateRequest", skip_serializing_if = "::core::option::Option::is_none")]
    pub counter_update_request: ::core::option::Option<CounterUpdateRequest>,
}
/// A representation of a List.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct List {
    /// The name of the List
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "crate::generated::is_default")]
    pub name: ::prost::alloc::string::String,
    /// The maximum capacity of the List
    #[prost(int64, tag = "2")]
    #[serde(with = "crate::generated::int64", skip_serializing_if = "crate::generated::is_default")]
    pub capacity: i64,
    /// The array of items in the List \["v1", "v2", …\]
    #[prost(string, repeated, tag = "3")]
    #[serde(skip_serializing_if = "crate::generated::is_default")]
    pub values: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct GetListRequest {
    /// The name of the List to get
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "crate::generated::is_default")]
    pub name: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateListRequest {
    /// The List to update
    #[prost(message, optional, tag = "1")]
    pub list: ::core::option::Option<List>,
    /// Required. Mask (list) of fields to update.
    /// Fields are specified relative to the List
    /// (e.g. `capacity`, `values`; *not* `List.capacity` or `List.values`).
    #[prost(message, optional, tag = "2")]
    pub update_mask: ::core::option::Option<::prost_types::FieldMask>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct AddListValueRequest {
    /// The name of the List to add a value to.
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "crate::generated::is_default")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "crate::generated::is_default")]
    pub value: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct RemoveListValueRequest {
    /// The name of the List to remove a value from.
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "crate::generated::is_default")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "crate::generated::is_default")]
    pub value: ::prost::alloc::string::String,
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
        /// Gets a Counter. Returns NOT_FOUND if the Counter does not exist.
        pub async fn get_counter(
            &mut self,
            request: impl tonic::IntoRequest<super::GetCounterRequest>,
        ) -> std::result::Result<tonic::Response<super::Counter>, tonic::Status> {
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
                "/agones.dev.sdk.beta.SDK/GetCounter",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("agones.dev.sdk.beta.SDK", "GetCounter"));
            self.inner.unary(req, path, codec).await
        }
        /// UpdateCounter returns the updated Counter. Returns NOT_FOUND if the Counter does not exist.
        /// Returns OUT_OF_RANGE if the Count is out of range \[0, Capacity\].
        pub async fn update_counter(
            &mut self,
            request: impl tonic::IntoRequest<super::UpdateCounterRequest>,
        ) -> std::result::Result<tonic::Response<super::Counter>, tonic::Status> {
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
                "/agones.dev.sdk.beta.SDK/UpdateCounter",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("agones.dev.sdk.beta.SDK", "UpdateCounter"));
            self.inner.unary(req, path, codec).await
        }
        /// Gets a List. Returns NOT_FOUND if the List does not exist.
        pub async fn get_list(
            &mut self,
            request: impl tonic::IntoRequest<super::GetListRequest>,
        ) -> std::result::Result<tonic::Response<super::List>, tonic::Status> {
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
                "/agones.dev.sdk.beta.SDK/GetList",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("agones.dev.sdk.beta.SDK", "GetList"));
            self.inner.unary(req, path, codec).await
        }
        /// UpdateList returns the updated List. Returns NOT_FOUND if the List does not exist.
        /// Only updates the fields named in the update mask.
        pub async fn update_list(
            &mut self,
            request: impl tonic::IntoRequest<super::UpdateListRequest>,
        ) -> std::result::Result<tonic::Response<super::List>, tonic::Status> {
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
                "/agones.dev.sdk.beta.SDK/UpdateList",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("agones.dev.sdk.beta.SDK", "UpdateList"));
            self.inner.unary(req, path, codec).await
        }
        /// Adds a value to a List and returns updated List. Returns NOT_FOUND if the List does not exist.
        /// Returns ALREADY_EXISTS if the value is already in the List.
        /// Returns OUT_OF_RANGE if the List is already at Capacity.
        pub async fn add_list_value(
            &mut self,
            request: impl tonic::IntoRequest<super::AddListValueRequest>,
        ) -> std::result::Result<tonic::Response<super::List>, tonic::Status> {
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
                "/agones.dev.sdk.beta.SDK/AddListValue",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("agones.dev.sdk.beta.SDK", "AddListValue"));
            self.inner.unary(req, path, codec).await
        }
        /// Removes a value from a List and returns updated List. Returns NOT_FOUND if the List does not exist.
        /// Returns NOT_FOUND if the value is not in the List.
        pub async fn remove_list_value(
            &mut self,
            request: impl tonic::IntoRequest<super::RemoveListValueRequest>,
        ) -> std::result::Result<tonic::Response<super::List>, tonic::Status> {
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
                "/agones.dev.sdk.beta.SDK/RemoveListValue",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("agones.dev.sdk.beta.SDK", "RemoveListValue"));
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
        /// Gets a Counter. Returns NOT_FOUND if the Counter does not exist.
        async fn get_counter(
            &self,
            request: tonic::Request<super::GetCounterRequest>,
        ) -> std::result::Result<tonic::Response<super::Counter>, tonic::Status>;
        /// UpdateCounter returns the updated Counter. Returns NOT_FOUND if the Counter does not exist.
        /// Returns OUT_OF_RANGE if the Count is out of range \[0, Capacity\].
        async fn update_counter(
            &self,
            request: tonic::Request<super::UpdateCounterRequest>,
        ) -> std::result::Result<tonic::Response<super::Counter>, tonic::Status>;
        /// Gets a List. Returns NOT_FOUND if the List does not exist.
        async fn get_list(
            &self,
            request: tonic::Request<super::GetListRequest>,
        ) -> std::result::Result<tonic::Response<super::List>, tonic::Status>;
        /// UpdateList returns the updated List. Returns NOT_FOUND if the List does not exist.
        /// Only updates the fields named in the update mask.
        async fn update_list(
            &self,
            request: tonic::Request<super::UpdateListRequest>,
        ) -> std::result::Result<tonic::Response<super::List>, tonic::Status>;
        /// Adds a value to a List and returns updated List. Returns NOT_FOUND if the List does not exist.
        /// Returns ALREADY_EXISTS if the value is already in the List.
        /// Returns OUT_OF_RANGE if the List is already at Capacity.
        async fn add_list_value(
            &self,
            request: tonic::Request<super::AddListValueRequest>,
        ) -> std::result::Result<tonic::Response<super::List>, tonic::Status>;
        /// Removes a value from a List and returns updated List. Returns NOT_FOUND if the List does not exist.
        /// Returns NOT_FOUND if the value is not in the List.
        async fn remove_list_value(
            &self,
            request: tonic::Request<super::RemoveListValueRequest>,
        ) -> std::result::Result<tonic::Response<super::List>, tonic::Status>;
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
                "/agones.dev.sdk.beta.SDK/GetCounter" => {
                    #[allow(non_camel_case_types)]
                    struct GetCounterSvc<T: Sdk>(pub Arc<T>);
                    impl<T: Sdk> tonic::server::UnaryService<super::GetCounterRequest>
                    for GetCounterSvc<T> {
                        type Response = super::Counter;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::GetCounterRequest>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as Sdk>::get_counter(&inner, request).await
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
                        let method = GetCounterSvc(inner);
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
                "/agones.dev.sdk.beta.SDK/UpdateCounter" => {
                    #[allow(non_camel_case_types)]
                    struct UpdateCounterSvc<T: Sdk>(pub Arc<T>);
                    impl<T: Sdk> tonic::server::UnaryService<super::UpdateCounterRequest>
                    for UpdateCounterSvc<T> {
                        type Response = super::Counter;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::UpdateCounterRequest>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as Sdk>::update_counter(&inner, request).await
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
                        let method = UpdateCounterSvc(inner);
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
                "/agones.dev.sdk.beta.SDK/GetList" => {
                    #[allow(non_camel_case_types)]
                    struct GetListSvc<T: Sdk>(pub Arc<T>);
                    impl<T: Sdk> tonic::server::UnaryService<super::GetListRequest>
                    for GetListSvc<T> {
                        type Response = super::List;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::GetListRequest>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as Sdk>::get_list(&inner, request).await
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
                        let method = GetListSvc(inner);
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
                "/agones.dev.sdk.beta.SDK/UpdateList" => {
                    #[allow(non_camel_case_types)]
                    struct UpdateListSvc<T: Sdk>(pub Arc<T>);
                    impl<T: Sdk> tonic::server::UnaryService<super::UpdateListRequest>
                    for UpdateListSvc<T> {
                        type Response = super::List;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::UpdateListRequest>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as Sdk>::update_list(&inner, request).await
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
                        let method = UpdateListSvc(inner);
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
                "/agones.dev.sdk.beta.SDK/AddListValue" => {
                    #[allow(non_camel_case_types)]
                    struct AddListValueSvc<T: Sdk>(pub Arc<T>);
                    impl<T: Sdk> tonic::server::UnaryService<super::AddListValueRequest>
                    for AddListValueSvc<T> {
                        type Response = super::List;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::AddListValueRequest>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as Sdk>::add_list_value(&inner, request).await
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
                        let method = AddListValueSvc(inner);
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
                "/agones.dev.sdk.beta.SDK/RemoveListValue" => {
                    #[allow(non_camel_case_types)]
                    struct RemoveListValueSvc<T: Sdk>(pub Arc<T>);
                    impl<T: Sdk> tonic::server::UnaryService<super::RemoveListValueRequest>
                    for RemoveListValueSvc<T> {
                        type Response = super::List;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::RemoveListValueRequest>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as Sdk>::remove_list_value(&inner, request).await
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
                        let method = RemoveListValueSvc(inner);
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
        const NAME: &'static str = "agones.dev.sdk.beta.SDK";
    }
}
