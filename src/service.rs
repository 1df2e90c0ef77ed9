/*
 * Copyright 2024 Google LLC
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! The gRPC front of the SDK. One [`SdkService`] backs all three tiers.

use std::{pin::Pin, sync::Arc};

use futures::{Stream, StreamExt};
use tonic::{Request, Response, Status, Streaming};

use crate::{
    engine::{Engine, Error},
    generated::sdk::{self, alpha, beta},
    lists, metrics,
};

type GrpcResult<T> = Result<Response<T>, Status>;

#[derive(Clone)]
pub struct SdkService {
    engine: Arc<dyn Engine>,
}

impl SdkService {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    /// The stable, alpha and beta services, sharing this one implementation.
    pub fn into_servers(
        self,
    ) -> (
        sdk::sdk_server::SdkServer<Self>,
        alpha::sdk_server::SdkServer<Self>,
        beta::sdk_server::SdkServer<Self>,
    ) {
        let service = Arc::new(self);
        (
            sdk::sdk_server::SdkServer::from_arc(service.clone()),
            alpha::sdk_server::SdkServer::from_arc(service.clone()),
            beta::sdk_server::SdkServer::from_arc(service),
        )
    }

    /// Runs `f` once the engine has synced, then counts the call.
    async fn call<T, F>(&self, rpc: &'static str, f: F) -> GrpcResult<T>
    where
        T: Send,
        F: FnOnce(&dyn Engine) -> Result<T, Error> + Send,
    {
        let result = match self.engine.synced().await {
            Ok(()) => f(&*self.engine),
            Err(error) => Err(error),
        };
        respond(rpc, result)
    }
}

/// Counts the call and turns the engine's answer into a gRPC response.
pub(crate) fn respond<T>(rpc: &str, result: Result<T, Error>) -> GrpcResult<T> {
    metrics::requests(rpc, metrics::result_label(&result)).inc();
    result.map(Response::new).map_err(|error| {
        tracing::debug!(rpc, %error, "request failed");
        Status::from(error)
    })
}

#[tonic::async_trait]
impl sdk::sdk_server::Sdk for SdkService {
    async fn ready(&self, _: Request<sdk::Empty>) -> GrpcResult<sdk::Empty> {
        self.call("Ready", |engine| engine.ready().map(|_| sdk::Empty {}))
            .await
    }

    async fn allocate(&self, _: Request<sdk::Empty>) -> GrpcResult<sdk::Empty> {
        self.call("Allocate", |engine| engine.allocate().map(|_| sdk::Empty {}))
            .await
    }

    async fn shutdown(&self, _: Request<sdk::Empty>) -> GrpcResult<sdk::Empty> {
        self.call("Shutdown", |engine| engine.shutdown().map(|_| sdk::Empty {}))
            .await
    }

    async fn health(&self, request: Request<Streaming<sdk::Empty>>) -> GrpcResult<sdk::Empty> {
        let mut pings = request.into_inner();
        loop {
            match pings.message().await {
                Ok(Some(_)) => self.engine.health(),
                Ok(None) => {
                    tracing::debug!("health stream closed");
                    break;
                }
                Err(status) => {
                    tracing::debug!(%status, "health stream failed");
                    return Err(status);
                }
            }
        }

        respond("Health", Ok(sdk::Empty {}))
    }

    async fn get_game_server(&self, _: Request<sdk::Empty>) -> GrpcResult<sdk::GameServer> {
        self.call("GetGameServer", |engine| engine.game_server())
            .await
    }

    type WatchGameServerStream =
        Pin<Box<dyn Stream<Item = Result<sdk::GameServer, Status>> + Send>>;

    async fn watch_game_server(
        &self,
        _: Request<sdk::Empty>,
    ) -> GrpcResult<Self::WatchGameServerStream> {
        self.call("WatchGameServer", |engine| {
            engine
                .watch_game_server()
                .map(|updates| Box::pin(updates.map(Ok)) as Self::WatchGameServerStream)
        })
        .await
    }

    async fn set_label(&self, request: Request<sdk::KeyValue>) -> GrpcResult<sdk::Empty> {
        let sdk::KeyValue { key, value } = request.into_inner();
        self.call("SetLabel", |engine| {
            engine.set_label(key, value).map(|_| sdk::Empty {})
        })
        .await
    }

    async fn set_annotation(&self, request: Request<sdk::KeyValue>) -> GrpcResult<sdk::Empty> {
        let sdk::KeyValue { key, value } = request.into_inner();
        self.call("SetAnnotation", |engine| {
            engine.set_annotation(key, value).map(|_| sdk::Empty {})
        })
        .await
    }

    async fn reserve(&self, request: Request<sdk::Duration>) -> GrpcResult<sdk::Empty> {
        let seconds = request.into_inner().seconds;
        self.call("Reserve", |engine| {
            engine.reserve(seconds).map(|_| sdk::Empty {})
        })
        .await
    }
}

#[tonic::async_trait]
impl alpha::sdk_server::Sdk for SdkService {
    async fn player_connect(&self, request: Request<alpha::PlayerId>) -> GrpcResult<alpha::Bool> {
        let id = request.into_inner().player_id;
        self.call("PlayerConnect", |engine| {
            engine.player_connect(id).map(|bool| alpha::Bool { bool })
        })
        .await
    }

    async fn player_disconnect(
        &self,
        request: Request<alpha::PlayerId>,
    ) -> GrpcResult<alpha::Bool> {
        let id = request.into_inner().player_id;
        self.call("PlayerDisconnect", |engine| {
            engine.player_disconnect(id).map(|bool| alpha::Bool { bool })
        })
        .await
    }

    async fn set_player_capacity(
        &self,
        request: Request<alpha::Count>,
    ) -> GrpcResult<alpha::Empty> {
        let capacity = request.into_inner().count;
        self.call("SetPlayerCapacity", |engine| {
            engine
                .set_player_capacity(capacity)
                .map(|_| alpha::Empty {})
        })
        .await
    }

    async fn get_player_capacity(&self, _: Request<alpha::Empty>) -> GrpcResult<alpha::Count> {
        self.call("GetPlayerCapacity", |engine| {
            engine.player_capacity().map(|count| alpha::Count { count })
        })
        .await
    }

    async fn get_player_count(&self, _: Request<alpha::Empty>) -> GrpcResult<alpha::Count> {
        self.call("GetPlayerCount", |engine| {
            engine.player_count().map(|count| alpha::Count { count })
        })
        .await
    }

    async fn is_player_connected(
        &self,
        request: Request<alpha::PlayerId>,
    ) -> GrpcResult<alpha::Bool> {
        let id = request.into_inner().player_id;
        self.call("IsPlayerConnected", |engine| {
            engine.is_player_connected(id).map(|bool| alpha::Bool { bool })
        })
        .await
    }

    async fn get_connected_players(
        &self,
        _: Request<alpha::Empty>,
    ) -> GrpcResult<alpha::PlayerIdList> {
        self.call("GetConnectedPlayers", |engine| {
            engine
                .connected_players()
                .map(|list| alpha::PlayerIdList { list })
        })
        .await
    }
}

#[tonic::async_trait]
impl beta::sdk_server::Sdk for SdkService {
    async fn get_counter(
        &self,
        request: Request<beta::GetCounterRequest>,
    ) -> GrpcResult<beta::Counter> {
        let name = request.into_inner().name;
        self.call("GetCounter", |engine| engine.get_counter(name))
            .await
    }

    async fn update_counter(
        &self,
        request: Request<beta::UpdateCounterRequest>,
    ) -> GrpcResult<beta::Counter> {
        let request = request.into_inner().counter_update_request;
        self.call("UpdateCounter", |engine| {
            request
                .ok_or_else(|| {
                    Error::InvalidArgument(
                        "invalid argument. CounterUpdateRequest: nil cannot be nil".into(),
                    )
                })
                .and_then(|request| engine.update_counter(request))
        })
        .await
    }

    async fn get_list(&self, request: Request<beta::GetListRequest>) -> GrpcResult<beta::List> {
        let name = request.into_inner().name;
        self.call("GetList", |engine| engine.get_list(name)).await
    }

    async fn update_list(
        &self,
        request: Request<beta::UpdateListRequest>,
    ) -> GrpcResult<beta::List> {
        let beta::UpdateListRequest { list, update_mask } = request.into_inner();
        self.call("UpdateList", |engine| {
            lists::validate_update(list, update_mask.map(|mask| mask.paths))
                .and_then(|(list, paths)| engine.update_list(list, paths))
        })
        .await
    }

    async fn add_list_value(
        &self,
        request: Request<beta::AddListValueRequest>,
    ) -> GrpcResult<beta::List> {
        let beta::AddListValueRequest { name, value } = request.into_inner();
        self.call("AddListValue", |engine| engine.add_list_value(name, value))
            .await
    }

    async fn remove_list_value(
        &self,
        request: Request<beta::RemoveListValueRequest>,
    ) -> GrpcResult<beta::List> {
        let beta::RemoveListValueRequest { name, value } = request.into_inner();
        self.call("RemoveListValue", |engine| {
            engine.remove_list_value(name, value)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Config, FeatureGates},
        engine::LocalEngine,
        gameserver,
    };
    use alpha::sdk_server::Sdk as _;
    use beta::sdk_server::Sdk as _;
    use sdk::sdk_server::Sdk as _;

    fn service() -> SdkService {
        let gates = FeatureGates::all();
        let config = Config {
            is_local: true,
            feature_gates: gates.clone(),
            ..<_>::default()
        };
        let engine = LocalEngine::new(&config, gameserver::local_default(&gates));
        SdkService::new(Arc::new(engine))
    }

    #[tokio::test]
    async fn errors_carry_codes() {
        let service = service();

        let status = service
            .get_counter(Request::new(beta::GetCounterRequest {
                name: "missing".into(),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::NotFound);

        let status = service
            .update_counter(Request::new(beta::UpdateCounterRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);

        let status = service
            .update_list(Request::new(beta::UpdateListRequest {
                list: Some(beta::List {
                    name: "players".into(),
                    ..<_>::default()
                }),
                update_mask: Some(prost_types::FieldMask {
                    paths: vec!["nope".into()],
                }),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn shared_implementation() {
        let service = service();
        service
            .set_label(Request::new(sdk::KeyValue {
                key: "key".into(),
                value: "value".into(),
            }))
            .await
            .unwrap();
        service
            .set_player_capacity(Request::new(alpha::Count { count: 3 }))
            .await
            .unwrap();

        let game_server = service
            .get_game_server(Request::new(sdk::Empty {}))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(
            game_server.object_meta.unwrap().labels["agones.dev/sdk-key"],
            "value"
        );
        assert_eq!(
            game_server.status.unwrap().players.unwrap().capacity,
            3
        );
    }
}
