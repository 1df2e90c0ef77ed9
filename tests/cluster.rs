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

use std::{sync::Arc, time::Duration};

use futures::StreamExt;

use agones_sdk_server::{
    config::{Config, FeatureGates},
    engine::{ClusterEngine, Engine},
    generated::sdk,
    k8s::{self, Event, GameServerState},
    server::Server,
    signal::{ShutdownKind, ShutdownTx},
    test::{available_addr, eventually, game_server, FakeControlPlane},
};

struct Sidecar {
    fake: Arc<FakeControlPlane>,
    client: sdk::sdk_client::SdkClient<tonic::transport::Channel>,
    shutdown_tx: ShutdownTx,
}

async fn sidecar(game_server: k8s::GameServer) -> Sidecar {
    let fake = Arc::new(FakeControlPlane::new(game_server));
    let engine = Arc::new(ClusterEngine::new(fake.clone(), FeatureGates::all()));
    let (shutdown_tx, shutdown_rx) = agones_sdk_server::signal::channel(ShutdownKind::default());
    tokio::spawn(engine.clone().run(shutdown_rx.clone()));
    engine.wait_for_sync().await;

    let config = Config {
        address: "127.0.0.1".into(),
        grpc_port: available_addr().port(),
        http_port: available_addr().port(),
        ..<_>::default()
    };
    let server = Server::bind(&config).await.unwrap();
    tokio::spawn(server.serve(engine as Arc<dyn Engine>, shutdown_rx));

    let client = sdk::sdk_client::SdkClient::connect(format!("http://{}", config.grpc_endpoint()))
        .await
        .unwrap();

    Sidecar {
        fake,
        client,
        shutdown_tx,
    }
}

fn state(fake: &FakeControlPlane) -> Option<GameServerState> {
    fake.game_server().state()
}

#[tokio::test]
async fn missed_health_checks() {
    let mut resource = game_server();
    resource.spec.health = serde_json::from_value(serde_json::json!({
        "periodSeconds": 1,
        "failureThreshold": 1,
        "initialDelaySeconds": 0,
    }))
    .unwrap();
    let Sidecar {
        fake, shutdown_tx, ..
    } = sidecar(resource).await;

    let unhealthy = tokio::time::timeout(Duration::from_secs(4), async {
        while state(&fake) != Some(GameServerState::Unhealthy) {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await;
    assert!(unhealthy.is_ok());
    assert!(fake
        .events()
        .contains(&Event::warning("Unhealthy", "Health check failure")));

    shutdown_tx.send(ShutdownKind::Signal).ok();
}

#[tokio::test]
async fn health_stream_keeps_server_healthy() {
    let mut resource = game_server();
    resource.spec.health = serde_json::from_value(serde_json::json!({
        "periodSeconds": 1,
        "failureThreshold": 1,
        "initialDelaySeconds": 0,
    }))
    .unwrap();
    let Sidecar {
        fake,
        mut client,
        shutdown_tx,
    } = sidecar(resource).await;

    let pings = futures::stream::unfold((), |()| async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Some((sdk::Empty {}, ()))
    })
    .take_until(tokio::time::sleep(Duration::from_secs(3)));
    client.health(pings).await.unwrap();

    assert_ne!(state(&fake), Some(GameServerState::Unhealthy));
    shutdown_tx.send(ShutdownKind::Signal).ok();
}

#[tokio::test]
async fn reserve_and_label_round_trip() {
    let Sidecar {
        fake,
        mut client,
        shutdown_tx,
    } = sidecar(game_server()).await;

    client
        .set_label(sdk::KeyValue {
            key: "foo".into(),
            value: "value-foo".into(),
        })
        .await
        .unwrap();
    client.reserve(sdk::Duration { seconds: 1 }).await.unwrap();

    assert!(eventually(|| state(&fake) == Some(GameServerState::Reserved)).await);
    let reserved = fake.game_server();
    assert!(reserved.status.unwrap().reserved_until.is_some());
    let labels = reserved.metadata.labels.unwrap();
    assert_eq!(labels["agones.dev/sdk-foo"], "value-foo");
    assert_eq!(labels["existing"], "true");

    assert!(eventually(|| state(&fake) == Some(GameServerState::RequestReady)).await);
    assert!(fake.game_server().status.unwrap().reserved_until.is_none());

    shutdown_tx.send(ShutdownKind::Signal).ok();
}

#[tokio::test]
async fn calls_wait_for_sync() {
    let fake = Arc::new(FakeControlPlane::new(game_server()));
    let engine = Arc::new(ClusterEngine::new(fake.clone(), FeatureGates::all()));
    let (shutdown_tx, shutdown_rx) = agones_sdk_server::signal::channel(ShutdownKind::default());

    let config = Config {
        address: "127.0.0.1".into(),
        grpc_port: available_addr().port(),
        http_port: available_addr().port(),
        ..<_>::default()
    };
    let server = Server::bind(&config).await.unwrap();
    tokio::spawn(server.serve(engine.clone() as Arc<dyn Engine>, shutdown_rx.clone()));

    let mut client =
        sdk::beta::sdk_client::SdkClient::connect(format!("http://{}", config.grpc_endpoint()))
            .await
            .unwrap();
    let pending = tokio::spawn(async move {
        client
            .get_counter(sdk::beta::GetCounterRequest {
                name: "rooms".into(),
            })
            .await
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!pending.is_finished());

    tokio::spawn(engine.clone().run(shutdown_rx));
    let counter = pending.await.unwrap().unwrap().into_inner();
    assert_eq!(counter.count, 1);
    assert_eq!(counter.capacity, 10);

    shutdown_tx.send(ShutdownKind::Signal).ok();
}
