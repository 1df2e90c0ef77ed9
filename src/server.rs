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

use std::{net::SocketAddr, sync::Arc};

use eyre::WrapErr;
use futures::TryFutureExt;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;

use crate::{config::Config, engine::Engine, service::SdkService, signal::ShutdownRx};

/// The gRPC and HTTP listeners of the SDK.
pub struct Server {
    grpc: TcpListener,
    http: TcpListener,
}

impl Server {
    /// Binds both ports, failing if either is unavailable.
    pub async fn bind(config: &Config) -> crate::Result<Self> {
        let grpc = TcpListener::bind((config.address.as_str(), config.grpc_port))
            .await
            .wrap_err_with(|| format!("failed to bind gRPC endpoint {}", config.grpc_endpoint()))?;
        let http = TcpListener::bind((config.address.as_str(), config.http_port))
            .await
            .wrap_err_with(|| format!("failed to bind HTTP endpoint {}", config.http_endpoint()))?;

        Ok(Self { grpc, http })
    }

    pub fn grpc_addr(&self) -> std::io::Result<SocketAddr> {
        self.grpc.local_addr()
    }

    pub fn http_addr(&self) -> std::io::Result<SocketAddr> {
        self.http.local_addr()
    }

    /// Serves every tier on both listeners until a shutdown is requested.
    /// Open streams are dropped rather than drained.
    pub async fn serve(self, engine: Arc<dyn Engine>, shutdown_rx: ShutdownRx) -> crate::Result<()> {
        let service = SdkService::new(engine);
        let (stable, alpha, beta) = service.clone().into_servers();

        tracing::info!(address = %self.grpc.local_addr()?, "serving gRPC SDK");
        let grpc = tonic::transport::Server::builder()
            .add_service(stable)
            .add_service(alpha)
            .add_service(beta)
            .serve_with_incoming(TcpListenerStream::new(self.grpc))
            .map_err(eyre::Error::from);
        let http = crate::gateway::serve(self.http, service);

        tokio::select! {
            result = grpc => result?,
            result = http => result?,
            _ = crate::signal::requested(shutdown_rx) => {
                tracing::info!("shutting down SDK server");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::FeatureGates,
        engine::LocalEngine,
        gameserver,
        generated::sdk::{self, sdk_client::SdkClient},
        signal::ShutdownKind,
        test::available_addr,
    };

    #[tokio::test]
    async fn bind_conflict() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let config = Config {
            address: "127.0.0.1".into(),
            grpc_port: taken.local_addr().unwrap().port(),
            http_port: available_addr().port(),
            ..<_>::default()
        };

        let error = Server::bind(&config).await.err().unwrap();
        assert!(error.to_string().contains("gRPC"));
    }

    #[tokio::test]
    async fn serves_until_shutdown() {
        let config = Config {
            address: "127.0.0.1".into(),
            grpc_port: available_addr().port(),
            http_port: available_addr().port(),
            ..<_>::default()
        };
        let engine = LocalEngine::new(&config, gameserver::local_default(&FeatureGates::default()));
        let server = Server::bind(&config).await.unwrap();
        let grpc = server.grpc_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = crate::signal::channel(ShutdownKind::default());
        let handle = tokio::spawn(server.serve(Arc::new(engine), shutdown_rx));

        let mut client = SdkClient::connect(format!("http://{grpc}")).await.unwrap();
        let game_server = client
            .get_game_server(sdk::Empty {})
            .await
            .unwrap()
            .into_inner();
        assert_eq!(game_server.object_meta.unwrap().name, "local");

        shutdown_tx.send(ShutdownKind::Signal).unwrap();
        handle.await.unwrap().unwrap();
    }
}
