/*
 * Copyright 2021 Google LLC
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

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use eyre::WrapErr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    admin,
    config::{Config, FeatureGates, DEFAULT_ADDRESS, DEFAULT_GRPC_PORT, DEFAULT_HTTP_PORT},
    engine::{local::LogLevelHook, ClusterEngine, Engine, LocalEngine},
    k8s::KubeControlPlane,
    server::Server,
    signal::{ShutdownKind, ShutdownTx},
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The per game server SDK sidecar.
#[derive(clap::Parser, Clone, Debug)]
#[command(version)]
#[non_exhaustive]
pub struct Cli {
    /// Run in local development mode, without a cluster.
    #[clap(long, env)]
    pub local: bool,
    /// Path to a YAML or JSON `GameServer` document served by the local mode.
    #[clap(short, long, env)]
    pub file: Option<PathBuf>,
    /// The address to bind the gRPC and HTTP ports to.
    #[clap(long, env, default_value = DEFAULT_ADDRESS)]
    pub address: String,
    #[clap(long, env = "AGONES_SDK_GRPC_PORT", default_value_t = DEFAULT_GRPC_PORT)]
    pub grpc_port: u16,
    #[clap(long, env = "AGONES_SDK_HTTP_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    pub http_port: u16,
    /// The address of the `/healthz`, `/gshealthz` and `/metrics` server.
    #[clap(long, env, default_value_t = admin::default_address())]
    pub health_address: SocketAddr,
    /// Seconds to wait before binding any port.
    #[clap(long, env, default_value_t = 0)]
    pub delay: u64,
    /// Seconds after which the local mode shuts itself down. Zero runs
    /// forever.
    #[clap(long, env, default_value_t = 0)]
    pub timeout: u64,
    /// Comma separated list of the calls a client SDK is expected to make.
    /// Enables conformance mode.
    #[clap(long, env, value_delimiter = ',')]
    pub test: Vec<String>,
    /// Name of the SDK under conformance test, used in logs.
    #[clap(long, env, default_value = "")]
    pub test_sdk_name: String,
    /// Feature gates, e.g. `PlayerTracking=true&CountsAndLists=false`.
    #[clap(long, env, default_value = "")]
    pub feature_gates: FeatureGates,
    /// Whether to report any results to stdout/stderr.
    #[clap(short, long, env)]
    pub quiet: bool,
    /// Name of the `GameServer` this sidecar belongs to.
    #[clap(long, env = "GAMESERVER_NAME", hide = true)]
    pub gameserver_name: Option<String>,
    #[clap(long, env = "POD_NAMESPACE", hide = true)]
    pub pod_namespace: Option<String>,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            is_local: self.local,
            local_file: self.file.clone(),
            delay: Duration::from_secs(self.delay),
            timeout: Duration::from_secs(self.timeout),
            test: self
                .test
                .iter()
                .map(|call| call.trim().to_owned())
                .filter(|call| !call.is_empty())
                .collect(),
            test_sdk_name: self.test_sdk_name.clone(),
            grpc_port: self.grpc_port,
            http_port: self.http_port,
            address: self.address.clone(),
            feature_gates: self.feature_gates.clone(),
        }
    }

    /// Installs the global subscriber, returning a hook that changes its
    /// level at runtime.
    fn init_logging(&self) -> Option<LogLevelHook> {
        if self.quiet {
            return None;
        }

        let env_filter = EnvFilter::builder()
            .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
            .from_env_lossy();
        let (filter, handle) = tracing_subscriber::reload::Layer::new(env_filter);
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_file(true))
            .init();

        Some(Arc::new(move |level| {
            tracing::info!(level = level.as_directive(), "setting log level");
            if let Err(error) = handle.reload(EnvFilter::new(level.as_directive())) {
                tracing::warn!(%error, "failed to change log level");
            }
        }))
    }

    /// Drives the sidecar lifecycle using the command line arguments.
    #[tracing::instrument(skip_all)]
    pub async fn drive(self) -> crate::Result<()> {
        let version: std::borrow::Cow<'static, str> = if cfg!(debug_assertions) {
            format!("{VERSION}+debug").into()
        } else {
            VERSION.into()
        };

        let on_log_level = self.init_logging();
        let config = self.config();
        tracing::info!(
            version = &*version,
            commit = option_env!("GIT_COMMIT_HASH").unwrap_or("unknown"),
            grpc_port = config.grpc_port,
            http_port = config.http_port,
            local = config.is_local,
            feature_gates = %config.feature_gates,
            "Starting sdk sidecar"
        );

        let (shutdown_tx, shutdown_rx) = crate::signal::spawn_handler()?;
        let health = admin::Health::new();
        health.install_panic_hook(shutdown_tx.clone());

        if !config.delay.is_zero() {
            tracing::info!(delay = ?config.delay, "waiting before starting");
            tokio::time::sleep(config.delay).await;
        }

        let (engine, local, mut runner): (Arc<dyn Engine>, _, _) = if config.is_local {
            let engine = Arc::new(LocalEngine::from_config(&config, on_log_level).await?);
            let runner = tokio::spawn(engine.clone().run(shutdown_rx.clone()));
            if !config.timeout.is_zero() {
                spawn_timeout(config.timeout, shutdown_tx.clone());
            }
            (engine.clone() as Arc<dyn Engine>, Some(engine), runner)
        } else {
            let name = self
                .gameserver_name
                .clone()
                .ok_or_else(|| eyre::eyre!("GAMESERVER_NAME must be set outside of local mode"))?;
            let namespace = self
                .pod_namespace
                .clone()
                .ok_or_else(|| eyre::eyre!("POD_NAMESPACE must be set outside of local mode"))?;
            let control_plane = KubeControlPlane::new(name, namespace)
                .await
                .wrap_err("could not create the kubernetes client")?;
            let engine = Arc::new(ClusterEngine::new(
                Arc::new(control_plane),
                config.feature_gates.clone(),
            ));
            let runner = tokio::spawn(engine.clone().run(shutdown_rx.clone()));
            (engine as Arc<dyn Engine>, None, runner)
        };

        let _admin_task = admin::server(self.health_address, engine.clone(), health);
        let server = Server::bind(&config).await?;

        tokio::select! {
            result = server.serve(engine, shutdown_rx.clone()) => result?,
            result = &mut runner => {
                result?.wrap_err("could not run sidecar")?;
            }
        }

        match *shutdown_rx.borrow() {
            ShutdownKind::Timeout => tracing::info!("local timeout elapsed"),
            kind => tracing::info!(?kind, "shutting down sdk server"),
        }

        if let Some(local) = local {
            if !local.close() {
                return Err(eyre::eyre!(
                    "conformance test failed, received: {:?}",
                    local.received()
                ));
            }
        }

        Ok(())
    }
}

fn spawn_timeout(timeout: Duration, shutdown_tx: ShutdownTx) {
    tracing::info!(?timeout, "local mode will exit after timeout");
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        shutdown_tx.send(ShutdownKind::Timeout).ok();
    });
}
