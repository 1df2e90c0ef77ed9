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

mod health;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server as HyperServer, StatusCode};

pub use self::health::Health;
use crate::engine::Engine;

pub const PORT: u16 = 8080;

/// The default address of the admin server, `[::]:8080`.
pub fn default_address() -> SocketAddr {
    (std::net::Ipv6Addr::UNSPECIFIED, PORT).into()
}

pub fn server(
    address: SocketAddr,
    engine: Arc<dyn Engine>,
    health: Health,
) -> tokio::task::JoinHandle<Result<(), hyper::Error>> {
    tracing::info!(address = %address, "Starting admin endpoint");

    let make_svc = make_service_fn(move |_conn| {
        let engine = engine.clone();
        let health = health.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                let engine = engine.clone();
                let health = health.clone();
                async move {
                    let result = handle_request(req, &*engine, &health);
                    Ok::<_, Infallible>(map_result_into_response(result))
                }
            }))
        }
    });

    tokio::spawn(async move { HyperServer::try_bind(&address)?.serve(make_svc).await })
}

/// Provides a generic way to map results into HTTP responses, providing it's
/// own 500 Response when it's `Err`, and passes the inner value if `Ok`.
fn map_result_into_response(request: Result<Response<Body>, eyre::Error>) -> Response<Body> {
    match request {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(%error, "admin http server error");
            let mut response = Response::new(Body::from("internal error"));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}

#[tracing::instrument(skip_all, fields(method = %request.method(), path = %request.uri().path()))]
fn handle_request(
    request: Request<Body>,
    engine: &dyn Engine,
    health: &Health,
) -> Result<Response<Body>, eyre::Error> {
    tracing::trace!("handling request");

    match (request.method(), request.uri().path()) {
        (&Method::GET, "/metrics") => Ok(collect_metrics()),
        (&Method::GET, "/healthz") => Ok(health.check_liveness()),
        (&Method::GET, "/gshealthz") => Ok(health.check_game_server(engine)),
        (_, path) => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::from(format!("{path} not found")))
            .map_err(From::from),
    }
}

fn collect_metrics() -> Response<Body> {
    let mut response = Response::new(Body::empty());
    let mut buffer = vec![];
    let encoder = prometheus::TextEncoder::new();
    let body =
        prometheus::Encoder::encode(&encoder, &crate::metrics::registry().gather(), &mut buffer)
            .map_err(|error| tracing::warn!(%error, "Failed to encode metrics"))
            .and_then(|_| {
                String::from_utf8(buffer)
                    .map(Body::from)
                    .map_err(|error| tracing::warn!(%error, "Failed to convert metrics to utf8"))
            });

    match body {
        Ok(body) => {
            *response.body_mut() = body;
        }
        Err(_) => {
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Config, FeatureGates},
        engine::LocalEngine,
        gameserver,
    };

    #[tokio::test]
    async fn collect_metrics() {
        crate::metrics::queue_depth().set(0);
        let response = super::collect_metrics();
        assert_eq!(response.status(), hyper::StatusCode::OK);
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("agones_sdk_queue_depth"));
    }

    #[tokio::test]
    async fn game_server_health() {
        let config = Config::default();
        let engine = LocalEngine::new(&config, gameserver::local_default(&FeatureGates::default()));
        let health = Health::new();

        let request = |path: &str| Request::get(path).body(Body::empty()).unwrap();

        let response = handle_request(request("/gshealthz"), &engine, &health).unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = handle_request(request("/healthz"), &engine, &health).unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = handle_request(request("/nope"), &engine, &health).unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
