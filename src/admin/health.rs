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

use std::panic;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::Arc;

use hyper::{Body, Response, StatusCode};

use crate::{
    engine::Engine,
    signal::{ShutdownKind, ShutdownTx},
};

/// Process liveness, cleared by the first panic on any thread.
#[derive(Clone)]
pub struct Health {
    alive: Arc<AtomicBool>,
}

impl Health {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Chains a process wide panic hook that marks the process as dead and
    /// requests a shutdown.
    pub fn install_panic_hook(&self, shutdown_tx: ShutdownTx) {
        let alive = self.alive.clone();
        let default_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            tracing::error!(%panic_info, "Panic has occurred. Moving to Unhealthy");
            alive.swap(false, Relaxed);
            shutdown_tx.send(ShutdownKind::Signal).ok();
            default_hook(panic_info);
        }));
    }

    /// `/healthz`: 200 while the process is alive.
    pub fn check_liveness(&self) -> Response<Body> {
        status(self.alive.load(Relaxed))
    }

    /// `/gshealthz`: 200 while the game server is passing its health checks.
    pub fn check_game_server(&self, engine: &dyn Engine) -> Response<Body> {
        status(engine.is_healthy())
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new()
    }
}

fn status(healthy: bool) -> Response<Body> {
    if healthy {
        return Response::new("ok".into());
    }

    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_hook() {
        let (shutdown_tx, shutdown_rx) = crate::signal::channel(ShutdownKind::default());
        let health = Health::new();
        health.install_panic_hook(shutdown_tx);

        let response = health.check_liveness();
        assert_eq!(response.status(), StatusCode::OK);

        let _unused = std::panic::catch_unwind(|| {
            panic!("oh no!");
        });

        let response = health.check_liveness();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(*shutdown_rx.borrow(), ShutdownKind::Signal);
    }
}
