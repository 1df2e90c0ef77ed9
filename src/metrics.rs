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

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};

pub use prometheus::Result;

pub const NAMESPACE: &str = "agones_sdk";

pub(crate) const RPC_LABEL: &str = "rpc";
pub(crate) const RESULT_LABEL: &str = "result";
pub(crate) const KEY_LABEL: &str = "key";

pub const SUCCESS: &str = "success";

static REGISTRY: Lazy<Registry> =
    Lazy::new(|| Registry::new_custom(Some(NAMESPACE.into()), None).unwrap());

/// The registry every sidecar metric is registered with.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

pub fn opts(name: &str, description: &str) -> Opts {
    Opts::new(name, description)
}

/// Count of SDK calls, labelled by call and outcome.
pub(crate) fn requests(rpc: &str, result: &str) -> IntCounter {
    static REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
        prometheus::register_int_counter_vec_with_registry! {
            opts("requests_total", "Total number of SDK requests"),
            &[RPC_LABEL, RESULT_LABEL],
            registry(),
        }
        .unwrap()
    });

    REQUESTS.with_label_values(&[rpc, result])
}

/// Count of reconciler passes, labelled by key and outcome.
pub(crate) fn reconciles(key: &str, result: &str) -> IntCounter {
    static RECONCILES: Lazy<IntCounterVec> = Lazy::new(|| {
        prometheus::register_int_counter_vec_with_registry! {
            opts("reconcile_total", "Total number of control plane write attempts"),
            &[KEY_LABEL, RESULT_LABEL],
            registry(),
        }
        .unwrap()
    });

    RECONCILES.with_label_values(&[key, result])
}

pub(crate) fn queue_depth() -> &'static IntGauge {
    static QUEUE_DEPTH: Lazy<IntGauge> = Lazy::new(|| {
        prometheus::register_int_gauge_with_registry! {
            opts("queue_depth", "Number of mutation keys waiting to be written"),
            registry(),
        }
        .unwrap()
    });

    &QUEUE_DEPTH
}

pub(crate) fn watchers() -> &'static IntGauge {
    static WATCHERS: Lazy<IntGauge> = Lazy::new(|| {
        prometheus::register_int_gauge_with_registry! {
            opts("watchers", "Number of active game server watch streams"),
            registry(),
        }
        .unwrap()
    });

    &WATCHERS
}

pub(crate) fn health_failures() -> &'static IntCounter {
    static HEALTH_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
        prometheus::register_int_counter_with_registry! {
            opts("health_failures_total", "Total number of missed health check periods"),
            registry(),
        }
        .unwrap()
    });

    &HEALTH_FAILURES
}

pub(crate) fn shutdown_initiated() -> &'static IntGauge {
    static SHUTDOWN_INITIATED: Lazy<IntGauge> = Lazy::new(|| {
        prometheus::register_int_gauge_with_registry! {
            opts("shutdown_initiated", "Shutdown process has been started"),
            registry(),
        }
        .unwrap()
    });

    &SHUTDOWN_INITIATED
}

/// Labels a result for the `requests_total` metric.
pub(crate) fn result_label<T>(result: &std::result::Result<T, crate::engine::Error>) -> &'static str {
    match result {
        Ok(_) => SUCCESS,
        Err(error) => error.kind(),
    }
}
