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

//! Liveness tracking driven by the client's health stream.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::generated::sdk::game_server::spec::Health;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthConfig {
    pub disabled: bool,
    /// How long a ping stays valid, also the interval between checks.
    pub period: Duration,
    pub failure_threshold: i32,
    pub initial_delay: Duration,
}

impl From<&Health> for HealthConfig {
    fn from(health: &Health) -> Self {
        let seconds = |value: i32| Duration::from_secs(u64::try_from(value).unwrap_or_default());
        Self {
            disabled: health.disabled,
            period: seconds(health.period_seconds).max(Duration::from_secs(1)),
            failure_threshold: health.failure_threshold.max(1),
            initial_delay: seconds(health.initial_delay_seconds),
        }
    }
}

struct Liveness {
    last_ping: Instant,
    failures: i32,
}

pub struct HealthMonitor {
    config: HealthConfig,
    liveness: Mutex<Liveness>,
}

impl HealthMonitor {
    pub fn new(config: HealthConfig) -> Self {
        Self {
            config,
            liveness: Mutex::new(Liveness {
                last_ping: Instant::now() + config.initial_delay,
                failures: 0,
            }),
        }
    }

    pub fn config(&self) -> HealthConfig {
        self.config
    }

    /// Records a message from the health stream.
    pub fn ping(&self) {
        let mut liveness = self.liveness.lock();
        liveness.last_ping = Instant::now();
        liveness.failures = 0;
    }

    /// Runs one check against the current time, returning whether the server
    /// is still considered healthy.
    pub fn check(&self) -> bool {
        {
            let mut liveness = self.liveness.lock();
            if Instant::now() > liveness.last_ping + self.config.period {
                liveness.failures += 1;
                crate::metrics::health_failures().inc();
                tracing::warn!(
                    failures = liveness.failures,
                    threshold = self.config.failure_threshold,
                    "health check failure"
                );
            } else {
                liveness.failures = 0;
            }
        }

        self.healthy()
    }

    pub fn healthy(&self) -> bool {
        self.config.disabled || self.liveness.lock().failures < self.config.failure_threshold
    }

    /// Spawns the periodic check. `on_unhealthy` runs once, the first time
    /// the failure threshold is reached.
    pub fn spawn(
        self: &Arc<Self>,
        mut shutdown_rx: crate::signal::ShutdownRx,
        on_unhealthy: impl FnOnce() + Send + 'static,
    ) -> Option<tokio::task::JoinHandle<()>> {
        if self.config.disabled {
            tracing::info!("health checking is disabled");
            return None;
        }

        let monitor = self.clone();
        let period = self.config.period;
        tracing::info!(
            period = ?period,
            failure_threshold = self.config.failure_threshold,
            initial_delay = ?self.config.initial_delay,
            "starting health checking"
        );

        Some(tokio::spawn(async move {
            let mut on_unhealthy = Some(on_unhealthy);
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = shutdown_rx.changed() => return,
                }

                if !monitor.check() {
                    if let Some(callback) = on_unhealthy.take() {
                        tracing::warn!("game server is unhealthy");
                        callback();
                    }
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn config(threshold: i32, delay: u64) -> HealthConfig {
        HealthConfig {
            disabled: false,
            period: Duration::from_secs(1),
            failure_threshold: threshold,
            initial_delay: Duration::from_secs(delay),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn consecutive_failures() {
        let monitor = HealthMonitor::new(config(2, 0));
        assert!(monitor.check());

        tokio::time::advance(Duration::from_millis(1500)).await;
        assert!(monitor.check());
        tokio::time::advance(Duration::from_millis(1000)).await;
        assert!(!monitor.check());

        monitor.ping();
        assert!(monitor.healthy());
        assert!(monitor.check());
    }

    #[tokio::test(start_paused = true)]
    async fn initial_delay() {
        let monitor = HealthMonitor::new(config(1, 5));
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(monitor.check());
        tokio::time::advance(Duration::from_millis(1100)).await;
        assert!(!monitor.check());
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_is_always_healthy() {
        let monitor = Arc::new(HealthMonitor::new(HealthConfig {
            disabled: true,
            ..config(1, 0)
        }));
        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(monitor.check());

        let (_tx, rx) = crate::signal::channel(<_>::default());
        assert!(monitor.spawn(rx, || {}).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn callback_fires_once() {
        let monitor = Arc::new(HealthMonitor::new(config(1, 0)));
        let fired = Arc::new(AtomicUsize::new(0));
        let (_tx, rx) = crate::signal::channel(<_>::default());
        let handle = monitor
            .spawn(rx, {
                let fired = fired.clone();
                move || {
                    fired.fetch_add(1, Ordering::SeqCst);
                }
            })
            .unwrap();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!monitor.healthy());
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn pings_keep_healthy() {
        let monitor = Arc::new(HealthMonitor::new(config(1, 0)));
        let fired = Arc::new(AtomicUsize::new(0));
        let (_tx, rx) = crate::signal::channel(<_>::default());
        let handle = monitor
            .spawn(rx, {
                let fired = fired.clone();
                move || {
                    fired.fetch_add(1, Ordering::SeqCst);
                }
            })
            .unwrap();

        for _ in 0..10 {
            tokio::time::sleep(Duration::from_millis(500)).await;
            monitor.ping();
        }

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        handle.abort();
    }
}
