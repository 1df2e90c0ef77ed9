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

/// Receiver for a shutdown event.
pub type ShutdownRx = tokio::sync::watch::Receiver<ShutdownKind>;
pub type ShutdownTx = tokio::sync::watch::Sender<ShutdownKind>;

/// Creates a new handler for shutdown signals (SIGTERM, SIGINT), returning
/// both ends of the channel so other tasks can also request a shutdown.
pub fn spawn_handler() -> crate::Result<(ShutdownTx, ShutdownRx)> {
    let (tx, rx) = channel(ShutdownKind::default());
    ShutdownKind::spawn_signal_handler(tx.clone())?;
    Ok((tx, rx))
}

pub fn channel(kind: ShutdownKind) -> (ShutdownTx, ShutdownRx) {
    tokio::sync::watch::channel(kind)
}

#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum ShutdownKind {
    /// Not shutting down.
    #[default]
    Running,
    /// Requested by a signal.
    Signal,
    /// The local engine's `--timeout` elapsed.
    Timeout,
}

impl ShutdownKind {
    #[inline]
    fn spawn_signal_handler(shutdown_tx: ShutdownTx) -> crate::Result<()> {
        crate::metrics::shutdown_initiated().set(false as _);

        #[cfg(unix)]
        let mut sig_term_fut =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

        tokio::spawn(async move {
            #[cfg(unix)]
            let sig_term = sig_term_fut.recv();
            #[cfg(not(unix))]
            let sig_term = std::future::pending::<Option<()>>();

            let signal = tokio::select! {
                _ = tokio::signal::ctrl_c() => "SIGINT",
                _ = sig_term => "SIGTERM",
            };

            crate::metrics::shutdown_initiated().set(true as _);
            tracing::info!(%signal, "shutting down from signal");
            shutdown_tx.send(Self::Signal).ok();
        });

        Ok(())
    }
}

/// Resolves once a shutdown has been requested on `shutdown_rx`.
pub async fn requested(mut shutdown_rx: ShutdownRx) {
    while *shutdown_rx.borrow_and_update() == ShutdownKind::Running {
        if shutdown_rx.changed().await.is_err() {
            return;
        }
    }
}
