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

//! Descriptor subscriptions handed out to `WatchGameServer` callers.

use std::{
    pin::Pin,
    task::{Context, Poll},
};

use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::{cache::Snapshot, generated::sdk};

/// Keeps the `watchers` gauge in step with the live subscriptions.
struct WatcherGuard;

impl WatcherGuard {
    fn new() -> Self {
        crate::metrics::watchers().inc();
        Self
    }
}

impl Drop for WatcherGuard {
    fn drop(&mut self) {
        crate::metrics::watchers().dec();
    }
}

/// A stream of descriptor versions. Intermediate versions may be skipped
/// when the subscriber falls behind, but the versions yielded are always
/// increasing.
pub struct Subscription {
    inner: WatchStream<Snapshot>,
    last_version: Option<u64>,
    _guard: WatcherGuard,
}

impl Subscription {
    /// Starts with the current descriptor, followed by every later change.
    pub fn new(rx: watch::Receiver<Snapshot>) -> Self {
        Self::from_stream(WatchStream::new(rx))
    }

    /// Only yields changes made after subscribing.
    pub fn from_changes(rx: watch::Receiver<Snapshot>) -> Self {
        Self::from_stream(WatchStream::from_changes(rx))
    }

    fn from_stream(inner: WatchStream<Snapshot>) -> Self {
        tracing::debug!("adding game server watcher");
        Self {
            inner,
            last_version: None,
            _guard: WatcherGuard::new(),
        }
    }
}

impl Stream for Subscription {
    type Item = sdk::GameServer;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            let Some(snapshot) = futures::ready!(self.inner.poll_next_unpin(cx)) else {
                tracing::debug!("game server watcher closed");
                return Poll::Ready(None);
            };

            if self
                .last_version
                .is_some_and(|last| snapshot.version <= last)
            {
                continue;
            }

            self.last_version = Some(snapshot.version);
            return Poll::Ready(Some((*snapshot.game_server).clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DescriptorCache;

    fn labelled(value: &str) -> impl FnOnce(&mut sdk::GameServer) + '_ {
        move |game_server| {
            crate::gameserver::meta_mut(game_server)
                .labels
                .insert("agones.dev/sdk-k".into(), value.into());
        }
    }

    fn label(game_server: &sdk::GameServer) -> Option<&str> {
        game_server
            .object_meta
            .as_ref()
            .and_then(|meta| meta.labels.get("agones.dev/sdk-k"))
            .map(String::as_str)
    }

    #[tokio::test]
    async fn immediate_snapshot() {
        let cache = DescriptorCache::new(<_>::default());
        let mut subscription = Subscription::new(cache.subscribe());
        assert_eq!(subscription.next().await, Some(<_>::default()));

        cache.modify(labelled("1"));
        let next = subscription.next().await.unwrap();
        assert_eq!(label(&next), Some("1"));
    }

    #[tokio::test]
    async fn coalesces_to_latest() {
        let cache = DescriptorCache::new(<_>::default());
        let mut subscription = Subscription::from_changes(cache.subscribe());
        cache.modify(labelled("1"));
        cache.modify(labelled("2"));
        cache.modify(labelled("3"));

        let next = subscription.next().await.unwrap();
        assert_eq!(label(&next), Some("3"));
    }

    #[tokio::test]
    async fn ends_when_cache_is_dropped() {
        let cache = DescriptorCache::new(<_>::default());
        let mut subscription = Subscription::from_changes(cache.subscribe());
        drop(cache);
        assert_eq!(subscription.next().await, None);
    }
}
