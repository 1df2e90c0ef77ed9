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

//! The last known descriptor, shared between the writer and every reader.

use std::sync::Arc;

use tokio::sync::watch;

use crate::generated::sdk;

/// One version of the descriptor. Versions only ever increase.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub version: u64,
    pub game_server: Arc<sdk::GameServer>,
}

/// Holds the current descriptor. Writes are serialised by the underlying
/// channel and only publish a new version when the descriptor changed.
#[derive(Debug)]
pub struct DescriptorCache {
    tx: watch::Sender<Snapshot>,
}

impl DescriptorCache {
    pub fn new(game_server: sdk::GameServer) -> Self {
        let (tx, _) = watch::channel(Snapshot {
            version: 0,
            game_server: Arc::new(game_server),
        });

        Self { tx }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    /// A deep copy of the current descriptor.
    pub fn get(&self) -> sdk::GameServer {
        (*self.tx.borrow().game_server).clone()
    }

    pub fn version(&self) -> u64 {
        self.tx.borrow().version
    }

    /// Applies `f` and publishes the result if it changed anything.
    pub fn modify(&self, f: impl FnOnce(&mut sdk::GameServer)) -> bool {
        self.tx.send_if_modified(|snapshot| {
            let mut next = (*snapshot.game_server).clone();
            f(&mut next);
            if next == *snapshot.game_server {
                return false;
            }

            snapshot.version += 1;
            snapshot.game_server = Arc::new(next);
            true
        })
    }

    /// Applies `f` to a copy of the descriptor, committing the copy only if
    /// `f` succeeds.
    pub fn try_modify<T, E>(
        &self,
        f: impl FnOnce(&mut sdk::GameServer) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut outcome = None;
        self.tx.send_if_modified(|snapshot| {
            let mut next = (*snapshot.game_server).clone();
            let result = f(&mut next);
            let changed = result.is_ok() && next != *snapshot.game_server;
            outcome = Some(result);

            if changed {
                snapshot.version += 1;
                snapshot.game_server = Arc::new(next);
            }

            changed
        });

        outcome.expect("send_if_modified always runs its closure")
    }

    /// Replaces the whole descriptor.
    pub fn replace(&self, game_server: sdk::GameServer) -> bool {
        self.modify(|current| *current = game_server)
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> sdk::GameServer {
        let mut game_server = sdk::GameServer::default();
        crate::gameserver::meta_mut(&mut game_server).name = name.into();
        game_server
    }

    #[test]
    fn versions_only_change_on_writes() {
        let cache = DescriptorCache::new(named("a"));
        assert_eq!(cache.version(), 0);

        assert!(!cache.replace(named("a")));
        assert_eq!(cache.version(), 0);

        assert!(cache.replace(named("b")));
        assert_eq!(cache.version(), 1);
        assert_eq!(cache.get(), named("b"));
    }

    #[test]
    fn failed_modifications_are_discarded() {
        let cache = DescriptorCache::new(named("a"));
        let result: Result<(), &str> = cache.try_modify(|game_server| {
            crate::gameserver::meta_mut(game_server).name = "b".into();
            Err("nope")
        });

        assert_eq!(result, Err("nope"));
        assert_eq!(cache.get(), named("a"));
        assert_eq!(cache.version(), 0);

        let result: Result<u8, ()> = cache.try_modify(|game_server| {
            crate::gameserver::meta_mut(game_server).name = "c".into();
            Ok(1)
        });
        assert_eq!(result, Ok(1));
        assert_eq!(cache.get(), named("c"));
        assert_eq!(cache.version(), 1);
    }

    #[tokio::test]
    async fn subscribers_see_latest() {
        let cache = DescriptorCache::new(named("a"));
        let mut rx = cache.subscribe();
        cache.replace(named("b"));
        cache.replace(named("c"));

        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.version, 2);
        assert_eq!(*snapshot.game_server, named("c"));
    }
}
