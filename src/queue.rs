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

//! A deduplicating work queue of pending control plane writes.

use std::{
    collections::{HashSet, VecDeque},
    sync::Arc,
    time::Duration,
};

use parking_lot::Mutex;
use tokio::sync::Notify;

/// The kind of pending write. Each key is queued at most once; repeated
/// mutations coalesce into the one batch the reconciler writes next.
#[derive(
    Clone, Copy, Debug, Hash, PartialEq, Eq, strum_macros::Display, strum_macros::EnumString,
)]
#[strum(serialize_all = "camelCase")]
pub enum Key {
    UpdateState,
    UpdateLabel,
    UpdateAnnotation,
    UpdatePlayerCapacity,
    UpdateConnectedPlayers,
    UpdateCounters,
    UpdateLists,
}

#[derive(Default)]
struct Inner {
    queue: VecDeque<Key>,
    dirty: HashSet<Key>,
    processing: HashSet<Key>,
    shutdown: bool,
}

/// Keys that are added while they are being processed are requeued once
/// `done` is called, so a key is never handed to two workers at once.
#[derive(Default)]
pub struct WorkQueue {
    inner: Mutex<Inner>,
    notify: Notify,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, key: Key) {
        {
            let mut inner = self.inner.lock();
            if inner.shutdown || !inner.dirty.insert(key) {
                return;
            }

            if !inner.processing.contains(&key) {
                inner.queue.push_back(key);
                crate::metrics::queue_depth().set(inner.queue.len() as i64);
            }
        }

        self.notify.notify_one();
    }

    /// Adds `key` once `delay` has elapsed.
    pub fn add_after(self: &Arc<Self>, key: Key, delay: Duration) {
        let queue = Arc::downgrade(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(queue) = queue.upgrade() {
                queue.add(key);
            }
        });
    }

    /// Waits for the next key, returning `None` once the queue is shut down.
    pub async fn next(&self) -> Option<Key> {
        loop {
            let notified = self.notify.notified();
            {
                let mut inner = self.inner.lock();
                if inner.shutdown {
                    return None;
                }

                if let Some(key) = inner.queue.pop_front() {
                    inner.dirty.remove(&key);
                    inner.processing.insert(key);
                    crate::metrics::queue_depth().set(inner.queue.len() as i64);
                    return Some(key);
                }
            }

            notified.await;
        }
    }

    /// Marks `key` as processed, requeueing it if it was added meanwhile.
    pub fn done(&self, key: Key) {
        let requeued = {
            let mut inner = self.inner.lock();
            inner.processing.remove(&key);
            if inner.dirty.contains(&key) && !inner.shutdown {
                inner.queue.push_back(key);
                crate::metrics::queue_depth().set(inner.queue.len() as i64);
                true
            } else {
                false
            }
        };

        if requeued {
            self.notify.notify_one();
        }
    }

    pub fn shutdown(&self) {
        self.inner.lock().shutdown = true;
        self.notify.notify_waiters();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
