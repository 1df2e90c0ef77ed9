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

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;

#[derive(Default)]
struct Slot {
    generation: u64,
    handle: Option<tokio::task::JoinHandle<()>>,
}

/// The single reservation timer of a sidecar. Arming replaces any pending
/// timer, and a timer that was cancelled or replaced never fires, even if
/// it had already woken up.
#[derive(Clone, Default)]
pub struct ReserveTimer {
    slot: Arc<Mutex<Slot>>,
}

impl ReserveTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `callback` once `after` has elapsed, unless cancelled first. The
    /// callback runs with the timer locked, so it must not call back into
    /// the timer.
    pub fn arm(&self, after: Duration, callback: impl FnOnce() + Send + 'static) {
        let mut slot = self.slot.lock();
        slot.generation = slot.generation.wrapping_add(1);
        if let Some(handle) = slot.handle.take() {
            handle.abort();
        }

        let generation = slot.generation;
        let timer = Arc::downgrade(&self.slot);
        tracing::debug!(after = ?after, "arming reserve timer");
        slot.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let Some(slot) = timer.upgrade() else {
                return;
            };

            let mut slot = slot.lock();
            if slot.generation != generation {
                return;
            }

            slot.handle = None;
            tracing::debug!("reserve timer expired");
            callback();
        }));
    }

    pub fn cancel(&self) {
        let mut slot = self.slot.lock();
        slot.generation = slot.generation.wrapping_add(1);
        if let Some(handle) = slot.handle.take() {
            tracing::debug!("cancelled reserve timer");
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.slot.lock().handle.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let fired = Arc::new(AtomicUsize::new(0));
        let callback = {
            let fired = fired.clone();
            move || {
                fired.fetch_add(1, Ordering::SeqCst);
            }
        };
        (fired, callback)
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_duration() {
        let timer = ReserveTimer::new();
        let (fired, callback) = counter();
        timer.arm(Duration::from_secs(3), callback);
        assert!(timer.is_armed());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!timer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let timer = ReserveTimer::new();
        let (fired, callback) = counter();
        timer.arm(Duration::from_secs(1), callback);
        timer.cancel();
        assert!(!timer.is_armed());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_replaces() {
        let timer = ReserveTimer::new();
        let (first, callback) = counter();
        timer.arm(Duration::from_secs(1), callback);
        let (second, callback) = counter();
        timer.arm(Duration::from_secs(3), callback);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }
}
