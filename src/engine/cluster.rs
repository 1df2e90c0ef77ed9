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

//! The cluster backed engine.
//!
//! Calls only touch in-memory side tables and enqueue a [`Key`]. A single
//! reconciler drains the queue and writes the `GameServer` through the
//! [`ControlPlane`], while a watch keeps the [`DescriptorCache`] in step with
//! what the control plane stores.
//!
//! Counter and list changes are batched. Until the watch catches up with a
//! write, reads answer from the last observed resource with the written and
//! pending changes layered on top, so callers always read their own writes.

use std::{
    collections::{btree_map::Entry, BTreeMap},
    sync::Arc,
    time::Duration,
};

use futures::{future::BoxFuture, StreamExt};
use k8s_openapi::{
    apimachinery::pkg::apis::meta::v1::Time,
    chrono::{self, Utc},
};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::watch;

use crate::{
    cache::DescriptorCache,
    config::{Feature, FeatureGates},
    counters::{self, CounterUpdate},
    engine::{Engine, Error},
    gameserver::{self, State, LAST_ALLOCATED_ANNOTATION},
    generated::sdk::{
        self, beta,
        game_server::status::{CounterStatus, ListStatus},
    },
    health::HealthMonitor,
    k8s::{self, ApiError, ControlPlane, Event, WatchEvent},
    lists::{self, ListUpdate},
    metrics,
    players::PlayerRegister,
    queue::{Key, WorkQueue},
    reserve::ReserveTimer,
    signal::ShutdownRx,
    watch::Subscription,
};

/// How long startup waits for the first copy of the `GameServer`.
pub const SYNC_TIMEOUT: Duration = Duration::from_secs(30);
/// Player changes are written at most this often.
pub const PLAYER_UPDATE_PERIOD: Duration = Duration::from_secs(1);

const RETRIES: u32 = 15;
const BACKOFF_STEP: Duration = Duration::from_millis(50);
const MAX_DELAY: Duration = Duration::from_secs(10);

/// A change that can be batched and layered over an observed value.
trait Change: Clone + Default {
    type Status: Clone;

    fn apply_to(&self, base: &Self::Status) -> Self::Status;
    fn fold(&mut self, later: &Self);
}

impl Change for CounterUpdate {
    type Status = CounterStatus;

    fn apply_to(&self, base: &CounterStatus) -> CounterStatus {
        self.apply(base)
    }

    fn fold(&mut self, later: &Self) {
        self.merge(later)
    }
}

impl Change for ListUpdate {
    type Status = ListStatus;

    fn apply_to(&self, base: &ListStatus) -> ListStatus {
        self.apply(base)
    }

    fn fold(&mut self, later: &Self) {
        self.merge(later)
    }
}

/// Per name changes that have not yet been confirmed by the control plane.
///
/// `pending` holds what callers asked for since the last write, `in_flight`
/// what the current write carries, and `written` the values that write
/// stores, computed against the freshest resource at write time.
struct Batch<U: Change> {
    pending: BTreeMap<String, U>,
    in_flight: BTreeMap<String, U>,
    written: BTreeMap<String, U::Status>,
}

impl<U: Change> Default for Batch<U> {
    fn default() -> Self {
        Self {
            pending: BTreeMap::new(),
            in_flight: BTreeMap::new(),
            written: BTreeMap::new(),
        }
    }
}

impl<U: Change> Batch<U> {
    /// The value callers validate against: the last write if one is
    /// outstanding, otherwise what was observed.
    fn base(&self, name: &str, observed: Option<U::Status>) -> Option<U::Status> {
        self.written.get(name).cloned().or(observed)
    }

    fn view(&self, name: &str, observed: Option<U::Status>) -> Option<U::Status> {
        let base = self.base(name, observed)?;
        Some(match self.pending.get(name) {
            Some(update) => update.apply_to(&base),
            None => base,
        })
    }

    fn pending(&self, name: &str) -> U {
        self.pending.get(name).cloned().unwrap_or_default()
    }

    fn set_pending(&mut self, name: &str, update: U) {
        self.pending.insert(name.to_owned(), update);
    }

    /// Moves the pending changes into the next write and returns the values
    /// it should store.
    fn begin(
        &mut self,
        observed: impl Fn(&str) -> Option<U::Status>,
    ) -> BTreeMap<String, U::Status> {
        for (name, update) in std::mem::take(&mut self.pending) {
            match self.in_flight.entry(name) {
                Entry::Occupied(mut entry) => entry.get_mut().fold(&update),
                Entry::Vacant(entry) => {
                    entry.insert(update);
                }
            }
        }

        self.written = self
            .in_flight
            .iter()
            .filter_map(|(name, update)| match observed(name) {
                Some(base) => Some((name.clone(), update.apply_to(&base))),
                None => {
                    tracing::warn!(%name, "dropping update, no longer present on gameserver");
                    None
                }
            })
            .collect();

        self.written.clone()
    }

    fn finish(&mut self) {
        self.in_flight.clear();
        self.written.clear();
    }
}

#[derive(Default)]
struct Shared {
    /// The latest observed resource. `None` until the first watch event.
    current: Option<k8s::GameServer>,
    /// The state the reconciler should write next.
    state: Option<State>,
    reserve_for: Option<Duration>,
    /// Bumped on every requested transition, so a reservation armed for an
    /// older request never fires.
    epoch: u64,
    labels: BTreeMap<String, String>,
    annotations: BTreeMap<String, String>,
    players: PlayerRegister,
    counters: Batch<CounterUpdate>,
    lists: Batch<ListUpdate>,
}

impl Shared {
    fn observed_counter(&self, name: &str) -> Option<CounterStatus> {
        self.current
            .as_ref()
            .and_then(|gs| gs.counter(name))
            .map(counter_status)
    }

    fn observed_list(&self, name: &str) -> Option<ListStatus> {
        self.current
            .as_ref()
            .and_then(|gs| gs.list(name))
            .map(list_status)
    }

    fn counter(&self, name: &str) -> Result<CounterStatus, Error> {
        self.counters
            .view(name, self.observed_counter(name))
            .ok_or_else(|| counters::not_found(name))
    }

    fn list(&self, name: &str) -> Result<ListStatus, Error> {
        self.lists
            .view(name, self.observed_list(name))
            .ok_or_else(|| lists::not_found(name))
    }

    /// The resource to write against, or `None` when it no longer accepts
    /// writes from the SDK.
    fn target(&self, key: Key) -> Option<k8s::GameServer> {
        let current = self.current.as_ref()?;
        if current.is_being_deleted() {
            tracing::debug!(%key, "gameserver is being deleted, skipping update");
            return None;
        }

        if current.state() == Some(State::Unhealthy) {
            tracing::debug!(%key, "gameserver is unhealthy, skipping update");
            return None;
        }

        Some(current.clone())
    }
}

fn counter_status(counter: &k8s::CounterStatus) -> CounterStatus {
    CounterStatus {
        count: counter.count,
        capacity: counter.capacity,
    }
}

fn list_status(list: &k8s::ListStatus) -> ListStatus {
    ListStatus {
        capacity: list.capacity,
        values: list.values.clone(),
    }
}

/// Records `state` as the next state to write. Nothing moves a server out
/// of `Unhealthy`.
fn request_state(
    shared: &Mutex<Shared>,
    queue: &WorkQueue,
    state: State,
    reserve_for: Option<Duration>,
) {
    {
        let mut shared = shared.lock();
        shared.epoch += 1;
        if shared.state == Some(State::Unhealthy) {
            tracing::debug!(%state, "ignoring state change, gameserver is unhealthy");
            return;
        }

        shared.state = Some(state);
        shared.reserve_for = reserve_for;
    }

    queue.add(Key::UpdateState);
}

/// Numeric resource versions let out of order watch events be dropped.
fn is_stale(current: &k8s::GameServer, incoming: &k8s::GameServer) -> bool {
    let version = |gs: &k8s::GameServer| gs.resource_version()?.parse::<u64>().ok();
    matches!(
        (version(current), version(incoming)),
        (Some(current), Some(incoming)) if incoming < current
    )
}

fn with_version(mut patch: Value, target: &k8s::GameServer) -> Value {
    patch["metadata"]["resourceVersion"] = json!(target.resource_version());
    patch
}

pub struct ClusterEngine<C> {
    gates: FeatureGates,
    control_plane: Arc<C>,
    cache: Arc<DescriptorCache>,
    shared: Arc<Mutex<Shared>>,
    queue: Arc<WorkQueue>,
    reserve: ReserveTimer,
    health: OnceCell<Arc<HealthMonitor>>,
    synced: watch::Sender<bool>,
}

impl<C: ControlPlane> ClusterEngine<C> {
    pub fn new(control_plane: Arc<C>, gates: FeatureGates) -> Self {
        Self {
            gates,
            control_plane,
            cache: Arc::new(DescriptorCache::new(<_>::default())),
            shared: <_>::default(),
            queue: Arc::new(WorkQueue::new()),
            reserve: ReserveTimer::new(),
            health: OnceCell::new(),
            synced: watch::channel(false).0,
        }
    }

    pub fn cache(&self) -> &Arc<DescriptorCache> {
        &self.cache
    }

    pub fn is_synced(&self) -> bool {
        *self.synced.borrow()
    }

    /// Resolves once the first copy of the `GameServer` has been observed.
    pub async fn wait_for_sync(&self) {
        let mut synced = self.synced.subscribe();
        // The sender lives as long as `self`.
        synced.wait_for(|synced| *synced).await.ok();
    }

    /// Follows the `GameServer`, then runs the health monitor and the
    /// reconciler until shutdown. Returns an error when the cache never
    /// syncs or when a write keeps failing past its retry budget.
    pub async fn run(self: Arc<Self>, shutdown_rx: ShutdownRx) -> crate::Result<()> {
        let follower = tokio::spawn(self.clone().follow());

        tokio::select! {
            synced = tokio::time::timeout(SYNC_TIMEOUT, self.wait_for_sync()) => {
                if synced.is_err() {
                    follower.abort();
                    return Err(eyre::eyre!("timed out waiting for the gameserver to sync"));
                }
            }
            _ = crate::signal::requested(shutdown_rx.clone()) => {
                follower.abort();
                return Ok(());
            }
        }

        tracing::info!("gameserver synced");
        let health = self.start_health_monitor(shutdown_rx.clone());
        self.restore_reservation();

        let result = tokio::select! {
            result = self.reconcile_loop() => result,
            _ = crate::signal::requested(shutdown_rx) => Ok(()),
        };

        self.queue.shutdown();
        self.reserve.cancel();
        follower.abort();
        if let Some(health) = health {
            health.abort();
        }

        result
    }

    async fn follow(self: Arc<Self>) {
        let mut events = self.control_plane.watch();
        while let Some(event) = events.next().await {
            match event {
                Ok(WatchEvent::Applied(game_server)) => self.observe(game_server),
                Ok(WatchEvent::Deleted) => tracing::info!("gameserver has been deleted"),
                Err(error) => tracing::warn!(%error, "gameserver watch failed"),
            }
        }

        tracing::debug!("gameserver watch ended");
    }

    fn observe(&self, game_server: k8s::GameServer) {
        self.commit(game_server, |_| {});
    }

    /// Makes `game_server` the current resource unless a newer one has
    /// already been seen, then runs `f` under the same lock.
    fn commit(&self, game_server: k8s::GameServer, f: impl FnOnce(&mut Shared)) {
        let first = {
            let mut shared = self.shared.lock();
            let first = shared.current.is_none();
            let stale = shared
                .current
                .as_ref()
                .is_some_and(|current| is_stale(current, &game_server));

            if stale {
                tracing::trace!(
                    incoming = game_server.resource_version(),
                    "ignoring stale gameserver"
                );
            } else {
                if first {
                    if let Some(players) = game_server.players() {
                        shared.players =
                            PlayerRegister::new(players.capacity, players.ids.iter().cloned());
                    }
                }

                self.cache
                    .replace(gameserver::convert(&game_server, &self.gates));
                shared.current = Some(game_server);
            }

            f(&mut shared);
            first
        };

        if first {
            self.synced.send_replace(true);
        }
    }

    fn start_health_monitor(
        &self,
        shutdown_rx: ShutdownRx,
    ) -> Option<tokio::task::JoinHandle<()>> {
        let config = (&gameserver::health(&self.cache.get())).into();
        let monitor = self.health.get_or_init(|| Arc::new(HealthMonitor::new(config)));

        let shared = self.shared.clone();
        let queue = self.queue.clone();
        let reserve = self.reserve.clone();
        monitor.spawn(shutdown_rx, move || {
            reserve.cancel();
            request_state(&shared, &queue, State::Unhealthy, None);
        })
    }

    /// A server that was reserved before a restart goes back to ready once
    /// its reservation runs out.
    fn restore_reservation(&self) {
        let (until, epoch) = {
            let shared = self.shared.lock();
            let Some(current) = shared.current.as_ref() else {
                return;
            };

            if current.state() != Some(State::Reserved) {
                return;
            }

            let Some(until) = current
                .status
                .as_ref()
                .and_then(|status| status.reserved_until.as_ref())
            else {
                return;
            };

            (until.0, shared.epoch)
        };

        match (until - Utc::now()).to_std() {
            Ok(remaining) => {
                tracing::info!(?remaining, "restoring reservation timer");
                self.arm_reservation(remaining, epoch);
            }
            Err(_) => tracing::debug!("reservation has already expired"),
        }
    }

    fn arm_reservation(&self, after: Duration, epoch: u64) {
        if self.shared.lock().epoch != epoch {
            return;
        }

        let shared = self.shared.clone();
        let queue = self.queue.clone();
        self.reserve.arm(after, move || {
            if shared.lock().epoch != epoch {
                return;
            }

            tracing::info!("reservation expired, moving back to ready");
            request_state(&shared, &queue, State::RequestReady, None);
        });
    }

    fn transition(&self, state: State, reserve_for: Option<Duration>) {
        self.reserve.cancel();
        request_state(&self.shared, &self.queue, state, reserve_for);
    }

    fn ensure_synced(&self) -> Result<(), Error> {
        if self.is_synced() {
            Ok(())
        } else {
            Err(Error::Unavailable("gameserver has not synced yet".into()))
        }
    }

    async fn reconcile_loop(&self) -> crate::Result<()> {
        while let Some(key) = self.queue.next().await {
            let result = tryhard::retry_fn(|| self.reconcile(key))
                .retries(RETRIES)
                .exponential_backoff(BACKOFF_STEP)
                .max_delay(MAX_DELAY)
                .on_retry(move |attempt, _, error: &ApiError| {
                    let error = error.to_string();
                    async move {
                        tracing::warn!(%attempt, %key, %error, "failed to update gameserver, retrying");
                    }
                })
                .await;

            self.queue.done(key);
            let key_label = key.to_string();
            match result {
                Ok(()) => metrics::reconciles(&key_label, metrics::SUCCESS).inc(),
                Err(error) => {
                    metrics::reconciles(&key_label, "error").inc();
                    return Err(eyre::eyre!("failed to {key} after {RETRIES} retries: {error}"));
                }
            }
        }

        Ok(())
    }

    async fn reconcile(&self, key: Key) -> Result<(), ApiError> {
        tracing::debug!(%key, "processing");
        match key {
            Key::UpdateState => self.update_state().await,
            Key::UpdateLabel | Key::UpdateAnnotation => self.update_metadata(key).await,
            Key::UpdatePlayerCapacity => self.update_player_capacity().await,
            Key::UpdateConnectedPlayers => self.update_connected_players().await,
            Key::UpdateCounters => self.update_counters().await,
            Key::UpdateLists => self.update_lists().await,
        }
    }

    /// Writes `patch`. A conflict refreshes the current resource before
    /// the error is handed back for a retry.
    async fn write(&self, patch: Value) -> Result<k8s::GameServer, ApiError> {
        match self.control_plane.patch(&patch).await {
            Err(error) if error.is_conflict() => {
                tracing::debug!(%error, "conflict updating gameserver, refreshing");
                match self.control_plane.get().await {
                    Ok(game_server) => self.observe(game_server),
                    Err(error) => tracing::debug!(%error, "failed to refresh gameserver"),
                }
                Err(error)
            }
            result => result,
        }
    }

    async fn update_state(&self) -> Result<(), ApiError> {
        let (target, state, reserve_for, epoch) = {
            let shared = self.shared.lock();
            let Some(state) = shared.state else {
                return Ok(());
            };
            let Some(target) = shared.target(Key::UpdateState) else {
                return Ok(());
            };
            (target, state, shared.reserve_for, shared.epoch)
        };

        let reserve_for = reserve_for.filter(|_| state == State::Reserved);
        let reserved_until = match reserve_for {
            Some(after) => json!(Time(
                Utc::now() + chrono::Duration::seconds(after.as_secs() as i64)
            )),
            None => Value::Null,
        };

        tracing::info!(%state, "updating state");
        let mut patch = json!({
            "status": {
                "state": state,
                "reservedUntil": reserved_until,
            }
        });

        if state == State::Allocated {
            patch["metadata"]["annotations"][LAST_ALLOCATED_ANNOTATION] =
                json!(Utc::now().to_rfc3339());
        }

        let updated = self.write(with_version(patch, &target)).await?;
        self.observe(updated.clone());

        let event = match state {
            State::Unhealthy => Event::warning(state.to_string(), "Health check failure"),
            _ => {
                let mut note = String::from("SDK state change");
                if let Some(after) = reserve_for {
                    note.push_str(&format!(", for {}s", after.as_secs()));
                    self.arm_reservation(after, epoch);
                }
                Event::normal(updated.state().unwrap_or(state).to_string(), note)
            }
        };

        self.control_plane.record(&updated, event).await;
        Ok(())
    }

    async fn update_metadata(&self, key: Key) -> Result<(), ApiError> {
        let (target, values) = {
            let shared = self.shared.lock();
            let Some(target) = shared.target(key) else {
                return Ok(());
            };
            let values = match key {
                Key::UpdateLabel => &shared.labels,
                _ => &shared.annotations,
            };
            let values = values
                .iter()
                .map(|(key, value)| (gameserver::prefixed(key), json!(value)))
                .collect::<serde_json::Map<_, _>>();
            (target, values)
        };

        let field = match key {
            Key::UpdateLabel => "labels",
            _ => "annotations",
        };

        tracing::info!(%key, ?values, "updating metadata");
        let updated = self
            .write(with_version(json!({ "metadata": { field: values } }), &target))
            .await?;
        self.observe(updated);
        Ok(())
    }

    async fn update_player_capacity(&self) -> Result<(), ApiError> {
        let (target, capacity) = {
            let shared = self.shared.lock();
            let Some(target) = shared.target(Key::UpdatePlayerCapacity) else {
                return Ok(());
            };
            (target, shared.players.capacity())
        };

        tracing::info!(capacity, "updating player capacity");
        let patch = json!({ "status": { "players": { "capacity": capacity } } });
        let updated = self.write(with_version(patch, &target)).await?;
        self.observe(updated.clone());
        self.control_plane
            .record(
                &updated,
                Event::normal("PlayerCapacity", format!("Set to {capacity}")),
            )
            .await;
        Ok(())
    }

    async fn update_connected_players(&self) -> Result<(), ApiError> {
        let (target, ids) = {
            let shared = self.shared.lock();
            let Some(target) = shared.target(Key::UpdateConnectedPlayers) else {
                return Ok(());
            };
            (target, shared.players.ids().to_vec())
        };

        if target.players().is_some_and(|players| players.ids == ids) {
            tracing::debug!("connected players unchanged, skipping update");
            return Ok(());
        }

        let count = ids.len();
        tracing::info!(count, "updating connected players");
        let patch = json!({ "status": { "players": { "ids": ids, "count": count } } });
        let updated = self.write(with_version(patch, &target)).await?;
        self.observe(updated.clone());
        self.control_plane
            .record(
                &updated,
                Event::normal("PlayerCount", format!("Set to {count}")),
            )
            .await;
        Ok(())
    }

    async fn update_counters(&self) -> Result<(), ApiError> {
        let (target, written) = {
            let mut shared = self.shared.lock();
            let Some(target) = shared.target(Key::UpdateCounters) else {
                return Ok(());
            };
            let written = shared
                .counters
                .begin(|name| target.counter(name).map(counter_status));
            (target, written)
        };

        if written.is_empty() {
            self.shared.lock().counters.finish();
            return Ok(());
        }

        let counters = written
            .iter()
            .map(|(name, counter)| {
                (
                    name.clone(),
                    json!({ "count": counter.count, "capacity": counter.capacity }),
                )
            })
            .collect::<serde_json::Map<_, _>>();

        tracing::info!(?counters, "updating counters");
        let patch = json!({ "status": { "counters": counters } });
        let updated = self.write(with_version(patch, &target)).await?;
        self.commit(updated.clone(), |shared| shared.counters.finish());

        for name in written.keys() {
            if let Some(counter) = updated.counter(name) {
                let note = format!(
                    "Counter {name} updated to Count:{} Capacity:{}",
                    counter.count, counter.capacity
                );
                self.control_plane
                    .record(&updated, Event::normal("UpdateCounter", note))
                    .await;
            }
        }

        Ok(())
    }

    async fn update_lists(&self) -> Result<(), ApiError> {
        let (target, written) = {
            let mut shared = self.shared.lock();
            let Some(target) = shared.target(Key::UpdateLists) else {
                return Ok(());
            };
            let written = shared
                .lists
                .begin(|name| target.list(name).map(list_status));
            (target, written)
        };

        if written.is_empty() {
            self.shared.lock().lists.finish();
            return Ok(());
        }

        let lists = written
            .iter()
            .map(|(name, list)| {
                (
                    name.clone(),
                    json!({ "capacity": list.capacity, "values": list.values }),
                )
            })
            .collect::<serde_json::Map<_, _>>();

        tracing::info!(?lists, "updating lists");
        let patch = json!({ "status": { "lists": lists } });
        let updated = self.write(with_version(patch, &target)).await?;
        self.commit(updated.clone(), |shared| shared.lists.finish());

        for name in written.keys() {
            self.control_plane
                .record(
                    &updated,
                    Event::normal("UpdateList", format!("List {name} updated")),
                )
                .await;
        }

        Ok(())
    }

    fn modify_list(
        &self,
        name: &str,
        f: impl FnOnce(&mut ListUpdate, &ListStatus) -> Result<(), Error>,
    ) -> Result<beta::List, Error> {
        self.gates.ensure(Feature::CountsAndLists)?;
        let list = {
            let mut shared = self.shared.lock();
            let view = shared.list(name)?;
            let mut update = shared.lists.pending(name);
            f(&mut update, &view)?;
            shared.lists.set_pending(name, update);
            shared.list(name)?
        };

        self.queue.add(Key::UpdateLists);
        Ok(lists::to_proto(name, &list))
    }

    fn players<T>(&self, f: impl FnOnce(&PlayerRegister) -> T) -> Result<T, Error> {
        self.gates.ensure(Feature::PlayerTracking)?;
        Ok(f(&self.shared.lock().players))
    }
}

impl<C: ControlPlane> Engine for ClusterEngine<C> {
    fn synced(&self) -> BoxFuture<'_, Result<(), Error>> {
        Box::pin(async move {
            tokio::time::timeout(SYNC_TIMEOUT, self.wait_for_sync())
                .await
                .map_err(|_| {
                    Error::Unavailable("timed out waiting for the gameserver to sync".into())
                })
        })
    }

    fn ready(&self) -> Result<(), Error> {
        tracing::info!("received ready request");
        self.transition(State::RequestReady, None);
        Ok(())
    }

    fn allocate(&self) -> Result<(), Error> {
        tracing::info!("received allocate request");
        self.transition(State::Allocated, None);
        Ok(())
    }

    fn shutdown(&self) -> Result<(), Error> {
        tracing::info!("received shutdown request");
        self.transition(State::Shutdown, None);
        Ok(())
    }

    fn reserve(&self, seconds: i64) -> Result<(), Error> {
        tracing::info!(seconds, "received reserve request");
        let reserve_for = (seconds > 0).then(|| Duration::from_secs(seconds.unsigned_abs()));
        self.transition(State::Reserved, reserve_for);
        Ok(())
    }

    fn health(&self) {
        match self.health.get() {
            Some(monitor) => monitor.ping(),
            None => tracing::debug!("health ping before the gameserver synced"),
        }
    }

    fn is_healthy(&self) -> bool {
        self.health.get().map_or(true, |monitor| monitor.healthy())
    }

    fn game_server(&self) -> Result<sdk::GameServer, Error> {
        self.ensure_synced()?;
        Ok(self.cache.get())
    }

    fn watch_game_server(&self) -> Result<Subscription, Error> {
        self.ensure_synced()?;
        tracing::debug!("adding gameserver watcher");
        Ok(Subscription::new(self.cache.subscribe()))
    }

    fn set_label(&self, key: String, value: String) -> Result<(), Error> {
        tracing::info!(%key, %value, "setting label");
        self.shared.lock().labels.insert(key, value);
        self.queue.add(Key::UpdateLabel);
        Ok(())
    }

    fn set_annotation(&self, key: String, value: String) -> Result<(), Error> {
        tracing::info!(%key, %value, "setting annotation");
        self.shared.lock().annotations.insert(key, value);
        self.queue.add(Key::UpdateAnnotation);
        Ok(())
    }

    fn player_connect(&self, id: String) -> Result<bool, Error> {
        self.gates.ensure(Feature::PlayerTracking)?;
        tracing::info!(player_id = %id, "player connected");
        let connected = self.shared.lock().players.connect(&id)?;
        if connected {
            self.queue
                .add_after(Key::UpdateConnectedPlayers, PLAYER_UPDATE_PERIOD);
        }
        Ok(connected)
    }

    fn player_disconnect(&self, id: String) -> Result<bool, Error> {
        self.gates.ensure(Feature::PlayerTracking)?;
        tracing::info!(player_id = %id, "player disconnected");
        let disconnected = self.shared.lock().players.disconnect(&id);
        if disconnected {
            self.queue
                .add_after(Key::UpdateConnectedPlayers, PLAYER_UPDATE_PERIOD);
        }
        Ok(disconnected)
    }

    fn set_player_capacity(&self, capacity: i64) -> Result<(), Error> {
        self.gates.ensure(Feature::PlayerTracking)?;
        tracing::info!(capacity, "setting player capacity");
        self.shared.lock().players.set_capacity(capacity)?;
        self.queue.add(Key::UpdatePlayerCapacity);
        Ok(())
    }

    fn player_capacity(&self) -> Result<i64, Error> {
        self.players(PlayerRegister::capacity)
    }

    fn player_count(&self) -> Result<i64, Error> {
        self.players(PlayerRegister::count)
    }

    fn is_player_connected(&self, id: String) -> Result<bool, Error> {
        self.players(|players| players.is_connected(&id))
    }

    fn connected_players(&self) -> Result<Vec<String>, Error> {
        self.players(|players| players.ids().to_vec())
    }

    fn get_counter(&self, name: String) -> Result<beta::Counter, Error> {
        self.gates.ensure(Feature::CountsAndLists)?;
        let counter = self.shared.lock().counter(&name)?;
        Ok(counters::to_proto(&name, &counter))
    }

    fn update_counter(
        &self,
        request: beta::CounterUpdateRequest,
    ) -> Result<beta::Counter, Error> {
        self.gates.ensure(Feature::CountsAndLists)?;
        let update = CounterUpdate::from_request(&request)?;
        let name = request.name;
        tracing::info!(%name, ?update, "updating counter");

        let counter = {
            let mut shared = self.shared.lock();
            let base = shared
                .counters
                .base(&name, shared.observed_counter(&name))
                .ok_or_else(|| counters::not_found(&name))?;
            let staged = update.stage(&base, &shared.counters.pending(&name))?;
            let counter = staged.apply(&base);
            shared.counters.set_pending(&name, staged);
            counter
        };

        self.queue.add(Key::UpdateCounters);
        Ok(counters::to_proto(&name, &counter))
    }

    fn get_list(&self, name: String) -> Result<beta::List, Error> {
        self.gates.ensure(Feature::CountsAndLists)?;
        let list = self.shared.lock().list(&name)?;
        Ok(lists::to_proto(&name, &list))
    }

    fn update_list(&self, list: beta::List, paths: Vec<String>) -> Result<beta::List, Error> {
        tracing::info!(name = %list.name, ?paths, "updating list");
        let name = list.name.clone();
        self.modify_list(&name, |update, view| {
            update.fold(&lists::masked_update(view, &list, &paths)?);
            Ok(())
        })
    }

    fn add_list_value(&self, name: String, value: String) -> Result<beta::List, Error> {
        tracing::info!(%name, %value, "adding value to list");
        self.modify_list(&name, |update, view| update.add_value(&name, view, &value))
    }

    fn remove_list_value(&self, name: String, value: String) -> Result<beta::List, Error> {
        tracing::info!(%name, %value, "removing value from list");
        self.modify_list(&name, |update, view| {
            update.remove_value(&name, view, &value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{eventually, FakeControlPlane};
    use pretty_assertions::assert_eq;

    struct Harness {
        engine: Arc<ClusterEngine<FakeControlPlane>>,
        fake: Arc<FakeControlPlane>,
        _shutdown_tx: crate::signal::ShutdownTx,
    }

    async fn start(game_server: k8s::GameServer) -> Harness {
        let fake = Arc::new(FakeControlPlane::new(game_server));
        let engine = Arc::new(ClusterEngine::new(fake.clone(), FeatureGates::all()));
        let (shutdown_tx, shutdown_rx) = crate::signal::channel(<_>::default());
        tokio::spawn(engine.clone().run(shutdown_rx));
        engine.wait_for_sync().await;

        Harness {
            engine,
            fake,
            _shutdown_tx: shutdown_tx,
        }
    }

    fn state(fake: &FakeControlPlane) -> Option<State> {
        fake.game_server().state()
    }

    #[tokio::test(start_paused = true)]
    async fn synced_waits_for_first_event() {
        let fake = Arc::new(FakeControlPlane::new(crate::test::game_server()));
        let engine = Arc::new(ClusterEngine::new(fake, FeatureGates::all()));

        assert!(matches!(engine.synced().await, Err(Error::Unavailable(_))));

        let (_shutdown_tx, shutdown_rx) = crate::signal::channel(<_>::default());
        tokio::spawn(engine.clone().run(shutdown_rx));
        engine.synced().await.unwrap();
        assert_eq!(engine.get_counter("rooms".into()).unwrap().count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ready_requests_ready() {
        let Harness { engine, fake, .. } = start(crate::test::game_server()).await;
        engine.ready().unwrap();

        assert!(eventually(|| state(&fake) == Some(State::RequestReady)).await);
        assert!(fake
            .events()
            .contains(&Event::normal("RequestReady", "SDK state change")));
        assert_eq!(
            gameserver::state(&engine.game_server().unwrap()),
            Some(State::RequestReady)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn allocate_stamps_annotation() {
        let Harness { engine, fake, .. } = start(crate::test::game_server()).await;
        engine.allocate().unwrap();

        assert!(eventually(|| state(&fake) == Some(State::Allocated)).await);
        assert!(fake
            .game_server()
            .annotation(LAST_ALLOCATED_ANNOTATION)
            .is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn health_timeout_marks_unhealthy() {
        let mut game_server = crate::test::game_server();
        game_server.spec.health = k8s::Health {
            disabled: false,
            period_seconds: 1,
            failure_threshold: 1,
            initial_delay_seconds: 0,
        };
        let Harness { engine, fake, .. } = start(game_server).await;

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(eventually(|| state(&fake) == Some(State::Unhealthy)).await);
        assert!(!engine.is_healthy());
        assert!(fake
            .events()
            .contains(&Event::warning("Unhealthy", "Health check failure")));

        engine.ready().unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(state(&fake), Some(State::Unhealthy));
    }

    #[tokio::test(start_paused = true)]
    async fn reserve_returns_to_ready() {
        let Harness { engine, fake, .. } = start(crate::test::game_server()).await;
        engine.reserve(3).unwrap();

        assert!(eventually(|| state(&fake) == Some(State::Reserved)).await);
        let reserved_until = fake
            .game_server()
            .status
            .and_then(|status| status.reserved_until);
        assert!(reserved_until.is_some());
        assert!(fake
            .events()
            .contains(&Event::normal("Reserved", "SDK state change, for 3s")));

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(eventually(|| state(&fake) == Some(State::RequestReady)).await);
        let reserved_until = fake
            .game_server()
            .status
            .and_then(|status| status.reserved_until);
        assert_eq!(reserved_until, None);
    }

    #[tokio::test(start_paused = true)]
    async fn reserve_indefinitely() {
        let Harness { engine, fake, .. } = start(crate::test::game_server()).await;
        engine.reserve(0).unwrap();

        assert!(eventually(|| state(&fake) == Some(State::Reserved)).await);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(state(&fake), Some(State::Reserved));
        assert!(!engine.reserve.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn ready_cancels_reservation() {
        let Harness { engine, fake, .. } = start(crate::test::game_server()).await;
        engine.reserve(2).unwrap();
        assert!(eventually(|| state(&fake) == Some(State::Reserved)).await);

        engine.allocate().unwrap();
        assert!(eventually(|| state(&fake) == Some(State::Allocated)).await);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(state(&fake), Some(State::Allocated));
    }

    #[tokio::test(start_paused = true)]
    async fn restores_reservation() {
        let mut game_server = crate::test::game_server();
        let status = game_server.status.get_or_insert_with(<_>::default);
        status.state = Some(State::Reserved);
        status.reserved_until = Some(Time(Utc::now() + chrono::Duration::seconds(2)));

        let Harness { engine, fake, .. } = start(game_server).await;
        assert!(eventually(|| engine.reserve.is_armed()).await);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(eventually(|| state(&fake) == Some(State::RequestReady)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn labels_merge_under_prefix() {
        let Harness { engine, fake, .. } = start(crate::test::game_server()).await;
        engine.set_label("foo".into(), "value-foo".into()).unwrap();
        engine.set_label("bar".into(), "value-bar".into()).unwrap();
        engine
            .set_annotation("baz".into(), "value-baz".into())
            .unwrap();

        assert!(
            eventually(|| fake.game_server().label("agones.dev/sdk-bar") == Some("value-bar"))
                .await
        );
        let game_server = fake.game_server();
        assert_eq!(game_server.label("agones.dev/sdk-foo"), Some("value-foo"));
        assert_eq!(game_server.label("existing"), Some("true"));
        assert!(
            eventually(|| fake.game_server().annotation("agones.dev/sdk-baz") == Some("value-baz"))
                .await
        );
    }

    #[tokio::test(start_paused = true)]
    async fn conflicts_are_retried() {
        let Harness { engine, fake, .. } = start(crate::test::game_server()).await;
        fake.inject_conflicts(3);
        engine.shutdown().unwrap();
        assert!(eventually(|| state(&fake) == Some(State::Shutdown)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn counters_read_their_writes() {
        let Harness { engine, fake, .. } = start(crate::test::game_server()).await;
        fake.inject_conflicts(2);

        let request = |count_diff| beta::CounterUpdateRequest {
            name: "rooms".into(),
            count_diff,
            ..<_>::default()
        };

        let counter = engine.update_counter(request(4)).unwrap();
        assert_eq!((counter.count, counter.capacity), (5, 10));
        assert_eq!(engine.get_counter("rooms".into()).unwrap().count, 5);
        assert!(matches!(
            engine.update_counter(request(6)),
            Err(Error::OutOfRange(_))
        ));
        let counter = engine.update_counter(request(-2)).unwrap();
        assert_eq!(counter.count, 3);

        assert!(eventually(|| fake.game_server().counter("rooms").map(|c| c.count) == Some(3)).await);
        assert_eq!(engine.get_counter("rooms".into()).unwrap().count, 3);
        assert!(fake.events().iter().any(|event| event.reason == "UpdateCounter"));
        assert_eq!(
            engine.get_counter("missing".into()),
            Err(counters::not_found("missing"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn lists_read_their_writes() {
        let Harness { engine, fake, .. } = start(crate::test::game_server()).await;

        let list = engine
            .add_list_value("players".into(), "test3".into())
            .unwrap();
        assert_eq!(list.values, vec!["test0", "test1", "test2", "test3"]);
        assert!(matches!(
            engine.add_list_value("players".into(), "test3".into()),
            Err(Error::AlreadyExists(_))
        ));

        let list = engine
            .remove_list_value("players".into(), "test0".into())
            .unwrap();
        assert_eq!(list.values, vec!["test1", "test2", "test3"]);

        assert!(
            eventually(|| fake
                .game_server()
                .list("players")
                .is_some_and(|list| list.values == ["test1", "test2", "test3"]))
            .await
        );
        assert!(fake
            .events()
            .contains(&Event::normal("UpdateList", "List players updated")));

        let list = engine
            .update_list(
                beta::List {
                    name: "players".into(),
                    capacity: 1,
                    values: vec![],
                },
                vec!["capacity".into()],
            )
            .unwrap();
        assert_eq!(list.values, vec!["test1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn players_are_batched() {
        let Harness { engine, fake, .. } = start(crate::test::game_server()).await;
        engine.set_player_capacity(1).unwrap();
        assert!(engine.player_connect("a".into()).unwrap());
        assert_eq!(
            engine.player_connect("b".into()),
            Err(Error::PlayersAtCapacity)
        );
        assert_eq!(engine.player_count().unwrap(), 1);
        assert_eq!(engine.connected_players().unwrap(), vec!["a".to_owned()]);

        assert!(
            eventually(|| fake
                .game_server()
                .players()
                .is_some_and(|players| players.ids == ["a"] && players.capacity == 1))
            .await
        );
        assert!(fake
            .events()
            .contains(&Event::normal("PlayerCount", "Set to 1")));

        assert!(engine.player_disconnect("a".into()).unwrap());
        assert!(!engine.player_disconnect("a".into()).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn seeds_players_from_status() {
        let mut game_server = crate::test::game_server();
        game_server.status.get_or_insert_with(<_>::default).players = Some(k8s::PlayerStatus {
            count: 1,
            capacity: 4,
            ids: vec!["seeded".into()],
        });

        let Harness { engine, .. } = start(game_server).await;
        assert!(engine.is_player_connected("seeded".into()).unwrap());
        assert_eq!(engine.player_capacity().unwrap(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn ignores_stale_events() {
        let Harness { engine, .. } = start(crate::test::game_server()).await;
        let mut stale = crate::test::game_server();
        stale.metadata.resource_version = Some("0".into());
        stale.metadata.labels = Some([("stale".to_owned(), "true".to_owned())].into());
        engine.observe(stale);

        let meta = engine.game_server().unwrap().object_meta.unwrap();
        assert!(!meta.labels.contains_key("stale"));
    }

    #[tokio::test]
    async fn unavailable_before_sync() {
        let fake = Arc::new(FakeControlPlane::new(crate::test::game_server()));
        let engine = ClusterEngine::new(fake, FeatureGates::all());
        assert!(matches!(engine.game_server(), Err(Error::Unavailable(_))));
        assert!(matches!(
            engine.watch_game_server(),
            Err(Error::Unavailable(_))
        ));
    }

    #[test]
    fn stale_versions() {
        let mut current = k8s::GameServer::default();
        current.metadata.resource_version = Some("10".into());
        let mut incoming = current.clone();

        incoming.metadata.resource_version = Some("9".into());
        assert!(is_stale(&current, &incoming));
        incoming.metadata.resource_version = Some("11".into());
        assert!(!is_stale(&current, &incoming));
        incoming.metadata.resource_version = Some("opaque".into());
        assert!(!is_stale(&current, &incoming));
    }
}
