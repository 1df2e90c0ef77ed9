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

//! The standalone engine: an in-process descriptor with no control plane,
//! used for development and for conformance runs of client SDKs.

mod conformance;
pub mod file;

use std::{path::PathBuf, sync::Arc, time::Duration};

use crate::{
    cache::DescriptorCache,
    config::{Config, Feature, FeatureGates},
    counters::{self, CounterUpdate},
    engine::{Engine, Error},
    gameserver::{self, State},
    generated::sdk::{self, beta},
    health::HealthMonitor,
    k8s::SdkServerLogLevel,
    lists::{self, ListUpdate},
    players::PlayerRegister,
    reserve::ReserveTimer,
    signal::ShutdownRx,
    watch::Subscription,
};

pub use self::conformance::{Conformance, Field};

/// Called with the log level requested by a descriptor document.
pub type LogLevelHook = Arc<dyn Fn(SdkServerLogLevel) + Send + Sync>;

pub struct LocalEngine {
    gates: FeatureGates,
    cache: Arc<DescriptorCache>,
    reserve: ReserveTimer,
    health: Arc<HealthMonitor>,
    conformance: Option<Conformance>,
    local_file: Option<PathBuf>,
    on_log_level: Option<LogLevelHook>,
}

impl LocalEngine {
    pub fn new(config: &Config, mut game_server: sdk::GameServer) -> Self {
        let conformance = config.is_conformance().then(|| {
            tracing::info!(sdk = %config.test_sdk_name, expected = ?config.test, "conformance mode enabled");
            gameserver::meta_mut(&mut game_server).uid = gameserver::generate_uid();
            Conformance::new(config.test.clone(), config.test_sdk_name.clone())
        });

        let health = HealthMonitor::new((&gameserver::health(&game_server)).into());

        Self {
            gates: config.feature_gates.clone(),
            cache: Arc::new(DescriptorCache::new(game_server)),
            reserve: ReserveTimer::new(),
            health: Arc::new(health),
            conformance,
            local_file: None,
            on_log_level: None,
        }
    }

    /// Builds the engine from `config`, reading the descriptor document if
    /// one was given.
    pub async fn from_config(
        config: &Config,
        on_log_level: Option<LogLevelHook>,
    ) -> crate::Result<Self> {
        let game_server = match &config.local_file {
            Some(path) => {
                let game_server = file::read(path).await?;
                if let Some(hook) = &on_log_level {
                    hook(game_server.spec.sdk_server.log_level);
                }
                gameserver::convert(&game_server, &config.feature_gates)
            }
            None => gameserver::local_default(&config.feature_gates),
        };

        Ok(Self {
            local_file: config.local_file.clone(),
            on_log_level,
            ..Self::new(config, game_server)
        })
    }

    pub fn cache(&self) -> &Arc<DescriptorCache> {
        &self.cache
    }

    /// Runs the health monitor and the document watcher until shutdown.
    pub async fn run(self: Arc<Self>, shutdown_rx: ShutdownRx) -> crate::Result<()> {
        let cache = self.cache.clone();
        let _health = self
            .health
            .spawn(shutdown_rx.clone(), move || mark_unhealthy(&cache));

        let Some(path) = self.local_file.clone() else {
            crate::signal::requested(shutdown_rx).await;
            return Ok(());
        };

        let engine = self.clone();
        tokio::select! {
            result = file::watch(path, move |game_server| engine.reload(game_server)) => result,
            _ = crate::signal::requested(shutdown_rx) => Ok(()),
        }
    }

    fn reload(&self, game_server: crate::k8s::GameServer) {
        if let Some(hook) = &self.on_log_level {
            hook(game_server.spec.sdk_server.log_level);
        }

        let mut game_server = gameserver::convert(&game_server, &self.gates);
        if self.conformance.is_some() {
            let uid = self.cache.get().object_meta.map(|meta| meta.uid);
            gameserver::meta_mut(&mut game_server).uid = uid.unwrap_or_default();
        }

        tracing::info!("sending watched gameserver");
        self.cache.replace(game_server);
    }

    /// Ends a conformance run, returning whether the received calls matched
    /// the expected ones. Always `true` outside of conformance mode.
    pub fn close(&self) -> bool {
        self.reserve.cancel();
        self.conformance
            .as_ref()
            .map_or(true, |conformance| conformance.verify())
    }

    /// The calls recorded so far in conformance mode.
    pub fn received(&self) -> Vec<String> {
        self.conformance
            .as_ref()
            .map(Conformance::received)
            .unwrap_or_default()
    }

    fn record(&self, call: &str) {
        tracing::debug!(call, "received request");
        if let Some(conformance) = &self.conformance {
            conformance.record(call);
        }
    }

    fn record_value(&self, call: &str, value: &str, field: Field) {
        tracing::debug!(call, value, "received request");
        if let Some(conformance) = &self.conformance {
            conformance.record_value(call, value, field, field.read(&self.cache.get()));
        }
    }

    fn transition(&self, state: State) {
        self.reserve.cancel();
        set_state(&self.cache, state);
    }

    fn players(&self) -> Result<PlayerRegister, Error> {
        self.gates.ensure(Feature::PlayerTracking)?;
        Ok(self
            .cache
            .get()
            .status
            .and_then(|status| status.players)
            .map(|players| PlayerRegister::from(&players))
            .unwrap_or_default())
    }

    fn modify_players<T>(
        &self,
        f: impl FnOnce(&mut PlayerRegister) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.gates.ensure(Feature::PlayerTracking)?;
        self.cache.try_modify(|game_server| {
            let players = gameserver::players_mut(game_server);
            let mut register = PlayerRegister::from(&*players);
            let result = f(&mut register)?;
            *players = register.to_status();
            Ok(result)
        })
    }

    fn modify_list(
        &self,
        name: &str,
        f: impl FnOnce(&mut ListUpdate, &sdk::game_server::status::ListStatus) -> Result<(), Error>,
    ) -> Result<beta::List, Error> {
        self.gates.ensure(Feature::CountsAndLists)?;
        self.cache.try_modify(|game_server| {
            let list = gameserver::status_mut(game_server)
                .lists
                .get_mut(name)
                .ok_or_else(|| lists::not_found(name))?;

            let mut update = ListUpdate::default();
            f(&mut update, list)?;
            *list = update.apply(list);
            Ok(lists::to_proto(name, list))
        })
    }
}

fn set_state(cache: &DescriptorCache, state: State) {
    cache.modify(|game_server| {
        if gameserver::rejects_transitions(game_server) {
            tracing::warn!(%state, "ignoring state change, gameserver is unhealthy or being deleted");
            return;
        }

        tracing::info!(%state, "updating state");
        gameserver::set_state(game_server, state);
    });
}

fn mark_unhealthy(cache: &DescriptorCache) {
    cache.modify(|game_server| {
        if !gameserver::is_being_deleted(game_server) {
            gameserver::set_state(game_server, State::Unhealthy);
        }
    });
}

impl Engine for LocalEngine {
    fn ready(&self) -> Result<(), Error> {
        tracing::info!("ready request has been received");
        self.record("ready");
        self.transition(State::Ready);
        Ok(())
    }

    fn allocate(&self) -> Result<(), Error> {
        tracing::info!("allocate request has been received");
        self.record("allocate");
        self.transition(State::Allocated);
        Ok(())
    }

    fn shutdown(&self) -> Result<(), Error> {
        tracing::info!("shutdown request has been received");
        self.record("shutdown");
        self.transition(State::Shutdown);
        Ok(())
    }

    fn reserve(&self, seconds: i64) -> Result<(), Error> {
        tracing::info!(seconds, "reserve request has been received");
        self.record("reserve");
        self.transition(State::Reserved);

        if seconds > 0 {
            let cache = self.cache.clone();
            self.reserve
                .arm(Duration::from_secs(seconds.unsigned_abs()), move || {
                    set_state(&cache, State::Ready)
                });
        }

        Ok(())
    }

    fn health(&self) {
        tracing::debug!("health ping received");
        self.record("health");
        self.health.ping();
    }

    fn is_healthy(&self) -> bool {
        self.health.healthy()
    }

    fn game_server(&self) -> Result<sdk::GameServer, Error> {
        self.record("gameserver");
        Ok(self.cache.get())
    }

    fn watch_game_server(&self) -> Result<Subscription, Error> {
        tracing::info!("connected to watch gameserver");
        self.record("watch");
        Ok(Subscription::new(self.cache.subscribe()))
    }

    fn set_label(&self, key: String, value: String) -> Result<(), Error> {
        tracing::info!(%key, %value, "setting label");
        self.cache.modify(|game_server| {
            gameserver::meta_mut(game_server)
                .labels
                .insert(gameserver::prefixed(&key), value.clone());
        });
        self.record_value("setlabel", &value, Field::CreationTimestamp);
        Ok(())
    }

    fn set_annotation(&self, key: String, value: String) -> Result<(), Error> {
        tracing::info!(%key, %value, "setting annotation");
        self.cache.modify(|game_server| {
            gameserver::meta_mut(game_server)
                .annotations
                .insert(gameserver::prefixed(&key), value.clone());
        });
        self.record_value("setannotation", &value, Field::Uid);
        Ok(())
    }

    fn player_connect(&self, id: String) -> Result<bool, Error> {
        tracing::info!(player_id = %id, "player connected");
        let connected = self.modify_players(|players| players.connect(&id))?;
        if connected {
            self.record_value("playerconnect", &id, Field::PlayerIds);
        }
        Ok(connected)
    }

    fn player_disconnect(&self, id: String) -> Result<bool, Error> {
        tracing::info!(player_id = %id, "player disconnected");
        let disconnected = self.modify_players(|players| Ok(players.disconnect(&id)))?;
        if disconnected {
            self.record_value("playerdisconnect", "", Field::PlayerIds);
        }
        Ok(disconnected)
    }

    fn set_player_capacity(&self, capacity: i64) -> Result<(), Error> {
        tracing::info!(capacity, "setting player capacity");
        self.modify_players(|players| players.set_capacity(capacity))?;
        self.record_value(
            "setplayercapacity",
            &capacity.to_string(),
            Field::PlayerCapacity,
        );
        Ok(())
    }

    fn player_capacity(&self) -> Result<i64, Error> {
        let players = self.players()?;
        self.record("getplayercapacity");
        Ok(players.capacity())
    }

    fn player_count(&self) -> Result<i64, Error> {
        let players = self.players()?;
        self.record("getplayercount");
        Ok(players.count())
    }

    fn is_player_connected(&self, id: String) -> Result<bool, Error> {
        let players = self.players()?;
        self.record_value("isplayerconnected", &id, Field::PlayerIds);
        Ok(players.is_connected(&id))
    }

    fn connected_players(&self) -> Result<Vec<String>, Error> {
        let players = self.players()?;
        self.record("getconnectedplayers");
        Ok(players.ids().to_vec())
    }

    fn get_counter(&self, name: String) -> Result<beta::Counter, Error> {
        self.gates.ensure(Feature::CountsAndLists)?;
        tracing::info!(%name, "getting counter");
        self.record("getcounter");
        self.cache
            .get()
            .status
            .and_then(|status| status.counters.get(&name).cloned())
            .map(|counter| counters::to_proto(&name, &counter))
            .ok_or_else(|| counters::not_found(&name))
    }

    fn update_counter(
        &self,
        request: beta::CounterUpdateRequest,
    ) -> Result<beta::Counter, Error> {
        self.gates.ensure(Feature::CountsAndLists)?;
        let name = request.name.clone();
        tracing::info!(%name, "updating counter");

        self.cache.try_modify(|game_server| {
            let counter = gameserver::status_mut(game_server)
                .counters
                .get_mut(&name)
                .ok_or_else(|| counters::not_found(&name))?;

            if request.capacity.is_some() {
                self.record("setcapacitycounter");
            }
            if request.count.is_some() {
                self.record("setcountcounter");
            }
            if request.count_diff != 0 {
                self.record("updatecounter");
            }

            let update = CounterUpdate::from_request(&request)?.stage(counter, &<_>::default())?;
            *counter = update.apply(counter);
            Ok(counters::to_proto(&name, counter))
        })
    }

    fn get_list(&self, name: String) -> Result<beta::List, Error> {
        self.gates.ensure(Feature::CountsAndLists)?;
        tracing::info!(%name, "getting list");
        self.record("getlist");
        self.cache
            .get()
            .status
            .and_then(|status| status.lists.get(&name).cloned())
            .map(|list| lists::to_proto(&name, &list))
            .ok_or_else(|| lists::not_found(&name))
    }

    fn update_list(&self, list: beta::List, paths: Vec<String>) -> Result<beta::List, Error> {
        self.gates.ensure(Feature::CountsAndLists)?;
        tracing::info!(name = %list.name, ?paths, "updating list");
        self.record("updatelist");
        let name = list.name.clone();
        self.modify_list(&name, |update, view| {
            *update = lists::masked_update(view, &list, &paths)?;
            Ok(())
        })
    }

    fn add_list_value(&self, name: String, value: String) -> Result<beta::List, Error> {
        self.gates.ensure(Feature::CountsAndLists)?;
        tracing::info!(%name, %value, "adding value to list");
        self.record("addlistvalue");
        self.modify_list(&name, |update, view| update.add_value(&name, view, &value))
    }

    fn remove_list_value(&self, name: String, value: String) -> Result<beta::List, Error> {
        self.gates.ensure(Feature::CountsAndLists)?;
        tracing::info!(%name, %value, "removing value from list");
        self.record("removelistvalue");
        self.modify_list(&name, |update, view| update.remove_value(&name, view, &value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use pretty_assertions::assert_eq;

    fn engine(gates: FeatureGates) -> LocalEngine {
        let config = Config {
            is_local: true,
            feature_gates: gates.clone(),
            ..<_>::default()
        };
        LocalEngine::new(&config, gameserver::local_default(&gates))
    }

    fn state(engine: &LocalEngine) -> Option<State> {
        gameserver::state(&engine.cache.get())
    }

    #[tokio::test]
    async fn transitions() {
        let engine = engine(<_>::default());
        engine.allocate().unwrap();
        assert_eq!(state(&engine), Some(State::Allocated));
        engine.ready().unwrap();
        assert_eq!(state(&engine), Some(State::Ready));
        engine.shutdown().unwrap();
        assert_eq!(state(&engine), Some(State::Shutdown));
    }

    #[tokio::test(start_paused = true)]
    async fn reserve_returns_to_ready() {
        let engine = engine(<_>::default());
        engine.reserve(3).unwrap();
        assert_eq!(state(&engine), Some(State::Reserved));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(state(&engine), Some(State::Reserved));
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(state(&engine), Some(State::Ready));
    }

    #[tokio::test(start_paused = true)]
    async fn reserve_indefinitely() {
        let engine = engine(<_>::default());
        engine.reserve(0).unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(state(&engine), Some(State::Reserved));

        engine.reserve(-1).unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(state(&engine), Some(State::Reserved));
    }

    #[tokio::test(start_paused = true)]
    async fn allocate_cancels_reservation() {
        let engine = engine(<_>::default());
        engine.reserve(1).unwrap();
        engine.allocate().unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(state(&engine), Some(State::Allocated));
    }

    #[tokio::test(start_paused = true)]
    async fn unhealthy_without_pings() {
        let engine = Arc::new(engine(<_>::default()));
        let (_tx, rx) = crate::signal::channel(<_>::default());
        let runner = tokio::spawn(engine.clone().run(rx));

        // initial delay 10s, period 3s, threshold 5
        tokio::time::sleep(Duration::from_secs(40)).await;
        assert_eq!(state(&engine), Some(State::Unhealthy));
        assert!(!engine.is_healthy());

        engine.ready().unwrap();
        assert_eq!(state(&engine), Some(State::Unhealthy));
        runner.abort();
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn unhealthy_ignores_transitions() {
        let engine = engine(<_>::default());
        mark_unhealthy(&engine.cache);
        engine.allocate().unwrap();
        assert_eq!(state(&engine), Some(State::Unhealthy));
        assert!(logs_contain("ignoring state change"));
    }

    #[tokio::test]
    async fn labels_are_prefixed() {
        let engine = engine(<_>::default());
        engine.set_label("foo".into(), "value-foo".into()).unwrap();
        engine.set_label("bar".into(), "value-bar".into()).unwrap();
        engine.set_annotation("baz".into(), "value-baz".into()).unwrap();

        let meta = engine.cache.get().object_meta.unwrap();
        assert_eq!(meta.labels["agones.dev/sdk-foo"], "value-foo");
        assert_eq!(meta.labels["agones.dev/sdk-bar"], "value-bar");
        assert_eq!(meta.labels["islocal"], "true");
        assert_eq!(meta.annotations["agones.dev/sdk-baz"], "value-baz");
    }

    #[tokio::test]
    async fn watch_sees_label_changes() {
        let engine = engine(<_>::default());
        let mut watch = engine.watch_game_server().unwrap();
        watch.next().await.unwrap();

        for value in ["1", "2", "3"] {
            engine.set_label("k".into(), value.into()).unwrap();
        }

        let next = watch.next().await.unwrap();
        assert_eq!(next.object_meta.unwrap().labels["agones.dev/sdk-k"], "3");
    }

    #[tokio::test]
    async fn player_capacity_enforced() {
        let engine = engine(FeatureGates::default().with(Feature::PlayerTracking, true));
        engine.set_player_capacity(1).unwrap();
        assert!(engine.player_connect("a".into()).unwrap());
        assert!(!engine.player_connect("a".into()).unwrap());
        assert_eq!(
            engine.player_connect("b".into()),
            Err(Error::PlayersAtCapacity)
        );
        assert_eq!(engine.player_count().unwrap(), 1);
        assert_eq!(engine.connected_players().unwrap(), vec!["a".to_owned()]);
        assert!(engine.is_player_connected("a".into()).unwrap());
        assert!(engine.player_disconnect("a".into()).unwrap());
        assert!(!engine.player_disconnect("a".into()).unwrap());
        assert!(!engine.is_player_connected("a".into()).unwrap());
    }

    #[tokio::test]
    async fn player_tracking_gate() {
        let engine = engine(<_>::default());
        assert_eq!(
            engine.player_count(),
            Err(Error::FeatureDisabled(Feature::PlayerTracking))
        );
        assert!(engine.cache.get().status.unwrap().players.is_none());
    }

    #[tokio::test]
    async fn counters() {
        let engine = engine(<_>::default());
        let request = |count_diff| beta::CounterUpdateRequest {
            name: "rooms".into(),
            count_diff,
            ..<_>::default()
        };

        let counter = engine.update_counter(request(4)).unwrap();
        assert_eq!((counter.count, counter.capacity), (5, 10));

        assert_eq!(
            engine.update_counter(request(6)),
            Err(Error::OutOfRange(
                "out of range. Count must be within range [0,Capacity]. Found Count: 11, Capacity: 10"
                    .into()
            ))
        );
        assert_eq!(engine.get_counter("rooms".into()).unwrap().count, 5);

        assert!(matches!(
            engine.update_counter(request(i64::MAX)),
            Err(Error::OutOfRange(_))
        ));
        assert_eq!(engine.get_counter("rooms".into()).unwrap().count, 5);

        let counter = engine
            .update_counter(beta::CounterUpdateRequest {
                name: "rooms".into(),
                capacity: Some(3),
                ..<_>::default()
            })
            .unwrap();
        assert_eq!((counter.count, counter.capacity), (3, 3));

        assert_eq!(
            engine.get_counter("missing".into()),
            Err(Error::NotFound("not found. missing Counter not found".into()))
        );
    }

    #[tokio::test]
    async fn lists() {
        let engine = engine(<_>::default());
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

        let list = engine
            .update_list(
                beta::List {
                    name: "players".into(),
                    capacity: 2,
                    values: vec![],
                },
                vec!["capacity".into()],
            )
            .unwrap();
        assert_eq!(list.values, vec!["test1", "test2"]);
        assert_eq!(list.capacity, 2);

        assert!(matches!(
            engine.get_list("missing".into()),
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn conformance_records_calls() {
        let gates = FeatureGates::default().with(Feature::PlayerTracking, true);
        let config = Config {
            is_local: true,
            feature_gates: gates.clone(),
            test: vec!["ready".into(), "setannotation".into(), "playerconnect".into()],
            test_sdk_name: "rust".into(),
            ..<_>::default()
        };
        let engine = LocalEngine::new(&config, gameserver::local_default(&gates));
        let uid = engine.cache.get().object_meta.unwrap().uid;
        assert_ne!(uid, "1234");

        engine.ready().unwrap();
        engine.set_annotation("uid".into(), "wrong".into()).unwrap();
        assert!(!engine.close());

        engine.set_annotation("uid".into(), uid).unwrap();
        engine.set_player_capacity(10).unwrap();
        engine.player_connect("1234".into()).unwrap();
        assert_eq!(
            engine.received(),
            vec!["ready", "setannotation", "setplayercapacity", "playerconnect"]
        );
        assert!(!engine.close());
    }
}
