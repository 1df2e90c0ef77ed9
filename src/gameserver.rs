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

//! Helpers over the SDK's view of a game server (the descriptor).

use crate::{
    config::{Feature, FeatureGates},
    generated::sdk::{
        self,
        game_server::{
            spec::Health,
            status::{Address, CounterStatus, ListStatus, PlayerStatus, Port},
            ObjectMeta, Spec, Status,
        },
    },
    k8s,
};

pub use crate::k8s::GameServerState as State;

/// Every label and annotation written by the SDK lands under this prefix.
pub const METADATA_PREFIX: &str = "agones.dev/sdk-";
/// Stamped with an RFC3339 time whenever the server is allocated.
pub const LAST_ALLOCATED_ANNOTATION: &str = "agones.dev/last-allocated";

pub fn prefixed(key: &str) -> String {
    format!("{METADATA_PREFIX}{key}")
}

pub fn meta_mut(gs: &mut sdk::GameServer) -> &mut ObjectMeta {
    gs.object_meta.get_or_insert_with(Default::default)
}

pub fn status_mut(gs: &mut sdk::GameServer) -> &mut Status {
    gs.status.get_or_insert_with(Default::default)
}

pub fn players_mut(gs: &mut sdk::GameServer) -> &mut PlayerStatus {
    status_mut(gs).players.get_or_insert_with(Default::default)
}

pub fn state(gs: &sdk::GameServer) -> Option<State> {
    gs.status
        .as_ref()
        .and_then(|status| status.state.parse().ok())
}

pub fn set_state(gs: &mut sdk::GameServer, state: State) {
    status_mut(gs).state = state.to_string();
}

pub fn is_being_deleted(gs: &sdk::GameServer) -> bool {
    gs.object_meta
        .as_ref()
        .is_some_and(|meta| meta.deletion_timestamp != 0)
}

/// Once unhealthy or marked for deletion the descriptor no longer accepts
/// transitions from the SDK.
pub fn rejects_transitions(gs: &sdk::GameServer) -> bool {
    is_being_deleted(gs) || state(gs) == Some(State::Unhealthy)
}

pub fn health(gs: &sdk::GameServer) -> Health {
    gs.spec
        .as_ref()
        .and_then(|spec| spec.health.clone())
        .unwrap_or_else(|| {
            let defaults = k8s::Health::default();
            Health {
                disabled: defaults.disabled,
                period_seconds: defaults.period_seconds,
                failure_threshold: defaults.failure_threshold,
                initial_delay_seconds: defaults.initial_delay_seconds,
            }
        })
}

/// A random UID, used when the local engine runs the conformance suite so
/// clients cannot pass by echoing a well known value.
pub fn generate_uid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Hides the fields of features that are switched off.
pub fn apply_feature_gates(gs: &mut sdk::GameServer, gates: &FeatureGates) {
    let Some(status) = gs.status.as_mut() else {
        return;
    };

    if !gates.enabled(Feature::PlayerTracking) {
        status.players = None;
    }

    if !gates.enabled(Feature::CountsAndLists) {
        status.counters.clear();
        status.lists.clear();
    }
}

/// Converts the cluster resource into the SDK's descriptor.
pub fn convert(gs: &k8s::GameServer, gates: &FeatureGates) -> sdk::GameServer {
    let meta = &gs.metadata;
    let health = &gs.spec.health;

    let object_meta = ObjectMeta {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        uid: meta.uid.clone().unwrap_or_default(),
        resource_version: meta.resource_version.clone().unwrap_or_default(),
        generation: meta.generation.unwrap_or_default(),
        creation_timestamp: meta
            .creation_timestamp
            .as_ref()
            .map(|time| time.0.timestamp())
            .unwrap_or_default(),
        deletion_timestamp: meta
            .deletion_timestamp
            .as_ref()
            .map(|time| time.0.timestamp())
            .unwrap_or_default(),
        annotations: meta
            .annotations
            .clone()
            .unwrap_or_default()
            .into_iter()
            .collect(),
        labels: meta.labels.clone().unwrap_or_default().into_iter().collect(),
    };

    let spec = Spec {
        health: Some(Health {
            disabled: health.disabled,
            period_seconds: health.period_seconds,
            failure_threshold: health.failure_threshold,
            initial_delay_seconds: health.initial_delay_seconds,
        }),
    };

    let status = gs.status.as_ref().map(|status| Status {
        state: status.state.map(|state| state.to_string()).unwrap_or_default(),
        address: status.address.clone(),
        addresses: status
            .addresses
            .iter()
            .map(|address| Address {
                r#type: address.type_.clone(),
                address: address.address.clone(),
            })
            .collect(),
        ports: status
            .ports
            .iter()
            .map(|port| Port {
                name: port.name.clone(),
                port: port.port.into(),
            })
            .collect(),
        players: status.players.as_ref().map(|players| PlayerStatus {
            count: players.count,
            capacity: players.capacity,
            ids: players.ids.clone(),
        }),
        counters: status
            .counters
            .iter()
            .map(|(name, counter)| {
                (
                    name.clone(),
                    CounterStatus {
                        count: counter.count,
                        capacity: counter.capacity,
                    },
                )
            })
            .collect(),
        lists: status
            .lists
            .iter()
            .map(|(name, list)| {
                (
                    name.clone(),
                    ListStatus {
                        capacity: list.capacity,
                        values: list.values.clone(),
                    },
                )
            })
            .collect(),
    });

    let mut gs = sdk::GameServer {
        object_meta: Some(object_meta),
        spec: Some(spec),
        status,
    };

    if gates.enabled(Feature::PlayerTracking) {
        if let Some(status) = gs.status.as_mut() {
            status.players.get_or_insert_with(Default::default);
        }
    }

    apply_feature_gates(&mut gs, gates);
    gs
}

/// The descriptor served by the local engine when no document is supplied.
pub fn local_default(gates: &FeatureGates) -> sdk::GameServer {
    let mut gs = sdk::GameServer {
        object_meta: Some(ObjectMeta {
            name: "local".into(),
            namespace: "default".into(),
            uid: "1234".into(),
            resource_version: "v1".into(),
            generation: 1,
            creation_timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs() as i64)
                .unwrap_or_default(),
            labels: [("islocal".to_owned(), "true".to_owned())].into(),
            annotations: [("annotation".to_owned(), "true".to_owned())].into(),
            ..Default::default()
        }),
        spec: Some(Spec {
            health: Some(Health {
                disabled: false,
                period_seconds: 3,
                failure_threshold: 5,
                initial_delay_seconds: 10,
            }),
        }),
        status: Some(Status {
            state: State::Ready.to_string(),
            address: "127.0.0.1".into(),
            ports: vec![Port {
                name: "default".into(),
                port: 7777,
            }],
            ..Default::default()
        }),
    };

    if gates.enabled(Feature::PlayerTracking) {
        players_mut(&mut gs);
    }

    if gates.enabled(Feature::CountsAndLists) {
        let status = status_mut(&mut gs);
        status.counters.insert(
            "rooms".into(),
            CounterStatus {
                count: 1,
                capacity: 10,
            },
        );
        status.lists.insert(
            "players".into(),
            ListStatus {
                capacity: 100,
                values: vec!["test0".into(), "test1".into(), "test2".into()],
            },
        );
    }

    gs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resource() -> k8s::GameServer {
        serde_json::from_value(serde_json::json!({
            "apiVersion": "agones.dev/v1",
            "kind": "GameServer",
            "metadata": {
                "name": "test",
                "namespace": "default",
                "uid": "1234",
                "resourceVersion": "12",
                "generation": 3,
                "creationTimestamp": "2024-01-01T00:00:00Z",
                "labels": {"a": "b"},
            },
            "spec": {
                "health": {
                    "disabled": true,
                    "periodSeconds": 10,
                    "failureThreshold": 15,
                    "initialDelaySeconds": 20,
                },
            },
            "status": {
                "state": "Ready",
                "address": "127.0.0.1",
                "addresses": [{"type": "InternalIP", "address": "10.0.0.1"}],
                "ports": [{"name": "default", "port": 7777}],
                "players": {"count": 1, "capacity": 10, "ids": ["one"]},
                "counters": {"rooms": {"count": 1, "capacity": 5}},
                "lists": {"players": {"capacity": 3, "values": ["x"]}},
            },
        }))
        .unwrap()
    }

    #[test]
    fn convert_resource() {
        let gs = convert(&resource(), &FeatureGates::all());

        let meta = gs.object_meta.as_ref().unwrap();
        assert_eq!(meta.name, "test");
        assert_eq!(meta.uid, "1234");
        assert_eq!(meta.resource_version, "12");
        assert_eq!(meta.generation, 3);
        assert_eq!(meta.creation_timestamp, 1_704_067_200);
        assert_eq!(meta.deletion_timestamp, 0);
        assert_eq!(meta.labels.get("a").map(String::as_str), Some("b"));

        let health = health(&gs);
        assert!(health.disabled);
        assert_eq!(health.period_seconds, 10);
        assert_eq!(health.failure_threshold, 15);
        assert_eq!(health.initial_delay_seconds, 20);

        let status = gs.status.as_ref().unwrap();
        assert_eq!(state(&gs), Some(State::Ready));
        assert_eq!(status.addresses[0].r#type, "InternalIP");
        assert_eq!(status.ports[0].port, 7777);
        assert_eq!(status.players.as_ref().unwrap().ids, vec!["one".to_owned()]);
        assert_eq!(status.counters["rooms"].capacity, 5);
        assert_eq!(status.lists["players"].values, vec!["x".to_owned()]);
    }

    #[test]
    fn convert_hides_disabled_features() {
        let gates = FeatureGates::default();
        let gs = convert(&resource(), &gates);
        let status = gs.status.as_ref().unwrap();
        assert!(status.players.is_none());
        assert_eq!(status.counters.len(), 1);

        let gates = FeatureGates::default().with(Feature::CountsAndLists, false);
        let gs = convert(&resource(), &gates);
        assert!(gs.status.as_ref().unwrap().counters.is_empty());
        assert!(gs.status.as_ref().unwrap().lists.is_empty());
    }

    #[test]
    fn local_defaults() {
        let gs = local_default(&FeatureGates::all());
        let meta = gs.object_meta.as_ref().unwrap();
        assert_eq!(meta.name, "local");
        assert_eq!(meta.labels["islocal"], "true");
        assert_eq!(state(&gs), Some(State::Ready));
        assert_eq!(health(&gs).period_seconds, 3);
        assert!(gs.status.as_ref().unwrap().players.is_some());
        assert_eq!(gs.status.as_ref().unwrap().lists["players"].capacity, 100);
    }

    #[test]
    fn transitions_blocked() {
        let mut gs = local_default(&FeatureGates::default());
        assert!(!rejects_transitions(&gs));
        set_state(&mut gs, State::Unhealthy);
        assert!(rejects_transitions(&gs));

        let mut gs = local_default(&FeatureGates::default());
        meta_mut(&mut gs).deletion_timestamp = 10;
        assert!(rejects_transitions(&gs));
    }

    #[test]
    fn uid_is_random() {
        assert_ne!(generate_uid(), generate_uid());
        assert_eq!(prefixed("foo"), "agones.dev/sdk-foo");
    }
}
