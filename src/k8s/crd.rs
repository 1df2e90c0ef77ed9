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

use std::collections::BTreeMap;

use k8s_openapi::{
    api::core::v1::NodeAddress,
    apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time},
};
use kube::core::Resource;
use serde::{Deserialize, Serialize};

/// The `agones.dev/v1` `GameServer` resource, limited to the fields the SDK
/// server reads. Writes go out as merge patches so unmodelled fields are
/// never round-tripped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameServer {
    pub metadata: ObjectMeta,
    pub spec: GameServerSpec,
    pub status: Option<GameServerStatus>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Inner {
    metadata: ObjectMeta,
    #[serde(default)]
    spec: GameServerSpec,
    status: Option<GameServerStatus>,
}

impl<'de> serde::Deserialize<'de> for GameServer {
    fn deserialize<D: serde::Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        use serde::de::Error;
        let value = serde_json::Value::deserialize(de)?;

        serde_json::from_value::<Inner>(value.clone())
            .map_err(|error| {
                tracing::trace!(%error, %value, "gameserver failed");
                Error::custom(error)
            })
            .map(
                |Inner {
                     metadata,
                     spec,
                     status,
                 }| Self {
                    metadata,
                    spec,
                    status,
                },
            )
    }
}

impl serde::Serialize for GameServer {
    fn serialize<S: serde::Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut obj = ser.serialize_struct("GameServer", 5)?;
        obj.serialize_field("apiVersion", &GameServer::api_version(&()))?;
        obj.serialize_field("kind", &GameServer::kind(&()))?;
        obj.serialize_field("metadata", &self.metadata)?;
        obj.serialize_field("spec", &self.spec)?;
        obj.serialize_field("status", &self.status)?;
        obj.end()
    }
}

impl GameServer {
    pub fn new(name: &str, namespace: &str, spec: GameServerSpec) -> Self {
        Self {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec,
            status: None,
        }
    }

    pub fn state(&self) -> Option<GameServerState> {
        self.status.as_ref().and_then(|status| status.state)
    }

    pub fn is_being_deleted(&self) -> bool {
        self.metadata.deletion_timestamp.is_some()
    }

    pub fn generation(&self) -> i64 {
        self.metadata.generation.unwrap_or_default()
    }

    pub fn resource_version(&self) -> Option<&str> {
        self.metadata.resource_version.as_deref()
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.metadata
            .labels
            .as_ref()
            .and_then(|labels| labels.get(key))
            .map(String::as_str)
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata
            .annotations
            .as_ref()
            .and_then(|annotations| annotations.get(key))
            .map(String::as_str)
    }

    pub fn players(&self) -> Option<&PlayerStatus> {
        self.status.as_ref().and_then(|status| status.players.as_ref())
    }

    pub fn counter(&self, name: &str) -> Option<&CounterStatus> {
        self.status
            .as_ref()
            .and_then(|status| status.counters.get(name))
    }

    pub fn list(&self, name: &str) -> Option<&ListStatus> {
        self.status.as_ref().and_then(|status| status.lists.get(name))
    }
}

impl Resource for GameServer {
    type DynamicType = ();
    type Scope = kube::core::NamespaceResourceScope;

    fn group(_: &()) -> std::borrow::Cow<'_, str> {
        "agones.dev".into()
    }

    fn kind(_: &()) -> std::borrow::Cow<'_, str> {
        "GameServer".into()
    }

    fn version(_: &()) -> std::borrow::Cow<'_, str> {
        "v1".into()
    }

    fn api_version(_: &()) -> std::borrow::Cow<'_, str> {
        "agones.dev/v1".into()
    }

    fn plural(_: &()) -> std::borrow::Cow<'_, str> {
        "gameservers".into()
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: serde::de::Deserializer<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameServerSpec {
    /// Configures health checking
    #[serde(default)]
    pub health: Health,
    /// Specifies parameters for the SDK Server sidecar container.
    #[serde(default)]
    pub sdk_server: SdkServer,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    /// Whether health checking is disabled or not
    #[serde(default)]
    pub disabled: bool,
    /// The number of seconds each health ping has to occur in
    #[serde(default = "default_period_seconds")]
    pub period_seconds: i32,
    /// How many failures in a row constitutes unhealthy
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: i32,
    /// Initial delay before checking health
    #[serde(default = "default_initial_delay_seconds")]
    pub initial_delay_seconds: i32,
}

fn default_period_seconds() -> i32 {
    5
}
fn default_initial_delay_seconds() -> i32 {
    5
}
fn default_failure_threshold() -> i32 {
    3
}

impl Default for Health {
    fn default() -> Self {
        Self {
            disabled: false,
            period_seconds: default_period_seconds(),
            failure_threshold: default_failure_threshold(),
            initial_delay_seconds: default_initial_delay_seconds(),
        }
    }
}

/// The status for a [`GameServer`] resource.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameServerStatus {
    /// The current state of a [`GameServer`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<GameServerState>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub ports: Vec<GameServerStatusPort>,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub addresses: Vec<NodeAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved_until: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players: Option<PlayerStatus>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub counters: BTreeMap<String, CounterStatus>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub lists: BTreeMap<String, ListStatus>,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
pub enum GameServerState {
    /// A dynamically allocating [`GameServer`] is being created, an open port needs
    /// to be allocated
    PortAllocation,
    /// The Pod for the [`GameServer`] is being created.
    Creating,
    /// The Pods for the [`GameServer`] are being created but are not yet Scheduled
    Starting,
    /// We have determined that the Pod has been scheduled in the cluster --
    /// basically, we have a `NodeName`
    Scheduled,
    /// The [`GameServer`] has declared that it is ready
    RequestReady,
    /// The [`GameServer`] is ready to take connections from game clients.
    Ready,
    /// The [`GameServer`] has shutdown and everything needs to be deleted from the cluster
    Shutdown,
    /// Something has gone wrong with the [`GameServer`] and it cannot be resolved
    Error,
    /// The [`GameServer`] has failed its health checks
    Unhealthy,
    /// The [`GameServer`] is reserved and therefore can be allocated but not removed
    Reserved,
    /// The [`GameServer`] has been allocated to a session
    Allocated,
}

/// The port that was allocated to a [`GameServer`].
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GameServerStatusPort {
    pub name: String,
    pub port: u16,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayerStatus {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub capacity: i64,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub ids: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CounterStatus {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub capacity: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ListStatus {
    #[serde(default)]
    pub capacity: i64,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub values: Vec<String>,
}

/// Parameters for the SDK Server sidecar container
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkServer {
    /// The log level for SDK server (sidecar) logs. Defaults to [`SdkServerLogLevel::Info`]
    #[serde(default)]
    pub log_level: SdkServerLogLevel,
    /// The port on which the SDK Server binds the gRPC server to accept incoming connections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc_port: Option<u16>,
    /// The port on which the SDK Server binds the HTTP gRPC gateway server to accept incoming connections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_port: Option<u16>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum SdkServerLogLevel {
    /// Output all messages except for debug messages.
    #[default]
    Info,
    /// Output all messages including debug messages.
    Debug,
    /// Only output error messages.
    Error,
    /// Output all messages including debug and trace messages.
    Trace,
}

impl SdkServerLogLevel {
    /// The equivalent `tracing` filter directive.
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Error => "error",
            Self::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserialize_minimal() {
        let gs: GameServer = serde_yaml::from_str(
            "
apiVersion: agones.dev/v1
kind: GameServer
metadata:
  name: simple
  labels:
    game: shooter
spec:
  health:
    periodSeconds: 10
  ports:
  - name: default
    containerPort: 7654
status:
  state: Reserved
  address: 10.0.0.1
  counters:
    rooms:
      count: 2
      capacity: 10
",
        )
        .unwrap();

        assert_eq!(gs.metadata.name.as_deref(), Some("simple"));
        assert_eq!(gs.label("game"), Some("shooter"));
        assert_eq!(gs.spec.health.period_seconds, 10);
        assert_eq!(gs.spec.health.failure_threshold, 3);
        assert_eq!(gs.state(), Some(GameServerState::Reserved));
        assert_eq!(
            gs.counter("rooms"),
            Some(&CounterStatus {
                count: 2,
                capacity: 10
            })
        );
        assert!(gs.list("players").is_none());
    }

    #[test]
    fn serialize_includes_type_meta() {
        let gs = GameServer::new("simple", "default", <_>::default());
        let value = serde_json::to_value(&gs).unwrap();
        assert_eq!(value["apiVersion"], "agones.dev/v1");
        assert_eq!(value["kind"], "GameServer");
        assert_eq!(value["metadata"]["namespace"], "default");
    }

    #[test]
    fn state_strings() {
        assert_eq!(GameServerState::RequestReady.to_string(), "RequestReady");
        assert_eq!(
            "Unhealthy".parse::<GameServerState>().unwrap(),
            GameServerState::Unhealthy
        );
    }
}
