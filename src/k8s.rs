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

//! The cluster side: the `GameServer` resource and the client the cluster
//! engine reads and writes it through.

mod crd;

use std::time::Duration;

use futures::{stream::BoxStream, StreamExt};
use kube::{
    api::{Patch, PatchParams},
    runtime::{
        events::{Event as KubeEvent, EventType, Recorder, Reporter},
        watcher::{self, Event as WatcherEvent},
        WatchStreamExt,
    },
    Resource,
};

pub use self::crd::*;

/// The component name events are reported under.
pub const REPORTING_CONTROLLER: &str = "gameserver-sidecar";

const CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

/// A change to the watched `GameServer`.
#[derive(Clone, Debug, PartialEq)]
pub enum WatchEvent {
    Applied(GameServer),
    Deleted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum EventKind {
    Normal,
    Warning,
}

/// An event recorded against the `GameServer`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub reason: String,
    pub note: String,
}

impl Event {
    pub fn normal(reason: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Normal,
            reason: reason.into(),
            note: note.into(),
        }
    }

    pub fn warning(reason: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Warning,
            reason: reason.into(),
            note: note.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("watch failed: {0}")]
    Watch(#[from] watcher::Error),
    #[error(transparent)]
    Kube(kube::Error),
}

impl ApiError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<kube::Error> for ApiError {
    fn from(error: kube::Error) -> Self {
        match error {
            kube::Error::Api(response) if response.code == 409 => {
                Self::Conflict(response.message)
            }
            kube::Error::Api(response) if response.code == 404 => {
                Self::NotFound(response.message)
            }
            error => Self::Kube(error),
        }
    }
}

/// Everything the cluster engine needs from the control plane for its one
/// `GameServer`.
#[async_trait::async_trait]
pub trait ControlPlane: Send + Sync + 'static {
    /// Watches the `GameServer`, starting with its current state.
    fn watch(&self) -> BoxStream<'static, Result<WatchEvent, ApiError>>;

    /// Reads the `GameServer` straight from the control plane.
    async fn get(&self) -> Result<GameServer, ApiError>;

    /// Applies a JSON merge patch, returning the updated resource.
    async fn patch(&self, patch: &serde_json::Value) -> Result<GameServer, ApiError>;

    /// Records an event against `game_server`. Failures are only logged.
    async fn record(&self, game_server: &GameServer, event: Event);
}

pub struct KubeControlPlane {
    name: String,
    api: kube::Api<GameServer>,
    recorder: Recorder,
}

impl KubeControlPlane {
    pub async fn new(name: String, namespace: String) -> crate::Result<Self> {
        let client = tokio::time::timeout(CLIENT_TIMEOUT, kube::Client::try_default()).await??;
        let reporter = Reporter {
            controller: REPORTING_CONTROLLER.into(),
            instance: Some(name.clone()),
        };

        Ok(Self {
            api: kube::Api::namespaced(client.clone(), &namespace),
            recorder: Recorder::new(client, reporter),
            name,
        })
    }
}

#[async_trait::async_trait]
impl ControlPlane for KubeControlPlane {
    fn watch(&self) -> BoxStream<'static, Result<WatchEvent, ApiError>> {
        let config = watcher::Config::default().fields(&format!("metadata.name={}", self.name));
        let events = watcher::watcher(self.api.clone(), config).default_backoff();

        async_stream::stream! {
            for await event in events {
                match event {
                    Ok(WatcherEvent::Apply(game_server) | WatcherEvent::InitApply(game_server)) => {
                        yield Ok(WatchEvent::Applied(game_server));
                    }
                    Ok(WatcherEvent::Delete(_)) => yield Ok(WatchEvent::Deleted),
                    Ok(WatcherEvent::Init | WatcherEvent::InitDone) => {}
                    Err(error) => yield Err(ApiError::from(error)),
                }
            }
        }
        .boxed()
    }

    async fn get(&self) -> Result<GameServer, ApiError> {
        Ok(self.api.get(&self.name).await?)
    }

    async fn patch(&self, patch: &serde_json::Value) -> Result<GameServer, ApiError> {
        tracing::trace!(%patch, "patching gameserver");
        Ok(self
            .api
            .patch(&self.name, &PatchParams::default(), &Patch::Merge(patch))
            .await?)
    }

    async fn record(&self, game_server: &GameServer, event: Event) {
        let event = KubeEvent {
            type_: match event.kind {
                EventKind::Normal => EventType::Normal,
                EventKind::Warning => EventType::Warning,
            },
            reason: event.reason,
            note: Some(event.note),
            action: "SDK".into(),
            secondary: None,
        };

        if let Err(error) = self
            .recorder
            .publish(&event, &game_server.object_ref(&()))
            .await
        {
            tracing::warn!(%error, reason = %event.reason, "failed to record event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".into(),
            message: "message".into(),
            reason: "reason".into(),
            code,
        })
    }

    #[test]
    fn classifies_api_errors() {
        assert!(ApiError::from(api_error(409)).is_conflict());
        assert!(matches!(
            ApiError::from(api_error(404)),
            ApiError::NotFound(_)
        ));
        assert!(matches!(ApiError::from(api_error(500)), ApiError::Kube(_)));
    }
}
