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

//! The shared contract between the transport front-end and the two
//! implementations of the SDK: the cluster backed engine and the local
//! standalone engine.

pub mod cluster;
pub mod local;

use futures::future::BoxFuture;

use crate::{
    config::Feature,
    generated::sdk::{self, beta},
    watch::Subscription,
};

pub use self::{cluster::ClusterEngine, local::LocalEngine};

/// The errors surfaced to SDK callers.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    OutOfRange(String),
    #[error("{0}")]
    AlreadyExists(String),
    #[error("{0}")]
    FailedPrecondition(String),
    #[error("{0} not enabled")]
    FeatureDisabled(Feature),
    #[error("Players are already at capacity")]
    PlayersAtCapacity,
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Internal(String),
}

impl Error {
    pub fn code(&self) -> tonic::Code {
        match self {
            Self::InvalidArgument(_) => tonic::Code::InvalidArgument,
            Self::NotFound(_) => tonic::Code::NotFound,
            Self::OutOfRange(_) => tonic::Code::OutOfRange,
            Self::AlreadyExists(_) => tonic::Code::AlreadyExists,
            Self::FailedPrecondition(_) | Self::FeatureDisabled(_) | Self::PlayersAtCapacity => {
                tonic::Code::FailedPrecondition
            }
            Self::Unavailable(_) => tonic::Code::Unavailable,
            Self::Internal(_) => tonic::Code::Internal,
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::NotFound(_) => "not_found",
            Self::OutOfRange(_) => "out_of_range",
            Self::AlreadyExists(_) => "already_exists",
            Self::FailedPrecondition(_) | Self::FeatureDisabled(_) | Self::PlayersAtCapacity => {
                "failed_precondition"
            }
            Self::Unavailable(_) => "unavailable",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<Error> for tonic::Status {
    fn from(error: Error) -> Self {
        tonic::Status::new(error.code(), error.to_string())
    }
}

/// One implementation of the SDK surface. Both engines hand out the same
/// observable behaviour, so the transport layer only ever sees this trait.
pub trait Engine: Send + Sync + 'static {
    /// Resolves once there is a descriptor to serve. Callers wait on it
    /// before every operation other than [`Engine::health`].
    fn synced(&self) -> BoxFuture<'_, Result<(), Error>> {
        Box::pin(futures::future::ok(()))
    }
    /// Request the `RequestReady` transition, cancelling any reservation.
    fn ready(&self) -> Result<(), Error>;
    /// Request the `Allocated` transition, cancelling any reservation.
    fn allocate(&self) -> Result<(), Error>;
    /// Request the `Shutdown` transition, cancelling any reservation.
    fn shutdown(&self) -> Result<(), Error>;
    /// Mark the server `Reserved`. A positive number of seconds arms the
    /// timer that returns it to ready, anything else reserves indefinitely.
    fn reserve(&self, seconds: i64) -> Result<(), Error>;
    /// Record one message received on the health stream.
    fn health(&self);
    /// Whether the health monitor currently considers the server healthy.
    fn is_healthy(&self) -> bool;
    fn game_server(&self) -> Result<sdk::GameServer, Error>;
    /// Subscribe to descriptor updates.
    fn watch_game_server(&self) -> Result<Subscription, Error>;
    fn set_label(&self, key: String, value: String) -> Result<(), Error>;
    fn set_annotation(&self, key: String, value: String) -> Result<(), Error>;

    fn player_connect(&self, id: String) -> Result<bool, Error>;
    fn player_disconnect(&self, id: String) -> Result<bool, Error>;
    fn set_player_capacity(&self, capacity: i64) -> Result<(), Error>;
    fn player_capacity(&self) -> Result<i64, Error>;
    fn player_count(&self) -> Result<i64, Error>;
    fn is_player_connected(&self, id: String) -> Result<bool, Error>;
    fn connected_players(&self) -> Result<Vec<String>, Error>;

    fn get_counter(&self, name: String) -> Result<beta::Counter, Error>;
    fn update_counter(&self, request: beta::CounterUpdateRequest)
        -> Result<beta::Counter, Error>;
    fn get_list(&self, name: String) -> Result<beta::List, Error>;
    fn update_list(&self, list: beta::List, paths: Vec<String>) -> Result<beta::List, Error>;
    fn add_list_value(&self, name: String, value: String) -> Result<beta::List, Error>;
    fn remove_list_value(&self, name: String, value: String) -> Result<beta::List, Error>;
}
