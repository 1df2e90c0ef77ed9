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

//! Records the calls a client SDK makes so a conformance run can be checked
//! against the calls it was expected to make.

use std::collections::BTreeSet;

use parking_lot::Mutex;

use crate::generated::sdk;

/// A descriptor field a recorded value is checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    CreationTimestamp,
    Uid,
    PlayerCapacity,
    PlayerIds,
}

impl Field {
    /// The field's current value, `None` when the descriptor has no such
    /// field, such as players while player tracking is disabled.
    pub fn read(self, game_server: &sdk::GameServer) -> Option<String> {
        let meta = game_server.object_meta.as_ref();
        let players = game_server
            .status
            .as_ref()
            .and_then(|status| status.players.as_ref());

        match self {
            Self::CreationTimestamp => {
                Some(meta.map_or(0, |meta| meta.creation_timestamp).to_string())
            }
            Self::Uid => Some(meta.map(|meta| meta.uid.clone()).unwrap_or_default()),
            Self::PlayerCapacity => players.map(|players| players.capacity.to_string()),
            Self::PlayerIds => players.map(|players| players.ids.join(",")),
        }
    }
}

#[derive(Debug)]
pub struct Conformance {
    sdk_name: String,
    expected: Vec<String>,
    received: Mutex<Vec<String>>,
}

impl Conformance {
    pub fn new(expected: Vec<String>, sdk_name: String) -> Self {
        Self {
            sdk_name,
            expected,
            received: Mutex::default(),
        }
    }

    pub fn record(&self, call: &str) {
        self.received.lock().push(call.to_owned());
    }

    /// Records `call` only when the client sent the value of `field`.
    pub fn record_value(&self, call: &str, value: &str, field: Field, actual: Option<String>) {
        let Some(actual) = actual else {
            return;
        };

        if value == actual {
            self.record(call);
        } else {
            tracing::error!(
                sdk = %self.sdk_name,
                call,
                ?field,
                expected = %actual,
                received = %value,
                "unexpected value for request"
            );
        }
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().clone()
    }

    /// Compares the expected and received calls as sets, logging the
    /// difference. Returns whether they matched.
    pub fn verify(&self) -> bool {
        let received = self.received();
        let expected_set: BTreeSet<&str> = self.expected.iter().map(String::as_str).collect();
        let received_set: BTreeSet<&str> = received.iter().map(String::as_str).collect();

        for call in received_set.difference(&expected_set) {
            tracing::error!(sdk = %self.sdk_name, call, "found a request which was not expected");
        }

        for call in expected_set.difference(&received_set) {
            tracing::error!(sdk = %self.sdk_name, call, "could not find a request which was expected");
        }

        if expected_set == received_set {
            tracing::info!(
                sdk = %self.sdk_name,
                "received requests match expected list, test run was successful"
            );
            true
        } else {
            tracing::error!(
                sdk = %self.sdk_name,
                expected = ?self.expected,
                ?received,
                "testing failed"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conformance(expected: &[&str]) -> Conformance {
        Conformance::new(
            expected.iter().map(|call| call.to_string()).collect(),
            "rust".into(),
        )
    }

    #[test]
    fn compares_as_sets() {
        let conformance = conformance(&["ready", "health", "gameserver"]);
        conformance.record("health");
        conformance.record("ready");
        conformance.record("health");
        assert!(!conformance.verify());

        conformance.record("gameserver");
        assert!(conformance.verify());

        conformance.record("shutdown");
        assert!(!conformance.verify());
    }

    #[test]
    fn values_must_match_field() {
        let conformance = conformance(&["setannotation"]);
        conformance.record_value("setannotation", "wrong", Field::Uid, Some("1234".into()));
        assert!(conformance.received().is_empty());

        conformance.record_value("setannotation", "1234", Field::Uid, Some("1234".into()));
        assert_eq!(conformance.received(), vec!["setannotation".to_owned()]);

        conformance.record_value("setplayercapacity", "10", Field::PlayerCapacity, None);
        assert_eq!(conformance.received().len(), 1);
    }

    #[test]
    fn reads_fields() {
        let mut game_server = crate::gameserver::local_default(&<_>::default());
        crate::gameserver::players_mut(&mut game_server).ids = vec!["a".into(), "b".into()];
        assert_eq!(Field::Uid.read(&game_server).as_deref(), Some("1234"));
        assert_eq!(Field::PlayerIds.read(&game_server).as_deref(), Some("a,b"));
        assert_eq!(Field::PlayerCapacity.read(&game_server).as_deref(), Some("0"));
    }
}
