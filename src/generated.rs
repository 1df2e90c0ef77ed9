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

//! Protobuf and gRPC bindings for the `agones.dev.sdk` packages.
//!
//! The messages also carry serde derives for the HTTP gateway, following the
//! grpc-gateway mapping: proto field names on output with default values
//! left out, lowerCamelCase names accepted on input, and 64 bit integers
//! written as strings.

#![allow(
    clippy::doc_markdown,
    clippy::use_self,
    clippy::enum_variant_names,
    clippy::large_enum_variant
)]

pub mod agones {
    pub mod dev {
        pub mod sdk {
            include!("generated/agones/dev/sdk.rs");

            pub mod alpha {
                include!("generated/agones/dev/sdk/alpha.rs");
            }

            pub mod beta {
                include!("generated/agones/dev/sdk/beta.rs");
            }
        }
    }
}

pub use agones::dev::sdk;

pub(crate) fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// 64 bit integers as JSON strings, read back from either strings or
/// numbers.
pub(crate) mod int64 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(i64),
        String(String),
    }

    impl Repr {
        fn into_i64<E: de::Error>(self) -> Result<i64, E> {
            match self {
                Self::Number(value) => Ok(value),
                Self::String(value) => value.trim().parse().map_err(|_| {
                    E::invalid_value(de::Unexpected::Str(&value), &"a 64 bit integer")
                }),
            }
        }
    }

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Repr::deserialize(deserializer)?.into_i64()
    }

    /// The same mapping for the `Int64Value` wrapper fields.
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<i64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => serializer.collect_str(value),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<i64>, D::Error> {
            Option::<super::Repr>::deserialize(deserializer)?
                .map(super::Repr::into_i64)
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::sdk::{self, alpha, beta};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn game_server_omits_defaults() {
        let gs = sdk::GameServer {
            object_meta: Some(sdk::game_server::ObjectMeta {
                name: "test".into(),
                generation: 2,
                labels: [("b".to_owned(), "2".to_owned()), ("a".to_owned(), "1".to_owned())]
                    .into(),
                ..<_>::default()
            }),
            spec: None,
            status: Some(sdk::game_server::Status {
                state: "Ready".into(),
                ports: vec![sdk::game_server::status::Port {
                    name: "default".into(),
                    port: 7777,
                }],
                counters: [(
                    "rooms".to_owned(),
                    sdk::game_server::status::CounterStatus {
                        count: 0,
                        capacity: 10,
                    },
                )]
                .into(),
                ..<_>::default()
            }),
        };

        assert_eq!(
            serde_json::to_value(&gs).unwrap(),
            json!({
                "object_meta": {
                    "name": "test",
                    "generation": "2",
                    "labels": {"a": "1", "b": "2"},
                },
                "status": {
                    "state": "Ready",
                    "ports": [{"name": "default", "port": 7777}],
                    "counters": {"rooms": {"capacity": "10"}},
                },
            })
        );
    }

    #[test]
    fn accepts_either_casing() {
        let request: beta::CounterUpdateRequest =
            serde_json::from_str(r#"{"countDiff": "-2", "name": "rooms"}"#).unwrap();
        assert_eq!(request.count_diff, -2);
        assert_eq!(request.count, None);

        let request: beta::CounterUpdateRequest =
            serde_json::from_str(r#"{"count_diff": 3, "capacity": "5"}"#).unwrap();
        assert_eq!(request.count_diff, 3);
        assert_eq!(request.capacity, Some(5));

        let id: alpha::PlayerId = serde_json::from_str(r#"{"playerID": "one"}"#).unwrap();
        assert_eq!(id.player_id, "one");
    }

    #[test]
    fn rejects_bad_integers() {
        assert!(serde_json::from_str::<sdk::Duration>(r#"{"seconds": "soon"}"#).is_err());
        assert!(serde_json::from_str::<sdk::Duration>(r#"{"seconds": 1.5}"#).is_err());
        assert!(serde_json::from_str::<beta::List>(r#"{"values": [1]}"#).is_err());

        let duration: sdk::Duration = serde_json::from_str(r#"{"seconds": " 7 "}"#).unwrap();
        assert_eq!(duration.seconds, 7);
    }

    #[test]
    fn counter_update_writes_wrappers_as_strings() {
        let request = beta::CounterUpdateRequest {
            name: "rooms".into(),
            count: Some(0),
            capacity: None,
            count_diff: 0,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"name": "rooms", "count": "0"})
        );
    }
}
