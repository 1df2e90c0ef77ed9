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

//! Runtime configuration for the SDK server.

use std::{path::PathBuf, str::FromStr, time::Duration};

/// The default port for the gRPC endpoint.
pub const DEFAULT_GRPC_PORT: u16 = 9357;
/// The default port for the HTTP/JSON gateway.
pub const DEFAULT_HTTP_PORT: u16 = 9358;
pub const DEFAULT_ADDRESS: &str = "localhost";

/// The knobs consulted by the engines and the transport front-end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Run the standalone engine instead of talking to the cluster.
    pub is_local: bool,
    /// Optional descriptor document for the local engine.
    pub local_file: Option<PathBuf>,
    /// How long to wait before binding the listeners.
    pub delay: Duration,
    /// How long the local engine runs before exiting on its own.
    /// [`Duration::ZERO`] runs forever.
    pub timeout: Duration,
    /// Expected call names for conformance mode. Empty disables it.
    pub test: Vec<String>,
    pub test_sdk_name: String,
    pub grpc_port: u16,
    pub http_port: u16,
    pub address: String,
    pub feature_gates: FeatureGates,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            is_local: false,
            local_file: None,
            delay: Duration::ZERO,
            timeout: Duration::ZERO,
            test: Vec::new(),
            test_sdk_name: String::new(),
            grpc_port: DEFAULT_GRPC_PORT,
            http_port: DEFAULT_HTTP_PORT,
            address: DEFAULT_ADDRESS.into(),
            feature_gates: FeatureGates::default(),
        }
    }
}

impl Config {
    pub fn grpc_endpoint(&self) -> String {
        format!("{}:{}", self.address, self.grpc_port)
    }

    pub fn http_endpoint(&self) -> String {
        format!("{}:{}", self.address, self.http_port)
    }

    /// Whether the local engine should record and verify calls.
    pub fn is_conformance(&self) -> bool {
        !self.test.is_empty()
    }
}

/// Features that can be toggled at startup.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
pub enum Feature {
    /// The alpha player tracking surface.
    PlayerTracking,
    /// The beta counters and lists surface.
    CountsAndLists,
}

impl Feature {
    pub const fn enabled_by_default(self) -> bool {
        match self {
            Self::PlayerTracking => false,
            Self::CountsAndLists => true,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FeatureGateError {
    #[error("unknown feature gate `{0}`")]
    Unknown(String),
    #[error("invalid value `{value}` for feature gate `{feature}`, expected true or false")]
    InvalidValue { feature: Feature, value: String },
}

/// The set of enabled features.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureGates {
    player_tracking: bool,
    counts_and_lists: bool,
}

impl Default for FeatureGates {
    fn default() -> Self {
        Self {
            player_tracking: Feature::PlayerTracking.enabled_by_default(),
            counts_and_lists: Feature::CountsAndLists.enabled_by_default(),
        }
    }
}

impl FeatureGates {
    /// Every feature switched on, mostly useful for tests.
    pub fn all() -> Self {
        Self {
            player_tracking: true,
            counts_and_lists: true,
        }
    }

    pub fn enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::PlayerTracking => self.player_tracking,
            Feature::CountsAndLists => self.counts_and_lists,
        }
    }

    pub fn set(&mut self, feature: Feature, enabled: bool) {
        match feature {
            Feature::PlayerTracking => self.player_tracking = enabled,
            Feature::CountsAndLists => self.counts_and_lists = enabled,
        }
    }

    #[must_use]
    pub fn with(mut self, feature: Feature, enabled: bool) -> Self {
        self.set(feature, enabled);
        self
    }

    /// Fails with a precondition error when `feature` is switched off.
    pub fn ensure(&self, feature: Feature) -> Result<(), crate::engine::Error> {
        if self.enabled(feature) {
            Ok(())
        } else {
            Err(crate::engine::Error::FeatureDisabled(feature))
        }
    }
}

/// Parses the `Name=bool&Name=bool` form used by the `--feature-gates` flag.
impl FromStr for FeatureGates {
    type Err = FeatureGateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut gates = Self::default();

        for (name, value) in form_urlencoded::parse(s.trim().as_bytes()) {
            if name.is_empty() {
                continue;
            }

            let feature = Feature::from_str(&name)
                .map_err(|_| FeatureGateError::Unknown(name.to_string()))?;
            let enabled = value
                .parse::<bool>()
                .map_err(|_| FeatureGateError::InvalidValue {
                    feature,
                    value: value.to_string(),
                })?;
            gates.set(feature, enabled);
        }

        Ok(gates)
    }
}

impl std::fmt::Display for FeatureGates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use strum::IntoEnumIterator;

        let gates = Feature::iter()
            .map(|feature| format!("{feature}={}", self.enabled(feature)))
            .collect::<Vec<_>>();
        f.write_str(&gates.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_gates() {
        let gates = FeatureGates::default();
        assert!(!gates.enabled(Feature::PlayerTracking));
        assert!(gates.enabled(Feature::CountsAndLists));
    }

    #[test]
    fn parse_gates() {
        let gates: FeatureGates = "PlayerTracking=true&CountsAndLists=false".parse().unwrap();
        assert!(gates.enabled(Feature::PlayerTracking));
        assert!(!gates.enabled(Feature::CountsAndLists));

        let gates: FeatureGates = "".parse().unwrap();
        assert_eq!(gates, FeatureGates::default());

        assert_eq!(
            "Nope=true".parse::<FeatureGates>(),
            Err(FeatureGateError::Unknown("Nope".into()))
        );
        assert!(matches!(
            "PlayerTracking=yes".parse::<FeatureGates>(),
            Err(FeatureGateError::InvalidValue { .. })
        ));
    }

    #[test]
    fn gates_display_round_trips() {
        let gates = FeatureGates::all();
        assert_eq!(
            gates.to_string(),
            "PlayerTracking=true&CountsAndLists=true"
        );
        assert_eq!(gates.to_string().parse::<FeatureGates>().unwrap(), gates);
    }

    #[test]
    fn ensure_reports_feature() {
        let gates = FeatureGates::default();
        let error = gates.ensure(Feature::PlayerTracking).unwrap_err();
        assert_eq!(error.to_string(), "PlayerTracking not enabled");
        assert!(gates.ensure(Feature::CountsAndLists).is_ok());
    }

    #[test]
    fn endpoints() {
        let config = Config::default();
        assert_eq!(config.grpc_endpoint(), "localhost:9357");
        assert_eq!(config.http_endpoint(), "localhost:9358");
        assert!(!config.is_conformance());
    }
}
