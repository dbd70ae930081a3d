// Copyright (c) 2026 Bpass
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Harness configuration (TOML).
//!
//! ```text
//! [logging]
//! format = "json"
//! filter = "bpass=debug"
//!
//! [networks.matic-mumbai]
//! chain_id = 80001
//! url = "https://rpc-mumbai.maticvigil.com/v1/<key>"
//! tags = ["staging", "l2"]
//! live = true
//! [networks.matic-mumbai.contracts]
//! WETH = "0xA6FA4fB5f76172d178d61B04b0ecd319C5d1C0aa"
//!
//! [release]
//! max_per_address = 5
//! default_amount = 500
//! default_duration_secs = 300000
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::time::minutes;
use crate::core::types::Address;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Cannot read config file.
    #[error("read config")]
    Read(#[from] std::io::Error),
    /// Cannot parse TOML.
    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Network name not configured.
    #[error("unknown network: {0}")]
    UnknownNetwork(String),
    /// Two networks share a chain id.
    #[error("chain id {0} configured more than once")]
    DuplicateChainId(u64),
    /// A contract address does not parse.
    #[error("bad contract address {name} on {network}")]
    BadContractAddress {
        /// Network name.
        network: String,
        /// Contract name.
        name: String,
    },
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single line.
    #[default]
    Compact,
    /// Structured JSON lines.
    Json,
}

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_filter(),
        }
    }
}

/// One deployment target.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Chain id (absent for ad-hoc local nodes).
    #[serde(default)]
    pub chain_id: Option<u64>,
    /// RPC endpoint.
    #[serde(default)]
    pub url: Option<String>,
    /// Deployment tags (e.g. "production", "staging", "local").
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether this is a live (non-local) chain.
    #[serde(default)]
    pub live: bool,
    /// Known contract addresses by name.
    #[serde(default)]
    pub contracts: BTreeMap<String, String>,
}

impl NetworkConfig {
    fn new(chain_id: Option<u64>, tags: &[&str], live: bool) -> Self {
        Self {
            chain_id,
            url: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            live,
            contracts: BTreeMap::new(),
        }
    }

    /// True if the network carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Parsed address of a named contract, if configured.
    pub fn contract(&self, name: &str) -> Option<Address> {
        self.contracts.get(name).and_then(|s| s.parse().ok())
    }
}

fn default_networks() -> BTreeMap<String, NetworkConfig> {
    let mut mumbai = NetworkConfig::new(Some(80001), &["staging", "l2"], true);
    mumbai.contracts.insert(
        "WETH".to_string(),
        "0xA6FA4fB5f76172d178d61B04b0ecd319C5d1C0aa".to_string(),
    );

    BTreeMap::from([
        ("mainnet".to_string(), NetworkConfig::new(Some(1), &["production"], true)),
        ("localhost".to_string(), NetworkConfig::new(None, &["local"], false)),
        ("hardhat".to_string(), NetworkConfig::new(Some(1337), &["local"], false)),
        ("ropsten".to_string(), NetworkConfig::new(Some(3), &["staging"], true)),
        ("rinkeby".to_string(), NetworkConfig::new(Some(4), &["staging"], true)),
        ("goerli".to_string(), NetworkConfig::new(Some(5), &["staging"], true)),
        ("kovan".to_string(), NetworkConfig::new(Some(42), &[], true)),
        ("matic".to_string(), NetworkConfig::new(Some(137), &["l2"], true)),
        ("matic-mumbai".to_string(), mumbai),
    ])
}

/// Release defaults used by `release-plan`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Per-address cap enforced by the contract (claims + purchases).
    #[serde(default = "default_max_per_address")]
    pub max_per_address: u64,
    /// Default units per release.
    #[serde(default = "default_amount")]
    pub default_amount: u64,
    /// Default release length in seconds.
    #[serde(default = "default_duration_secs")]
    pub default_duration_secs: u64,
}

fn default_max_per_address() -> u64 {
    5
}

fn default_amount() -> u64 {
    500
}

fn default_duration_secs() -> u64 {
    minutes(500 * 10)
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            max_per_address: default_max_per_address(),
            default_amount: default_amount(),
            default_duration_secs: default_duration_secs(),
        }
    }
}

/// Token metadata settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApolloConfig {
    /// Base URI for token metadata.
    #[serde(default = "default_base_uri")]
    pub base_uri: String,
}

fn default_base_uri() -> String {
    "ipfs://QmTFdg4WmLyidFmftZ48gD5PtKzVJrAg2kG3WpNas6CZp9".to_string()
}

impl Default for ApolloConfig {
    fn default() -> Self {
        Self {
            base_uri: default_base_uri(),
        }
    }
}

/// Configuration root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Deployment targets by name.
    #[serde(default = "default_networks")]
    pub networks: BTreeMap<String, NetworkConfig>,
    /// Release defaults.
    #[serde(default)]
    pub release: ReleaseConfig,
    /// Token metadata.
    #[serde(default)]
    pub apollo: ApolloConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            networks: default_networks(),
            release: ReleaseConfig::default(),
            apollo: ApolloConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let cfg: HarnessConfig = toml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    /// Look up a network by name.
    pub fn network(&self, name: &str) -> Result<&NetworkConfig, ConfigError> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }

    /// Reject duplicate chain ids and unparsable contract addresses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for (name, net) in &self.networks {
            if let Some(id) = net.chain_id {
                if !seen.insert(id) {
                    return Err(ConfigError::DuplicateChainId(id));
                }
            }
            for (contract, addr) in &net.contracts {
                if addr.parse::<Address>().is_err() {
                    return Err(ConfigError::BadContractAddress {
                        network: name.clone(),
                        name: contract.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
