use std::collections::HashMap;

use parse_display::{Display, FromStr};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Address, ConfigError, Interpolation, NetworkName, Result};

/// The chain family a network (or an account address) belongs to.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Deserialize, Serialize, JsonSchema, Display, FromStr,
)]
#[derive(clap::ValueEnum)]
pub enum ChainId {
    /// Local emulator
    #[serde(rename = "flow-emulator")]
    #[display("flow-emulator")]
    #[value(name = "flow-emulator")]
    Emulator,
    /// Public testnet
    #[serde(rename = "flow-testnet")]
    #[display("flow-testnet")]
    #[value(name = "flow-testnet")]
    Testnet,
    /// Mainnet
    #[serde(rename = "flow-mainnet")]
    #[display("flow-mainnet")]
    #[value(name = "flow-mainnet")]
    Mainnet,
    /// Preview network
    #[serde(rename = "flow-previewnet")]
    #[display("flow-previewnet")]
    #[value(name = "flow-previewnet")]
    Previewnet,
}

/// A named network the project can target.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Network {
    /// Unique network name, e.g., "emulator" or "testnet".
    pub name: NetworkName,
    /// Access node endpoint, e.g., "127.0.0.1:3569". May embed secrets (see [`Interpolation`]).
    pub host: Interpolation,
    /// Chain family.
    pub chain_id: ChainId,
    /// Address of the migration staging contract on this network, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_address: Option<Address>,
}

impl Network {
    /// Create a network without a staging contract.
    pub fn new(name: impl Into<NetworkName>, host: &str, chain_id: ChainId) -> Self {
        Network {
            name: name.into(),
            host: host.into(),
            chain_id,
            staging_address: None,
        }
    }
}

/// All networks of a project, unique by name.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Vec<Network>", into = "Vec<Network>")]
pub struct NetworkRegistry {
    entries: Vec<Network>,
    by_name: HashMap<NetworkName, usize>,
}

impl NetworkRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Default::default()
    }

    /// The network named `name`.
    pub fn get_by_name(&self, name: &str) -> Option<&Network> {
        self.by_name.get(name).map(|&idx| &self.entries[idx])
    }

    /// Insert `network`, replacing any network with the same name.
    pub fn add_or_update(&mut self, network: Network) {
        match self.by_name.get(&network.name).copied() {
            Some(idx) => self.entries[idx] = network,
            None => {
                self.by_name.insert(network.name.clone(), self.entries.len());
                self.entries.push(network);
            }
        }
    }

    /// Iterate over all networks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Network> {
        self.entries.iter()
    }

    /// Number of networks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no networks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<Network>> for NetworkRegistry {
    type Error = ConfigError;

    fn try_from(networks: Vec<Network>) -> Result<Self> {
        let mut registry = NetworkRegistry::new();
        for network in networks {
            if registry.get_by_name(&network.name).is_some() {
                return Err(ConfigError::DuplicateNetwork(network.name));
            }
            registry.add_or_update(network);
        }
        Ok(registry)
    }
}

impl From<NetworkRegistry> for Vec<Network> {
    fn from(registry: NetworkRegistry) -> Self {
        registry.entries
    }
}

impl JsonSchema for NetworkRegistry {
    fn schema_name() -> String {
        "NetworkRegistry".into()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <Vec<Network> as JsonSchema>::json_schema(gen)
    }
}
