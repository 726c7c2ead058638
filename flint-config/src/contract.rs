use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Address, ContractName, NetworkName};

/// Where a contract's code comes from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ContractSource {
    /// Path to a source file, relative to the project directory.
    Path(PathBuf),
    /// The contract is already deployed at this address; there is no local code.
    Alias(Address),
}

impl ContractSource {
    /// The alias address, if this source is an alias.
    pub fn alias(&self) -> Option<Address> {
        match self {
            ContractSource::Alias(addr) => Some(*addr),
            ContractSource::Path(_) => None,
        }
    }

    /// The source file location, if this source is a path.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ContractSource::Path(path) => Some(path),
            ContractSource::Alias(_) => None,
        }
    }
}

/// A source string is an alias iff it carries a `0x` prefix and the remainder is a valid
/// address; everything else is a path.
impl From<&str> for ContractSource {
    fn from(s: &str) -> Self {
        if Address::has_hex_prefix(s) {
            if let Ok(addr) = s.parse() {
                return ContractSource::Alias(addr);
            }
        }
        ContractSource::Path(PathBuf::from(s))
    }
}

impl From<Address> for ContractSource {
    fn from(addr: Address) -> Self {
        ContractSource::Alias(addr)
    }
}

impl From<PathBuf> for ContractSource {
    fn from(path: PathBuf) -> Self {
        ContractSource::Path(path)
    }
}

impl Display for ContractSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractSource::Path(path) => write!(f, "{}", path.display()),
            ContractSource::Alias(addr) => write!(f, "{addr:#}"),
        }
    }
}

impl Serialize for ContractSource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ContractSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ContractSource::from(s.as_str()))
    }
}

/// Same as for `String`
impl JsonSchema for ContractSource {
    fn schema_name() -> String {
        "ContractSource".into()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <String as JsonSchema>::json_schema(gen)
    }
}

/// A contract definition, scoped to a single network.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Contract {
    /// Contract name (unique per network, not globally).
    pub name: ContractName,
    /// Source file or alias address.
    pub source: ContractSource,
    /// Network this entry applies to.
    pub network: NetworkName,
}

impl Contract {
    /// Create a new contract definition.
    pub fn new(
        name: impl Into<ContractName>,
        source: impl Into<ContractSource>,
        network: impl Into<NetworkName>,
    ) -> Self {
        Contract {
            name: name.into(),
            source: source.into(),
            network: network.into(),
        }
    }
}

/// All contract definitions of a project.
///
/// Entries keep their insertion order; exact `(name, network)` lookups go through an index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "Vec<Contract>", into = "Vec<Contract>")]
pub struct ContractCatalog {
    entries: Vec<Contract>,
    /// network -> contract name -> position in `entries`
    index: HashMap<NetworkName, HashMap<ContractName, usize>>,
}

impl ContractCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Default::default()
    }

    /// First contract (in insertion order) named `name`, on any network.
    pub fn get_by_name(&self, name: &str) -> Option<&Contract> {
        self.entries.iter().find(|c| c.name == name)
    }

    /// The contract named `name` on `network`.
    pub fn get_by_name_and_network(&self, name: &str, network: &str) -> Option<&Contract> {
        self.index
            .get(network)
            .and_then(|by_name| by_name.get(name))
            .map(|&idx| &self.entries[idx])
    }

    /// All contracts defined for `network`, in insertion order.
    pub fn get_by_network(&self, network: &str) -> Vec<&Contract> {
        self.entries
            .iter()
            .filter(|c| c.network == network)
            .collect()
    }

    /// Insert `contract`, replacing (in place) any entry with the same name and network.
    pub fn add_or_update(&mut self, contract: Contract) {
        let by_name = self.index.entry(contract.network.clone()).or_default();
        match by_name.get(&contract.name).copied() {
            Some(idx) => {
                tracing::debug!(
                    "Replacing contract {} on network {}",
                    contract.name,
                    contract.network
                );
                self.entries[idx] = contract;
            }
            None => {
                by_name.insert(contract.name.clone(), self.entries.len());
                self.entries.push(contract);
            }
        }
    }

    /// Distinct contract names, in the order they were first defined.
    pub fn names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Contract> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Contract>> for ContractCatalog {
    fn from(contracts: Vec<Contract>) -> Self {
        let mut catalog = ContractCatalog::new();
        catalog.extend(contracts);
        catalog
    }
}

impl From<ContractCatalog> for Vec<Contract> {
    fn from(catalog: ContractCatalog) -> Self {
        catalog.entries
    }
}

impl Extend<Contract> for ContractCatalog {
    fn extend<I: IntoIterator<Item = Contract>>(&mut self, iter: I) {
        for contract in iter {
            self.add_or_update(contract);
        }
    }
}

impl JsonSchema for ContractCatalog {
    fn schema_name() -> String {
        "ContractCatalog".into()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <Vec<Contract> as JsonSchema>::json_schema(gen)
    }
}
