use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{AccountName, ContractName, NetworkName};

/// Which contracts an account deploys on a network.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Deployment {
    /// Target network name
    pub network: NetworkName,
    /// Deploying account name
    pub account: AccountName,
    /// Contracts deployed by `account`, in deployment order; each name at most once
    #[serde(deserialize_with = "de_unique_names")]
    contracts: Vec<ContractName>,
}

/// Keeps the first occurrence of every name.
fn dedup_names(names: impl IntoIterator<Item = ContractName>) -> Vec<ContractName> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

fn de_unique_names<'de, D>(deserializer: D) -> Result<Vec<ContractName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(dedup_names(Vec::<ContractName>::deserialize(deserializer)?))
}

impl Deployment {
    /// Create a deployment; repeated contract names are dropped.
    pub fn new<I, S>(
        network: impl Into<NetworkName>,
        account: impl Into<AccountName>,
        contracts: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ContractName>,
    {
        Deployment {
            network: network.into(),
            account: account.into(),
            contracts: dedup_names(contracts.into_iter().map(Into::into)),
        }
    }

    /// Contracts deployed by this entry, in deployment order.
    pub fn contracts(&self) -> &[ContractName] {
        &self.contracts
    }

    /// Whether this deployment includes contract `name`.
    pub fn deploys(&self, name: &str) -> bool {
        self.contracts.iter().any(|c| c == name)
    }
}

/// All deployments of a project.
///
/// Several entries may exist for the same `(network, account)` pair (e.g., when written that way
/// in the config file); they are all kept, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "Vec<Deployment>", into = "Vec<Deployment>")]
pub struct DeploymentIndex {
    entries: Vec<Deployment>,
    /// network -> account -> positions in `entries` (ascending)
    index: HashMap<NetworkName, HashMap<AccountName, Vec<usize>>>,
}

impl DeploymentIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Default::default()
    }

    fn positions(&self, account: &str, network: &str) -> &[usize] {
        self.index
            .get(network)
            .and_then(|by_account| by_account.get(account))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All deployments of `account` on `network`, in insertion order.
    pub fn get_by_account_and_network(&self, account: &str, network: &str) -> Vec<&Deployment> {
        self.positions(account, network)
            .iter()
            .map(|&idx| &self.entries[idx])
            .collect()
    }

    /// All deployments on `network`, in insertion order.
    ///
    /// This is a linear scan over the entries: callers that look for "the first deployment
    /// listing contract X" depend on the global insertion order, which per-account buckets
    /// would not preserve.
    pub fn by_network(&self, network: &str) -> Vec<&Deployment> {
        self.entries
            .iter()
            .filter(|d| d.network == network)
            .collect()
    }

    /// Upsert by `(network, account)`: the contract list of the first matching entry is
    /// replaced wholesale; if there is no matching entry, `deployment` is appended.
    pub fn add_or_update(&mut self, deployment: Deployment) {
        let first = self
            .positions(&deployment.account, &deployment.network)
            .first()
            .copied();
        match first {
            Some(idx) => self.entries[idx].contracts = deployment.contracts,
            None => self.push(deployment),
        }
    }

    /// Append without merging.
    fn push(&mut self, deployment: Deployment) {
        self.index
            .entry(deployment.network.clone())
            .or_default()
            .entry(deployment.account.clone())
            .or_default()
            .push(self.entries.len());
        self.entries.push(deployment);
    }

    /// Iterate over all deployments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Deployment> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Loaded entries accumulate; nothing is merged.
impl From<Vec<Deployment>> for DeploymentIndex {
    fn from(deployments: Vec<Deployment>) -> Self {
        let mut index = DeploymentIndex::new();
        for deployment in deployments {
            index.push(deployment);
        }
        index
    }
}

impl From<DeploymentIndex> for Vec<Deployment> {
    fn from(index: DeploymentIndex) -> Self {
        index.entries
    }
}

impl JsonSchema for DeploymentIndex {
    fn schema_name() -> String {
        "DeploymentIndex".into()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <Vec<Deployment> as JsonSchema>::json_schema(gen)
    }
}
