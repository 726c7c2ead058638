//! Contract resolution: turning a contract name and a target network into a [`Binding`].
//!
//! The [`Resolver`] only borrows the project collections and never mutates them, so it can be
//! shared freely between threads. The one potentially blocking step, reading contract source
//! code, is delegated to a caller-supplied [`ReadSource`].
//!
//! Addresses are determined in this order:
//! 1. if the contract's source on the target network is an alias address, that address is used
//!    and deployments are not consulted at all;
//! 2. otherwise, the first deployment on the network (in configuration order) that lists the
//!    contract names the deploying account, whose address is used.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::{
    AccountRegistry, Address, Config, Contract, ContractCatalog, ContractName, ContractSource,
    DeploymentIndex, NetworkName,
};

/// Errors raised while resolving a contract.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No contract entry exists for the name on the network.
    #[error("Contract '{name}' is not defined for network '{network}'")]
    ContractNotDefined {
        /// Contract name
        name: ContractName,
        /// Target network
        network: NetworkName,
    },
    /// The contract has neither an alias nor a deployment on the network.
    #[error("Contract '{name}' has no alias and is not deployed by any account on network '{network}'")]
    ContractNotDeployed {
        /// Contract name
        name: ContractName,
        /// Target network
        network: NetworkName,
    },
    /// A deployment names an account that does not exist.
    #[error("Contract '{name}' is deployed on network '{network}' by account '{account}', which is not defined")]
    DeployingAccountNotFound {
        /// Contract name
        name: ContractName,
        /// Target network
        network: NetworkName,
        /// The missing account
        account: String,
    },
    /// Reading the contract source failed.
    #[error("Failed to read source of contract '{name}' for network '{network}' from {}", location.display())]
    SourceUnreadable {
        /// Contract name
        name: ContractName,
        /// Target network
        network: NetworkName,
        /// Source location that could not be read
        location: PathBuf,
        /// Underlying failure
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    /// Name of the contract that failed to resolve.
    pub fn contract_name(&self) -> &str {
        match self {
            ResolveError::ContractNotDefined { name, .. }
            | ResolveError::ContractNotDeployed { name, .. }
            | ResolveError::DeployingAccountNotFound { name, .. }
            | ResolveError::SourceUnreadable { name, .. } => name,
        }
    }
}

/// Result with error type defaulting to [`ResolveError`].
pub type Result<T, E = ResolveError> = core::result::Result<T, E>;

/// Capability to read contract source code.
pub trait ReadSource {
    /// Read the contents of `location`.
    fn read_source(&self, location: &Path) -> io::Result<Vec<u8>>;
}

impl<F> ReadSource for F
where
    F: Fn(&Path) -> io::Result<Vec<u8>>,
{
    fn read_source(&self, location: &Path) -> io::Result<Vec<u8>> {
        self(location)
    }
}

/// A contract name resolved against a network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Binding {
    /// Contract name
    pub name: ContractName,
    /// Contract code; `None` for aliased (already deployed) contracts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Vec<u8>>,
    /// Address hosting the contract
    pub address: Address,
}

impl Binding {
    /// Whether this binding points at an aliased contract (no local code).
    pub fn is_alias(&self) -> bool {
        self.code.is_none()
    }
}

/// Resolves contract names against the borrowed project collections.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'a> {
    contracts: &'a ContractCatalog,
    accounts: &'a AccountRegistry,
    deployments: &'a DeploymentIndex,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over the given collections.
    pub fn new(
        contracts: &'a ContractCatalog,
        accounts: &'a AccountRegistry,
        deployments: &'a DeploymentIndex,
    ) -> Self {
        Resolver {
            contracts,
            accounts,
            deployments,
        }
    }

    fn contract(&self, name: &str, network: &str) -> Result<&'a Contract> {
        self.contracts
            .get_by_name_and_network(name, network)
            .ok_or_else(|| ResolveError::ContractNotDefined {
                name: name.into(),
                network: network.into(),
            })
    }

    fn address_of(&self, contract: &Contract, network: &str) -> Result<Address> {
        if let ContractSource::Alias(address) = contract.source {
            return Ok(address);
        }
        let name = contract.name.as_str();
        let deployment = self
            .deployments
            .by_network(network)
            .into_iter()
            .find(|d| d.deploys(name))
            .ok_or_else(|| ResolveError::ContractNotDeployed {
                name: name.into(),
                network: network.into(),
            })?;
        self.accounts
            .get_by_name(&deployment.account)
            .map(|account| account.address)
            .ok_or_else(|| ResolveError::DeployingAccountNotFound {
                name: name.into(),
                network: network.into(),
                account: deployment.account.clone(),
            })
    }

    /// Resolve the address hosting contract `name` on `network`, without reading any code.
    pub fn resolve_address(&self, name: &str, network: &str) -> Result<Address> {
        let contract = self.contract(name, network)?;
        self.address_of(contract, network)
    }

    /// Resolve contract `name` on `network` into a [`Binding`].
    ///
    /// Code is read through `read_source` only for contracts whose source is a path.
    ///
    /// # Errors
    ///
    /// * [`ResolveError::ContractNotDefined`] if there is no entry for `(name, network)`,
    /// * [`ResolveError::ContractNotDeployed`] if there is no alias and no deployment lists it,
    /// * [`ResolveError::DeployingAccountNotFound`] if the deploying account is not defined,
    /// * [`ResolveError::SourceUnreadable`] if `read_source` fails.
    pub fn resolve_contract(
        &self,
        name: &str,
        network: &str,
        read_source: &impl ReadSource,
    ) -> Result<Binding> {
        let contract = self.contract(name, network)?;
        let address = self.address_of(contract, network)?;
        let code = match &contract.source {
            ContractSource::Alias(_) => None,
            ContractSource::Path(location) => Some(read_source.read_source(location).map_err(
                |source| ResolveError::SourceUnreadable {
                    name: name.into(),
                    network: network.into(),
                    location: location.clone(),
                    source,
                },
            )?),
        };
        Ok(Binding {
            name: name.into(),
            code,
            address,
        })
    }

    /// Resolve every name in `names`, in order, stopping at the first failure.
    ///
    /// Repeated names are resolved (and returned) once per occurrence.
    pub fn resolve_many<S: AsRef<str>>(
        &self,
        names: &[S],
        network: &str,
        read_source: &impl ReadSource,
    ) -> Result<Vec<Binding>> {
        names
            .iter()
            .map(|name| self.resolve_contract(name.as_ref(), network, read_source))
            .collect()
    }
}

impl<'a> From<&'a Config> for Resolver<'a> {
    fn from(cfg: &'a Config) -> Self {
        Resolver::new(cfg.contracts(), cfg.accounts(), cfg.deployments())
    }
}
