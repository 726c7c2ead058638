#![warn(missing_docs)]

//! This crate exposes the flint project configuration interface [`Config`] and the contract
//! [`Resolver`] built on top of it.
//!
//! Every flint project has a JSON config file `flint.json`, which specifies:
//! - [`contracts`](Config::contracts): contract definitions, each scoped to a single network; the
//!   source is either a path to a contract file or an *alias* address of an already deployed
//!   contract,
//! - [`accounts`](Config::accounts): named on-chain accounts and their signing keys,
//! - [`networks`](Config::networks): named networks (access node host, chain id, and optionally
//!   the address of the migration staging contract),
//! - [`deployments`](Config::deployments): which contracts each account deploys on each network.
//!
//! Example JSON file:
//! ```
//! # use flint_config::Config;
//! # use serde_json::{from_str, json};
//! # let cfg_json = json!(
//! {
//!   "contracts": [
//!     { "name": "Kibble", "source": "./cadence/contracts/Kibble.cdc", "network": "emulator" },
//!     { "name": "FungibleToken", "source": "./cadence/contracts/FungibleToken.cdc", "network": "emulator" },
//!     { "name": "FungibleToken", "source": "0x9a0766d93b6608b7", "network": "testnet" }
//!   ],
//!   "accounts": [{
//!     "name": "emulator-account",
//!     "address": "f8d6e0586b0a20c1",
//!     "chain_id": "flow-emulator",
//!     "keys": [{ "private_key": { "env": "EMULATOR_PRIVATE_KEY" } }]
//!   }],
//!   "networks": [
//!     { "name": "emulator", "host": "127.0.0.1:3569", "chain_id": "flow-emulator" }
//!   ],
//!   "deployments": [
//!     { "network": "emulator", "account": "emulator-account", "contracts": ["FungibleToken", "Kibble"] }
//!   ]
//! }
//! # );
//! # let cfg: Config = from_str(&cfg_json.to_string()).unwrap();
//! # assert_eq!(3, cfg.contracts().len());
//! ```
//!
//! You can load config files with [`Config::nearest`], which finds the JSON file in the current
//! directory or any parent directory (or uses the file named by the `FLINT_CONFIG` environment
//! variable):
//!
//! ```no_run
//! use flint_config::Config;
//! let cfg = Config::nearest().unwrap();
//! ```
//!
//! Alternatively, you can load the default config in a directory with [`Config::from_dir`], or
//! use [`Config::from_file`] if you have the filename of the config file.
//!
//! Once loaded, contracts are resolved into [`Binding`]s (name, address, and code):
//!
//! ```no_run
//! use flint_config::Config;
//! let cfg = Config::nearest().unwrap();
//! let binding = cfg.resolver().resolve_contract("Kibble", "emulator", &cfg).unwrap();
//! println!("{} is at {:#}", binding.name, binding.address);
//! ```

use parse_display::Display;
use path_clean::PathClean;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// On-chain account addresses
pub mod address;
/// Named accounts and their keys
pub mod account;
/// Contract definitions
pub mod contract;
/// Which account deploys which contracts where
pub mod deployment;
/// Interpolated string containing secrets
pub mod interpolation;
/// Named networks
pub mod network;
/// Contract resolution
pub mod resolve;
/// Secret management
pub mod secret;
/// Various utilities
pub mod util;

pub use account::{Account, AccountKey, AccountRegistry, HashAlgo, SigAlgo};
pub use address::Address;
pub use contract::{Contract, ContractCatalog, ContractSource};
pub use deployment::{Deployment, DeploymentIndex};
pub use interpolation::Interpolation;
pub use network::{ChainId, Network, NetworkRegistry};
pub use resolve::{Binding, ReadSource, ResolveError, Resolver};

use util::OrBug;

/// Default flint config filename
pub const DEFAULT_FILENAME: &str = "flint.json";

/// Environment variable naming the config file picked up by [`Config::nearest`]
pub const CONFIG_ENV_VAR: &str = "FLINT_CONFIG";

/// Errors raised handling configurations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error raised when we can't find the config file
    #[error("Could not find config file {}", DEFAULT_FILENAME)]
    FileNotFound,
    /// Error raised when deserialization/serialization of the config file fails.
    #[error("Malformed config {}: {1}", .0.display())]
    MalformedConfig(PathBuf, #[source] serde_json::Error),
    /// Generic path-related error, not caused by a filesystem error.
    #[error("{0}. Path: {}", .1.display())]
    PathError(&'static str, PathBuf),
    /// Generic filesystem error
    #[error("{0}. Path: {}", .1.display())]
    FsError(&'static str, PathBuf, #[source] io::Error),
    /// Two accounts share a name.
    #[error("Duplicate account name '{0}'")]
    DuplicateAccountName(AccountName),
    /// Two differently named accounts share an address.
    #[error("Address {0} of account '{2}' is already used by account '{1}'")]
    DuplicateAccountAddress(Address, AccountName, AccountName),
    /// Two networks share a name.
    #[error("Duplicate network name '{0}'")]
    DuplicateNetwork(NetworkName),
    /// Not a valid account address.
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),
    /// A secret value failed validation.
    #[error("Invalid secret: {0}")]
    InvalidSecret(String),
    /// Error raised when secret cannot be read from environment
    #[error("Failed to read secret from environment variable '{0}': {1}")]
    SecretReadFromEnv(String, #[source] dotenv::Error),
    /// Error raised when secret cannot be read from file
    #[error("Failed to read secret from file '{}': {1}", .0.display())]
    SecretReadFromFile(PathBuf, #[source] io::Error),
}

/// Result with error type defaulting to [`ConfigError`].
pub type Result<T, E = ConfigError> = core::result::Result<T, E>;
/// Type alias for contract name.
pub type ContractName = String;
/// Type alias for "network name" to be used in hash maps
pub type NetworkName = String;
/// Type alias for account name.
pub type AccountName = String;

/// A deployment that refers to something the config does not define.
///
/// Such deployments are accepted at load time; resolution reports them lazily, only for the
/// contracts that need them.
#[derive(Clone, Debug, PartialEq, Eq, Display)]
pub enum ConfigIssue {
    /// Deployment targets an undefined network.
    #[display("deployment of account '{account}' targets unknown network '{network}'")]
    UnknownNetwork {
        /// Network name
        network: NetworkName,
        /// Deploying account
        account: AccountName,
    },
    /// Deployment names an undefined account.
    #[display("deployment on network '{network}' names unknown account '{account}'")]
    UnknownAccount {
        /// Network name
        network: NetworkName,
        /// Deploying account
        account: AccountName,
    },
    /// Deployment lists a contract not defined for its network.
    #[display("account '{account}' deploys contract '{contract}', which is not defined for network '{network}'")]
    UnknownContract {
        /// Network name
        network: NetworkName,
        /// Deploying account
        account: AccountName,
        /// Contract name
        contract: ContractName,
    },
}

/// Top-level flint project configuration.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Absolute path to the file corresponding to this configuration.
    #[serde(skip_serializing, skip_deserializing)]
    pub config_path: PathBuf,
    /// Contract definitions.
    #[serde(default)]
    contracts: ContractCatalog,
    /// Accounts.
    #[serde(default)]
    accounts: AccountRegistry,
    /// Networks.
    #[serde(default)]
    networks: NetworkRegistry,
    /// Deployments.
    #[serde(default)]
    deployments: DeploymentIndex,
}

impl Config {
    /// Create an empty configuration for the project in directory `dir`.
    ///
    /// # Example
    ///
    /// ```
    /// use flint_config::{ChainId, Config, Network};
    /// use tempfile::tempdir;
    ///
    /// let dir = tempdir().unwrap();
    ///
    /// let mut cfg = Config::new(&dir).unwrap();
    /// cfg.networks_mut()
    ///     .add_or_update(Network::new("emulator", "127.0.0.1:3569", ChainId::Emulator));
    ///
    /// // Save config file to disk
    /// cfg.to_file(false).unwrap();
    ///
    /// // Load config from disk
    /// let cfg2 = Config::from_file(&cfg.config_path).unwrap();
    /// assert!(cfg2.networks().get_by_name("emulator").is_some());
    /// ```
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let actual_dir = fs::canonicalize(dir.as_ref()).map_err(|e| {
            ConfigError::FsError("Failed to canonicalize path", dir.as_ref().into(), e)
        })?;
        Ok(Config {
            config_path: actual_dir.join(DEFAULT_FILENAME),
            contracts: Default::default(),
            accounts: Default::default(),
            networks: Default::default(),
            deployments: Default::default(),
        })
    }

    /// Create configuration from the file named by `FLINT_CONFIG` if set, otherwise from the
    /// config file in the current directory or some parent directory.
    pub fn nearest() -> Result<Self> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            tracing::debug!("Using config file from {CONFIG_ENV_VAR}: {path}");
            return Config::from_file(path);
        }
        let cwd = env::current_dir().map_err(|e| {
            ConfigError::FsError("Failed to get current working directory", ".".into(), e)
        })?;
        Config::from_file(find_file(DEFAULT_FILENAME, cwd)?)
    }

    /// Create configuration from directory (really from [`DEFAULT_FILENAME`] file in the directory).
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Config::from_file(dir.as_ref().join(DEFAULT_FILENAME))
    }

    /// Create configuration from JSON file.
    ///
    /// This function serves as the deserializer to all the other loaders (namely [`Self::nearest`]
    /// and [`Self::from_dir`]).
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let contents = fs::read_to_string(config_path)
            .map_err(|e| ConfigError::FsError("Failed to read config file", config_path.into(), e))?;
        let mut cfg: Config = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::MalformedConfig(config_path.into(), e))?;
        cfg.config_path = fs::canonicalize(config_path).map_err(|e| {
            ConfigError::FsError("Failed to canonicalize path", config_path.into(), e)
        })?;
        tracing::debug!(
            "Loaded {} ({} contracts, {} accounts, {} networks, {} deployments)",
            cfg.config_path.display(),
            cfg.contracts.len(),
            cfg.accounts.len(),
            cfg.networks.len(),
            cfg.deployments.len()
        );
        Ok(cfg)
    }

    /// Save configuration to [`Self::config_path`].
    ///
    /// Overwriting an existing file requires passing `true` for `force`. Entries are written in
    /// insertion order and inline secrets are written as they are, so saving a freshly loaded
    /// config reproduces its contents.
    pub fn to_file(&self, force: bool) -> Result<()> {
        if !force && self.config_path.is_file() {
            return Err(ConfigError::PathError(
                "Config file already exists",
                self.config_path.clone(),
            ));
        }
        let pretty = secret::with_secrets_revealed(|| serde_json::to_string_pretty(self))
            .map_err(|e| ConfigError::MalformedConfig(self.config_path.clone(), e))?;
        fs::write(&self.config_path, pretty).map_err(|e| {
            ConfigError::FsError(
                "Failed to write config to file",
                self.config_path.clone(),
                e,
            )
        })?;
        tracing::debug!("Saved {}", self.config_path.display());
        Ok(())
    }

    /// Get the top-level project directory
    pub fn project_dir(&self) -> PathBuf {
        self.config_path
            .parent()
            .or_bug("Config path is always a file inside the project directory")
            .to_path_buf()
    }

    /// Given a relative path, return absolute path prefixed by project root; otherwise return the
    /// absolute path.
    pub fn absolute_path_in_project(&self, path: impl AsRef<Path>) -> PathBuf {
        if path.as_ref().is_absolute() {
            path.as_ref().to_path_buf().clean()
        } else {
            self.project_dir().join(path).clean()
        }
    }

    /// Contract definitions.
    pub fn contracts(&self) -> &ContractCatalog {
        &self.contracts
    }

    /// Mutable contract definitions.
    pub fn contracts_mut(&mut self) -> &mut ContractCatalog {
        &mut self.contracts
    }

    /// Accounts.
    pub fn accounts(&self) -> &AccountRegistry {
        &self.accounts
    }

    /// Mutable accounts.
    pub fn accounts_mut(&mut self) -> &mut AccountRegistry {
        &mut self.accounts
    }

    /// Networks.
    pub fn networks(&self) -> &NetworkRegistry {
        &self.networks
    }

    /// Mutable networks.
    pub fn networks_mut(&mut self) -> &mut NetworkRegistry {
        &mut self.networks
    }

    /// Deployments.
    pub fn deployments(&self) -> &DeploymentIndex {
        &self.deployments
    }

    /// Mutable deployments.
    pub fn deployments_mut(&mut self) -> &mut DeploymentIndex {
        &mut self.deployments
    }

    /// Resolver over this configuration.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::from(self)
    }

    /// Report deployments referring to undefined networks, accounts, or contracts, in
    /// deployment order.
    pub fn check(&self) -> Vec<ConfigIssue> {
        let mut issues = vec![];
        for d in self.deployments.iter() {
            if self.networks.get_by_name(&d.network).is_none() {
                issues.push(ConfigIssue::UnknownNetwork {
                    network: d.network.clone(),
                    account: d.account.clone(),
                });
            }
            if self.accounts.get_by_name(&d.account).is_none() {
                issues.push(ConfigIssue::UnknownAccount {
                    network: d.network.clone(),
                    account: d.account.clone(),
                });
            }
            for name in d.contracts() {
                if self
                    .contracts
                    .get_by_name_and_network(name, &d.network)
                    .is_none()
                {
                    issues.push(ConfigIssue::UnknownContract {
                        network: d.network.clone(),
                        account: d.account.clone(),
                        contract: name.clone(),
                    });
                }
            }
        }
        issues
    }
}

/// Contract files are read relative to the project directory.
impl ReadSource for Config {
    fn read_source(&self, location: &Path) -> io::Result<Vec<u8>> {
        fs::read(self.absolute_path_in_project(location))
    }
}

/// Find file starting from directory.
///
/// # Arguments
///
/// * `file` - Config filename
/// * `dir`  - Starting directory
///
/// # Errors
///
/// Fails with [`ConfigError::FileNotFound`] if we cannot find the file.
fn find_file(file: impl AsRef<Path>, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let mut path: PathBuf = PathBuf::from(dir.as_ref());

    loop {
        let candidate = path.join(file.as_ref());
        if candidate.is_file() {
            break Ok(candidate);
        }
        if !path.pop() {
            break Err(ConfigError::FileNotFound);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn should_find_file() {
        let tmp = tempdir().unwrap();
        let file_path = tmp.path().join("a.foo");

        fs::write(&file_path, "{}").unwrap();
        let found_file = find_file("a.foo", &tmp).unwrap();
        assert_eq!(found_file, file_path);
    }

    #[test]
    fn should_find_file_in_parent() {
        let tmp = tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join(DEFAULT_FILENAME), "{}").unwrap();
        let found_file = find_file(DEFAULT_FILENAME, &nested).unwrap();
        assert_eq!(found_file, tmp.path().join(DEFAULT_FILENAME));
    }

    #[test]
    fn should_not_find_file() {
        let tmp = tempdir().unwrap();

        match find_file("a.foo", &tmp) {
            Err(ConfigError::FileNotFound) => {}
            _ => panic!("Found file that should not exist"),
        };
    }

    #[test]
    fn test_defaults() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join(DEFAULT_FILENAME), "{}").unwrap();

        let cfg = Config::from_dir(&tmp).unwrap();
        assert!(cfg.contracts().is_empty());
        assert!(cfg.accounts().is_empty());
        assert!(cfg.networks().is_empty());
        assert!(cfg.deployments().is_empty());
        assert_eq!(
            fs::canonicalize(tmp.path()).unwrap(),
            cfg.project_dir()
        );
        assert!(cfg.check().is_empty());
    }

    #[test]
    fn test_deny_unknown_fields() {
        let tmp = tempdir().unwrap();
        fs::write(
            tmp.path().join(DEFAULT_FILENAME),
            r#" { "contracts": [], "emulators": [] } "#,
        )
        .unwrap();

        match Config::from_dir(&tmp) {
            Err(ConfigError::MalformedConfig(..)) => {}
            other => panic!("Should have failed to parse, got {other:?}"),
        }
    }

    #[test]
    fn test_fail_on_bogus_dir() {
        let tmp = tempdir().unwrap();
        match Config::new(tmp.path().join("does-not-exist")) {
            Err(ConfigError::FsError(..)) => {}
            other => panic!("Should have failed, got {other:?}"),
        }
    }

    #[test]
    fn to_file_refuses_to_overwrite() {
        let tmp = tempdir().unwrap();
        let cfg = Config::new(&tmp).unwrap();
        cfg.to_file(false).unwrap();
        match cfg.to_file(false) {
            Err(ConfigError::PathError(_, path)) => assert_eq!(cfg.config_path, path),
            other => panic!("Expected PathError, got {other:?}"),
        }
        cfg.to_file(true).unwrap();
    }

    #[test]
    fn save_and_reload_keeps_order() {
        let tmp = tempdir().unwrap();
        let mut cfg = Config::new(&tmp).unwrap();
        cfg.contracts_mut()
            .add_or_update(Contract::new("B", "./b.cdc", "emulator"));
        cfg.contracts_mut()
            .add_or_update(Contract::new("A", "0x01", "testnet"));
        cfg.deployments_mut()
            .add_or_update(Deployment::new("emulator", "alice", ["B"]));
        cfg.to_file(false).unwrap();

        let loaded = Config::from_file(&cfg.config_path).unwrap();
        let names: Vec<_> = loaded.contracts().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(vec!["B", "A"], names);
        assert_eq!(
            Some(Address::new([0, 0, 0, 0, 0, 0, 0, 1])),
            loaded
                .contracts()
                .get_by_name_and_network("A", "testnet")
                .unwrap()
                .source
                .alias()
        );
        assert_eq!(1, loaded.deployments().len());
    }

    #[test]
    fn save_and_reload_keeps_inline_secrets() {
        use secrecy::ExposeSecret;
        const KEY: &str = "dd72967fd2bd75234ae9037dd4694c1f00baad63a10c35172bf65fbb8ad74b47";

        let tmp = tempdir().unwrap();
        let mut cfg = Config::new(&tmp).unwrap();
        let mut account = Account::new(
            "emulator-account",
            "f8d6e0586b0a20c1".parse().unwrap(),
            ChainId::Emulator,
        );
        account.keys.push(AccountKey::new(secret::Secret::plain_text(KEY).unwrap()));
        cfg.accounts_mut().add_or_update(account).unwrap();
        cfg.networks_mut().add_or_update(Network::new(
            "testnet",
            "access.devnet.example.org:9000/${{text.t0ken}}",
            ChainId::Testnet,
        ));
        cfg.to_file(false).unwrap();

        let written = fs::read_to_string(&cfg.config_path).unwrap();
        assert!(!written.contains(secret::FLINT_REDACTED), "{written}");

        let loaded = Config::from_file(&cfg.config_path).unwrap();
        let key = &loaded.accounts().get_by_name("emulator-account").unwrap().keys[0];
        assert_eq!(KEY, key.private_key.load().unwrap().expose_secret());
        let host = &loaded.networks().get_by_name("testnet").unwrap().host;
        assert_eq!(
            "access.devnet.example.org:9000/t0ken",
            host.load().unwrap().expose_secret()
        );
    }

    #[test]
    fn check_reports_dangling_references() {
        let cfg: Config = serde_json::from_value(serde_json::json!({
            "contracts": [{ "name": "A", "source": "./a.cdc", "network": "emulator" }],
            "accounts": [{ "name": "alice", "address": "01", "chain_id": "flow-emulator" }],
            "networks": [{ "name": "emulator", "host": "127.0.0.1:3569", "chain_id": "flow-emulator" }],
            "deployments": [
                { "network": "emulator", "account": "alice", "contracts": ["A", "B"] },
                { "network": "testnet", "account": "bob", "contracts": [] }
            ]
        }))
        .unwrap();
        assert_eq!(
            vec![
                ConfigIssue::UnknownContract {
                    network: "emulator".into(),
                    account: "alice".into(),
                    contract: "B".into(),
                },
                ConfigIssue::UnknownNetwork {
                    network: "testnet".into(),
                    account: "bob".into(),
                },
                ConfigIssue::UnknownAccount {
                    network: "testnet".into(),
                    account: "bob".into(),
                },
            ],
            cfg.check()
        );
        assert_eq!(
            "account 'alice' deploys contract 'B', which is not defined for network 'emulator'",
            cfg.check()[0].to_string()
        );
    }

    #[test]
    fn reads_sources_relative_to_project() {
        let tmp = tempdir().unwrap();
        fs::create_dir(tmp.path().join("contracts")).unwrap();
        fs::write(tmp.path().join("contracts").join("A.cdc"), "access(all) contract A {}").unwrap();
        let cfg = Config::new(&tmp).unwrap();
        assert_eq!(
            b"access(all) contract A {}".to_vec(),
            cfg.read_source(Path::new("./contracts/A.cdc")).unwrap()
        );
        assert_eq!(
            io::ErrorKind::NotFound,
            cfg.read_source(Path::new("missing.cdc")).unwrap_err().kind()
        );
    }
}
