use std::collections::HashMap;

use parse_display::{Display, FromStr};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::secret::{PrivateKeyHex, Secret};
use crate::{AccountName, Address, ChainId, ConfigError, Result};

/// Signature algorithm of an account key.
#[derive(
    Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize, Serialize, JsonSchema, Display, FromStr,
)]
#[derive(clap::ValueEnum)]
pub enum SigAlgo {
    /// ECDSA over the NIST P-256 curve
    #[default]
    #[serde(rename = "ECDSA_P256")]
    #[display("ECDSA_P256")]
    #[value(name = "ECDSA_P256")]
    EcdsaP256,
    /// ECDSA over the secp256k1 curve
    #[serde(rename = "ECDSA_secp256k1")]
    #[display("ECDSA_secp256k1")]
    #[value(name = "ECDSA_secp256k1")]
    EcdsaSecp256k1,
}

/// Hash algorithm of an account key.
#[derive(
    Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize, Serialize, JsonSchema, Display, FromStr,
)]
#[derive(clap::ValueEnum)]
pub enum HashAlgo {
    /// SHA3-256
    #[default]
    #[serde(rename = "SHA3_256")]
    #[display("SHA3_256")]
    #[value(name = "SHA3_256")]
    Sha3_256,
    /// SHA2-256
    #[serde(rename = "SHA2_256")]
    #[display("SHA2_256")]
    #[value(name = "SHA2_256")]
    Sha2_256,
}

/// A signing key attached to an account. Opaque to resolution.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AccountKey {
    /// Key index on the account
    #[serde(default)]
    pub index: u32,
    /// Signature algorithm
    #[serde(default)]
    pub sig_algo: SigAlgo,
    /// Hash algorithm
    #[serde(default)]
    pub hash_algo: HashAlgo,
    /// Hex-encoded private key (without leading "0x")
    pub private_key: Secret<PrivateKeyHex>,
}

impl AccountKey {
    /// Key with index 0 and default algorithms.
    pub fn new(private_key: Secret<PrivateKeyHex>) -> Self {
        AccountKey {
            index: 0,
            sig_algo: Default::default(),
            hash_algo: Default::default(),
            private_key,
        }
    }
}

/// A named on-chain account.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Account {
    /// Unique account name
    pub name: AccountName,
    /// Unique account address
    pub address: Address,
    /// Chain family the address was minted for
    pub chain_id: ChainId,
    /// Signing keys, in order
    #[serde(default)]
    pub keys: Vec<AccountKey>,
}

impl Account {
    /// Create an account without keys.
    pub fn new(name: impl Into<AccountName>, address: Address, chain_id: ChainId) -> Self {
        Account {
            name: name.into(),
            address,
            chain_id,
            keys: vec![],
        }
    }
}

/// All accounts of a project. Names and addresses are both unique.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(try_from = "Vec<Account>", into = "Vec<Account>")]
pub struct AccountRegistry {
    entries: Vec<Account>,
    by_name: HashMap<AccountName, usize>,
    by_address: HashMap<Address, usize>,
}

impl AccountRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Default::default()
    }

    /// The account named `name`.
    pub fn get_by_name(&self, name: &str) -> Option<&Account> {
        self.by_name.get(name).map(|&idx| &self.entries[idx])
    }

    /// The account whose address is `address`. The `0x` prefix is optional and hex digits are
    /// case-insensitive; a string that is not an address at all is simply not found.
    pub fn get_by_address(&self, address: &str) -> Option<&Account> {
        let address: Address = address.parse().ok()?;
        self.by_address.get(&address).map(|&idx| &self.entries[idx])
    }

    /// Insert `account`, replacing the account with the same name (if any).
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::DuplicateAccountAddress`] if a differently named account already
    /// uses the same address; the registry is left unchanged.
    pub fn add_or_update(&mut self, account: Account) -> Result<()> {
        if let Some(&idx) = self.by_address.get(&account.address) {
            let owner = &self.entries[idx];
            if owner.name != account.name {
                return Err(ConfigError::DuplicateAccountAddress(
                    account.address,
                    owner.name.clone(),
                    account.name,
                ));
            }
        }
        match self.by_name.get(&account.name).copied() {
            Some(idx) => {
                self.by_address.remove(&self.entries[idx].address);
                self.by_address.insert(account.address, idx);
                self.entries[idx] = account;
            }
            None => {
                let idx = self.entries.len();
                self.by_name.insert(account.name.clone(), idx);
                self.by_address.insert(account.address, idx);
                self.entries.push(account);
            }
        }
        Ok(())
    }

    /// Iterate over all accounts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.entries.iter()
    }

    /// Number of accounts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no accounts.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<Account>> for AccountRegistry {
    type Error = ConfigError;

    fn try_from(accounts: Vec<Account>) -> Result<Self> {
        let mut registry = AccountRegistry::new();
        for account in accounts {
            if registry.get_by_name(&account.name).is_some() {
                return Err(ConfigError::DuplicateAccountName(account.name));
            }
            registry.add_or_update(account)?;
        }
        Ok(registry)
    }
}

impl From<AccountRegistry> for Vec<Account> {
    fn from(registry: AccountRegistry) -> Self {
        registry.entries
    }
}

impl JsonSchema for AccountRegistry {
    fn schema_name() -> String {
        "AccountRegistry".into()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <Vec<Account> as JsonSchema>::json_schema(gen)
    }
}
