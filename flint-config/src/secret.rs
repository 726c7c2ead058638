use std::{cell::Cell, fmt::Debug, marker::PhantomData, path::PathBuf};

use schemars::JsonSchema;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

use crate::{ConfigError, Result};

/// Different ways to provide a secret value
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
#[serde(deny_unknown_fields)]
pub(crate) enum SecretKind {
    /// Secret value is the value of an environment variable.
    /// If found, .env file is automatically loaded.
    EnvVar {
        /// Name of the environment variable
        env: String,
    },
    /// Secret value is the contents of a file (surrounding whitespace is trimmed).
    /// Relative paths are resolved against the current working directory.
    File {
        /// File path
        file: PathBuf,
    },
    /// Secret saved as plain text
    PlainText {
        /// The secret value
        #[serde(serialize_with = "ser_secret", deserialize_with = "de_secret")]
        #[schemars(with = "String")]
        secret: SecretString,
    },
}

/// Marker for redacted text
pub(crate) const FLINT_REDACTED: &str = "***FLINT REDACTED SECRET***";

thread_local! {
    static REVEAL_SECRETS: Cell<bool> = const { Cell::new(false) };
}

/// Run `f` with plain-text secrets serialized verbatim instead of redacted.
///
/// Only the config file writer needs this; any other serialization (e.g., JSON command output)
/// keeps redacting.
pub(crate) fn with_secrets_revealed<R>(f: impl FnOnce() -> R) -> R {
    struct Restore(bool);
    impl Drop for Restore {
        fn drop(&mut self) {
            REVEAL_SECRETS.with(|r| r.set(self.0));
        }
    }
    let _restore = Restore(REVEAL_SECRETS.with(|r| r.replace(true)));
    f()
}

/// Whether plain-text secrets are currently serialized verbatim.
pub(crate) fn secrets_revealed() -> bool {
    REVEAL_SECRETS.with(Cell::get)
}

fn de_secret<'a, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'a>,
{
    let s = String::deserialize(deserializer)?;
    Ok(SecretString::new(s))
}

fn ser_secret<S>(key: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if secrets_revealed() {
        serializer.serialize_str(key.expose_secret())
    } else {
        serializer.serialize_str(FLINT_REDACTED)
    }
}

impl SecretKind {
    /// Loads and returns secret value
    pub fn load(&self) -> Result<SecretString> {
        let sec = match self {
            Self::PlainText { secret } => secret.clone(),
            Self::EnvVar { env } => dotenv::var(env)
                .map_err(|e| ConfigError::SecretReadFromEnv(env.clone(), e))?
                .into(),
            Self::File { file } => std::fs::read_to_string(file)
                .map_err(|e| ConfigError::SecretReadFromFile(file.clone(), e))?
                .trim()
                .to_owned()
                .into(),
        };
        Ok(sec)
    }
}

/// An extension point used to validate different types of secrets
pub trait ValidateSecret<T> {
    /// Returns `None` if `val` is a valid secret of type `T`, or `Some(reason)` otherwise.
    fn validate(val: &str) -> Option<String>;
}

/// A reference to a secret value (environment variable, file, or inline text), optionally
/// validated as a `T` whenever the value can be loaded.
#[derive(Clone, Debug, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Secret<T = String>
where
    T: ValidateSecret<T>,
{
    #[serde(flatten)]
    pub(crate) inner: SecretKind,
    #[serde(skip)]
    phantom: PhantomData<T>,
}

impl<T: ValidateSecret<T>> Secret<T> {
    fn new(inner: SecretKind) -> Self {
        Self {
            inner,
            phantom: Default::default(),
        }
    }

    /// Secret read from environment variable `name`.
    pub fn env(name: impl Into<String>) -> Self {
        Self::new(SecretKind::EnvVar { env: name.into() })
    }

    /// Secret read from `file`.
    pub fn file(file: impl Into<PathBuf>) -> Self {
        Self::new(SecretKind::File { file: file.into() })
    }

    /// Inline secret; fails if the value is not a valid `T`.
    pub fn plain_text(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        match T::validate(&value) {
            None => Ok(Self::new(value.into())),
            Some(reason) => Err(ConfigError::InvalidSecret(reason)),
        }
    }

    /// Loads and returns secret value
    pub fn load(&self) -> Result<SecretString> {
        self.inner.load()
    }

    /// Human-readable description of where the secret comes from (never the value itself).
    pub fn describe(&self) -> String {
        match &self.inner {
            SecretKind::EnvVar { env } => format!("env:{env}"),
            SecretKind::File { file } => format!("file:{}", file.display()),
            SecretKind::PlainText { .. } => "inline".into(),
        }
    }
}

pub(crate) const INVALID_PRIVATE_KEY_HEX_ERR: &str =
    "Invalid private key; expected hex string without leading '0x'";
pub(crate) const INVALID_PRIVATE_KEY_LEN_ERR: &str = "Invalid private key length";

/// Length of a raw private key, in bytes.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Marker type for hex-encoded account private keys.
#[derive(Clone, Copy, Debug)]
pub struct PrivateKeyHex;

// ==================== ValidateSecret impls ====================

impl ValidateSecret<String> for String {
    fn validate(_val: &str) -> Option<String> {
        None
    }
}

impl ValidateSecret<PrivateKeyHex> for PrivateKeyHex {
    fn validate(val: &str) -> Option<String> {
        match hex::decode(val) {
            Ok(bytes) if bytes.len() == PRIVATE_KEY_LENGTH => None,
            Ok(bytes) => Some(format!(
                "{INVALID_PRIVATE_KEY_LEN_ERR}: expected {PRIVATE_KEY_LENGTH} bytes, got {}",
                bytes.len()
            )),
            Err(e) => Some(format!("{INVALID_PRIVATE_KEY_HEX_ERR}: {e}")),
        }
    }
}

// ==================== serde Deserialize impl ====================

impl<'de, T: ValidateSecret<T>> Deserialize<'de> for Secret<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner: SecretKind = SecretKind::deserialize(deserializer)?;
        match inner.load() {
            Ok(val) => match T::validate(val.expose_secret()) {
                None => Ok(Secret::new(inner)),
                Some(e) => Err(Error::custom(e)),
            },
            // don't fail eagerly if not set at all (maybe this secret won't be needed)
            Err(_) => Ok(Secret::new(inner)),
        }
    }
}

// =================== schemars JsonSchema impl ==================

impl<T: ValidateSecret<T>> JsonSchema for Secret<T> {
    fn schema_name() -> String {
        <SecretKind as JsonSchema>::schema_name()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <SecretKind as JsonSchema>::json_schema(gen)
    }
}

// ==================== From conversions impls ====================

impl From<String> for SecretKind {
    fn from(s: String) -> Self {
        SecretKind::PlainText {
            secret: SecretString::new(s),
        }
    }
}

impl From<String> for Secret<String> {
    fn from(s: String) -> Self {
        Secret::new(s.into())
    }
}

// ==================== unit tests ====================
