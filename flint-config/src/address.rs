use std::fmt::{self, Display};
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ConfigError;

/// Number of bytes in an account address.
pub const ADDRESS_LENGTH: usize = 8;

/// A fixed-width account address.
///
/// Addresses are parsed leniently: an optional `0x`/`0X` prefix is stripped, hex digits may be
/// upper or lower case, and short values are left-padded with zeros. Two strings denote the same
/// address iff they parse to the same bytes.
///
/// ```
/// # use flint_config::Address;
/// let a: Address = "0xF8D6E0586B0A20C1".parse().unwrap();
/// let b: Address = "f8d6e0586b0a20c1".parse().unwrap();
/// assert_eq!(a, b);
/// assert_eq!("f8d6e0586b0a20c1", a.to_string());
/// assert_eq!("0xf8d6e0586b0a20c1", format!("{a:#}"));
///
/// let short: Address = "0x123123123".parse().unwrap();
/// assert_eq!("0000000123123123", short.to_string());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Create address from raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Address(bytes)
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Returns whether `s` starts with a `0x` or `0X` prefix.
    pub(crate) fn has_hex_prefix(s: &str) -> bool {
        s.starts_with("0x") || s.starts_with("0X")
    }
}

impl FromStr for Address {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidAddress(s.to_owned());
        let digits = if Address::has_hex_prefix(s) {
            &s[2..]
        } else {
            s
        };
        if digits.is_empty()
            || digits.len() > 2 * ADDRESS_LENGTH
            || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(invalid());
        }
        let padded = format!("{:0>width$}", digits, width = 2 * ADDRESS_LENGTH);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(padded, &mut bytes).map_err(|_| invalid())?;
        Ok(Address(bytes))
    }
}

impl TryFrom<&str> for Address {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self:#})")
    }
}

/// Always written with the "0x" prefix, the same form aliased contract sources use.
impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{self:#}"))
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Same as for `String`
impl JsonSchema for Address {
    fn schema_name() -> String {
        "Address".into()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <String as JsonSchema>::json_schema(gen)
    }
}
