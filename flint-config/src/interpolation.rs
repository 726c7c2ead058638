use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use schemars::JsonSchema;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{
    secret::{secrets_revealed, SecretKind, FLINT_REDACTED},
    util::OrBug,
    Result,
};

#[derive(Clone, Debug)]
enum Part {
    Secret(SecretKind),
    Public(String),
}

impl Part {
    fn load(&self) -> Result<SecretString> {
        match self {
            Self::Secret(s) => s.load(),
            Self::Public(p) => Ok(p.clone().into()),
        }
    }

    fn render(&self, reveal: bool) -> String {
        match self {
            Part::Public(v) => v.clone(),
            Part::Secret(SecretKind::EnvVar { env }) => format!("${{{{env.{env}}}}}"),
            Part::Secret(SecretKind::File { file }) => format!("${{{{file.{}}}}}", file.display()),
            Part::Secret(SecretKind::PlainText { secret }) if reveal => {
                format!("${{{{text.{}}}}}", secret.expose_secret())
            }
            Part::Secret(SecretKind::PlainText { .. }) => {
                format!("${{{{text.{FLINT_REDACTED}}}}}")
            }
        }
    }
}

/// A string that may embed secrets.
///
/// Substrings matching `${{<KIND>.<VALUE>}}` are replaced on [`Self::load`]:
/// - `env`: `<VALUE>` names an environment variable (`.env` files are honored),
/// - `file`: `<VALUE>` names a file whose contents are the secret,
/// - `text`: `<VALUE>` is the secret itself.
///
/// Everything else is public text. Displaying an interpolation never reveals `text` secrets;
/// serializing reveals them only while the config file is being written.
///
/// ```
/// # use flint_config::Interpolation;
/// # use secrecy::ExposeSecret;
/// std::env::set_var("ACCESS_TOKEN_DOC", "t0ken");
/// let host: Interpolation = "access.example.org:9000/${{ env.ACCESS_TOKEN_DOC }}".parse().unwrap();
/// assert_eq!("access.example.org:9000/${{env.ACCESS_TOKEN_DOC}}", host.to_string());
/// assert_eq!("access.example.org:9000/t0ken", host.load().unwrap().expose_secret());
/// ```
#[derive(Clone)]
pub struct Interpolation {
    parts: Vec<Part>,
}

impl Interpolation {
    fn render(&self, reveal: bool) -> String {
        self.parts.iter().map(|p| p.render(reveal)).collect()
    }

    /// Load all secret values, concatenate all parts, and return the final value.
    pub fn load(&self) -> Result<SecretString> {
        let mut result = String::new();
        for part in &self.parts {
            result.push_str(part.load()?.expose_secret());
        }
        Ok(result.into())
    }

    /// Whether any part of this string is a secret.
    pub fn has_secrets(&self) -> bool {
        self.parts.iter().any(|p| matches!(p, Part::Secret(_)))
    }
}

/// Regex for matching interpolation substrings
pub const REGEX_STR: &str = r#"\$\{\{\s*(?P<kind>env|file|text)\.(?P<value>.*?)\s*\}\}"#;
lazy_static! {
    static ref REGEX: Regex = Regex::new(REGEX_STR).or_bug("interpolation regex is valid");
}

impl FromStr for Interpolation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = vec![];
        let mut last_idx: usize = 0;
        for c in REGEX.captures_iter(s) {
            let m = c.get(0).or_bug("capture 0 is the whole match");
            if m.start() > last_idx {
                parts.push(Part::Public(s[last_idx..m.start()].to_string()));
            }
            let val = c.name("value").or_bug("regex has a 'value' group").as_str();
            let kind = match c.name("kind").or_bug("regex has a 'kind' group").as_str() {
                "env" => SecretKind::EnvVar { env: val.into() },
                "file" => SecretKind::File { file: val.into() },
                "text" => SecretKind::PlainText {
                    secret: val.to_string().into(),
                },
                x => unreachable!("ensured by the regex above: {x:?}"),
            };
            parts.push(Part::Secret(kind));
            last_idx = m.end();
        }
        if s.len() > last_idx {
            parts.push(Part::Public(s[last_idx..].to_string()));
        }
        Ok(Self { parts })
    }
}

impl From<&str> for Interpolation {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(i) => i,
            Err(never) => match never {},
        }
    }
}

impl Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

impl Debug for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl PartialEq for Interpolation {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

/// Same as for `String`
impl JsonSchema for Interpolation {
    fn schema_name() -> String {
        <String as JsonSchema>::schema_name()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <String as JsonSchema>::json_schema(gen)
    }
}

impl<'de> Deserialize<'de> for Interpolation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        Ok(Interpolation::from(string.as_str()))
    }
}

impl Serialize for Interpolation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.render(secrets_revealed()))
    }
}
