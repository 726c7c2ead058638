use eyre::{Result, WrapErr};
use flint_config::{Binding, Config};
use serde::Serialize;

use crate::stylist;

/// Printable summary of a [`Binding`] (the code itself is never printed).
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ResolvedContract {
    pub name: String,
    /// "0x"-prefixed address
    pub address: String,
    pub alias: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_size: Option<usize>,
}

impl From<&Binding> for ResolvedContract {
    fn from(binding: &Binding) -> Self {
        ResolvedContract {
            name: binding.name.clone(),
            address: format!("{:#}", binding.address),
            alias: binding.is_alias(),
            code_size: binding.code.as_ref().map(Vec::len),
        }
    }
}

/// Resolve `names` on `network`, reading contract code relative to the project directory.
pub fn resolve_bindings(cfg: &Config, network: &str, names: &[String]) -> Result<Vec<Binding>> {
    cfg.resolver()
        .resolve_many(names, network, cfg)
        .wrap_err_with(|| format!("Could not resolve contracts on network '{network}'"))
}

/// Command that resolves contracts and prints where they live.
pub fn resolve(cfg: &Config, network: &str, names: &[String], json: bool) -> Result<()> {
    let resolved: Vec<ResolvedContract> = resolve_bindings(cfg, network, names)?
        .iter()
        .map(ResolvedContract::from)
        .collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }
    for r in resolved {
        let what = match r.code_size {
            Some(size) => format!("{size} bytes"),
            None => "alias".into(),
        };
        println!(
            "{} {} {} ({what})",
            stylist::name(&r.name),
            stylist::network(network),
            stylist::address(&r.address),
        );
    }
    Ok(())
}
