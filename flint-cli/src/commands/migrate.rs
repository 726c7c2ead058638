use eyre::{eyre, Result};
use flint_config::{Address, Config};
use itertools::Itertools;
use serde::Serialize;

use crate::commands::resolve::{resolve_bindings, ResolvedContract};
use crate::stylist;

/// What staging contracts on a network would submit to its staging contract.
#[derive(Debug, Serialize)]
pub struct StagingPlan {
    pub network: String,
    /// "0x"-prefixed address of the staging contract
    pub staging_address: String,
    /// Contracts with code to stage, in order
    pub contracts: Vec<ResolvedContract>,
    /// Aliased contracts, which have no local code
    pub skipped: Vec<String>,
}

/// Build the staging plan for `names` on `network`.
///
/// Fails if the network is not defined or has no staging contract, or if any contract fails to
/// resolve.
pub fn plan(cfg: &Config, network: &str, names: &[String]) -> Result<StagingPlan> {
    let net = cfg
        .networks()
        .get_by_name(network)
        .ok_or_else(|| eyre!("Network '{network}' is not defined"))?;
    let staging: Address = net
        .staging_address
        .ok_or_else(|| eyre!("Network '{network}' has no staging contract (set staging_address)"))?;

    let (aliases, staged): (Vec<_>, Vec<_>) = resolve_bindings(cfg, network, names)?
        .into_iter()
        .partition(|b| b.is_alias());
    for alias in &aliases {
        tracing::debug!("Skipping aliased contract {}", alias.name);
    }
    Ok(StagingPlan {
        network: network.to_string(),
        staging_address: format!("{staging:#}"),
        contracts: staged.iter().map(ResolvedContract::from).collect(),
        skipped: aliases.into_iter().map(|b| b.name).collect(),
    })
}

/// Command that prints the staging plan.
pub fn print_plan(cfg: &Config, network: &str, names: &[String], json: bool) -> Result<()> {
    let plan = plan(cfg, network, names)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }
    println!(
        "Staging on {} via {}",
        stylist::network(&plan.network),
        stylist::address(&plan.staging_address)
    );
    for (i, c) in plan.contracts.iter().enumerate() {
        println!(
            "{:3}. {} {} ({} bytes)",
            i + 1,
            stylist::name(&c.name),
            stylist::address(&c.address),
            c.code_size.unwrap_or_default()
        );
    }
    if !plan.skipped.is_empty() {
        println!(
            "{} aliased contracts: {}",
            stylist::warning("skipping"),
            plan.skipped.iter().join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flint_config::{Account, ChainId, Contract, Deployment, Network};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn config(dir: &std::path::Path, staging: Option<&str>) -> Config {
        fs::write(dir.join("A.cdc"), "access(all) contract A {}").unwrap();
        let mut cfg = Config::new(dir).unwrap();
        cfg.networks_mut().add_or_update(Network {
            staging_address: staging.map(|s| s.parse().unwrap()),
            ..Network::new("testnet", "access.devnet.nodes.onflow.org:9000", ChainId::Testnet)
        });
        cfg.accounts_mut()
            .add_or_update(Account::new(
                "deployer",
                "2c1162386b0a245f".parse().unwrap(),
                ChainId::Testnet,
            ))
            .unwrap();
        cfg.contracts_mut()
            .add_or_update(Contract::new("A", "./A.cdc", "testnet"));
        cfg.contracts_mut()
            .add_or_update(Contract::new("FungibleToken", "0x9a0766d93b6608b7", "testnet"));
        cfg.deployments_mut()
            .add_or_update(Deployment::new("testnet", "deployer", ["A"]));
        cfg
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn plan_stages_code_and_skips_aliases() {
        let tmp = tempdir().unwrap();
        let cfg = config(tmp.path(), Some("0x2ceae959ed1a7e7a"));
        let plan = plan(&cfg, "testnet", &names(&["FungibleToken", "A"])).unwrap();
        assert_eq!("0x2ceae959ed1a7e7a", plan.staging_address);
        assert_eq!(1, plan.contracts.len());
        assert_eq!("A", plan.contracts[0].name);
        assert_eq!("0x2c1162386b0a245f", plan.contracts[0].address);
        assert_eq!(vec!["FungibleToken"], plan.skipped);
    }

    #[test]
    fn plan_needs_staging_contract() {
        let tmp = tempdir().unwrap();
        let cfg = config(tmp.path(), None);
        let err = plan(&cfg, "testnet", &names(&["A"])).unwrap_err();
        assert!(err.to_string().contains("has no staging contract"), "{err}");
        let err = plan(&cfg, "mainnet", &names(&["A"])).unwrap_err();
        assert!(err.to_string().contains("is not defined"), "{err}");
    }
}
