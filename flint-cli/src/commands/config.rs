use console::style;
use eyre::{eyre, Result, WrapErr};
use flint_config::secret::{PrivateKeyHex, Secret};
use flint_config::{Account, AccountKey, Config, Contract, Deployment, Network};
use thiserror::Error;

use crate::cli::{AddAccountArgs, AddDeploymentArgs};
use crate::commands::prompt;
use crate::stylist;

/// Errors raised when `config add deployment` gets only some of its options.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeploymentArgsError {
    #[error("network name must be provided")]
    MissingNetwork,
    #[error("account name must be provided")]
    MissingAccount,
    #[error("at least one contract name must be provided")]
    MissingContracts,
}

/// Turn `config add deployment` options into a deployment.
///
/// Returns `Ok(None)` when no option was given at all (the caller should prompt instead).
pub fn deployment_from_args(
    args: &AddDeploymentArgs,
) -> Result<Option<Deployment>, DeploymentArgsError> {
    if args.network.is_none() && args.account.is_none() && args.contracts.is_empty() {
        return Ok(None);
    }
    let network = args
        .network
        .as_ref()
        .ok_or(DeploymentArgsError::MissingNetwork)?;
    let account = args
        .account
        .as_ref()
        .ok_or(DeploymentArgsError::MissingAccount)?;
    if args.contracts.is_empty() {
        return Err(DeploymentArgsError::MissingContracts);
    }
    Ok(Some(Deployment::new(
        network.as_str(),
        account.as_str(),
        args.contracts.iter().map(String::as_str),
    )))
}

fn save(cfg: &Config) -> Result<()> {
    cfg.to_file(true)
        .wrap_err_with(|| format!("Failed to save config to {}", cfg.config_path.display()))
}

fn added(what: &str, name: &str) {
    println!(
        "{} {what} {}",
        style("Added").bold().green(),
        stylist::name(name)
    );
}

/// Add or update a contract definition.
pub fn add_contract(mut cfg: Config, name: &str, source: &str, network: &str) -> Result<()> {
    cfg.contracts_mut()
        .add_or_update(Contract::new(name, source, network));
    save(&cfg)?;
    added("contract", name);
    Ok(())
}

/// Add or update an account.
pub fn add_account(mut cfg: Config, args: &AddAccountArgs) -> Result<()> {
    let mut account = Account::new(args.name.as_str(), args.address, args.chain_id);
    let private_key: Option<Secret<PrivateKeyHex>> =
        match (&args.key_env, &args.key_file, &args.private_key) {
            (Some(env), _, _) => Some(Secret::env(env)),
            (_, Some(file), _) => Some(Secret::file(file)),
            (_, _, Some(hex)) => {
                Some(Secret::plain_text(hex.as_str()).wrap_err("Invalid account private key")?)
            }
            _ => None,
        };
    if let Some(private_key) = private_key {
        account.keys.push(AccountKey {
            index: args.key_index,
            sig_algo: args.sig_algo,
            hash_algo: args.hash_algo,
            private_key,
        });
    }
    cfg.accounts_mut()
        .add_or_update(account)
        .wrap_err("Could not add account")?;
    save(&cfg)?;
    added("account", &args.name);
    Ok(())
}

/// Add or update a network.
pub fn add_network(mut cfg: Config, network: Network) -> Result<()> {
    let name = network.name.clone();
    cfg.networks_mut().add_or_update(network);
    save(&cfg)?;
    added("network", &name);
    Ok(())
}

/// Add a deployment, or replace the contracts of the existing deployment with the same account
/// and network. Prompts for everything when `args` is empty.
pub fn add_deployment(mut cfg: Config, args: &AddDeploymentArgs) -> Result<()> {
    let deployment = match deployment_from_args(args)? {
        Some(deployment) => deployment,
        None => prompt::deployment(&cfg)?,
    };
    let label = format!("{}@{}", deployment.account, deployment.network);
    cfg.deployments_mut().add_or_update(deployment);
    save(&cfg)?;
    added("deployment", &label);
    Ok(())
}

/// Print deployments that refer to undefined things. Fails if there are any.
pub fn check(cfg: &Config) -> Result<()> {
    let issues = cfg.check();
    for issue in &issues {
        println!("{} {issue}", stylist::warning("warning:"));
    }
    if issues.is_empty() {
        println!(
            "{} {}",
            style("No issues in").bold().green(),
            stylist::path(cfg.config_path.display())
        );
        Ok(())
    } else {
        Err(eyre!("Found {} issue(s) in config", issues.len()))
    }
}
