use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use eyre::{eyre, Result};
use flint_config::{Config, Deployment};

/// Pick one of `items`, or type a value if there is nothing to pick from.
fn select_or_input(prompt: &str, items: &[&str]) -> Result<String> {
    let theme = ColorfulTheme::default();
    if items.is_empty() {
        return Ok(Input::<String>::with_theme(&theme)
            .with_prompt(prompt)
            .interact_text()?);
    }
    let idx = Select::with_theme(&theme)
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()?;
    Ok(items[idx].to_string())
}

/// Interactively build a deployment from the networks, accounts, and contracts in `cfg`.
pub fn deployment(cfg: &Config) -> Result<Deployment> {
    let networks: Vec<_> = cfg.networks().iter().map(|n| n.name.as_str()).collect();
    let network = select_or_input("Network", &networks)?;

    let accounts: Vec<_> = cfg.accounts().iter().map(|a| a.name.as_str()).collect();
    let account = select_or_input("Deploying account", &accounts)?;

    let candidates: Vec<_> = cfg
        .contracts()
        .get_by_network(&network)
        .into_iter()
        .filter(|c| c.source.path().is_some())
        .map(|c| c.name.as_str())
        .collect();
    let contracts: Vec<String> = if candidates.is_empty() {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("Contracts (comma separated)")
            .interact_text()?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Contracts to deploy")
            .items(&candidates[..])
            .interact()?
            .into_iter()
            .map(|idx| candidates[idx].to_string())
            .collect()
    };
    if contracts.is_empty() {
        return Err(eyre!("at least one contract name must be provided"));
    }
    Ok(Deployment::new(network, account, contracts))
}
