use console::style;
use eyre::{eyre, Result};
use flint_config::{Account, Config};

use crate::stylist;

/// Find an account by name, then by address.
pub fn find<'a>(cfg: &'a Config, name_or_address: &str) -> Option<&'a Account> {
    let accounts = cfg.accounts();
    accounts
        .get_by_name(name_or_address)
        .or_else(|| accounts.get_by_address(name_or_address))
}

/// Command that prints an account.
pub fn get(cfg: &Config, name_or_address: &str, json: bool) -> Result<()> {
    let account = find(cfg, name_or_address)
        .ok_or_else(|| eyre!("No account named or at address '{name_or_address}'"))?;
    if json {
        println!("{}", serde_json::to_string_pretty(account)?);
        return Ok(());
    }
    println!(
        "{} {} {}",
        stylist::name(&account.name),
        stylist::address(format!("{:#}", account.address)),
        style(account.chain_id).dim()
    );
    for key in &account.keys {
        println!(
            "  key {} {} {} {}",
            key.index,
            key.sig_algo,
            key.hash_algo,
            stylist::path(key.private_key.describe())
        );
    }
    Ok(())
}
