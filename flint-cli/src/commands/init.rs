use console::style;
use eyre::{Result, WrapErr};
use flint_config::secret::{PrivateKeyHex, Secret};
use flint_config::{Account, AccountKey, ChainId, Config, Network};
use std::path::Path;

use crate::cli::InitArgs;

/// Name of the network `init` creates.
pub const EMULATOR_NETWORK: &str = "emulator";
/// Name of the service account `init` creates.
pub const SERVICE_ACCOUNT: &str = "emulator-account";

/// Build the initial config for a project.
///
/// # Arguments
///
/// * `args`        - Init options (service account and emulator settings)
/// * `config_path` - File the config will be saved to
pub fn initial_config(args: &InitArgs, config_path: &Path) -> Result<Config> {
    let dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut cfg = Config::new(dir).wrap_err("Failed to create config")?;
    if let Some(file_name) = config_path.file_name() {
        cfg.config_path = cfg.project_dir().join(file_name);
    }

    let private_key = match &args.service_private_key {
        Some(hex) => Secret::<PrivateKeyHex>::plain_text(hex.as_str())
            .wrap_err("Invalid service account private key")?,
        None => Secret::env(&args.service_key_env),
    };
    let key = AccountKey {
        sig_algo: args.service_sig_algo,
        hash_algo: args.service_hash_algo,
        ..AccountKey::new(private_key)
    };
    let mut service = Account::new(SERVICE_ACCOUNT, args.service_address, ChainId::Emulator);
    service.keys.push(key);

    cfg.networks_mut()
        .add_or_update(Network::new(EMULATOR_NETWORK, &args.host, ChainId::Emulator));
    cfg.accounts_mut().add_or_update(service)?;
    Ok(cfg)
}

/// Command that writes a new config file.
///
/// Fails if the file already exists, unless `args.reset` is set.
pub fn init(args: &InitArgs, config_path: &Path) -> Result<Config> {
    let cfg = initial_config(args, config_path)?;
    cfg.to_file(args.reset).with_context(|| {
        format!(
            "Failed to save config to file {} (use --reset to overwrite)",
            cfg.config_path.display()
        )
    })?;
    println!(
        "{} {}",
        style("Created").bold().green(),
        cfg.config_path.display()
    );
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use flint_config::{HashAlgo, SigAlgo, DEFAULT_FILENAME};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> InitArgs {
        let cli = Cli::try_parse_from(["flint", "init"].iter().chain(args)).unwrap();
        match cli.command {
            Commands::Init(args) => args,
            other => panic!("Expected init, got {other:?}"),
        }
    }

    #[test]
    fn creates_emulator_setup() {
        let tmp = tempdir().unwrap();
        let args = parse(&["--service-sig-algo", "ECDSA_secp256k1"]);
        let cfg = init(&args, &tmp.path().join(DEFAULT_FILENAME)).unwrap();

        let loaded = Config::from_file(&cfg.config_path).unwrap();
        let network = loaded.networks().get_by_name(EMULATOR_NETWORK).unwrap();
        assert_eq!("127.0.0.1:3569", network.host.to_string());
        let service = loaded.accounts().get_by_name(SERVICE_ACCOUNT).unwrap();
        assert_eq!("f8d6e0586b0a20c1", service.address.to_string());
        assert_eq!(SigAlgo::EcdsaSecp256k1, service.keys[0].sig_algo);
        assert_eq!(HashAlgo::Sha3_256, service.keys[0].hash_algo);
        assert_eq!("env:FLINT_SERVICE_KEY", service.keys[0].private_key.describe());
    }

    #[test]
    fn refuses_to_overwrite_without_reset() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(DEFAULT_FILENAME);
        init(&parse(&[]), &path).unwrap();
        assert!(init(&parse(&[]), &path).is_err());
        init(&parse(&["--reset", "--host", "127.0.0.1:4000"]), &path).unwrap();
        let cfg = Config::from_file(&path).unwrap();
        assert_eq!(
            "127.0.0.1:4000",
            cfg.networks().get_by_name(EMULATOR_NETWORK).unwrap().host.to_string()
        );
    }

    #[test]
    fn saves_inline_key() {
        let tmp = tempdir().unwrap();
        let key = "dd72967fd2bd75234ae9037dd4694c1f00baad63a10c35172bf65fbb8ad74b47";
        let cfg = init(
            &parse(&["--service-private-key", key]),
            &tmp.path().join(DEFAULT_FILENAME),
        )
        .unwrap();

        let loaded = Config::from_file(&cfg.config_path).unwrap();
        let service = loaded.accounts().get_by_name(SERVICE_ACCOUNT).unwrap();
        assert_eq!("inline", service.keys[0].private_key.describe());
        let written = std::fs::read_to_string(&cfg.config_path).unwrap();
        assert!(written.contains(key), "{written}");
    }

    #[test]
    fn rejects_bad_inline_key() {
        let tmp = tempdir().unwrap();
        let args = parse(&["--service-private-key", "0x1234"]);
        assert!(initial_config(&args, &tmp.path().join(DEFAULT_FILENAME)).is_err());
    }
}
