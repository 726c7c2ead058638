use flint_config::*;

use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

// These tests set environment variables (and the current directory), so they must run serially
// and in a separate process (hence why they're not unit tests).

const KEY: &str = "dd72967fd2bd75234ae9037dd4694c1f00baad63a10c35172bf65fbb8ad74b47";

#[test]
#[serial]
fn test_config_from_env_var() {
    let tmp = tempdir().unwrap();
    let file_path = tmp.path().join("custom.json");
    fs::write(
        &file_path,
        r#" { "networks": [{ "name": "emulator", "host": "127.0.0.1:3569", "chain_id": "flow-emulator" }] } "#,
    )
    .unwrap();

    std::env::set_var(CONFIG_ENV_VAR, &file_path);
    let cfg = Config::nearest();
    std::env::remove_var(CONFIG_ENV_VAR);

    let cfg = cfg.unwrap();
    assert_eq!(fs::canonicalize(&file_path).unwrap(), cfg.config_path);
    assert!(cfg.networks().get_by_name("emulator").is_some());
}

#[test]
#[serial]
fn test_nearest_searches_parents() {
    let tmp = tempdir().unwrap();
    let nested = tmp.path().join("cadence").join("contracts");
    fs::create_dir_all(&nested).unwrap();
    let cfg = Config::new(&tmp).unwrap();
    cfg.to_file(false).unwrap();

    let cwd = std::env::current_dir().unwrap();
    std::env::set_current_dir(&nested).unwrap();
    let found = Config::nearest();
    std::env::set_current_dir(cwd).unwrap();

    assert_eq!(cfg.config_path, found.unwrap().config_path);
}

#[test]
#[serial]
fn test_account_key_from_env() {
    let tmp = tempdir().unwrap();
    fs::write(
        tmp.path().join(DEFAULT_FILENAME),
        r#"
        {
          "accounts": [{
            "name": "emulator-account",
            "address": "f8d6e0586b0a20c1",
            "chain_id": "flow-emulator",
            "keys": [{ "private_key": { "env": "FLINT_TEST_SERVICE_KEY" } }]
          }],
          "networks": [{
            "name": "testnet",
            "host": "access.devnet.nodes.onflow.org:9000/${{env.FLINT_TEST_ACCESS_TOKEN}}",
            "chain_id": "flow-testnet"
          }]
        }
        "#,
    )
    .unwrap();

    // loading does not require the variables to be set
    let cfg = Config::from_dir(&tmp).unwrap();
    let key = &cfg.accounts().get_by_name("emulator-account").unwrap().keys[0];
    assert!(matches!(
        key.private_key.load(),
        Err(ConfigError::SecretReadFromEnv(..))
    ));

    std::env::set_var("FLINT_TEST_SERVICE_KEY", KEY);
    std::env::set_var("FLINT_TEST_ACCESS_TOKEN", "t0k3n");
    let loaded_key = key.private_key.load();
    let host = cfg.networks().get_by_name("testnet").unwrap().host.load();
    std::env::remove_var("FLINT_TEST_SERVICE_KEY");
    std::env::remove_var("FLINT_TEST_ACCESS_TOKEN");

    assert_eq!(KEY, loaded_key.unwrap().expose_secret());
    assert_eq!(
        "access.devnet.nodes.onflow.org:9000/t0k3n",
        host.unwrap().expose_secret()
    );
}
