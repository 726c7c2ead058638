use flint_config::*;
use pretty_assertions::assert_eq;

use std::path::PathBuf;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_good_config() {
    let dir = fixtures();
    let cfg = Config::from_dir(&dir).unwrap();
    assert_eq!(dir.canonicalize().unwrap(), cfg.project_dir());

    let contracts = cfg.contracts();
    assert_eq!(10, contracts.len());
    assert_eq!(
        vec!["NonFungibleToken", "FungibleToken", "Kibble", "KittyItems", "KittyItemsMarket"],
        contracts.names()
    );
    assert_eq!(5, contracts.get_by_network("testnet").len());
    let market = contracts
        .get_by_name_and_network("KittyItemsMarket", "testnet")
        .unwrap();
    assert_eq!(
        Some("fcceff21d9532b58".parse().unwrap()),
        market.source.alias()
    );

    let accounts = cfg.accounts();
    assert_eq!(3, accounts.len());
    let account2 = accounts.get_by_name("account-2").unwrap();
    assert_eq!(ChainId::Testnet, account2.chain_id);
    assert_eq!(1, account2.keys[0].index);
    assert_eq!(SigAlgo::EcdsaSecp256k1, account2.keys[0].sig_algo);
    assert_eq!(HashAlgo::Sha2_256, account2.keys[0].hash_algo);
    assert_eq!("env:ACCOUNT_2_KEY", account2.keys[0].private_key.describe());

    let testnet = cfg.networks().get_by_name("testnet").unwrap();
    assert_eq!(
        Some("2ceae959ed1a7e7a".parse().unwrap()),
        testnet.staging_address
    );

    let emulator = cfg.deployments().by_network("emulator");
    assert_eq!(2, emulator.len());
    assert_eq!("emulator-account", emulator[0].account);
    assert!(cfg.check().is_empty(), "{:?}", cfg.check());
}

#[test]
fn test_duplicate_account_address() {
    match Config::from_file(fixtures().join("dup-account-address.json")) {
        Err(ConfigError::MalformedConfig(path, err)) => {
            assert!(path.ends_with("dup-account-address.json"));
            let msg = err.to_string();
            assert!(msg.contains("already used by account 'emulator-account'"), "{msg}");
        }
        other => panic!("Expected MalformedConfig, got {other:?}"),
    }
}

#[test]
fn test_bad_address() {
    match Config::from_file(fixtures().join("bad-address.json")) {
        Err(ConfigError::MalformedConfig(_, err)) => {
            let msg = err.to_string();
            assert!(msg.contains("Invalid address '0xnothex'"), "{msg}");
        }
        other => panic!("Expected MalformedConfig, got {other:?}"),
    }
}

#[test]
fn test_bad_private_key() {
    match Config::from_file(fixtures().join("bad-private-key.json")) {
        Err(ConfigError::MalformedConfig(_, err)) => {
            let msg = err.to_string();
            assert!(msg.contains("Invalid private key"), "{msg}");
        }
        other => panic!("Expected MalformedConfig, got {other:?}"),
    }
}

#[test]
fn test_missing_file() {
    match Config::from_file(fixtures().join("nope.json")) {
        Err(ConfigError::FsError(_, path, _)) => assert!(path.ends_with("nope.json")),
        other => panic!("Expected FsError, got {other:?}"),
    }
}

#[test]
fn test_schema_mentions_every_section() {
    let schema = serde_json::to_value(schemars::schema_for!(Config)).unwrap();
    let props = schema["properties"].as_object().unwrap();
    let mut keys: Vec<_> = props.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(vec!["accounts", "contracts", "deployments", "networks"], keys);
}
