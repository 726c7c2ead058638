use clap::{Args, Parser, Subcommand};
use flint_config::{Address, ChainId, HashAlgo, SigAlgo};
use std::fmt::Debug;
use std::path::PathBuf;

pub const BINARY_NAME: &str = "flint";

#[derive(Debug, Parser)]
#[clap(name = BINARY_NAME, about = "Configuration and contract resolution for Cadence projects", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ConfigFile {
    /// Explicit config file
    #[clap(short = 'c', long = "config", value_parser, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new config with an emulator network and service account
    Init(InitArgs),
    /// Edit or check the config
    Config {
        #[clap(subcommand)]
        command: ConfigCommand,
    },
    /// Resolve contracts to their addresses (and code) on a network
    #[clap(arg_required_else_help = true)]
    Resolve {
        #[clap(flatten)]
        config: ConfigFile,
        /// Target network
        #[clap(short = 'n', long = "network")]
        network: String,
        /// Contract names, resolved in order
        #[clap(required = true)]
        names: Vec<String>,
        /// Print JSON
        #[clap(short = 'j', long = "json")]
        json: bool,
    },
    /// Contract migration helpers
    Migrate {
        #[clap(subcommand)]
        command: MigrateCommand,
    },
    /// Inspect accounts
    Accounts {
        #[clap(subcommand)]
        command: AccountsCommand,
    },
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory where to create the config
    #[clap(long = "dir", value_parser, value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<PathBuf>,
    /// Explicit config file to create
    #[clap(
        short = 'c', long = "config", value_parser,
        value_hint = clap::ValueHint::FilePath, conflicts_with = "dir"
    )]
    pub config: Option<PathBuf>,
    /// Address of the emulator service account
    #[clap(long, default_value = "f8d6e0586b0a20c1")]
    pub service_address: Address,
    /// Emulator access node
    #[clap(long, default_value = "127.0.0.1:3569")]
    pub host: String,
    /// Service account private key (hex, without leading "0x"); stored inline
    #[clap(long, conflicts_with = "service_key_env")]
    pub service_private_key: Option<String>,
    /// Environment variable holding the service account private key
    #[clap(long, default_value = "FLINT_SERVICE_KEY")]
    pub service_key_env: String,
    /// Service account key signature algorithm
    #[clap(long, value_enum, default_value_t)]
    pub service_sig_algo: SigAlgo,
    /// Service account key hash algorithm
    #[clap(long, value_enum, default_value_t)]
    pub service_hash_algo: HashAlgo,
    /// Overwrite an existing config
    #[clap(long, action, default_value = "false")]
    pub reset: bool,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Add (or update) a config entry
    Add {
        #[clap(subcommand)]
        command: AddCommand,
    },
    /// Report deployments referring to undefined networks, accounts, or contracts
    Check {
        #[clap(flatten)]
        config: ConfigFile,
    },
}

#[derive(Debug, Subcommand)]
pub enum AddCommand {
    /// Add a contract definition for one network
    Contract {
        #[clap(flatten)]
        config: ConfigFile,
        /// Contract name
        #[clap(long)]
        name: String,
        /// Path to the contract file, or "0x"-prefixed address of an already deployed contract
        #[clap(long)]
        source: String,
        /// Network the definition applies to
        #[clap(long)]
        network: String,
    },
    /// Add an account
    Account(AddAccountArgs),
    /// Add a network
    Network {
        #[clap(flatten)]
        config: ConfigFile,
        /// Network name
        #[clap(long)]
        name: String,
        /// Access node host
        #[clap(long)]
        host: String,
        /// Chain id
        #[clap(long, value_enum)]
        chain_id: ChainId,
        /// Address of the migration staging contract
        #[clap(long)]
        staging_address: Option<Address>,
    },
    /// Add a deployment; prompts for everything when no option is given
    Deployment(AddDeploymentArgs),
}

#[derive(Debug, Args)]
pub struct AddAccountArgs {
    #[clap(flatten)]
    pub config: ConfigFile,
    /// Account name
    #[clap(long)]
    pub name: String,
    /// Account address
    #[clap(long)]
    pub address: Address,
    /// Chain id
    #[clap(long, value_enum, default_value_t = ChainId::Emulator)]
    pub chain_id: ChainId,
    /// Environment variable holding the private key
    #[clap(long, group = "key")]
    pub key_env: Option<String>,
    /// File holding the private key
    #[clap(long, group = "key", value_hint = clap::ValueHint::FilePath)]
    pub key_file: Option<PathBuf>,
    /// Private key (hex, without leading "0x"); stored inline
    #[clap(long, group = "key")]
    pub private_key: Option<String>,
    /// Key index
    #[clap(long, default_value_t = 0)]
    pub key_index: u32,
    /// Key signature algorithm
    #[clap(long, value_enum, default_value_t)]
    pub sig_algo: SigAlgo,
    /// Key hash algorithm
    #[clap(long, value_enum, default_value_t)]
    pub hash_algo: HashAlgo,
}

#[derive(Debug, Args, Default)]
pub struct AddDeploymentArgs {
    #[clap(flatten)]
    pub config: ConfigFile,
    /// Target network
    #[clap(long)]
    pub network: Option<String>,
    /// Deploying account
    #[clap(long)]
    pub account: Option<String>,
    /// Contract to deploy (repeatable, in deployment order)
    #[clap(long = "contract")]
    pub contracts: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Show what staging the given contracts on a network would submit
    #[clap(arg_required_else_help = true)]
    Plan {
        #[clap(flatten)]
        config: ConfigFile,
        /// Target network
        #[clap(short = 'n', long = "network")]
        network: String,
        /// Contract names, staged in order
        #[clap(required = true)]
        names: Vec<String>,
        /// Print JSON
        #[clap(short = 'j', long = "json")]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum AccountsCommand {
    /// Show an account, looked up by name and then by address
    Get {
        #[clap(flatten)]
        config: ConfigFile,
        /// Account name or address
        name_or_address: String,
        /// Print JSON
        #[clap(short = 'j', long = "json")]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn init_defaults() {
        let cli = Cli::try_parse_from([BINARY_NAME, "init"]).unwrap();
        match cli.command {
            Commands::Init(args) => {
                assert_eq!("f8d6e0586b0a20c1", args.service_address.to_string());
                assert_eq!("127.0.0.1:3569", args.host);
                assert_eq!("FLINT_SERVICE_KEY", args.service_key_env);
                assert_eq!(SigAlgo::EcdsaP256, args.service_sig_algo);
                assert_eq!(HashAlgo::Sha3_256, args.service_hash_algo);
                assert!(!args.reset);
            }
            other => panic!("Expected init, got {other:?}"),
        }
    }

    #[test]
    fn resolve_requires_names() {
        assert!(Cli::try_parse_from([BINARY_NAME, "resolve", "-n", "emulator"]).is_err());
        let cli =
            Cli::try_parse_from([BINARY_NAME, "resolve", "-n", "emulator", "A", "B"]).unwrap();
        match cli.command {
            Commands::Resolve { names, json, .. } => {
                assert_eq!(vec!["A", "B"], names);
                assert!(!json);
            }
            other => panic!("Expected resolve, got {other:?}"),
        }
    }

    #[test]
    fn account_key_sources_conflict() {
        let res = Cli::try_parse_from([
            BINARY_NAME,
            "config",
            "add",
            "account",
            "--name",
            "a",
            "--address",
            "01",
            "--key-env",
            "K",
            "--key-file",
            "k.txt",
        ]);
        assert!(res.is_err());
    }
}
