use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use flint_cli::cli::{
    AccountsCommand, AddCommand, Cli, Commands, ConfigCommand, ConfigFile, MigrateCommand,
};
use flint_cli::commands::{accounts, config, init, migrate, resolve};
use flint_config::{Config, Network, DEFAULT_FILENAME};

use std::env;

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();
    let args = Cli::parse();

    let load_config = |file: &ConfigFile| {
        match &file.config {
            None => Config::nearest(),
            Some(path) => Config::from_file(path),
        }
        .wrap_err("Could not load config")
    };

    match args.command {
        Commands::Init(init_args) => {
            let config_path = match (&init_args.config, &init_args.dir) {
                (Some(file), _) => file.clone(),
                (None, Some(dir)) => dir.join(DEFAULT_FILENAME),
                (None, None) => env::current_dir()
                    .wrap_err("Failed to get current working directory")?
                    .join(DEFAULT_FILENAME),
            };
            init::init(&init_args, &config_path)?;
        }
        Commands::Config { command } => match command {
            ConfigCommand::Add { command } => match command {
                AddCommand::Contract {
                    config: file,
                    name,
                    source,
                    network,
                } => config::add_contract(load_config(&file)?, &name, &source, &network)?,
                AddCommand::Account(account_args) => {
                    config::add_account(load_config(&account_args.config)?, &account_args)?
                }
                AddCommand::Network {
                    config: file,
                    name,
                    host,
                    chain_id,
                    staging_address,
                } => {
                    let network = Network {
                        staging_address,
                        ..Network::new(name, &host, chain_id)
                    };
                    config::add_network(load_config(&file)?, network)?
                }
                AddCommand::Deployment(deployment_args) => {
                    config::add_deployment(load_config(&deployment_args.config)?, &deployment_args)?
                }
            },
            ConfigCommand::Check { config: file } => config::check(&load_config(&file)?)?,
        },
        Commands::Resolve {
            config: file,
            network,
            names,
            json,
        } => resolve::resolve(&load_config(&file)?, &network, &names, json)?,
        Commands::Migrate {
            command:
                MigrateCommand::Plan {
                    config: file,
                    network,
                    names,
                    json,
                },
        } => migrate::print_plan(&load_config(&file)?, &network, &names, json)?,
        Commands::Accounts {
            command:
                AccountsCommand::Get {
                    config: file,
                    name_or_address,
                    json,
                },
        } => accounts::get(&load_config(&file)?, &name_or_address, json)?,
    }

    Ok(())
}
