#![doc(html_no_source)]
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate_to, Shell};
use clap_mangen::Man;
use color_eyre::eyre::{eyre, Result};
use flint_cli::cli::{Cli as FlintCli, BINARY_NAME};

use std::fs;
use std::path::{Path, PathBuf};

mod generate_schema;

#[derive(Debug, Parser)]
#[clap(about = "xtasks for flint", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Produce auto completion files for the flint CLI
    GenerateAutoComplete,
    /// Produce man pages for the flint CLI (one per subcommand)
    GenerateMan,
    /// Generate the JSON schema of the config file
    GenerateSchema {
        /// Output directory
        #[clap(value_parser)]
        out: PathBuf,
    },
}

fn root_path() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| eyre!("xtask has no parent directory"))
}

/// Render a man page for `cmd` and, recursively, for each of its subcommands.
fn write_man_pages(cmd: clap::Command, name: &str, dir: &Path) -> Result<()> {
    let mut buffer: Vec<u8> = Default::default();
    Man::new(cmd.clone()).title(name).render(&mut buffer)?;
    fs::write(dir.join(format!("{name}.1")), buffer)?;
    for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
        write_man_pages(sub.clone(), &format!("{name}-{}", sub.get_name()), dir)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();
    match args.command {
        Commands::GenerateAutoComplete => {
            let complete_path = root_path()?.join("complete");
            fs::create_dir_all(&complete_path)?;
            for shell in [Shell::Bash, Shell::Fish, Shell::Zsh] {
                generate_to(shell, &mut FlintCli::command(), BINARY_NAME, &complete_path)?;
            }
        }
        Commands::GenerateMan => {
            let man_path = root_path()?.join("man");
            fs::create_dir_all(&man_path)?;
            write_man_pages(FlintCli::command(), BINARY_NAME, &man_path)?;
        }
        Commands::GenerateSchema { out } => {
            generate_schema::run(out)?;
        }
    }

    Ok(())
}
