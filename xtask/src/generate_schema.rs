use color_eyre::eyre::Result;
use flint_config::Config;
use schemars::{schema::RootSchema, schema_for};
use std::fs;
use std::path::{Path, PathBuf};

/// Write schema to file
fn write_schema(path: PathBuf, schema: RootSchema) -> Result<()> {
    println!("Generating {}", path.display());
    fs::write(path, serde_json::to_string_pretty(&schema)?)?;
    Ok(())
}

pub fn run(out: impl AsRef<Path>) -> Result<()> {
    fs::create_dir_all(out.as_ref())?;
    write_schema(out.as_ref().join("flint.schema.json"), schema_for!(Config))
}
