//! Config command - inspect and edit the JSON configuration.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use pickr_core::PickrConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with every default spelled out
    Init {
        /// Where to write it (default: --config or the user config path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value, e.g. "extraction.packing_markers"
    Get { key: String },

    /// Change one value; JSON literals are parsed, anything else is a string
    Set { key: String, value: String },

    /// Print the configuration file location
    Path,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => {
            if !path.exists() {
                eprintln!("{} {} not found, showing defaults", style("ℹ").blue(), path.display());
            }
            let config = PickrConfig::from_file_or_default(&path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommand::Init { output, force } => init(&output.unwrap_or(path), force)?,
        ConfigCommand::Get { key } => {
            let value = PickrConfig::from_file_or_default(&path)?.get(&key)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        ConfigCommand::Set { key, value } => {
            let value = parse_value(&value);
            let config = PickrConfig::from_file_or_default(&path)?.with_value(&key, value.clone())?;
            config.save(&path)?;
            println!("{} {} = {}", style("✓").green(), key, value);
        }
        ConfigCommand::Path => {
            let state = if path.exists() {
                style("exists").green()
            } else {
                style("not created, run 'pickr config init'").yellow()
            };
            println!("{} ({})", path.display(), state);
        }
    }

    Ok(())
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pickr")
        .join("config.json")
}

fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists, use --force to overwrite", path.display());
    }
    PickrConfig::default().save(path)?;
    println!("{} Created {}", style("✓").green(), path.display());
    Ok(())
}

/// `30`, `true` and `["DEP"]` are JSON; a bare word like `segment` is a string.
fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}
