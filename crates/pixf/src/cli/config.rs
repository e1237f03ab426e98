//! The `pixf config` command.

use clap::{Args, Subcommand};
use pixf_core::{Config, EncoderRegistry};
use std::fmt::Write as _;
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate the config file and print it with the resolved settings
    Show,

    /// Print the config file path
    Path,

    /// Write a config file with the defaults
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    let path = Config::default_path();
    match args.command {
        ConfigCommand::Show => {
            // Unlike startup, a broken file is an error here rather than a
            // silent fallback to defaults.
            let (config, source) = if path.exists() {
                (Config::load_from(&path)?, Some(path.as_path()))
            } else {
                (Config::default(), None)
            };
            println!("{}", config.to_toml()?);
            print!("{}", resolved_summary(&config, source)?);
        }
        ConfigCommand::Path => println!("{}", path.display()),
        ConfigCommand::Init { force } => {
            write_default(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }
    Ok(())
}

/// What the extract command would actually run with under `config`.
fn resolved_summary(config: &Config, source: Option<&Path>) -> anyhow::Result<String> {
    let registry = EncoderRegistry::default();
    let mode = registry.resolve(&config.output.default_format)?;

    let mut out = String::from("# resolved\n");
    match source {
        Some(path) => writeln!(out, "# config file:     {}", path.display())?,
        None => writeln!(out, "# config file:     none (built-in defaults)")?,
    }
    writeln!(out, "# encode workers:  {}", config.pool.effective_workers())?;
    writeln!(out, "# default format:  {}", mode.name())?;
    writeln!(out, "# formats:         {}", registry.format_names().join(", "))?;
    Ok(out)
}

fn write_default(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let body = format!(
        "# pixf configuration. `pool.workers = 0` uses every available CPU.\n\n{}",
        Config::default().to_toml()?
    );
    std::fs::write(path, body)?;
    Ok(())
}
