//! pixf CLI - extract, deduplicate and convert the images embedded in a PDF.
//!
//! # Usage
//!
//! ```bash
//! # Extract images in their native format
//! pixf extract report.pdf
//!
//! # Re-encode as lossless WebP into a chosen directory
//! pixf extract report.pdf webp --output ./figures
//!
//! # View configuration
//! pixf config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// pixf - Extract unique images from PDF documents.
#[derive(Parser, Debug)]
#[command(name = "pixf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the images of a PDF (or a directory of images)
    Extract(cli::extract::ExtractArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match pixf_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `pixf config path`."
            );
            pixf_core::Config::default()
        }
    };
    logging::init(&config.logging, cli.verbose, cli.json_logs);

    tracing::debug!("pixf v{}", pixf_core::VERSION);

    match cli.command {
        Commands::Extract(args) => cli::extract::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
