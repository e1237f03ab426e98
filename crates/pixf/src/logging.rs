//! Logging setup for the CLI.
//!
//! All log output goes to stderr so `pixf extract --json` can own stdout.

use pixf_core::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter directive when RUST_LOG is unset: `--verbose` forces
/// debug, otherwise the configured level applies as is.
fn default_directive(config: &LoggingConfig, verbose: bool) -> &str {
    if verbose {
        "debug"
    } else {
        &config.level
    }
}

fn use_json(config: &LoggingConfig, json_logs: bool) -> bool {
    json_logs || config.format == "json"
}

/// Install the global subscriber for the `[logging]` section and CLI flags.
pub fn init(config: &LoggingConfig, verbose: bool, json_logs: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config, verbose)));

    let registry = tracing_subscriber::registry().with(filter);
    if use_json(config, json_logs) {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
