//! taskview - render task-runner results in the terminal
//!
//! Reads result and inventory dumps written by a network-automation task
//! runner and pretty-prints them.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use taskview::commands::{self, Cli};
use taskview::exit_code::ExitCode;

/// Log filter: RUST_LOG wins, otherwise warnings only unless --debug
fn env_filter(debug: bool) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug {
        EnvFilter::new("taskview=debug,taskview_core=debug")
    } else {
        EnvFilter::new("taskview=warn,taskview_core=warn")
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with rendered output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter(cli.debug))
        .init();

    // Dropping the command future on Ctrl-C releases any live display
    let exit_code = tokio::select! {
        code = commands::execute(cli) => code,
        _ = tokio::signal::ctrl_c() => {
            tracing::debug!("interrupted");
            ExitCode::Interrupted
        }
    };

    std::process::exit(exit_code.as_i32());
}
