// Ciphergate — Application Entry Point
//
// Parses CLI arguments, initializes structured logging (with a filter that
// never emits key material or payloads), and dispatches to the command
// handler.

use std::error::Error as _;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ciphergate::cli::{execute, Cli};

#[tokio::main]
async fn main() {
    // RUST_LOG=ciphergate=debug for verbose output. Logs go to stderr so
    // command output on stdout stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ciphergate=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli).await {
        let mut shown = e.to_string();
        eprintln!("Error: {}", shown);
        let mut source = e.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !shown.contains(&text) {
                eprintln!("  caused by: {}", text);
            }
            shown = text;
            source = cause.source();
        }
        std::process::exit(1);
    }
}
