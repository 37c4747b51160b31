//! possms — send point-of-sale receipts by SMS.
//!
//! # Usage
//!
//! ```text
//! possms config init [--backend-url URL] [--enable] [--force]
//! possms config show [--json]
//! possms validate <PHONE>
//! possms send --order <FILE> [--phone P] [--offline] [--json]
//! possms preview --order <FILE>
//! possms status --order <FILE> [--json]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    config::ConfigCommand, preview::PreviewArgs, send::SendArgs, status::StatusArgs,
    validate::ValidateArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "possms",
    version,
    about = "Send point-of-sale receipts to customers by SMS",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or inspect ~/.possms/config.yaml.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Check whether a phone number passes the SMS format gate.
    Validate(ValidateArgs),

    /// Send the receipt of an exported order by SMS.
    Send(SendArgs),

    /// Print the SMS receipt body for an exported order.
    Preview(PreviewArgs),

    /// Show the SMS fields of an exported order.
    Status(StatusArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Config { command } => commands::config::run(command),
        Commands::Validate(args) => args.run(),
        Commands::Send(args) => args.run(),
        Commands::Preview(args) => args.run(),
        Commands::Status(args) => args.run(),
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
