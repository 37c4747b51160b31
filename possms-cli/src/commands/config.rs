//! `possms config init|show`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use possms_core::config::{self, BackendConfig, PosConfig};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a starter config to ~/.possms/config.yaml.
    Init(ConfigInitArgs),
    /// Print the current config.
    Show {
        /// Emit JSON instead of YAML.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Base URL of the POS server.
    #[arg(long, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Turn the SMS receipt feature on.
    #[arg(long)]
    pub enable: bool,

    /// Overwrite an existing config.
    #[arg(long)]
    pub force: bool,
}

pub fn run(command: ConfigCommand) -> Result<()> {
    let home = super::home_dir()?;
    match command {
        ConfigCommand::Init(args) => {
            let path = config::config_path_at(&home);
            let existed = path.exists();
            let wanted = PosConfig {
                enable_sms_receipt: args.enable,
                backend: BackendConfig {
                    url: args
                        .backend_url
                        .unwrap_or_else(|| BackendConfig::default().url),
                    ..BackendConfig::default()
                },
                ..PosConfig::default()
            };

            if args.force {
                config::save_at(&home, &wanted)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            } else {
                config::init_at(&home, wanted)
                    .with_context(|| format!("failed to initialize {}", path.display()))?;
            }

            if existed && !args.force {
                println!(
                    "{} config already exists at {} (use --force to overwrite)",
                    "•".yellow(),
                    path.display()
                );
            } else {
                println!("{} Wrote {}", "✓".green(), path.display());
            }
            Ok(())
        }
        ConfigCommand::Show { json } => {
            let cfg = config::load_at(&home)
                .context("failed to load config — run `possms config init` first")?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&cfg).context("failed to serialize config JSON")?
                );
            } else {
                print!(
                    "{}",
                    serde_yaml::to_string(&cfg).context("failed to serialize config YAML")?
                );
            }
            Ok(())
        }
    }
}
