use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kitaverse_core::config::Config;
use kitaverse_core::core_space::EntryPolicy;
use kitaverse_core::logging::{init_logging_with_config, LogLevel};
use kitaverse_core::start_server;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "kitaverse")]
#[command(author, version, about = "Kitaverse space membership server", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<LogLevel>,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    /// Address to listen on, e.g. 127.0.0.1:8000
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// How entering a space treats an existing membership (cumulative, transfer)
    #[arg(long, value_name = "POLICY")]
    entry_policy: Option<EntryPolicy>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Print the effective configuration as TOML
    Config,
}

impl Args {
    /// Layer defaults, the config file, `KITAVERSE_*` variables and flags
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = Config::from_file(path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?;
                config.apply_env().context("Invalid KITAVERSE_* environment")?;
                config
            }
            None => Config::from_env().context("Invalid KITAVERSE_* environment")?,
        };

        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if self.json_logs {
            config.logging.json_format = true;
        }
        if let Some(bind) = self.bind {
            config.server.bind_address = bind;
        }
        if let Some(policy) = self.entry_policy {
            config.registry.entry_policy = policy;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.load_config()?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Config => {
            print!("{}", config.to_toml()?);
        }
        Command::Serve => {
            init_logging_with_config(&config.logging)?;
            info!(
                bind = %config.server.bind_address,
                entry_policy = %config.registry.entry_policy,
                "Kitaverse starting"
            );
            start_server(config).await?;
            info!("Kitaverse stopped");
        }
    }

    Ok(())
}
