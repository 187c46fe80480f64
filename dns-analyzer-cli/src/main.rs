//! `dns-analyzer` command-line entry point.
//!
//! Logs go to stderr so that `--json` output on stdout stays machine-readable.

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dns_analyzer_engine::{DiagnosticService, EngineConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dns-analyzer", version, about = "DNS health analysis and WHOIS lookup")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the DNS-over-HTTPS endpoint
    #[arg(long, global = true)]
    doh_endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the parent, NS, SOA, MX and WWW checks
    Analyze {
        domain: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up domain registration data
    Whois {
        domain: String,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(endpoint) = cli.doh_endpoint {
        config.doh_endpoint = endpoint;
    }
    let service = DiagnosticService::new(&config)?;

    match cli.command {
        Command::Analyze { domain, json } => {
            let report = service.analyze(&domain).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::analysis(&report));
            }
        }
        Command::Whois { domain, json } => {
            let record = service.whois(&domain).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print!("{}", render::whois(&record));
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
