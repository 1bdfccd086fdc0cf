//! MailSRS - command-line envelope sender rewriter

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mailsrs_common::config::{Config, LoggingConfig, SECRET_ENV_VAR};
use mailsrs_common::{EmailAddress, SrsConfig};
use mailsrs_core::Srs;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "mailsrs", about = "Sender Rewriting Scheme address rewriter")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite a sender address for forwarding
    Rewrite {
        /// Original envelope sender (local@domain)
        address: String,

        /// Domain of the forwarding host
        #[arg(short, long)]
        domain: String,
    },
    /// Reverse a rewritten bounce address
    Reverse {
        /// Rewritten address (local@domain)
        address: String,

        /// Keep unwrapping SRS1 layers down to the original sender
        #[arg(long)]
        full: bool,
    },
}

#[derive(Debug, Serialize)]
struct Output {
    address: EmailAddress,
    rewritten: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.logging);

    let srs = Srs::new(config.srs).context("Invalid SRS configuration")?;
    debug!("Loaded {:?}", srs);

    let output = match cli.command {
        Command::Rewrite { address, domain } => {
            let address: EmailAddress = address.parse()?;
            let rewritten = srs.rewrite_address(&address, &domain)?;
            info!("Rewrote {} as {}", address, rewritten);
            Output {
                address: rewritten,
                rewritten: true,
            }
        }
        Command::Reverse { address, full } => reverse(&srs, &address, full)?,
    };

    if cli.json {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", output.address);
    }

    Ok(())
}

fn reverse(srs: &Srs, input: &str, full: bool) -> Result<Output> {
    let address: EmailAddress = input.parse()?;

    let reversed = if full {
        srs.reverse_fully(&address.local)
    } else {
        srs.reverse(&address.local)
    }
    .map_err(|e| {
        let (code, status) = e.smtp_reply();
        anyhow!("{} {} {} ({})", code, status, e, e.code())
    })?;

    Ok(match reversed {
        Some((local, domain)) => {
            let original = EmailAddress::new(local, domain);
            info!("Reversed {} to {}", address, original);
            Output {
                address: original,
                rewritten: true,
            }
        }
        None => Output {
            address,
            rewritten: false,
        },
    })
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    resolve_config(
        path,
        &Config::default_paths(),
        std::env::var(SECRET_ENV_VAR).ok(),
    )
}

/// Pick the configuration file and apply the secret from the environment
///
/// Without an explicit path the first existing `search` entry is used. Only
/// when none exists does a non-empty `env_secret` stand in for the file.
fn resolve_config(
    path: Option<&Path>,
    search: &[PathBuf],
    env_secret: Option<String>,
) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => match Config::load_from(search)? {
            Some(config) => config,
            None if env_secret.as_deref().is_some_and(|s| !s.is_empty()) => Config {
                srs: SrsConfig::new(""),
                logging: LoggingConfig::default(),
            },
            None => return Err(anyhow!("No configuration file found")),
        },
    };

    Ok(config.with_secret_override(env_secret))
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
