//! envcheck - resolve typed configuration parameters from the environment

use anyhow::{Context, Result};
use clap::Parser;
use config::{Binding, EnvAdapter, ParamDecl};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod decl;
mod output;

use cli::{Cli, Command, LogFormat, OutputFormat};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load the env file before logging so it can set RUST_LOG
    let loaded = load_env(cli.env_file.as_deref(), cli.no_dotenv)?;

    init_logging(cli.log_format)?;

    if let Some(path) = loaded {
        info!("Loaded environment variables from {}", path);
    }

    let adapter = match cli.prefix.as_deref() {
        Some(prefix) => EnvAdapter::with_prefix(prefix),
        None => EnvAdapter::new(),
    };

    if run(cli.command, adapter)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Execute one command; `false` means some parameter failed to resolve
fn run(command: Command, adapter: EnvAdapter) -> Result<bool> {
    match command {
        Command::Validate { params } => {
            let binding = bind(adapter, params)?;
            match binding.validate() {
                Ok(()) => {
                    info!(params = binding.len(), "All parameters resolved");
                    Ok(true)
                }
                Err(e) => {
                    for message in e.messages() {
                        eprintln!("{}", message);
                    }
                    Ok(false)
                }
            }
        }
        Command::Fetch { format, params } => {
            let binding = bind(adapter, params)?;
            match binding.fetch_all() {
                Ok(values) => {
                    let rendered = match format {
                        OutputFormat::Text => output::render_text(&binding, &values),
                        OutputFormat::Json => output::render_json(&values)? + "\n",
                    };
                    print!("{}", rendered);
                    Ok(true)
                }
                Err(messages) => {
                    for message in messages {
                        eprintln!("{}", message);
                    }
                    Ok(false)
                }
            }
        }
        Command::Get { name, params } => {
            let binding = bind(adapter, params)?;
            match binding.get(&name) {
                Ok(value) => {
                    println!("{}", value);
                    Ok(true)
                }
                Err(e) => {
                    eprintln!("{}", e);
                    Ok(false)
                }
            }
        }
    }
}

fn bind(adapter: EnvAdapter, params: Vec<ParamDecl>) -> Result<Binding> {
    Binding::new(adapter, params).context("Failed to build parameter binding")
}

/// Load variables from `env_file`, or from `.env` when present.
///
/// Returns the path that was loaded, if any.
fn load_env(env_file: Option<&Path>, no_dotenv: bool) -> Result<Option<String>> {
    if let Some(path) = env_file {
        dotenv::from_path(path)
            .with_context(|| format!("Failed to load env file {}", path.display()))?;
        return Ok(Some(path.display().to_string()));
    }

    if no_dotenv {
        return Ok(None);
    }

    match dotenv::dotenv() {
        Ok(path) => Ok(Some(path.display().to_string())),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e).context("Failed to load .env file"),
    }
}

/// Initialize logging; filter from `RUST_LOG`, default `warn`
fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Pretty => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
        LogFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
    }

    debug!(format = ?format, "Logging initialized");

    Ok(())
}
