//! Command-line interface definition

use crate::decl::parse_decl;
use clap::{Parser, Subcommand, ValueEnum};
use config::ParamDecl;
use std::path::PathBuf;

/// Resolve and validate typed configuration parameters from the environment
#[derive(Debug, Parser)]
#[command(name = "envcheck", version, about)]
pub struct Cli {
    /// Load variables from this file before resolving (defaults to `.env` if present)
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Do not load a `.env` file
    #[arg(long, global = true, conflicts_with = "env_file")]
    pub no_dotenv: bool,

    /// Prefix prepended to every variable name (`PREFIX_NAME`)
    #[arg(long, global = true, env = "ENVCHECK_PREFIX")]
    pub prefix: Option<String>,

    /// Log output format
    #[arg(long, global = true, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Exit successfully only if every parameter resolves
    Validate {
        /// Parameter declarations: `name[:type][=default]`
        #[arg(required = true, value_parser = parse_decl)]
        params: Vec<ParamDecl>,
    },
    /// Print every resolved parameter
    Fetch {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Parameter declarations: `name[:type][=default]`
        #[arg(required = true, value_parser = parse_decl)]
        params: Vec<ParamDecl>,
    },
    /// Print a single parameter
    Get {
        /// Name of a declared parameter
        name: String,

        /// Parameter declarations: `name[:type][=default]`
        #[arg(required = true, value_parser = parse_decl)]
        params: Vec<ParamDecl>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}
