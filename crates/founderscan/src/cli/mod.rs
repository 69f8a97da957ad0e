pub mod batch;
pub mod extract;
pub mod resolve;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use founderscan_core::FounderscanConfig;

#[derive(Parser)]
#[command(
    name = "founderscan",
    about = "Find company founders from web search and reference pages",
    version
)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true, env = "FOUNDERSCAN_CONFIG")]
    pub config: Option<PathBuf>,
    /// Log pipeline details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Lower-case page text before extraction (remote recognizer only)
    #[arg(long, global = true)]
    pub lowercase: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up the founder of one or more companies
    Resolve {
        /// Company names
        #[arg(required = true)]
        companies: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
    },
    /// Look up founders for every company listed in a file
    Batch {
        /// File with one company per row; only the first column is read
        #[arg(short, long)]
        input: PathBuf,
        /// Where to write results (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
        /// Pause between companies, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Run the extraction pipeline on a local text file, without any lookups
    Extract {
        /// Text file to read ("-" for stdin)
        file: PathBuf,
        /// Also print the relevant sentences and raw candidates
        #[arg(long)]
        explain: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Json,
}

/// Load config from file and environment, then apply global flags.
pub fn load_config(cli: &Cli) -> Result<FounderscanConfig> {
    let mut config = FounderscanConfig::load_or_default(cli.config.as_deref())
        .context("loading configuration")?
        .with_env();

    if cli.lowercase {
        config.pipeline.lowercase = true;
    }

    config.validate().context("validating configuration")?;
    Ok(config)
}
