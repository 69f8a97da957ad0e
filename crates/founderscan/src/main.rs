use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use founderscan::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("founderscan={default_level},founderscan_core={default_level}").into()
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli::load_config(&cli)?;

    match cli.command {
        Commands::Resolve { companies, format } => {
            cli::resolve::run(config, &companies, format).await
        }
        Commands::Batch {
            input,
            output,
            format,
            delay_ms,
        } => cli::batch::run(config, &input, output.as_deref(), format, delay_ms).await,
        Commands::Extract { file, explain } => cli::extract::run(&config, &file, explain).await,
    }
}
