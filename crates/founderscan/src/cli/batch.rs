use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use founderscan_core::{resolver_from_config, FounderscanConfig, HttpSourceQuery};

use super::Format;
use crate::companies::read_companies;
use crate::output::write_results;

pub async fn run(
    mut config: FounderscanConfig,
    input: &Path,
    output: Option<&Path>,
    format: Format,
    delay_ms: Option<u64>,
) -> Result<()> {
    if let Some(delay) = delay_ms {
        config.batch.delay_ms = delay;
    }

    let companies = read_companies(input)?;
    tracing::info!(count = companies.len(), input = %input.display(), "Loaded companies");

    let resolver = resolver_from_config(&config)?;
    let query = HttpSourceQuery::new(config.query).context("building HTTP client")?;

    let batch = resolver.resolve_all(companies.as_slice(), &query).await;

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_results(&mut writer, &batch.results, format)?;
            writer.flush()?;
            eprintln!("Results saved to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            write_results(&mut stdout, &batch.results, format)?;
        }
    }

    let stats = &batch.stats;
    eprintln!(
        "Processed {} companies: {} primary, {} secondary, {} not found ({} failed lookups)",
        stats.companies, stats.primary_hits, stats.secondary_hits, stats.not_found, stats.failed_attempts
    );

    Ok(())
}
