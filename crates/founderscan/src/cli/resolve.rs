use anyhow::{Context, Result};
use founderscan_core::{resolver_from_config, FounderscanConfig, HttpSourceQuery};

use super::Format;
use crate::output::write_results;

pub async fn run(config: FounderscanConfig, companies: &[String], format: Format) -> Result<()> {
    let resolver = resolver_from_config(&config)?;
    let query = HttpSourceQuery::new(config.query).context("building HTTP client")?;

    let batch = resolver.resolve_all(companies, &query).await;

    let mut stdout = std::io::stdout().lock();
    write_results(&mut stdout, &batch.results, format)
}
