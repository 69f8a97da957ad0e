use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use founderscan_core::{recognizer_from_config, ExtractionPipeline, FounderscanConfig};

pub async fn run(config: &FounderscanConfig, file: &Path, explain: bool) -> Result<()> {
    let text = read_input(file)?;

    let recognizer = recognizer_from_config(&config.recognizer)?;
    let pipeline = ExtractionPipeline::new(&config.pipeline, recognizer);

    let output = pipeline.run(&text).await?;

    if explain {
        println!("Relevant: {}", output.relevant_text);
        for candidate in &output.candidates {
            println!("Candidate: {candidate}");
        }
    }

    if output.names.is_empty() {
        eprintln!("No founder names found");
    }
    for name in &output.names {
        println!("{name}");
    }

    Ok(())
}

fn read_input(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))
}
