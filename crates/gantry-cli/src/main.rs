//! Gantry CLI - extract container IDs from photographs via an OCR oracle.

use clap::Parser;
use gantry_cli::{output, Cli, CliError, Formatter};
use gantry_cli::imaging::load_image;
use gantry_extractor::{ExtractionSession, SessionConfig, SessionOutcome};
use gantry_oracle::OpenRouterOracle;
use tracing::Level;

#[tokio::main]
async fn main() {
    // Log to stderr; stdout carries the results
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::INFO)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> gantry_cli::Result<()> {
    let cli = Cli::parse();

    let api_key = cli.api_key.ok_or(CliError::MissingApiKey)?;

    let formatter = Formatter::new(cli.format, !cli.no_color);

    let image = load_image(&cli.image)?;

    let oracle = OpenRouterOracle::new(&cli.model, api_key);
    let config = SessionConfig {
        max_iterations: cli.max_iterations,
        ..SessionConfig::default()
    };

    let session = ExtractionSession::new(oracle, config).with_model_name(&cli.model);
    let report = session.run(image).await?;

    output::save_results(&report.records, &cli.output)?;

    println!("{}", formatter.format_records(&report.records)?);

    match report.outcome {
        SessionOutcome::Converged { rounds } => {
            println!(
                "{}",
                formatter.success(&format!(
                    "Extracted {} container(s) in {} round(s)",
                    report.records.len(),
                    rounds
                ))
            );
        }
        SessionOutcome::Exhausted => {
            println!(
                "{}",
                formatter.warning(&format!(
                    "Extracted {} container(s); {} identifier(s) could not be corrected:",
                    report.records.len(),
                    report.unresolved.len()
                ))
            );
            for failure in &report.unresolved {
                println!(
                    "{}",
                    formatter.error(&format!(
                        "  {} at index {}: {:?}",
                        failure.identifier, failure.index, failure.outcome
                    ))
                );
            }
        }
    }

    for warning in &report.warnings {
        println!("{}", formatter.warning(warning));
    }

    Ok(())
}
