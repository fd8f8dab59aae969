//! marisol - Stamp bates numbers onto PDF documents.

mod cli;

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use marisol::collection::{Collection, SaveStatistics};
use marisol::config::Config;
use marisol::error::{MarisolError, Result};
use marisol::output::{self, OutputFormatter, SaveReport};
use marisol::utils::collect_paths_for_patterns;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Install the log subscriber. `RUST_LOG` takes precedence over the flags.
fn init_tracing(cli: &Cli) {
    let level = if cli.verbose { "marisol=debug" } else { "marisol=error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<()> {
    let config = cli.to_config()?;
    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", marisol::NAME, marisol::VERSION));
    }

    let inputs = collect_paths_for_patterns(&cli.inputs)?;
    if inputs.is_empty() {
        return Err(MarisolError::invalid_config("No input files matched"));
    }
    tracing::debug!(inputs = inputs.len(), "resolved input patterns");

    let collection = build_collection(&config, &inputs, &formatter).await?;

    if config.dry_run {
        if cli.json {
            let plan = serde_json::to_string_pretty(&output::plan(&collection))
                .map_err(|e| MarisolError::other(e.to_string()))?;
            println!("{plan}");
        } else {
            output::display_plan(&formatter, &collection);
        }
        return Ok(());
    }

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|e| MarisolError::FailedToCreateOutput {
            path: config.output_dir.clone(),
            source: e,
        })?;

    formatter.info(&format!(
        "Saving {} document(s) to {}",
        collection.len(),
        config.output_dir.display()
    ));

    let total = collection.len();
    let mut done = 0;
    let start = std::time::Instant::now();
    let outcomes = collection
        .save_all_with_progress(&config.save_options(), |outcome| {
            done += 1;
            formatter.progress(done, total, Some(&outcome.begin));
        })
        .await;
    let stats = SaveStatistics::from_outcomes(&outcomes, start.elapsed());

    if cli.json {
        println!("{}", SaveReport::new(&outcomes, stats.clone()).to_json()?);
    } else {
        output::display_save_summary(&formatter, &outcomes, &stats);
    }

    if stats.failed() > 0 {
        return Err(MarisolError::SaveFailed {
            failed: stats.failed(),
            total: stats.total(),
        });
    }

    Ok(())
}

/// Load every input and apply the configured legend and redactions.
async fn build_collection(
    config: &Config,
    inputs: &[std::path::PathBuf],
    formatter: &OutputFormatter,
) -> Result<Collection> {
    let mut collection = Collection::from_config(config)?;

    for path in inputs {
        collection.append_path(path).await?;
        if let Some(document) = collection.documents().last() {
            formatter.debug(&format!("{} -> {document}", path.display()));
        }
    }

    if let Some(legend) = config.legend_overlay() {
        collection.add_overlay_to_all(legend)?;
    }

    for entry in &config.redactions {
        collection.add_redaction(&entry.page, entry.redaction.clone())?;
    }

    Ok(collection)
}
