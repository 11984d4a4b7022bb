use anyhow::{Context, Result};

use understat_datasets::cli_args::{args, has_flag, require_flag};
use understat_datasets::config::DatasetConfig;
use understat_datasets::logging::init_tracing;
use understat_datasets::page::HttpPageFetcher;
use understat_datasets::pipeline::update_shots_dataset;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let args = args();
    let year: i32 = require_flag(&args, "year")?;

    let config = DatasetConfig::from_env();
    let fetcher = HttpPageFetcher::new()?;
    let summary = update_shots_dataset(fetcher, &config, year).context("update failed")?;

    if has_flag(&args, "json") {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Shots update complete");
    println!("Started: {}", summary.started_at);
    println!("Finished: {}", summary.finished_at);
    println!(
        "Matches resolved: {}/{}",
        summary.resolved, summary.attempted
    );
    println!("Still unresolved: {}", summary.still_unresolved);
    println!("New shots: {}", summary.new_rows);
    println!("Canonical rows: {}", summary.canonical_rows);
    for path in &summary.partitions {
        println!(" - {}", path.display());
    }
    Ok(())
}
