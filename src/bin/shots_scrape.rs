use anyhow::{Context, Result, anyhow};

use understat_datasets::MatchId;
use understat_datasets::cli_args::{args, flag_value, require_flag};
use understat_datasets::config::DatasetConfig;
use understat_datasets::logging::init_tracing;
use understat_datasets::page::HttpPageFetcher;
use understat_datasets::pipeline::scrape_match_range;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let args = args();
    let from: MatchId = require_flag(&args, "from")?;
    let to: MatchId = require_flag(&args, "to")?;
    if from > to {
        return Err(anyhow!("--from {from} is after --to {to}"));
    }
    let export = flag_value(&args, "export").unwrap_or_else(|| format!("shots_{from}_{to}.csv"));
    let checkpoint =
        flag_value(&args, "checkpoint").unwrap_or_else(|| format!("empty_url_{from}_{to}.txt"));

    let config = DatasetConfig::from_env();
    let fetcher = HttpPageFetcher::new()?;
    let ids: Vec<MatchId> = (from..=to).collect();
    let summary = scrape_match_range(fetcher, &config, &ids, &export, &checkpoint)
        .context("range scrape failed")?;

    println!("Range scrape complete");
    println!("Matches attempted: {}", summary.attempted);
    println!("Without data: {}", summary.unresolved);
    println!("Shots: {}", summary.rows);
    println!("Export: {}", summary.export.display());
    println!("Checkpoint: {}", summary.checkpoint.display());
    Ok(())
}
