use anyhow::{Context, Result};

use understat_datasets::checkpoint::CheckpointStore;
use understat_datasets::cli_args::{args, parse_flag};
use understat_datasets::config::DatasetConfig;
use understat_datasets::logging::init_tracing;
use understat_datasets::partition::partition_shots;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let args = args();
    let config = DatasetConfig::from_env();
    let first = parse_flag(&args, "first")?.unwrap_or(config.first_year);
    let last = parse_flag(&args, "last")?.unwrap_or(config.last_year);

    let store = CheckpointStore::new(&config);
    let written = partition_shots(&config, &store, first, last).context("partition failed")?;

    println!("Wrote {} partition files", written.len());
    Ok(())
}
