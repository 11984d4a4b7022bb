use anyhow::{Context, Result};

use understat_datasets::config::DatasetConfig;
use understat_datasets::logging::init_tracing;
use understat_datasets::merge::merge_shot_exports;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let config = DatasetConfig::from_env();
    let summary = merge_shot_exports(&config).context("merge failed")?;

    println!("Merged {} export files", summary.files.len());
    for file in &summary.files {
        println!(" - {}", file.display());
    }
    println!("Rows: {}", summary.rows);
    println!("Output: {}", summary.output.display());
    Ok(())
}
