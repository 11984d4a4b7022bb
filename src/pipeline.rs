//! Shot dataset procedures: bulk range scrape and incremental update.

use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::assembler::{DatasetAssembler, RunAborted};
use crate::builders::ShotRecordBuilder;
use crate::checkpoint::CheckpointStore;
use crate::config::{DatasetConfig, UPDATE_CHECKPOINT};
use crate::merge::{fold_batch, load_canonical};
use crate::page::PageFetcher;
use crate::partition::partition_shots;
use crate::table::Table;
use crate::{MatchId, Record, ScrapeError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Aborted(#[from] RunAborted<MatchId, Record>),
    #[error(transparent)]
    Scrape(#[from] ScrapeError),
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeSummary {
    pub attempted: usize,
    pub unresolved: usize,
    pub rows: usize,
    pub export: PathBuf,
    pub checkpoint: PathBuf,
}

/// Scrapes `ids` into `<datasets>/<export_name>` and stores the ids that
/// had no page under `checkpoint_name`. The export is raw: names are fixed
/// when exports are merged.
pub fn scrape_match_range<F: PageFetcher>(
    fetcher: F,
    config: &DatasetConfig,
    ids: &[MatchId],
    export_name: &str,
    checkpoint_name: &str,
) -> Result<RangeSummary, PipelineError> {
    let assembler = DatasetAssembler::new(fetcher, ShotRecordBuilder::new(config))
        .with_policy(config.malformed_policy);
    let run = assembler.run(ids)?;

    let table = Table::from_records(&run.items);
    let export = config.datasets_dir.join(export_name);
    table.write_csv(&export)?;

    let store = CheckpointStore::new(config);
    store.save_ids(checkpoint_name, &run.unresolved)?;

    info!(
        attempted = ids.len(),
        unresolved = run.unresolved.len(),
        rows = table.len(),
        "range scraped"
    );
    Ok(RangeSummary {
        attempted: ids.len(),
        unresolved: run.unresolved.len(),
        rows: table.len(),
        export,
        checkpoint: store.ids_path(checkpoint_name),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateSummary {
    pub started_at: String,
    pub finished_at: String,
    pub attempted: usize,
    pub resolved: usize,
    pub still_unresolved: usize,
    pub new_rows: usize,
    pub canonical_rows: usize,
    pub partitions: Vec<PathBuf>,
}

/// Retries every id in the update checkpoint, folds the new shots into the
/// canonical dataset, stores the ids that are still empty and regenerates
/// the partitions of `year`.
///
/// Nothing is written unless the whole scrape succeeds, so an aborted run
/// leaves the canonical dataset and the checkpoint untouched.
pub fn update_shots_dataset<F: PageFetcher>(
    fetcher: F,
    config: &DatasetConfig,
    year: i32,
) -> Result<UpdateSummary, PipelineError> {
    let started_at = Utc::now().to_rfc3339();
    let store = CheckpointStore::new(config);

    let mut pending = store.load_ids(UPDATE_CHECKPOINT)?;
    pending.sort_unstable();

    let assembler = DatasetAssembler::new(fetcher, ShotRecordBuilder::new(config))
        .with_policy(config.malformed_policy);
    let run = assembler.run(&pending)?;

    let batch = Table::from_records(&run.items);
    let new_rows = batch.len();
    let canonical_path = config.canonical_shots_path();
    let canonical = load_canonical(&canonical_path)?;
    let merged = fold_batch(batch, canonical);

    merged.write_csv(&canonical_path)?;
    store.save_ids(UPDATE_CHECKPOINT, &run.unresolved)?;
    let partitions = partition_shots(config, &store, year, year)?;

    let summary = UpdateSummary {
        started_at,
        finished_at: Utc::now().to_rfc3339(),
        attempted: pending.len(),
        resolved: pending.len() - run.unresolved.len(),
        still_unresolved: run.unresolved.len(),
        new_rows,
        canonical_rows: merged.len(),
        partitions,
    };
    info!(
        resolved = summary.resolved,
        still_unresolved = summary.still_unresolved,
        new_rows,
        "update complete"
    );
    Ok(summary)
}
