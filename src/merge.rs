//! Folding per-run shot exports into the canonical dataset.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::ScrapeError;
use crate::config::{CANONICAL_SHOTS_FILE, DatasetConfig};
use crate::table::{ColumnFix, Table};

pub const PLAYER_COLUMN: &str = "player";

/// understat leaves apostrophes HTML-encoded in player names.
const ENCODED_APOSTROPHE: &str = "&#039;";

/// Decodes `&#039;` in the player column. Batches without the column are
/// left alone.
pub fn fix_player_names(table: &mut Table) -> ColumnFix {
    let fix = table.replace_in_column(PLAYER_COLUMN, ENCODED_APOSTROPHE, "'");
    if fix == ColumnFix::MissingColumn && !table.headers.is_empty() {
        warn!("batch has no `{PLAYER_COLUMN}` column, skipping name fix");
    }
    fix
}

/// Row-wise union of `tables` followed by the player-name fix. No rows are
/// de-duplicated.
pub fn merge_tables(tables: &[Table]) -> Table {
    let mut merged = Table::concat(tables);
    fix_player_names(&mut merged);
    merged
}

/// Top-level `*.csv` files of the datasets directory, the canonical file
/// excluded, sorted by name.
pub fn list_export_files(config: &DatasetConfig) -> Result<Vec<PathBuf>, ScrapeError> {
    let dir = &config.datasets_dir;
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).map_err(|err| ScrapeError::io(dir, err))? {
        let path = entry.map_err(|err| ScrapeError::io(dir, err))?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        if path.file_name().and_then(|n| n.to_str()) == Some(CANONICAL_SHOTS_FILE) {
            continue;
        }
        out.push(path);
    }
    out.sort();
    Ok(out)
}

pub fn merge_export_files(paths: &[PathBuf]) -> Result<Table, ScrapeError> {
    let tables = paths
        .iter()
        .map(|p| Table::read_csv(p))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(merge_tables(&tables))
}

#[derive(Debug, Clone)]
pub struct MergeSummary {
    pub files: Vec<PathBuf>,
    pub rows: usize,
    pub output: PathBuf,
}

/// Rebuilds the canonical dataset from every per-run export, overwriting
/// whatever canonical file existed.
pub fn merge_shot_exports(config: &DatasetConfig) -> Result<MergeSummary, ScrapeError> {
    let files = list_export_files(config)?;
    let merged = merge_export_files(&files)?;
    let output = config.canonical_shots_path();
    merged.write_csv(&output)?;
    info!(files = files.len(), rows = merged.len(), "canonical dataset rebuilt");
    Ok(MergeSummary {
        files,
        rows: merged.len(),
        output,
    })
}

/// Loads the canonical dataset; a missing file reads as an empty table.
pub fn load_canonical(path: &Path) -> Result<Table, ScrapeError> {
    if !path.exists() {
        warn!(path = %path.display(), "no canonical dataset yet, starting empty");
        return Ok(Table::default());
    }
    Table::read_csv(path)
}

/// New batch first, then the existing canonical rows. Only the batch gets
/// the name fix; canonical rows were fixed when they were merged.
pub fn fold_batch(mut batch: Table, canonical: Table) -> Table {
    fix_player_names(&mut batch);
    Table::concat(&[batch, canonical])
}
