//! Splits the canonical shots dataset into one file per league-season.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::ScrapeError;
use crate::checkpoint::{CheckpointStore, TeamSet};
use crate::config::DatasetConfig;
use crate::league::SeasonKey;
use crate::merge::load_canonical;
use crate::table::Table;

pub const HOME_TEAM_COLUMN: &str = "h_team";
pub const SEASON_COLUMN: &str = "season";

/// Rows whose home team is in `teams` and whose season equals `year`, in
/// canonical order.
///
/// League membership is decided on the home team only: a row whose away
/// team belongs to the league but whose home team does not is excluded.
pub fn partition_table(
    canonical: &Table,
    teams: &TeamSet,
    year: i32,
) -> Result<Table, ScrapeError> {
    if canonical.headers.is_empty() {
        return Ok(Table::default());
    }
    let home_idx = require_column(canonical, HOME_TEAM_COLUMN)?;
    let season_idx = require_column(canonical, SEASON_COLUMN)?;
    Ok(canonical.filter(|row| {
        let home_in_league = row.get(home_idx).is_some_and(|team| teams.contains(team));
        home_in_league && row.get(season_idx).is_some_and(|s| season_matches(s, year))
    }))
}

fn require_column(table: &Table, column: &str) -> Result<usize, ScrapeError> {
    table
        .column_index(column)
        .ok_or_else(|| ScrapeError::MissingColumn {
            column: column.to_string(),
        })
}

/// Numeric comparison so `2019`, ` 2019` and `2019.0` all match 2019.
fn season_matches(cell: &str, year: i32) -> bool {
    let cell = cell.trim();
    if let Ok(v) = cell.parse::<i64>() {
        return v == i64::from(year);
    }
    cell.parse::<f64>().is_ok_and(|v| v == f64::from(year))
}

/// Writes every (league, year) file for the configured leagues and the
/// given years. Returns the written paths in league-major order.
pub fn partition_shots(
    config: &DatasetConfig,
    store: &CheckpointStore,
    first_year: i32,
    last_year: i32,
) -> Result<Vec<PathBuf>, ScrapeError> {
    let canonical = load_canonical(&config.canonical_shots_path())?;
    let mut written = Vec::new();

    for league in &config.leagues {
        let teams = store.load_team_set(*league)?;
        for year in first_year..=last_year {
            let key = SeasonKey::new(*league, year);
            let part = partition_table(&canonical, &teams, year)?;
            let path = config.shots_partition_path(&key);
            part.write_csv(&path)?;
            debug!(%key, rows = part.len(), "partition written");
            written.push(path);
        }
    }

    info!(files = written.len(), first_year, last_year, "shots partitioned");
    Ok(written)
}
