//! Season-page procedures: team sets per league and player tables per
//! league-season.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::ScrapeError;
use crate::assembler::DatasetAssembler;
use crate::builders::{PlayerRecordBuilder, TeamSetBuilder};
use crate::checkpoint::{CheckpointStore, TeamSet};
use crate::config::DatasetConfig;
use crate::league::{League, SeasonKey};
use crate::page::PageFetcher;
use crate::table::Table;

/// Union of team names over `first_year..=last_year` for one league.
/// Seasons without a page are skipped with a warning, but a range that
/// yields no team at all is an error.
pub fn collect_team_set<F: PageFetcher>(
    assembler: &DatasetAssembler<F, TeamSetBuilder>,
    league: League,
    first_year: i32,
    last_year: i32,
) -> Result<TeamSet, ScrapeError> {
    let mut teams = TeamSet::new();
    for year in first_year..=last_year {
        let key = SeasonKey::new(league, year);
        match assembler.fetch_items(key)? {
            Some(names) => teams.extend(names),
            None => warn!(%key, "season page unavailable"),
        }
    }
    if teams.is_empty() {
        return Err(ScrapeError::NoTeams {
            league,
            first_year,
            last_year,
        });
    }
    Ok(teams)
}

/// Builds and persists the team set of every configured league. Each set
/// is regenerated from scratch. A league whose pages yield no team fails
/// the run and its stored set is left as it was.
pub fn build_team_sets<F: PageFetcher>(
    fetcher: F,
    config: &DatasetConfig,
    first_year: i32,
    last_year: i32,
) -> Result<BTreeMap<League, TeamSet>, ScrapeError> {
    let assembler = DatasetAssembler::new(fetcher, TeamSetBuilder::new(config));
    let store = CheckpointStore::new(config);
    let mut out = BTreeMap::new();

    for league in &config.leagues {
        let teams = collect_team_set(&assembler, *league, first_year, last_year)?;
        store.save_team_set(*league, &teams)?;
        info!(%league, teams = teams.len(), "team set saved");
        out.insert(*league, teams);
    }
    Ok(out)
}

/// Writes one players CSV per configured league and year.
pub fn export_player_tables<F: PageFetcher>(
    fetcher: F,
    config: &DatasetConfig,
    first_year: i32,
    last_year: i32,
) -> Result<Vec<PathBuf>, ScrapeError> {
    let assembler = DatasetAssembler::new(fetcher, PlayerRecordBuilder::new(config));
    let mut written = Vec::new();

    for key in config.season_grid(first_year, last_year) {
        let Some(players) = assembler.fetch_items(key)? else {
            warn!(%key, "season page unavailable, no players file");
            continue;
        };
        let path = config.players_path(&key);
        Table::from_records(&players).write_csv(&path)?;
        info!(%key, players = players.len(), "players exported");
        written.push(path);
    }
    Ok(written)
}
