//! Flat-file checkpoints: unresolved match ids and per-league team sets.
//!
//! Files hold one JSON value per line (an integer per id, a JSON string
//! per team name), so any team name round trips.

use std::collections::BTreeSet;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::config::{DatasetConfig, UPDATE_CHECKPOINT};
use crate::league::League;
use crate::table::write_atomic;
use crate::{MatchId, ScrapeError};

pub type TeamSet = BTreeSet<String>;

#[derive(Debug, Clone)]
pub struct CheckpointStore {
    checkpoint_dir: PathBuf,
    teams_dir: PathBuf,
}

impl CheckpointStore {
    pub fn new(config: &DatasetConfig) -> Self {
        Self {
            checkpoint_dir: config.checkpoint_dir.clone(),
            teams_dir: config.teams_dir.clone(),
        }
    }

    pub fn ids_path(&self, name: &str) -> PathBuf {
        self.checkpoint_dir.join(name)
    }

    pub fn team_set_path(&self, league: League) -> PathBuf {
        self.teams_dir.join(format!("{}_teams.txt", league.site_name()))
    }

    pub fn save_ids(&self, name: &str, ids: &[MatchId]) -> Result<(), ScrapeError> {
        write_lines(&self.ids_path(name), ids)
    }

    pub fn load_ids(&self, name: &str) -> Result<Vec<MatchId>, ScrapeError> {
        read_lines(&self.ids_path(name))
    }

    pub fn save_team_set(&self, league: League, teams: &TeamSet) -> Result<(), ScrapeError> {
        let names: Vec<&String> = teams.iter().collect();
        write_lines(&self.team_set_path(league), &names)
    }

    pub fn load_team_set(&self, league: League) -> Result<TeamSet, ScrapeError> {
        let names: Vec<String> = read_lines(&self.team_set_path(league))?;
        Ok(names.into_iter().collect())
    }

    /// Replaces the update checkpoint with every id in `range`. Run once at
    /// the start of a season with the ids the site will use for it.
    pub fn seed_update_checkpoint(
        &self,
        range: RangeInclusive<MatchId>,
    ) -> Result<usize, ScrapeError> {
        let ids: Vec<MatchId> = range.collect();
        self.save_ids(UPDATE_CHECKPOINT, &ids)?;
        info!(ids = ids.len(), "seeded update checkpoint");
        Ok(ids.len())
    }

    /// Drops ids below `first_live_id` from checkpoint `name`. Returns how
    /// many were removed.
    pub fn retain_from(&self, name: &str, first_live_id: MatchId) -> Result<usize, ScrapeError> {
        let mut ids = self.load_ids(name)?;
        let before = ids.len();
        ids.retain(|id| *id >= first_live_id);
        self.save_ids(name, &ids)?;
        Ok(before - ids.len())
    }

    /// Concatenates every checkpoint whose file name starts with `prefix`
    /// (in file-name order, `output` itself excluded) and saves the result
    /// as `output`.
    pub fn merge_unresolved_lists(
        &self,
        prefix: &str,
        output: &str,
    ) -> Result<Vec<MatchId>, ScrapeError> {
        let mut names = Vec::new();
        let dir = &self.checkpoint_dir;
        for entry in fs::read_dir(dir).map_err(|err| ScrapeError::io(dir, err))? {
            let entry = entry.map_err(|err| ScrapeError::io(dir, err))?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name != output && name.starts_with(prefix) && name.ends_with(".txt") {
                names.push(name);
            }
        }
        names.sort();

        let mut merged = Vec::new();
        for name in &names {
            merged.extend(self.load_ids(name)?);
        }
        self.save_ids(output, &merged)?;
        info!(files = names.len(), ids = merged.len(), output, "merged unresolved lists");
        Ok(merged)
    }
}

fn write_lines<T: Serialize>(path: &Path, values: &[T]) -> Result<(), ScrapeError> {
    let mut buf = String::new();
    for value in values {
        let line = serde_json::to_string(value).map_err(|err| ScrapeError::Checkpoint {
            path: path.to_path_buf(),
            line: 0,
            reason: err.to_string(),
        })?;
        buf.push_str(&line);
        buf.push('\n');
    }
    write_atomic(path, buf.as_bytes())
}

fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ScrapeError> {
    let raw = fs::read_to_string(path).map_err(|err| ScrapeError::io(path, err))?;
    let mut out = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value = serde_json::from_str(line).map_err(|err| ScrapeError::Checkpoint {
            path: path.to_path_buf(),
            line: idx + 1,
            reason: err.to_string(),
        })?;
        out.push(value);
    }
    Ok(out)
}
