use std::path::{Path, PathBuf};

use tracing::warn;

use crate::league::{League, SeasonKey};

pub const DEFAULT_MATCH_URL: &str = "https://understat.com/match/";
pub const DEFAULT_LEAGUE_URL: &str = "https://understat.com/league/";

pub const CANONICAL_SHOTS_FILE: &str = "shots_dataset.csv";
pub const UPDATE_CHECKPOINT: &str = "empty_url_update.txt";

const DEFAULT_FIRST_YEAR: i32 = 2014;
const DEFAULT_LAST_YEAR: i32 = 2021;

/// What the assembler does when a page returns scripts but the payload
/// cannot be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Abort the whole run.
    #[default]
    Abort,
    /// Log the failure and record the key as unresolved.
    SkipAndRecord,
}

#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub datasets_dir: PathBuf,
    pub checkpoint_dir: PathBuf,
    pub teams_dir: PathBuf,
    pub match_url_base: String,
    pub league_url_base: String,
    pub leagues: Vec<League>,
    pub first_year: i32,
    pub last_year: i32,
    pub malformed_policy: MalformedPolicy,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self::under(".")
    }
}

impl DatasetConfig {
    /// Standard layout below `root`: `datasets/`, `scraping/` and
    /// `scraping/teams_set/`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            datasets_dir: root.join("datasets"),
            checkpoint_dir: root.join("scraping"),
            teams_dir: root.join("scraping").join("teams_set"),
            match_url_base: DEFAULT_MATCH_URL.to_string(),
            league_url_base: DEFAULT_LEAGUE_URL.to_string(),
            leagues: League::ALL.to_vec(),
            first_year: DEFAULT_FIRST_YEAR,
            last_year: DEFAULT_LAST_YEAR,
            malformed_policy: MalformedPolicy::Abort,
        }
    }

    /// Defaults overridden by `UNDERSTAT_*` variables. Values that do not
    /// parse are ignored with a warning.
    pub fn from_env() -> Self {
        let root = env_non_empty("UNDERSTAT_ROOT").unwrap_or_else(|| ".".to_string());
        let mut cfg = Self::under(root);

        if let Some(url) = env_non_empty("UNDERSTAT_MATCH_URL") {
            cfg.match_url_base = url;
        }
        if let Some(url) = env_non_empty("UNDERSTAT_LEAGUE_URL") {
            cfg.league_url_base = url;
        }
        if let Some(raw) = env_non_empty("UNDERSTAT_LEAGUES") {
            let leagues = parse_leagues(&raw);
            if leagues.is_empty() {
                warn!(value = %raw, "UNDERSTAT_LEAGUES has no known league, keeping defaults");
            } else {
                cfg.leagues = leagues;
            }
        }
        if let Some(year) = env_year("UNDERSTAT_FIRST_YEAR") {
            cfg.first_year = year;
        }
        if let Some(year) = env_year("UNDERSTAT_LAST_YEAR") {
            cfg.last_year = year;
        }
        if let Some(raw) = env_non_empty("UNDERSTAT_MALFORMED") {
            match raw.to_ascii_lowercase().as_str() {
                "abort" => cfg.malformed_policy = MalformedPolicy::Abort,
                "skip" => cfg.malformed_policy = MalformedPolicy::SkipAndRecord,
                other => warn!(value = other, "UNDERSTAT_MALFORMED must be `abort` or `skip`"),
            }
        }
        cfg
    }

    pub fn canonical_shots_path(&self) -> PathBuf {
        self.datasets_dir.join(CANONICAL_SHOTS_FILE)
    }

    pub fn league_dir(&self, league: League) -> PathBuf {
        self.datasets_dir.join(league.dir_name())
    }

    pub fn shots_partition_path(&self, key: &SeasonKey) -> PathBuf {
        self.league_dir(key.league).join(key.shots_file_name())
    }

    pub fn players_path(&self, key: &SeasonKey) -> PathBuf {
        self.league_dir(key.league).join(key.players_file_name())
    }

    pub fn season_grid(&self, first_year: i32, last_year: i32) -> Vec<SeasonKey> {
        SeasonKey::grid(&self.leagues, first_year, last_year)
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_year(key: &str) -> Option<i32> {
    let raw = env_non_empty(key)?;
    match raw.parse::<i32>() {
        Ok(year) => Some(year),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable year");
            None
        }
    }
}

fn parse_leagues(raw: &str) -> Vec<League> {
    let mut out = Vec::new();
    for part in raw.split([',', ';']) {
        if part.trim().is_empty() {
            continue;
        }
        match part.parse::<League>() {
            Ok(league) if !out.contains(&league) => out.push(league),
            Ok(_) => {}
            Err(err) => warn!("{err}"),
        }
    }
    out
}
