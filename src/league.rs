use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The six leagues understat covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum League {
    Epl,
    LaLiga,
    Bundesliga,
    SerieA,
    Ligue1,
    Rfpl,
}

impl League {
    pub const ALL: [League; 6] = [
        League::Epl,
        League::LaLiga,
        League::Bundesliga,
        League::SerieA,
        League::Ligue1,
        League::Rfpl,
    ];

    /// Spelling used in understat league URLs and team-set file names.
    pub fn site_name(self) -> &'static str {
        match self {
            League::Epl => "EPL",
            League::LaLiga => "La_liga",
            League::Bundesliga => "Bundesliga",
            League::SerieA => "Serie_A",
            League::Ligue1 => "Ligue_1",
            League::Rfpl => "RFPL",
        }
    }

    /// Lowercased name used for per-league directories and file names.
    pub fn dir_name(self) -> String {
        self.site_name().to_ascii_lowercase()
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.site_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLeague(pub String);

impl fmt::Display for UnknownLeague {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown league `{}`", self.0)
    }
}

impl std::error::Error for UnknownLeague {}

impl FromStr for League {
    type Err = UnknownLeague;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        League::ALL
            .into_iter()
            .find(|league| league.dir_name() == key)
            .ok_or_else(|| UnknownLeague(raw.trim().to_string()))
    }
}

/// One league-season, e.g. EPL 2019 (the 2019/20 season).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeasonKey {
    pub league: League,
    pub year: i32,
}

impl SeasonKey {
    pub fn new(league: League, year: i32) -> Self {
        Self { league, year }
    }

    /// `2019` -> `19-20`, `2099` -> `99-00`.
    pub fn season_label(&self) -> String {
        format!(
            "{:02}-{:02}",
            self.year.rem_euclid(100),
            (self.year + 1).rem_euclid(100)
        )
    }

    /// Path segment appended to the league URL base: `EPL/2019`.
    pub fn url_path(&self) -> String {
        format!("{}/{}", self.league.site_name(), self.year)
    }

    pub fn shots_file_name(&self) -> String {
        format!(
            "shots_{}_{}.csv",
            self.league.dir_name(),
            self.season_label()
        )
    }

    pub fn players_file_name(&self) -> String {
        format!(
            "players_{}_{}.csv",
            self.league.dir_name(),
            self.season_label()
        )
    }

    /// Every (league, year) pair, leagues outermost.
    pub fn grid(leagues: &[League], first_year: i32, last_year: i32) -> Vec<SeasonKey> {
        let mut out = Vec::new();
        for league in leagues {
            for year in first_year..=last_year {
                out.push(SeasonKey::new(*league, year));
            }
        }
        out
    }
}

impl fmt::Display for SeasonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.league, self.year)
    }
}
