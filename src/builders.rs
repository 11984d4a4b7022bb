//! Turns extracted payloads into flat records or names.

use std::fmt;

use serde_json::Value;

use crate::config::DatasetConfig;
use crate::extract::{MATCH_SHOTS_SCRIPT, SEASON_PLAYERS_SCRIPT, SEASON_TEAMS_SCRIPT};
use crate::league::SeasonKey;
use crate::{MatchId, Record, ScrapeError};

/// Knows where one kind of payload lives and how to flatten it.
pub trait PayloadBuilder {
    type Key: Copy + fmt::Debug + fmt::Display;
    type Item;

    /// Zero-based position of the payload script on the page.
    const SCRIPT_INDEX: usize;

    fn url(&self, key: Self::Key) -> String;

    fn build(&self, payload: Value) -> Result<Vec<Self::Item>, ScrapeError>;
}

/// Match page: `{"h": [shot, ...], "a": [shot, ...]}`.
#[derive(Debug, Clone)]
pub struct ShotRecordBuilder {
    match_url_base: String,
}

impl ShotRecordBuilder {
    pub fn new(config: &DatasetConfig) -> Self {
        Self {
            match_url_base: config.match_url_base.clone(),
        }
    }
}

impl PayloadBuilder for ShotRecordBuilder {
    type Key = MatchId;
    type Item = Record;

    const SCRIPT_INDEX: usize = MATCH_SHOTS_SCRIPT;

    fn url(&self, key: MatchId) -> String {
        format!("{}{}", self.match_url_base, key)
    }

    /// Home shots followed by away shots. Values are kept verbatim.
    fn build(&self, payload: Value) -> Result<Vec<Record>, ScrapeError> {
        let Value::Object(mut sides) = payload else {
            return Err(ScrapeError::malformed("shots payload is not an object"));
        };
        let home = take_side(&mut sides, "h")?;
        let away = take_side(&mut sides, "a")?;

        let mut out = Vec::with_capacity(home.len() + away.len());
        for shot in home.into_iter().chain(away) {
            out.push(into_record(shot, "shot")?);
        }
        Ok(out)
    }
}

fn take_side(sides: &mut Record, key: &str) -> Result<Vec<Value>, ScrapeError> {
    match sides.remove(key) {
        Some(Value::Array(shots)) => Ok(shots),
        Some(_) => Err(ScrapeError::malformed(format!(
            "shots payload `{key}` is not an array"
        ))),
        None => Err(ScrapeError::malformed(format!(
            "shots payload has no `{key}` side"
        ))),
    }
}

fn into_record(value: Value, what: &str) -> Result<Record, ScrapeError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ScrapeError::malformed(format!(
            "{what} entry is not an object: {other}"
        ))),
    }
}

/// Season page team roster: `{"<team id>": {"id": .., "title": "..", ..}, ..}`.
#[derive(Debug, Clone)]
pub struct TeamSetBuilder {
    league_url_base: String,
}

impl TeamSetBuilder {
    pub fn new(config: &DatasetConfig) -> Self {
        Self {
            league_url_base: config.league_url_base.clone(),
        }
    }
}

impl PayloadBuilder for TeamSetBuilder {
    type Key = SeasonKey;
    type Item = String;

    const SCRIPT_INDEX: usize = SEASON_TEAMS_SCRIPT;

    fn url(&self, key: SeasonKey) -> String {
        format!("{}{}", self.league_url_base, key.url_path())
    }

    fn build(&self, payload: Value) -> Result<Vec<String>, ScrapeError> {
        let Value::Object(teams) = payload else {
            return Err(ScrapeError::malformed("teams payload is not an object"));
        };
        let mut out = Vec::with_capacity(teams.len());
        for (id, team) in teams {
            let title = team
                .get("title")
                .and_then(Value::as_str)
                .ok_or_else(|| ScrapeError::malformed(format!("team {id} has no title")))?;
            out.push(title.to_string());
        }
        Ok(out)
    }
}

/// Season page players: an array of player objects. Older pages keyed
/// players by id, so an object of player objects is accepted too.
#[derive(Debug, Clone)]
pub struct PlayerRecordBuilder {
    league_url_base: String,
}

impl PlayerRecordBuilder {
    pub fn new(config: &DatasetConfig) -> Self {
        Self {
            league_url_base: config.league_url_base.clone(),
        }
    }
}

impl PayloadBuilder for PlayerRecordBuilder {
    type Key = SeasonKey;
    type Item = Record;

    const SCRIPT_INDEX: usize = SEASON_PLAYERS_SCRIPT;

    fn url(&self, key: SeasonKey) -> String {
        format!("{}{}", self.league_url_base, key.url_path())
    }

    fn build(&self, payload: Value) -> Result<Vec<Record>, ScrapeError> {
        let players: Vec<Value> = match payload {
            Value::Array(items) => items,
            Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
            _ => return Err(ScrapeError::malformed("players payload is not a list")),
        };
        players
            .into_iter()
            .map(|player| into_record(player, "player"))
            .collect()
    }
}
