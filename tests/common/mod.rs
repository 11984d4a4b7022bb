#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use understat_datasets::ScrapeError;
use understat_datasets::config::DatasetConfig;
use understat_datasets::page::{PageFetcher, PageScripts};

pub const MATCH_BASE: &str = "http://fake.test/match/";
pub const LEAGUE_BASE: &str = "http://fake.test/league/";

#[derive(Debug, Clone)]
pub enum FakePage {
    Scripts(Vec<String>),
    Unavailable,
    ConnectionReset,
}

/// In-memory fetcher. Unknown URLs behave like pages without scripts.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, FakePage>,
    calls: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, page: FakePage) -> Self {
        self.pages.insert(url.into(), page);
        self
    }

    pub fn match_page(self, id: u32, payload: &Value) -> Self {
        self.page(format!("{MATCH_BASE}{id}"), FakePage::Scripts(match_scripts(payload)))
    }

    pub fn broken_match(self, id: u32) -> Self {
        self.page(format!("{MATCH_BASE}{id}"), FakePage::ConnectionReset)
    }

    pub fn season_page(self, path: &str, teams: &Value, players: &Value) -> Self {
        self.page(
            format!("{LEAGUE_BASE}{path}"),
            FakePage::Scripts(season_scripts(teams, players)),
        )
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl PageFetcher for FakeFetcher {
    fn fetch_scripts(&self, url: &str) -> Result<PageScripts, ScrapeError> {
        self.calls.borrow_mut().push(url.to_string());
        match self.pages.get(url) {
            Some(FakePage::Scripts(scripts)) => Ok(PageScripts::Scripts(scripts.clone())),
            Some(FakePage::Unavailable) | None => Ok(PageScripts::Unavailable),
            Some(FakePage::ConnectionReset) => Err(ScrapeError::transport(
                url,
                std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset"),
            )),
        }
    }
}

/// Escapes JSON text the way understat embeds it: everything outside
/// `[A-Za-z0-9 ]` as `\xHH`, non-ASCII as `\uHHHH`.
pub fn js_escape(json: &str) -> String {
    let mut out = String::new();
    for c in json.chars() {
        if c.is_ascii_alphanumeric() || c == ' ' {
            out.push(c);
        } else if c.is_ascii() {
            out.push_str(&format!("\\x{:02X}", c as u32));
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04X}", unit));
            }
        }
    }
    out
}

pub fn embed(var: &str, payload: &Value) -> String {
    format!("\n\tvar {var} = JSON.parse('{}');\n", js_escape(&payload.to_string()))
}

pub fn match_scripts(payload: &Value) -> Vec<String> {
    vec![
        String::new(),
        embed("shotsData", payload),
        embed("rostersData", &Value::Null),
    ]
}

pub fn season_scripts(teams: &Value, players: &Value) -> Vec<String> {
    vec![
        String::new(),
        embed("datesData", &Value::Array(Vec::new())),
        embed("teamsData", teams),
        embed("playersData", players),
    ]
}

pub fn config_in(root: &Path) -> DatasetConfig {
    let mut cfg = DatasetConfig::under(root);
    cfg.match_url_base = MATCH_BASE.to_string();
    cfg.league_url_base = LEAGUE_BASE.to_string();
    cfg
}

pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, contents).expect("write file");
}

pub fn read_file(path: &Path) -> String {
    fs::read_to_string(path).expect("file should be readable")
}

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

pub fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join(name)).expect("fixture file should be readable")
}
