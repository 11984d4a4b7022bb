use std::path::PathBuf;

use thiserror::Error;

use crate::league::League;

/// Errors raised while scraping, extracting, or writing datasets.
///
/// A page without any script nodes is not an error; fetchers report it as
/// [`crate::page::PageScripts::Unavailable`].
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The request never produced a usable response (connection error,
    /// timeout, or a server-side failure status). Fatal for the run.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The shared HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    /// A page returned script nodes but the embedded payload did not have
    /// the expected shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// No season page of the range yielded a team, so there is nothing
    /// trustworthy to store for the league.
    #[error("no teams found for {league} in {first_year}..={last_year}")]
    NoTeams {
        league: League,
        first_year: i32,
        last_year: i32,
    },

    /// A dataset is missing a column the operation depends on.
    #[error("missing column `{column}`")]
    MissingColumn { column: String },

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error at {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A CSV row has more cells than the header names.
    #[error("csv {} line {line}: {cells} cells, header has {width}", path.display())]
    WideRow {
        path: PathBuf,
        line: u64,
        cells: usize,
        width: usize,
    },

    /// A checkpoint file contained a line that does not decode.
    #[error("checkpoint {} line {line}: {reason}", path.display())]
    Checkpoint {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

impl ScrapeError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        ScrapeError::MalformedPayload(msg.into())
    }

    pub fn transport(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ScrapeError::Transport {
            url: url.into(),
            source: source.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScrapeError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        ScrapeError::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ScrapeError::Transport { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ScrapeError::MalformedPayload(_))
    }
}
