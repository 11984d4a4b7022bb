//! Page fetching: turns a URL into the texts of the page's inline
//! `<script>` nodes.

use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use tracing::debug;

use crate::ScrapeError;
use crate::http_client::http_client;

static SCRIPT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script").expect("static selector"));

/// Result of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageScripts {
    /// The page has no script nodes at all. understat serves this for ids
    /// that are not (yet) assigned to a match.
    Unavailable,
    /// Script node texts in document order.
    Scripts(Vec<String>),
}

impl PageScripts {
    pub fn from_nodes(nodes: Vec<String>) -> Self {
        if nodes.is_empty() {
            PageScripts::Unavailable
        } else {
            PageScripts::Scripts(nodes)
        }
    }
}

pub trait PageFetcher {
    fn fetch_scripts(&self, url: &str) -> Result<PageScripts, ScrapeError>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn fetch_scripts(&self, url: &str) -> Result<PageScripts, ScrapeError> {
        (**self).fetch_scripts(url)
    }
}

/// Collects every `<script>` node's text. Scripts with only a `src`
/// attribute yield an empty string so positions stay stable.
pub fn script_texts(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    doc.select(&SCRIPT_SELECTOR)
        .map(|node| node.text().collect::<String>())
        .collect()
}

/// Blocking HTTP GET over the shared client.
#[derive(Debug, Clone, Copy)]
pub struct HttpPageFetcher {
    client: &'static Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            client: http_client()?,
        })
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch_scripts(&self, url: &str) -> Result<PageScripts, ScrapeError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|err| ScrapeError::transport(url, err))?;
        let status = resp.status();
        if status.is_server_error() {
            return Err(ScrapeError::transport(url, format!("http {status}")));
        }
        let body = resp
            .text()
            .map_err(|err| ScrapeError::transport(url, err))?;
        let nodes = script_texts(&body);
        debug!(url, %status, scripts = nodes.len(), "fetched page");
        Ok(PageScripts::from_nodes(nodes))
    }
}
