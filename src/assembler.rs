//! Sequential scrape driver: fetch, extract and build, key by key.

use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ScrapeError;
use crate::builders::PayloadBuilder;
use crate::config::MalformedPolicy;
use crate::extract::extract_at;
use crate::page::{PageFetcher, PageScripts};

/// What a run produced: keys whose page had no content, and the items of
/// every other key in iteration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembled<K, T> {
    pub unresolved: Vec<K>,
    pub items: Vec<T>,
}

impl<K, T> Default for Assembled<K, T> {
    fn default() -> Self {
        Self {
            unresolved: Vec::new(),
            items: Vec::new(),
        }
    }
}

/// A run stopped early. `partial` holds everything gathered before
/// `failed_at`, which itself is in neither list.
#[derive(Debug, Error)]
#[error("run aborted at {failed_at}: {source}")]
pub struct RunAborted<K: fmt::Debug + fmt::Display, T: fmt::Debug> {
    pub failed_at: K,
    pub partial: Assembled<K, T>,
    #[source]
    pub source: ScrapeError,
}

pub struct DatasetAssembler<F, B> {
    fetcher: F,
    builder: B,
    policy: MalformedPolicy,
}

impl<F, B> DatasetAssembler<F, B>
where
    F: PageFetcher,
    B: PayloadBuilder,
{
    pub fn new(fetcher: F, builder: B) -> Self {
        Self {
            fetcher,
            builder,
            policy: MalformedPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetches one key. `Ok(None)` means the page had no script nodes.
    pub fn fetch_items(&self, key: B::Key) -> Result<Option<Vec<B::Item>>, ScrapeError> {
        let url = self.builder.url(key);
        match self.fetcher.fetch_scripts(&url)? {
            PageScripts::Unavailable => Ok(None),
            PageScripts::Scripts(scripts) => {
                let payload = extract_at(&scripts, B::SCRIPT_INDEX)?;
                self.builder.build(payload).map(Some)
            }
        }
    }

    /// Processes `keys` strictly in order. Transport failures always abort;
    /// malformed payloads abort unless the policy says to skip them.
    pub fn run(
        &self,
        keys: &[B::Key],
    ) -> Result<Assembled<B::Key, B::Item>, RunAborted<B::Key, B::Item>>
    where
        B::Item: fmt::Debug,
    {
        info!(keys = keys.len(), "assembling");
        let mut out = Assembled::default();

        for key in keys {
            let key = *key;
            match self.fetch_items(key) {
                Ok(Some(items)) => {
                    debug!(%key, items = items.len(), "resolved");
                    out.items.extend(items);
                }
                Ok(None) => {
                    debug!(%key, "no content");
                    out.unresolved.push(key);
                }
                Err(err)
                    if err.is_malformed() && self.policy == MalformedPolicy::SkipAndRecord =>
                {
                    warn!(%key, error = %err, "skipping malformed payload");
                    out.unresolved.push(key);
                }
                Err(source) => {
                    warn!(%key, error = %source, "run aborted");
                    return Err(RunAborted {
                        failed_at: key,
                        partial: out,
                        source,
                    });
                }
            }
        }

        info!(
            items = out.items.len(),
            unresolved = out.unresolved.len(),
            "assembled"
        );
        Ok(out)
    }
}
