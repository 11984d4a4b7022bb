use std::time::Duration;

use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

use crate::ScrapeError;

/// Applied to every page fetch; a timeout counts as a transport failure.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("understat_datasets/", env!("CARGO_PKG_VERSION"));

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client, ScrapeError> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(ScrapeError::Client)
    })
}
