pub mod assembler;
pub mod builders;
pub mod checkpoint;
pub mod cli_args;
pub mod config;
pub mod error;
pub mod extract;
pub mod http_client;
pub mod league;
pub mod logging;
pub mod merge;
pub mod page;
pub mod partition;
pub mod pipeline;
pub mod season;
pub mod table;

pub use error::ScrapeError;

/// One match on the source site. Validity is only known after fetching.
pub type MatchId = u32;

/// A flat record exactly as the source delivers it, keys in source order.
pub type Record = serde_json::Map<String, serde_json::Value>;
