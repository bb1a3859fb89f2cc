//! Command-line arguments for the sync daemon.
//!
//! Every flag can also be set through the environment variable named next to it.
use clap::Parser;
use quote_common::net::{
    DEFAULT_DATA_DIR, DEFAULT_ENDPOINT, DEFAULT_FETCH_LIMIT, DEFAULT_SYNC_INTERVAL_SECS,
};
use quote_common::sync::{SyncMode, SyncOptions};
use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Periodically merges server quotes into the local store", long_about = None)]
pub struct Args {
    /// Directory holding the durable quote slots.
    #[clap(long, env = "QUOTES_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Server endpoint used for fetching and pushing quotes.
    #[clap(long, env = "QUOTES_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Seconds between two sync cycles.
    #[clap(long, env = "QUOTES_SYNC_INTERVAL", default_value_t = DEFAULT_SYNC_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: u64,

    /// Maximum number of server items taken per fetch.
    #[clap(long, default_value_t = DEFAULT_FETCH_LIMIT)]
    pub limit: usize,

    /// Push the local list back to the server after each cycle.
    #[clap(long)]
    pub push: bool,

    /// Replace the local list with server data instead of merging.
    #[clap(long)]
    pub overwrite: bool,
}

impl Args {
    /// Sync tuning derived from the flags.
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            limit: self.limit,
            mode: if self.overwrite {
                SyncMode::Overwrite
            } else {
                SyncMode::Merge
            },
            push: self.push,
        }
    }
}
