//! Command-line arguments for the quote CLI.
//!
//! This module defines the CLI interface using `clap`. Global flags select the
//! data directory and the server; the subcommand selects the action. See `main`
//! for end-to-end usage.
use clap::{Parser, Subcommand};
use quote_common::net::{DEFAULT_DATA_DIR, DEFAULT_ENDPOINT, DEFAULT_FETCH_LIMIT};
use quote_common::sync::{SyncMode, SyncOptions};
use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Random quotes with local storage and server sync", long_about = None)]
pub struct Args {
    /// Directory holding the durable quote slots.
    #[clap(long, global = true, env = "QUOTES_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Server endpoint used for fetching and pushing quotes.
    #[clap(long, global = true, env = "QUOTES_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Maximum number of server items taken per sync.
    #[clap(long, global = true, default_value_t = DEFAULT_FETCH_LIMIT)]
    pub limit: usize,

    /// Push the local list back to the server after syncing.
    #[clap(long, global = true)]
    pub push: bool,

    /// Replace the local list with server data instead of merging.
    #[clap(long, global = true)]
    pub overwrite: bool,

    /// Action to run; shows a random quote when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    /// Sync tuning derived from the global flags.
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

/// Actions available from the command line and inside the shell.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show a random quote, from the last selected category unless one is given.
    Show {
        /// Category to pick from (`all` for every quote).
        #[clap(long)]
        category: Option<String>,
    },
    /// Add a new quote.
    Add {
        /// Quote text.
        #[clap(long)]
        text: String,
        /// Quote category.
        #[clap(long)]
        category: String,
    },
    /// Select a category filter and show a quote from it.
    Filter {
        /// Category name, or `all`.
        category: String,
    },
    /// List the known categories.
    Categories,
    /// List quotes, optionally from one category.
    List {
        /// Category to list (`all` for every quote).
        #[clap(long)]
        category: Option<String>,
    },
    /// Show the last quote picked in this session.
    Last,
    /// Export all quotes to a timestamped JSON file.
    Export {
        /// Directory receiving the export.
        #[clap(long, default_value = ".")]
        out: PathBuf,
    },
    /// Import quotes from a JSON file (an array or a single object).
    Import {
        /// File to import.
        path: PathBuf,
    },
    /// Remove repeated quotes, keeping the first occurrence.
    Dedupe {
        /// Compare text and category case-insensitively.
        #[clap(long)]
        ignore_case: bool,
    },
    /// Fetch server quotes and merge them into the local list.
    Sync,
    /// Start an interactive session.
    Shell {
        /// Sync in the background every N seconds while the shell is open.
        #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
        auto_sync: Option<u64>,
    },
}

/// One line typed into the shell.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    /// Action to run.
    #[command(subcommand)]
    pub command: Command,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_none() {
        let args = Args::try_parse_from(["quote_cli"]).unwrap();
        assert_eq!(args.command, None);
        assert_eq!(args.limit, DEFAULT_FETCH_LIMIT);
        assert_eq!(args.sync_options().mode, SyncMode::Merge);
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let args =
            Args::try_parse_from(["quote_cli", "sync", "--overwrite", "--push", "--limit", "3"])
                .unwrap();
        assert_eq!(args.command, Some(Command::Sync));
        let options = args.sync_options();
        assert_eq!(options.mode, SyncMode::Overwrite);
        assert!(options.push);
        assert_eq!(options.limit, 3);
    }

    #[test]
    fn add_requires_both_fields() {
        assert!(Args::try_parse_from(["quote_cli", "add", "--text", "x"]).is_err());
        let args = Args::try_parse_from([
            "quote_cli", "add", "--text", "x", "--category", "y",
        ])
        .unwrap();
        assert_eq!(
            args.command,
            Some(Command::Add {
                text: "x".to_string(),
                category: "y".to_string()
            })
        );
    }

    #[test]
    fn shell_line_parses_without_binary_name() {
        let line = ShellLine::try_parse_from(["filter", "Wisdom"]).unwrap();
        assert_eq!(
            line.command,
            Command::Filter {
                category: "Wisdom".to_string()
            }
        );
    }
}
