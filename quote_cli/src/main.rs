//! Quote CLI — shows random quotes from a local store, lets the user add, filter,
//! export, import and deduplicate them, and merges quotes fetched from a server.
//!
//! Usage example (CLI):
//! ```bash
//! quote_cli add --text "Well begun is half done." --category Wisdom
//! quote_cli filter Wisdom
//! quote_cli export --out ./backups
//! quote_cli --endpoint https://example.org/posts sync --push
//! quote_cli shell --auto-sync 30
//! ```
//!
//! Quotes live in the data directory (`--data-dir`, default `./quote_data`) and are
//! saved after every change. The last selected category is remembered between runs.
#![warn(missing_docs)]
mod app;
mod args;
mod shell;

use crate::app::App;
use crate::args::{Args, Command};
use crate::shell::run_shell;
use clap::Parser;
use log::{debug, error};
use quote_common::Result;
use quote_common::remote::RemoteClient;
use quote_common::storage::FileStore;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    init_logger();
    exit_code(run(Args::parse()))
}

/// Log a failed run once and turn it into the process status.
fn exit_code(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    debug!("Using data directory {:?}", args.data_dir);

    let remote = RemoteClient::new(args.endpoint.clone())?;
    let app = App::new(FileStore::new(&args.data_dir), remote, args.sync_options());

    let command = args
        .command
        .clone()
        .unwrap_or(Command::Show { category: None });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = match &command {
        Command::Shell { auto_sync } => run_shell(&app, *auto_sync, io::stdin().lock(), &mut out),
        other => app.execute(other, &mut out),
    };
    app.syncer().wait_for_pushes();
    result
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_common::QuoteError;

    #[test]
    fn failed_run_maps_to_failure_status() {
        let failed = Err(QuoteError::Validation("Please enter both a quote and a category.".into()));
        assert_eq!(exit_code(failed), ExitCode::FAILURE);
        assert_eq!(exit_code(Ok(())), ExitCode::SUCCESS);
    }
}
