//! Interactive session.
//!
//! Each line is split into words and parsed with the same `clap` subcommands as the
//! command line, so `filter Wisdom` or `add --text "Be kind." --category Life` work
//! as typed. The session keeps one store open, which is what makes `last` useful:
//! the last viewed quote lives only as long as the session.
//!
//! With `--auto-sync N` a `SyncScheduler` runs on a background thread for the
//! lifetime of the session and is stopped when the user leaves.
use crate::app::App;
use crate::args::ShellLine;
use clap::Parser;
use crossbeam_channel::unbounded;
use log::{error, info};
use quote_common::remote::RemoteSource;
use quote_common::schedule::SyncScheduler;
use quote_common::storage::KeyValueStore;
use quote_common::{QuoteError, Result};
use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

const PROMPT: &str = "quotes> ";

/// Run the session until `exit`, `quit` or end of input.
pub fn run_shell<S, R, I, W>(app: &App<S, R>, auto_sync: Option<u64>, input: I, out: &mut W) -> Result<()>
where
    S: KeyValueStore + Send + 'static,
    R: RemoteSource + Send + Sync + 'static,
    I: BufRead,
    W: Write,
{
    let background = auto_sync.map(|secs| {
        let (stop_tx, stop_rx) = unbounded::<()>();
        let syncer = app.syncer();
        info!("Background sync every {}s", secs);
        let handle = thread::spawn(move || {
            SyncScheduler::run(syncer, Duration::from_secs(secs), stop_rx)
        });
        (stop_tx, handle)
    });

    writeln!(out, "Type a command (`help` for the list, `exit` to leave).")?;
    let result = read_eval_loop(app, input, out);

    if let Some((stop_tx, handle)) = background {
        let _ = stop_tx.send(());
        if handle.join().is_err() {
            error!("Background sync thread panicked");
        }
    }
    result
}

fn read_eval_loop<S, R, I, W>(app: &App<S, R>, input: I, out: &mut W) -> Result<()>
where
    S: KeyValueStore,
    R: RemoteSource + Send + Sync + 'static,
    I: BufRead,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            return Ok(());
        };
        let line = line?;
        let words = match split_words(&line) {
            Ok(words) => words,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        match words.first().map(String::as_str) {
            None => continue,
            Some("exit" | "quit") => return Ok(()),
            Some(_) => {}
        }

        match ShellLine::try_parse_from(&words) {
            Ok(parsed) => {
                if let Err(e) = app.execute(&parsed.command, out) {
                    writeln!(out, "{}", e)?;
                }
            }
            // Covers `help` as well as real mistakes; clap renders both.
            Err(e) => write!(out, "{}", e.render())?,
        }
    }
}

/// Split a line into words, honouring double quotes and backslash escapes inside them.
pub fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            '\\' if quoted => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        return Err(QuoteError::Parse("unterminated quote".to_string()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
