//! Executes CLI and shell commands against the shared quote store.
//!
//! `App` ties together the file-backed `QuoteStore`, the `RemoteClient` and one
//! `Syncer`. Manual `sync` commands and the shell's background sync share that
//! syncer, so they never run two cycles at once.
use crate::args::Command;
use log::debug;
use quote_common::merge::CaseMode;
use quote_common::remote::{RemoteClient, RemoteSource};
use quote_common::snapshot::write_export;
use quote_common::storage::{FileStore, KeyValueStore};
use quote_common::sync::{SyncOptions, SyncOutcome, Syncer};
use quote_common::{CategoryFilter, Quote, QuoteStore, Result};
use std::fs;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

/// Store, syncer and the command handlers working on them.
pub struct App<S: KeyValueStore = FileStore, R: RemoteSource = RemoteClient> {
    store: Arc<Mutex<QuoteStore<S>>>,
    syncer: Arc<Syncer<S, R>>,
}

impl<S, R> App<S, R>
where
    S: KeyValueStore,
    R: RemoteSource + Send + Sync + 'static,
{
    /// Open the store on `storage` and prepare a syncer over `remote`.
    pub fn new(storage: S, remote: R, options: SyncOptions) -> Self {
        let store = Arc::new(Mutex::new(QuoteStore::open(storage)));
        let syncer = Arc::new(Syncer::new(Arc::clone(&store), remote, options));
        Self { store, syncer }
    }

    /// Syncer shared with background schedulers.
    pub fn syncer(&self) -> Arc<Syncer<S, R>> {
        Arc::clone(&self.syncer)
    }

    fn store(&self) -> Result<MutexGuard<'_, QuoteStore<S>>> {
        Ok(self.store.lock()?)
    }

    /// Run `command`, writing user-facing output to `out`.
    ///
    /// `Shell` is not handled here; the caller decides how to start a session.
    pub fn execute<W: Write>(&self, command: &Command, out: &mut W) -> Result<()> {
        debug!("Executing {:?}", command);
        match command {
            Command::Show { category } => self.show(category.as_deref(), out),
            Command::Add { text, category } => {
                let quote = self.store()?.add(text, category)?;
                writeln!(out, "Quote added: {}", quote)?;
                Ok(())
            }
            Command::Filter { category } => self.filter(category, out),
            Command::Categories => self.categories(out),
            Command::List { category } => self.list(category.as_deref(), out),
            Command::Last => {
                match self.store()?.last_viewed() {
                    Some(quote) => writeln!(out, "Last viewed: {}", quote)?,
                    None => writeln!(out, "Nothing viewed in this session yet.")?,
                }
                Ok(())
            }
            Command::Export { out: dir } => {
                let path = write_export(dir, self.store()?.quotes())?;
                writeln!(out, "Exported to {}", path.display())?;
                Ok(())
            }
            Command::Import { path } => {
                let bytes = fs::read(path)?;
                let report = self.store()?.import(&bytes)?;
                writeln!(
                    out,
                    "Imported {} quotes ({} discarded).",
                    report.accepted.len(),
                    report.discarded
                )?;
                Ok(())
            }
            Command::Dedupe { ignore_case } => {
                let mode = if *ignore_case {
                    CaseMode::Insensitive
                } else {
                    CaseMode::Sensitive
                };
                let removed = self.store()?.dedupe(mode)?;
                writeln!(out, "Removed {} duplicate quotes.", removed)?;
                Ok(())
            }
            Command::Sync => {
                let message = match self.syncer.run_once()? {
                    SyncOutcome::Merged { added } => {
                        format!("Quotes synced with server: {} new.", added)
                    }
                    SyncOutcome::Replaced { count } => {
                        format!("Local quotes replaced by {} server quotes.", count)
                    }
                    SyncOutcome::NoChange => "Already up to date.".to_string(),
                    SyncOutcome::Skipped => "A sync is already running.".to_string(),
                };
                writeln!(out, "{}", message)?;
                Ok(())
            }
            Command::Shell { .. } => {
                writeln!(out, "Already in a shell.")?;
                Ok(())
            }
        }
    }

    fn show<W: Write>(&self, category: Option<&str>, out: &mut W) -> Result<()> {
        let mut store = self.store()?;
        let filter = match category {
            Some(raw) => CategoryFilter::parse(raw),
            None => store.restored_filter(),
        };
        match store.pick_random(&filter) {
            Some(quote) => write_quote(out, &quote),
            None => write_empty(out, &filter),
        }
    }

    fn filter<W: Write>(&self, category: &str, out: &mut W) -> Result<()> {
        let filter = CategoryFilter::parse(category);
        let picked = self.store()?.filter(&filter)?;
        match (&filter, picked) {
            (CategoryFilter::All, _) => {
                writeln!(out, "All categories selected. Run `show` for a quote.")?;
                Ok(())
            }
            (_, Some(quote)) => write_quote(out, &quote),
            (_, None) => write_empty(out, &filter),
        }
    }

    fn categories<W: Write>(&self, out: &mut W) -> Result<()> {
        let store = self.store()?;
        let current = store.restored_filter();
        let marker = |selected: bool| if selected { "*" } else { " " };

        writeln!(out, "{} all", marker(current == CategoryFilter::All))?;
        for name in store.categories() {
            let selected = matches!(&current, CategoryFilter::Category(c) if *c == name);
            writeln!(out, "{} {}", marker(selected), name)?;
        }
        Ok(())
    }

    fn list<W: Write>(&self, category: Option<&str>, out: &mut W) -> Result<()> {
        let filter = CategoryFilter::from(category);
        let store = self.store()?;
        let mut shown = 0;
        for quote in store.quotes().iter().filter(|q| filter.matches(q)) {
            shown += 1;
            writeln!(out, "{:>3}. {}", shown, quote)?;
        }
        if shown == 0 {
            return write_empty(out, &filter);
        }
        Ok(())
    }
}

fn write_quote<W: Write>(out: &mut W, quote: &Quote) -> Result<()> {
    writeln!(out, "{}", quote)?;
    Ok(())
}

fn write_empty<W: Write>(out: &mut W, filter: &CategoryFilter) -> Result<()> {
    match filter {
        CategoryFilter::All => writeln!(out, "No quotes available.")?,
        CategoryFilter::Category(name) => writeln!(out, "No quotes available in {}.", name)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_common::QuoteError;
    use quote_common::quote::default_quotes;
    use quote_common::sync::SyncMode;
    use quote_common::{QuoteList, Quote};
    use tempfile::TempDir;

    struct FixedRemote(QuoteList);

    impl RemoteSource for FixedRemote {
        fn fetch(&self, limit: usize) -> Result<QuoteList> {
            Ok(self.0.iter().take(limit).cloned().collect())
        }

        fn push(&self, _quotes: &[Quote]) -> Result<()> {
            Ok(())
        }
    }

    fn app(dir: &TempDir, server: QuoteList) -> App<FileStore, FixedRemote> {
        App::new(
            FileStore::new(dir.path()),
            FixedRemote(server),
            SyncOptions {
                limit: 5,
                mode: SyncMode::Merge,
                push: false,
            },
        )
    }

    fn run(app: &App<FileStore, FixedRemote>, command: Command) -> Result<String> {
        let mut out = Vec::new();
        app.execute(&command, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn add_then_list_shows_new_quote() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, Vec::new());
        let added = run(
            &app,
            Command::Add {
                text: " Act. ".to_string(),
                category: "Now".to_string(),
            },
        )
        .unwrap();
        assert_eq!(added, "Quote added: \"Act.\" (Now)\n");

        let listed = run(
            &app,
            Command::List {
                category: Some("Now".to_string()),
            },
        )
        .unwrap();
        assert_eq!(listed, "  1. \"Act.\" (Now)\n");
    }

    #[test]
    fn add_with_blank_text_is_rejected() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, Vec::new());
        let result = run(
            &app,
            Command::Add {
                text: "  ".to_string(),
                category: "Now".to_string(),
            },
        );
        assert!(matches!(result, Err(QuoteError::Validation(_))));
    }

    #[test]
    fn filter_remembers_category_for_show() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, Vec::new());
        let shown = run(
            &app,
            Command::Filter {
                category: "Wisdom".to_string(),
            },
        )
        .unwrap();
        let wisdom = &default_quotes()[2];
        assert_eq!(shown, format!("{}\n", wisdom));

        for _ in 0..5 {
            let again = run(&app, Command::Show { category: None }).unwrap();
            assert_eq!(again, format!("{}\n", wisdom));
        }
        let last = run(&app, Command::Last).unwrap();
        assert_eq!(last, format!("Last viewed: {}\n", wisdom));
    }

    #[test]
    fn show_reports_empty_category() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, Vec::new());
        let shown = run(
            &app,
            Command::Show {
                category: Some("Nope".to_string()),
            },
        )
        .unwrap();
        assert_eq!(shown, "No quotes available in Nope.\n");
    }

    #[test]
    fn categories_mark_current_filter() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, Vec::new());
        run(
            &app,
            Command::Filter {
                category: "Success".to_string(),
            },
        )
        .unwrap();
        let listed = run(&app, Command::Categories).unwrap();
        assert_eq!(listed, "  all\n  Motivation\n* Success\n  Wisdom\n");
    }

    #[test]
    fn export_import_and_dedupe() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let app = app(&dir, Vec::new());

        let exported = run(
            &app,
            Command::Export {
                out: out.path().to_path_buf(),
            },
        )
        .unwrap();
        let path = exported.trim().trim_start_matches("Exported to ").to_string();

        let imported = run(&app, Command::Import { path: path.into() }).unwrap();
        assert_eq!(imported, "Imported 3 quotes (0 discarded).\n");

        let removed = run(&app, Command::Dedupe { ignore_case: false }).unwrap();
        assert_eq!(removed, "Removed 3 duplicate quotes.\n");
    }

    #[test]
    fn import_of_garbage_fails_without_changes() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, Vec::new());
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "not json").unwrap();

        let result = run(&app, Command::Import { path: bad });
        assert!(matches!(result, Err(QuoteError::Parse(_))));
        let listed = run(&app, Command::List { category: None }).unwrap();
        assert_eq!(listed.lines().count(), default_quotes().len());
    }

    #[test]
    fn sync_reports_new_quotes_once() {
        let dir = TempDir::new().unwrap();
        let server = vec![Quote::new("Fresh", "Server").unwrap()];
        let app = app(&dir, server);

        let first = run(&app, Command::Sync).unwrap();
        assert_eq!(first, "Quotes synced with server: 1 new.\n");
        let second = run(&app, Command::Sync).unwrap();
        assert_eq!(second, "Already up to date.\n");
    }
}
