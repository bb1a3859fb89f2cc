//! The quote store: the in-memory list and the storage slots mirroring it.
//!
//! `QuoteStore` owns the quote list, a durable `KeyValueStore` that receives the
//! whole list after every mutation, and a session `MemoryStore` holding the last
//! quote shown. The durable backend is generic so the binaries can use `FileStore`
//! while tests run against `MemoryStore`.
//!
//! Loading never fails: a missing slot, an unreadable slot or malformed JSON all
//! fall back to the built-in defaults. Mutations validate first and only then
//! touch the list, so a rejected call leaves the store unchanged. A mutation whose
//! save fails is rolled back before the error is returned.

use std::mem;

use log::{debug, info, warn};
use rand::Rng;
use serde_json::Value;

use crate::category::{CategoryFilter, unique_categories};
use crate::error::QuoteError;
use crate::merge::{CaseMode, dedupe, merge_into};
use crate::quote::{Quote, QuoteList, default_quotes};
use crate::result::Result;
use crate::snapshot::{ImportReport, decode_snapshot, export_snapshot};
use crate::storage::{
    KeyValueStore, LAST_FILTER_KEY, LAST_VIEWED_KEY, MemoryStore, QUOTES_KEY,
};

/// Read the quote list from `storage`, falling back to the defaults.
///
/// Records of a well-formed array that fail shape validation are dropped one by one;
/// anything else unreadable counts as an empty slot.
pub fn load_quotes<S: KeyValueStore + ?Sized>(storage: &S) -> QuoteList {
    let raw = match storage.get(QUOTES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No stored quotes, using defaults");
            return default_quotes();
        }
        Err(e) => {
            warn!("Failed to read stored quotes, using defaults: {}", e);
            return default_quotes();
        }
    };

    match serde_json::from_str::<Vec<Value>>(&raw) {
        Ok(records) => records.iter().filter_map(Quote::from_value).collect(),
        Err(e) => {
            warn!("Stored quotes are malformed, using defaults: {}", e);
            default_quotes()
        }
    }
}

/// Owner of the quote list and its storage slots.
pub struct QuoteStore<S: KeyValueStore> {
    quotes: QuoteList,
    durable: S,
    session: MemoryStore,
}

impl<S: KeyValueStore> QuoteStore<S> {
    /// Open the store, loading the list from `durable`.
    pub fn open(durable: S) -> Self {
        let quotes = load_quotes(&durable);
        debug!("Loaded {} quotes", quotes.len());
        Self {
            quotes,
            durable,
            session: MemoryStore::new(),
        }
    }

    /// Current list, in insertion order.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Number of quotes held.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Durable backend, mainly for inspection.
    pub fn durable(&self) -> &S {
        &self.durable
    }

    /// Write the full list to durable storage, replacing what was there.
    pub fn save(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.quotes)?;
        self.durable.set(QUOTES_KEY, &json)?;
        debug!("Saved {} quotes", self.quotes.len());
        Ok(())
    }

    /// Validate, append and persist a new quote. The list is left untouched when
    /// saving fails.
    pub fn add(&mut self, text: &str, category: &str) -> Result<Quote> {
        let quote = Quote::new(text, category)?;
        let before = self.quotes.len();
        self.quotes.push(quote.clone());
        self.save_or_truncate(before)?;
        info!("Quote added: {}", quote);
        Ok(quote)
    }

    /// Pick a uniformly random quote passing `filter`, or `None` when nothing matches.
    pub fn pick_random(&mut self, filter: &CategoryFilter) -> Option<Quote> {
        self.pick_random_with(filter, &mut rand::rng())
    }

    /// [`Self::pick_random`] with a caller-supplied random source.
    pub fn pick_random_with<R: Rng>(
        &mut self,
        filter: &CategoryFilter,
        rng: &mut R,
    ) -> Option<Quote> {
        let matching: Vec<&Quote> = self.quotes.iter().filter(|q| filter.matches(q)).collect();
        if matching.is_empty() {
            return None;
        }
        let chosen = matching[rng.random_range(0..matching.len())].clone();
        self.remember_viewed(&chosen);
        Some(chosen)
    }

    /// Select `filter` as the current filter and pick a quote from it.
    ///
    /// The filter is saved as the last filter. Selecting `All` only records the
    /// choice and returns `None`; callers prompt for a fresh pick instead.
    pub fn filter(&mut self, filter: &CategoryFilter) -> Result<Option<Quote>> {
        self.save_last_filter(filter)?;
        match filter {
            CategoryFilter::All => Ok(None),
            CategoryFilter::Category(_) => Ok(self.pick_random(filter)),
        }
    }

    /// Unique categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        unique_categories(&self.quotes)
    }

    /// Persist `filter` as the last selected filter.
    pub fn save_last_filter(&mut self, filter: &CategoryFilter) -> Result<()> {
        self.durable.set(LAST_FILTER_KEY, &filter.to_string())
    }

    /// Last selected filter, `All` when none was saved or the slot is unreadable.
    pub fn last_filter(&self) -> CategoryFilter {
        match self.durable.get(LAST_FILTER_KEY) {
            Ok(raw) => CategoryFilter::from(raw.as_deref()),
            Err(e) => {
                warn!("Failed to read last filter: {}", e);
                CategoryFilter::All
            }
        }
    }

    /// Last filter if its category still exists in the list, otherwise `All`.
    pub fn restored_filter(&self) -> CategoryFilter {
        match self.last_filter() {
            CategoryFilter::Category(name) if !self.categories().contains(&name) => {
                debug!("Saved filter {} no longer matches any quote", name);
                CategoryFilter::All
            }
            filter => filter,
        }
    }

    /// Last quote returned by a random pick during this session.
    pub fn last_viewed(&self) -> Option<Quote> {
        let raw = self.session.get(LAST_VIEWED_KEY).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    /// Serialized snapshot of the whole list.
    pub fn export(&self) -> Result<Vec<u8>> {
        export_snapshot(&self.quotes)
    }

    /// Parse `bytes` and append every accepted record, then persist.
    ///
    /// Nothing is appended when the payload is rejected as a whole.
    pub fn import(&mut self, bytes: &[u8]) -> Result<ImportReport> {
        let report = decode_snapshot(bytes)?;
        if !report.accepted.is_empty() {
            let before = self.quotes.len();
            self.quotes.extend(report.accepted.iter().cloned());
            self.save_or_truncate(before)?;
        }
        info!(
            "Imported {} quotes ({} discarded)",
            report.accepted.len(),
            report.discarded
        );
        Ok(report)
    }

    /// Append-merge `remote` into the list and persist when anything was added.
    pub fn merge_remote(&mut self, remote: &[Quote]) -> Result<usize> {
        let before = self.quotes.len();
        let added = merge_into(&mut self.quotes, remote);
        if added > 0 {
            self.save_or_truncate(before)?;
        }
        Ok(added)
    }

    /// Replace the whole list with `quotes` and persist.
    pub fn replace_all(&mut self, quotes: QuoteList) -> Result<()> {
        let previous = mem::replace(&mut self.quotes, quotes);
        if let Err(e) = self.save() {
            self.quotes = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Drop repeated (text, category) pairs and persist. Returns how many were removed.
    pub fn dedupe(&mut self, mode: CaseMode) -> Result<usize> {
        let previous = self.quotes.clone();
        let removed = dedupe(&mut self.quotes, mode);
        if removed > 0 {
            if let Err(e) = self.save() {
                self.quotes = previous;
                return Err(e);
            }
            info!("Removed {} duplicate quotes", removed);
        }
        Ok(removed)
    }

    /// Save, or drop everything appended past `len` when saving fails.
    fn save_or_truncate(&mut self, len: usize) -> Result<()> {
        let saved = self.save();
        if saved.is_err() {
            self.quotes.truncate(len);
        }
        saved
    }

    fn remember_viewed(&mut self, quote: &Quote) {
        let stored = serde_json::to_string(quote)
            .map_err(QuoteError::from)
            .and_then(|json| self.session.set(LAST_VIEWED_KEY, &json));
        if let Err(e) = stored {
            warn!("Failed to remember last viewed quote: {}", e);
        }
    }
}
