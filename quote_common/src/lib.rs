//!
//! Quote store, snapshot codec and server sync shared by the CLI and the sync daemon.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` used across the workspace.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `quote` — the `Quote` record, its validation and the built-in defaults.
//! - `category` — category filter and category listing.
//! - `storage` — key-value slots (`FileStore`, `MemoryStore`).
//! - `store` — `QuoteStore`, the owner of the quote list.
//! - `snapshot` — JSON export/import.
//! - `merge` — append-merge and dedupe of quote lists.
//! - `remote` — HTTP access to the quote server.
//! - `sync` — single-flight sync cycles.
//! - `schedule` — fixed-interval driver for sync cycles.
//! - `net` — endpoint and schedule defaults.
#![warn(missing_docs)]
pub mod category;
pub mod error;
pub mod merge;
pub mod net;
pub mod quote;
pub mod remote;
pub mod result;
pub mod schedule;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod sync;

pub use category::CategoryFilter;
pub use error::QuoteError;
pub use quote::{Quote, QuoteList};
pub use result::Result;
pub use store::QuoteStore;
