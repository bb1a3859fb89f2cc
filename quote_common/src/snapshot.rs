//! JSON snapshot codec for export, import and the durable quote slot.
//!
//! Exports are pretty-printed arrays. Imports are forgiving: a single object or an
//! array is accepted, and individual records with the wrong shape are dropped. Only
//! bytes that are not JSON at all, or JSON that is neither an object nor an array,
//! are rejected as a whole.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde_json::Value;

use crate::error::QuoteError;
use crate::quote::{Quote, QuoteList};
use crate::result::Result;

/// Outcome of decoding an import payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Records that passed shape validation, in input order.
    pub accepted: QuoteList,
    /// Number of records dropped for failing shape validation.
    pub discarded: usize,
}

/// Serialize `quotes` as pretty-printed JSON.
pub fn export_snapshot(quotes: &[Quote]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(quotes)?)
}

/// Parse an import payload, keeping only records with a valid quote shape.
pub fn import_snapshot(bytes: &[u8]) -> Result<QuoteList> {
    Ok(decode_snapshot(bytes)?.accepted)
}

/// Parse an import payload and report how many records were dropped.
pub fn decode_snapshot(bytes: &[u8]) -> Result<ImportReport> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| QuoteError::Parse(format!("not valid JSON: {}", e)))?;

    let records = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => {
            return Err(QuoteError::Parse(format!(
                "expected a quote object or an array of quotes, got {}",
                json_kind(&other)
            )));
        }
    };

    let total = records.len();
    let accepted: QuoteList = records.iter().filter_map(Quote::from_value).collect();
    let discarded = total - accepted.len();
    if discarded > 0 {
        debug!("Discarded {} of {} records with an invalid shape", discarded, total);
    }

    Ok(ImportReport {
        accepted,
        discarded,
    })
}

/// File name for an export taken at `now`, e.g. `quotes-20240131-235959.json`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("quotes-{}.json", now.format("%Y%m%d-%H%M%S"))
}

/// Write an export of `quotes` into `dir` and return the artifact path.
pub fn write_export(dir: &Path, quotes: &[Quote]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(Utc::now()));
    fs::write(&path, export_snapshot(quotes)?)?;
    info!("Exported {} quotes to {:?}", quotes.len(), path);
    Ok(path)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
