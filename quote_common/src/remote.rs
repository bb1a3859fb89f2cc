//! Remote endpoint access: fetching server quotes and pushing the local list.
//!
//! The endpoint speaks plain JSON over HTTP. A GET returns an array of server-side
//! items; only the first `limit` are used, and each item's `title` becomes the text
//! of a quote tagged with the `Server` category. A POST receives the local list as is.
//!
//! Sync must never fail because of the network, so [`fetch_or_empty`] turns every
//! failure into an empty list after logging it.

use std::time::Duration;

use log::{debug, error};
use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::QuoteError;
use crate::net::{REQUEST_TIMEOUT_SECS, SERVER_CATEGORY};
use crate::quote::{Quote, QuoteList};
use crate::result::Result;

/// Source of server-side quotes and sink for local pushes.
pub trait RemoteSource {
    /// Fetch at most `limit` quotes from the server.
    fn fetch(&self, limit: usize) -> Result<QuoteList>;
    /// Send the full local list to the server.
    fn push(&self, quotes: &[Quote]) -> Result<()>;
}

/// HTTP client for a JSON endpoint.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    endpoint: String,
    client: Client,
}

impl RemoteClient {
    /// Build a client for `endpoint` with the default request timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

impl RemoteSource for RemoteClient {
    fn fetch(&self, limit: usize) -> Result<QuoteList> {
        debug!("Fetching quotes from {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::RemoteStatus(status.as_u16()));
        }
        let body = response.bytes()?;
        parse_remote_items(&body, limit)
    }

    fn push(&self, quotes: &[Quote]) -> Result<()> {
        let response = self.client.post(&self.endpoint).json(quotes).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::RemoteStatus(status.as_u16()));
        }
        Ok(())
    }
}

/// Map the first `limit` items of a server payload to quotes.
///
/// Items without a non-blank string `title` are skipped; they still count towards
/// `limit`. A payload that is not a JSON array is a parse error.
pub fn parse_remote_items(bytes: &[u8], limit: usize) -> Result<QuoteList> {
    let items: Vec<Value> = serde_json::from_slice(bytes)
        .map_err(|e| QuoteError::Parse(format!("server payload is not a JSON array: {}", e)))?;

    Ok(items
        .iter()
        .take(limit)
        .filter_map(|item| item.get("title")?.as_str())
        .filter_map(|title| Quote::new(title, SERVER_CATEGORY).ok())
        .collect())
}

/// Fetch from `source`, logging any failure and returning an empty list instead.
pub fn fetch_or_empty<R: RemoteSource + ?Sized>(source: &R, limit: usize) -> QuoteList {
    match source.fetch(limit) {
        Ok(quotes) => {
            debug!("Fetched {} server quotes", quotes.len());
            quotes
        }
        Err(e) => {
            error!("Error fetching quotes from server: {}", e);
            QuoteList::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_maps_titles_to_server_quotes() {
        let body = br#"[
            {"userId": 1, "id": 1, "title": " first ", "body": "..."},
            {"userId": 1, "id": 2, "title": "second", "body": "..."}
        ]"#;
        let quotes = parse_remote_items(body, 5).unwrap();
        assert_eq!(
            quotes,
            vec![
                Quote::new("first", "Server").unwrap(),
                Quote::new("second", "Server").unwrap(),
            ]
        );
    }

    #[test]
    fn parse_honours_limit_and_skips_unusable_items() {
        let body = br#"[{"title":"a"},{"title":""},{"id":3},{"title":7},{"title":"e"},{"title":"f"}]"#;
        let quotes = parse_remote_items(body, 5).unwrap();
        assert_eq!(
            quotes,
            vec![
                Quote::new("a", "Server").unwrap(),
                Quote::new("e", "Server").unwrap(),
            ]
        );
    }

    #[test]
    fn parse_rejects_non_array_payload() {
        assert!(matches!(
            parse_remote_items(br#"{"title":"a"}"#, 5),
            Err(QuoteError::Parse(_))
        ));
    }

    #[test]
    fn unreachable_endpoint_yields_empty_list() {
        // Port 1 on loopback is not listening; connect is refused immediately.
        let client = RemoteClient::new("http://127.0.0.1:1/posts").unwrap();
        assert!(client.fetch(5).is_err());
        assert!(fetch_or_empty(&client, 5).is_empty());
    }
}
