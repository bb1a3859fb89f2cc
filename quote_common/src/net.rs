//! Shared defaults for the remote endpoint and the sync schedule.

/// Endpoint queried for server-side quotes and receiving pushes.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";
/// Number of remote items taken per fetch.
pub const DEFAULT_FETCH_LIMIT: usize = 5;
/// Seconds between two scheduled syncs.
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 30;
/// Category attached to every quote mapped from a remote item.
pub const SERVER_CATEGORY: &str = "Server";
/// Directory holding the durable storage slots.
pub const DEFAULT_DATA_DIR: &str = "quote_data";
/// Timeout applied to every remote request, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
