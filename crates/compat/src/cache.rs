//! Per-session cache of resolved server versions.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::identifiers::ServerKey;
use crate::version::VersionTuple;

/// A resolved version together with the raw string it was derived from.
///
/// The raw string is kept for diagnostics only (error messages, log lines);
/// every comparison uses the normalised tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCacheEntry {
    /// The normalised version.
    pub version: VersionTuple,
    /// The string exactly as the server reported it.
    pub raw: String,
}

/// Maps each server to the version it reported, for the lifetime of the
/// owning client or session.
///
/// Entries never expire on their own; [`clear`](VersionCache::clear) and
/// [`clear_all`](VersionCache::clear_all) are the only invalidation paths
/// (e.g. after a server upgrade, or between test runs). The cache performs
/// no fetching itself — resolution belongs to the gate — which keeps it
/// testable without any network mocking.
///
/// Interior mutability is a single mutex around the whole map: entries are
/// written once per server and read thereafter, so contention is negligible.
#[derive(Debug, Default)]
pub struct VersionCache {
    entries: Mutex<HashMap<ServerKey, VersionCacheEntry>>,
}

impl VersionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure lookup; `None` when the server has not been resolved yet.
    pub fn get(&self, server: &ServerKey) -> Option<VersionCacheEntry> {
        self.lock().get(server).cloned()
    }

    /// Stores (or overwrites) the resolved version for a server.
    pub fn put(&self, server: ServerKey, version: VersionTuple, raw: impl Into<String>) {
        self.lock().insert(
            server,
            VersionCacheEntry {
                version,
                raw: raw.into(),
            },
        );
    }

    /// Removes the entry for one server; the next gated call re-resolves it.
    pub fn clear(&self, server: &ServerKey) {
        self.lock().remove(server);
    }

    /// Removes every entry.
    pub fn clear_all(&self) {
        self.lock().clear();
    }

    /// Number of servers currently resolved.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` when no server has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ServerKey, VersionCacheEntry>> {
        // Entries are inserted whole, so the map stays consistent even if a
        // holder panicked; recover rather than propagate the poison.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::VersionTuple;

    fn key(host: &str) -> ServerKey {
        ServerKey::new(host, 8443)
    }

    #[test]
    fn get_returns_what_put_stored() {
        let cache = VersionCache::new();
        let v = VersionTuple::from_parts(2024, 6);
        cache.put(key("a"), v, "24.2");

        let entry = cache.get(&key("a")).unwrap();
        assert_eq!(entry.version, v);
        assert_eq!(entry.raw, "24.2");
        assert!(cache.get(&key("b")).is_none());
    }

    #[test]
    fn put_overwrites_a_prior_entry() {
        let cache = VersionCache::new();
        cache.put(key("a"), VersionTuple::from_parts(2023, 5), "2023.05");
        cache.put(key("a"), VersionTuple::from_parts(2024, 6), "24.2");

        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get(&key("a")).unwrap().version,
            VersionTuple::from_parts(2024, 6)
        );
    }

    #[test]
    fn clear_removes_one_server_only() {
        let cache = VersionCache::new();
        cache.put(key("a"), VersionTuple::from_parts(2023, 5), "2023.05");
        cache.put(key("b"), VersionTuple::from_parts(2024, 6), "24.2");

        cache.clear(&key("a"));
        assert!(cache.get(&key("a")).is_none());
        assert!(cache.get(&key("b")).is_some());

        cache.clear_all();
        assert!(cache.is_empty());
    }
}
