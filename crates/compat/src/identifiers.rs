//! Newtype identifiers for the compatibility core.
//!
//! Following the convention used across the workspace, identity-bearing
//! concepts get a distinct type instead of a bare `String`, so a server key
//! cannot be confused with an arbitrary host name or URL fragment.

use serde::{Deserialize, Serialize};

/// Identifies one remote UCMDB server within a session.
///
/// Host plus port is enough to tell servers apart for caching purposes. The
/// key is stable across calls within one process and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerKey {
    host: String,
    port: u16,
}

impl ServerKey {
    /// Creates a key from a host name (or address) and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the host component.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port component.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl std::fmt::Display for ServerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
