//! Version gating for operations with a minimum-server-version contract.
//!
//! UCMDB grew its REST surface release by release, so some endpoints are
//! only defined on sufficiently new servers. A [`CompatibilityGate`] wraps
//! such an operation with its [`VersionRequirement`] and resolves the target
//! server's actual version — through the [`VersionCache`], falling back to a
//! [`VersionSource`] round-trip — before letting the operation run.

use std::future::Future;

use async_trait::async_trait;

use crate::cache::{VersionCache, VersionCacheEntry};
use crate::errors::{BoxError, CompatError};
use crate::identifiers::ServerKey;
use crate::version::{self, VersionRequirement};

/// Supplies the raw version string a server reports about itself.
///
/// One network round-trip per call; implementations carry their own timeout
/// policy. Failures reach the gate as opaque transport errors — the gate
/// adds no retry behaviour on top.
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Fetches the server-reported version string, in either release shape.
    async fn fetch_version(&self, server: &ServerKey) -> Result<String, BoxError>;
}

/// Wraps an operation with a minimum-version requirement.
///
/// Constructed per operation (see [`require_version`]); the gating data is a
/// plain value, so the set of requirements stays inspectable rather than
/// hidden in attributes or macros.
#[derive(Debug, Clone)]
pub struct CompatibilityGate {
    operation: String,
    required: VersionRequirement,
}

/// Builds a gate for one named operation — the per-operation factory.
pub fn require_version(
    operation: impl Into<String>,
    required: VersionRequirement,
) -> CompatibilityGate {
    CompatibilityGate::new(operation, required)
}

impl CompatibilityGate {
    /// Creates a gate for `operation` demanding at least `required`.
    pub fn new(operation: impl Into<String>, required: VersionRequirement) -> Self {
        Self {
            operation: operation.into(),
            required,
        }
    }

    /// Name of the gated operation, as used in error messages.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// The minimum version this gate demands.
    pub fn required(&self) -> VersionRequirement {
        self.required
    }

    /// Resolves the server's version, consulting `cache` first.
    ///
    /// At most one `source` round-trip per server per cache lifetime. A
    /// string that fails to normalise never populates the cache, so a later
    /// call resolves again.
    pub async fn resolve<S>(
        &self,
        server: &ServerKey,
        cache: &VersionCache,
        source: &S,
    ) -> Result<VersionCacheEntry, CompatError>
    where
        S: VersionSource + ?Sized,
    {
        if let Some(entry) = cache.get(server) {
            tracing::trace!(%server, version = %entry.version, "version cache hit");
            return Ok(entry);
        }

        let raw = source
            .fetch_version(server)
            .await
            .map_err(|source| CompatError::VersionResolution {
                server: server.clone(),
                source,
            })?;
        let parsed = version::normalize(&raw).map_err(|e| CompatError::VersionResolution {
            server: server.clone(),
            source: Box::new(e),
        })?;
        tracing::debug!(%server, version = %parsed, raw = raw.as_str(), "resolved server version");
        cache.put(server.clone(), parsed, &raw);
        Ok(VersionCacheEntry {
            version: parsed,
            raw,
        })
    }

    /// Runs `operation` if the server satisfies the requirement.
    ///
    /// The operation is invoked only after a successful, satisfied version
    /// check; on [`CompatError::VersionResolution`] or
    /// [`CompatError::IncompatibleVersion`] it never runs, so it produces no
    /// partial side effects. The operation's own result — success or error —
    /// passes through unchanged.
    pub async fn invoke<S, F, Fut, T, E>(
        &self,
        server: &ServerKey,
        cache: &VersionCache,
        source: &S,
        operation: F,
    ) -> Result<T, E>
    where
        S: VersionSource + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<CompatError>,
    {
        let entry = self.resolve(server, cache, source).await?;
        if !entry.version.satisfies(self.required.min_version()) {
            tracing::debug!(
                %server,
                operation = self.operation.as_str(),
                required = %self.required,
                current = %entry.version,
                "operation blocked by server version"
            );
            return Err(CompatError::IncompatibleVersion {
                operation: self.operation.clone(),
                server: server.clone(),
                required: self.required,
                current: entry.version,
                raw: entry.raw,
            }
            .into());
        }
        operation().await
    }
}
