//! Error taxonomy for the compatibility-and-pagination core.
//!
//! Every kind here is surfaced to the immediate caller; recovery decisions
//! (retry, accept a partial result, abort) belong there, never inside the
//! core. No kind is fatal to the session: each is scoped to the invocation
//! that produced it, and the version cache remains valid afterwards.

use std::num::NonZeroUsize;

use thiserror::Error;

use crate::identifiers::ServerKey;
use crate::paging::AggregatedResult;
use crate::version::{VersionRequirement, VersionTuple};

/// Boxed transport-layer error produced by a collaborator.
///
/// The core treats collaborator failures as opaque; they are preserved as
/// error sources, never inspected or retried.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ---------------------------------------------------------------------------

/// A version string matching neither recognised release shape.
///
/// Returned by [`crate::version::normalize`]; a string that produced this
/// error never populates the version cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("version string '{raw}' matches neither the YYYY.MM calendar shape nor the YY.Q quarterly shape")]
pub struct MalformedVersion {
    /// The string exactly as the server reported it.
    pub raw: String,
}

// ---------------------------------------------------------------------------

/// Failures raised by [`crate::gate::CompatibilityGate`] before the wrapped
/// operation runs.
///
/// In both variants the wrapped operation is never invoked, so it produces
/// no partial side effects.
#[derive(Debug, Error)]
pub enum CompatError {
    /// The server's version could not be resolved: the version fetch failed
    /// at the transport level, or it succeeded but returned an unparsable
    /// string. Nothing is cached in either case.
    #[error("failed to resolve the software version reported by {server}")]
    VersionResolution {
        /// The server whose version was being resolved.
        server: ServerKey,
        /// The transport failure, or the [`MalformedVersion`] from parsing,
        /// preserved unchanged.
        #[source]
        source: BoxError,
    },

    /// The resolved version is below the operation's requirement.
    #[error(
        "{operation} requires server version {required} or later, but {server} reports {current} ('{raw}')"
    )]
    IncompatibleVersion {
        /// Name of the gated operation.
        operation: String,
        /// The server that reported the insufficient version.
        server: ServerKey,
        /// The minimum version the operation declares.
        required: VersionRequirement,
        /// The version the server actually reports.
        current: VersionTuple,
        /// The raw version string, for the log trail.
        raw: String,
    },
}

// ---------------------------------------------------------------------------

/// A paged collection that could not run to completion.
///
/// Both variants carry everything fetched before the failure: entries from
/// chunks that completed are never discarded, so the caller can decide
/// whether a partial result is still usable.
#[derive(Debug, Error)]
pub enum AggregationError<T, E> {
    /// A page fetch failed mid-stream. A failure on the very first fetch
    /// carries an empty partial result.
    #[error("page fetch failed after {} entries in {} chunks", .partial.entries.len(), .partial.chunks)]
    Fetch {
        /// Everything accumulated before the failing fetch.
        partial: AggregatedResult<T>,
        /// The page fetcher's own error, preserved unchanged.
        #[source]
        source: E,
    },

    /// The caller-supplied safety cap was reached with data still
    /// outstanding.
    #[error("chunk safety cap of {limit} reached after {} entries", .partial.entries.len())]
    ChunkLimit {
        /// Everything accumulated within the cap.
        partial: AggregatedResult<T>,
        /// The cap that was hit.
        limit: NonZeroUsize,
    },
}

impl<T, E> AggregationError<T, E> {
    /// Whatever had been accumulated when the aggregation stopped.
    pub fn partial(&self) -> &AggregatedResult<T> {
        match self {
            AggregationError::Fetch { partial, .. } => partial,
            AggregationError::ChunkLimit { partial, .. } => partial,
        }
    }

    /// Consumes the error, yielding the partial result.
    pub fn into_partial(self) -> AggregatedResult<T> {
        match self {
            AggregationError::Fetch { partial, .. } => partial,
            AggregationError::ChunkLimit { partial, .. } => partial,
        }
    }
}
