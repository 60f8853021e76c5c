//! Compatibility-and-pagination core for the UCMDB REST client.
//!
//! Two concerns live here, both free of I/O: deciding whether a target
//! server's software version supports an operation before it is attempted,
//! and driving a single logical query across a server that only returns
//! results in bounded chunks. Network collaborators are supplied by the
//! caller — a [`VersionSource`] for the one version round-trip, and a page
//! fetcher closure for chunked queries — so everything in this crate is
//! testable without a server.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | The [`ServerKey`] cache key |
//! | [`version`] | Version normalisation and comparison |
//! | [`cache`] | Per-session store of resolved server versions |
//! | [`gate`] | Minimum-version gating around operations |
//! | [`paging`] | Chunked-result aggregation |
//! | [`errors`] | The error taxonomy shared by all of the above |

pub mod cache;
pub mod errors;
pub mod gate;
pub mod identifiers;
pub mod paging;
pub mod version;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use cache::{VersionCache, VersionCacheEntry};
pub use errors::{AggregationError, BoxError, CompatError, MalformedVersion};
pub use gate::{require_version, CompatibilityGate, VersionSource};
pub use identifiers::ServerKey;
pub use paging::{collect, AggregatedResult, Continuation, PageCursor, ResultChunk};
pub use version::{normalize, VersionRequirement, VersionTuple};
