//! UCMDB REST API client.
//!
//! An authenticated session against one Universal CMDB server, with one
//! service module per functional area of the REST API. The interesting
//! machinery — version-compatibility gating and chunked-result aggregation —
//! lives in the [`compat`] crate; this crate supplies the transport side:
//! configuration, the `/authenticate` handshake, JSON plumbing, and the
//! mechanical endpoint wrappers.
//!
//! # Quick start
//!
//! ```no_run
//! use ucmdb::{ClientConfig, Credentials, UcmdbClient};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = UcmdbClient::connect(
//!     ClientConfig::new("cmdb.example.com").port(443),
//!     &Credentials::new("admin", "password"),
//! )
//! .await?;
//!
//! // Plain wrapper call.
//! let ping = client.system().ping(false, false).await?;
//! println!("{:?}", ping.status.message);
//!
//! // Version-gated call: resolved once per session, cached thereafter.
//! let packs = client.packages().content_packs().await?;
//! println!("{} content packs", packs.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | [`ClientConfig`], [`Credentials`] |
//! | [`client`] | [`UcmdbClient`], the HTTP plumbing, [`SessionId`] |
//! | [`error`] | [`UcmdbError`] |
//! | [`system`] | Version, ping, license |
//! | [`topology`] | TQL queries and chunked view collection |
//! | [`datamodel`] | CI bulk operations and class metadata |
//! | [`discovery`] | Job groups, ranges, schedules |
//! | [`dataflow`] | Probes, domains, credentials |
//! | [`packages`] | Package manager, offset-paginated browsing |
//! | [`policies`] | Policies and compliance views |
//! | [`reports`] | Change reports |
//! | [`management_zones`] | Management zones |
//! | [`settings`] | Infrastructure settings, recipients |
//! | [`integration`] | Integration points |
//! | [`ldap`] | LDAP settings |

pub mod client;
pub mod config;
pub mod dataflow;
pub mod datamodel;
pub mod discovery;
pub mod error;
pub mod integration;
pub mod ldap;
pub mod management_zones;
pub mod packages;
pub mod policies;
mod requirements;
pub mod reports;
pub mod settings;
pub mod system;
pub mod topology;

pub use client::{SessionId, UcmdbClient};
pub use config::{ClientConfig, Credentials, Scheme, DEFAULT_PORT};
pub use error::UcmdbError;
pub use packages::PackageSummary;
pub use system::{PingStatus, VersionInfo};
pub use topology::{TopologyCi, TopologyRelation, TopologyResult, ViewEntity, ViewResult};

// Re-exported so callers can name gate and aggregation types without adding
// a direct dependency on the core crate.
pub use compat::{
    AggregatedResult, AggregationError, CompatError, MalformedVersion, ServerKey,
    VersionRequirement, VersionTuple,
};
