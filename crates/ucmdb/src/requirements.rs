//! Minimum-version requirements, one table for the whole client.
//!
//! Operations absent from this table work on every supported server and are
//! called without a gate. The values mirror the vendor's endpoint
//! documentation: the classic `/rest-api` surface predates version
//! reporting, while the `uiserver` endpoints arrived with the 2023.05
//! release and the modelling result-path API with 24.2.

use compat::VersionRequirement;

/// `/uiserver/license/report`
pub(crate) const LICENSE_REPORT: VersionRequirement = VersionRequirement::calendar(2023, 5);

/// `/packagemanager/packages` (listing) and `/packagemanager/contentpacks`.
pub(crate) const PACKAGES_LIST: VersionRequirement = VersionRequirement::calendar(2023, 5);
pub(crate) const CONTENT_PACKS: VersionRequirement = VersionRequirement::calendar(2023, 5);

/// `/uiserver/packagemanager/...` paginated browsing and export.
pub(crate) const PACKAGES_BROWSE: VersionRequirement = VersionRequirement::calendar(2023, 5);

/// `/uiserver/probeService/dashboard/summary`
pub(crate) const PROBE_STATUS: VersionRequirement = VersionRequirement::calendar(2023, 5);

/// `/topology/result/{id}/{index}` chunked view retrieval.
pub(crate) const TOPOLOGY_VIEW_CHUNKS: VersionRequirement = VersionRequirement::calendar(2023, 5);

/// `/uiserver/modeling/views/result/chunkForPath`
pub(crate) const MODELING_CHUNK_FOR_PATH: VersionRequirement = VersionRequirement::quarterly(2024, 2);
