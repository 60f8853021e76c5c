//! Server-level information: version, liveness, licensing.

use serde::Deserialize;
use serde_json::Value;

use compat::require_version;

use crate::client::UcmdbClient;
use crate::error::UcmdbError;
use crate::requirements;

/// What the dashboard version endpoint reports about a server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub server_build_number: Option<String>,
    #[serde(default)]
    pub content_pack_build_number: Option<String>,
    /// Release-format version, e.g. `"24.2"` or `"2023.05"`.
    #[serde(default)]
    pub content_pack_version: Option<String>,
    /// Build-format version, e.g. `"11.8.0"`; not comparable to releases.
    #[serde(default)]
    pub full_server_version: Option<String>,
}

impl VersionInfo {
    /// The string used for compatibility checks: the content-pack version
    /// when present (it matches the release format), otherwise whatever the
    /// server put in `fullServerVersion`.
    pub fn preferred_release(&self) -> String {
        self.content_pack_version
            .as_deref()
            .filter(|v| !v.is_empty())
            .or(self.full_server_version.as_deref())
            .unwrap_or_default()
            .to_owned()
    }
}

/// Connectivity probe result.
#[derive(Debug, Clone, Deserialize)]
pub struct PingStatus {
    pub status: PingStatusDetail,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingStatusDetail {
    pub status_code: u16,
    #[serde(default)]
    pub reason_phrase: Option<String>,
    /// E.g. `"FullyUp, is writer: true"`.
    #[serde(default)]
    pub message: Option<String>,
}

/// Server-level operations.
pub struct System<'a> {
    client: &'a UcmdbClient,
}

impl<'a> System<'a> {
    pub(crate) fn new(client: &'a UcmdbClient) -> Self {
        Self { client }
    }

    /// Reads the server's version report from the dashboard endpoint.
    ///
    /// Never gated — this is the round-trip the gates themselves rely on.
    pub async fn version_info(&self) -> Result<VersionInfo, UcmdbError> {
        self.client
            .get_json("/v1/uiserver/dashboard/versions/getVersion")
            .await
    }

    /// Tests connectivity, optionally requiring the server to be the writer
    /// (or a reader) of its cluster.
    pub async fn ping(
        &self,
        restrict_to_writer: bool,
        restrict_to_reader: bool,
    ) -> Result<PingStatus, UcmdbError> {
        let query = [
            ("restrictToWriter", restrict_to_writer.to_string()),
            ("restrictToReader", restrict_to_reader.to_string()),
        ];
        self.client.get_json_query("/ping", &query).await
    }

    /// Retrieves the license report, including per-feature capacity counts.
    pub async fn license_report(&self) -> Result<Value, UcmdbError> {
        let gate = require_version("system.license_report", requirements::LICENSE_REPORT);
        self.client
            .gated(&gate, || self.client.get_json("/uiserver/license/report"))
            .await
    }
}
