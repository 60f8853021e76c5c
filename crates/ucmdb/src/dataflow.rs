//! Data-flow management: probes, ranges, domains, and credentials.

use serde_json::Value;

use compat::require_version;

use crate::client::UcmdbClient;
use crate::error::UcmdbError;
use crate::requirements;

/// Data-flow management operations.
pub struct DataFlow<'a> {
    client: &'a UcmdbClient,
}

impl<'a> DataFlow<'a> {
    pub(crate) fn new(client: &'a UcmdbClient) -> Self {
        Self { client }
    }

    /// Lists the data-flow probes.
    pub async fn probes(&self) -> Result<Value, UcmdbError> {
        self.client.get_json("/dataflowmanagement/probes").await
    }

    /// Retrieves one probe by name.
    pub async fn probe(&self, name: &str) -> Result<Value, UcmdbError> {
        let path = format!("/dataflowmanagement/probes/{name}");
        self.client.get_json(&path).await
    }

    /// Lists the probes answering for an IP address.
    pub async fn probes_for_ip(&self, ip: &str) -> Result<Value, UcmdbError> {
        let query = [("queriedIpAddress", ip.to_owned())];
        self.client
            .get_json_query("/dataflowmanagement/probes", &query)
            .await
    }

    /// The probe dashboard summary (status of every probe).
    pub async fn probe_status(&self) -> Result<Value, UcmdbError> {
        let gate = require_version("dataflow.probe_status", requirements::PROBE_STATUS);
        self.client
            .gated(&gate, || {
                self.client.get_json("/uiserver/probeService/dashboard/summary")
            })
            .await
    }

    /// Lists the IP ranges assigned to one probe.
    pub async fn probe_ranges(&self, probe: &str) -> Result<Value, UcmdbError> {
        let path = format!("/dataflowmanagement/probes/{probe}/ranges");
        self.client.get_json(&path).await
    }

    /// Adds an IP range to a probe.
    pub async fn add_range(&self, probe: &str, range: &Value) -> Result<(), UcmdbError> {
        let path = format!("/dataflowmanagement/probes/{probe}/ranges");
        self.client.post_no_content(&path, range).await
    }

    /// Updates an IP range on a probe.
    pub async fn update_range(&self, probe: &str, range: &Value) -> Result<(), UcmdbError> {
        let path = format!("/dataflowmanagement/probes/{probe}/ranges");
        self.client.put_no_content(&path, range).await
    }

    /// Lists the discovery domains.
    pub async fn domains(&self) -> Result<Value, UcmdbError> {
        self.client.get_json("/dataflowmanagement/domains").await
    }

    /// Lists every credential visible to the session.
    pub async fn credentials(&self) -> Result<Value, UcmdbError> {
        self.client.get_json("/dataflowmanagement/credentials").await
    }

    /// Lists the supported protocols.
    pub async fn protocols(&self) -> Result<Value, UcmdbError> {
        self.client.get_json("/dataflowmanagement/protocols").await
    }

    /// Retrieves one protocol definition.
    pub async fn protocol(&self, protocol_id: &str) -> Result<Value, UcmdbError> {
        let path = format!("/dataflowmanagement/protocols/{protocol_id}");
        self.client.get_json(&path).await
    }

    /// Runs a live credential check from a probe against a target address.
    ///
    /// `timeout_ms` is how long the probe waits for the target; slow
    /// networks need more than the server default of 60 s.
    pub async fn check_credential(
        &self,
        credential_id: &str,
        probe: &str,
        ip: &str,
        timeout_ms: u64,
    ) -> Result<Value, UcmdbError> {
        let path = format!("/dataflowmanagement/credentials/{credential_id}/availability");
        let body = serde_json::json!({
            "probeName": probe,
            "ipAddress": ip,
            "timeout": timeout_ms,
        });
        self.client.post_json(&path, &body).await
    }
}
