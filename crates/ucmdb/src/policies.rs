//! Policy and compliance-view operations.

use serde_json::Value;

use compat::require_version;

use crate::client::UcmdbClient;
use crate::error::UcmdbError;
use crate::requirements;

/// Policy operations.
pub struct Policies<'a> {
    client: &'a UcmdbClient,
}

impl<'a> Policies<'a> {
    pub(crate) fn new(client: &'a UcmdbClient) -> Self {
        Self { client }
    }

    /// Lists the policies defined on the server.
    pub async fn list(&self) -> Result<Value, UcmdbError> {
        self.client.get_json("/policy/policies").await
    }

    /// Lists the compliance views.
    pub async fn compliance_views(&self) -> Result<Value, UcmdbError> {
        self.client.get_json("/policy/complianceViews").await
    }

    /// Retrieves one compliance view by name.
    pub async fn compliance_view(&self, name: &str) -> Result<Value, UcmdbError> {
        let path = format!("/policy/complianceView/{name}");
        self.client.get_json(&path).await
    }

    /// Calculates policy results for the views named in `request`.
    ///
    /// The misspelled `chunckSize` parameter is what the server accepts.
    pub async fn calculate(&self, request: &Value) -> Result<Value, UcmdbError> {
        self.client
            .post_json("/policy/calculate?chunckSize=300", request)
            .await
    }

    /// Calculates a compliance view through the modelling API.
    pub async fn calculate_view(&self, view: &str) -> Result<Value, UcmdbError> {
        let path = format!("/uiserver/modeling/views/{view}");
        self.client.post_empty_json(&path).await
    }

    /// Retrieves one numbered chunk of the non-compliant elements of a
    /// calculated view execution.
    pub async fn non_compliant_chunk(
        &self,
        execution_id: &str,
        chunk: u32,
    ) -> Result<Value, UcmdbError> {
        let gate = require_version(
            "policies.non_compliant_chunk",
            requirements::MODELING_CHUNK_FOR_PATH,
        );
        let body = serde_json::json!({
            "viewExecutionId": execution_id,
            "path": [{
                "pathElementId": "NON-COMPLIANT",
                "pathElementType": "NON-COMPLIANT",
            }],
            "chunkNumber": chunk,
        });
        self.client
            .gated(&gate, || async move {
                self.client
                    .post_json("/policy/chunkForPath?chunkSize=300", &body)
                    .await
            })
            .await
    }

    /// Number of result elements on a path of a view execution.
    pub async fn element_count(&self, request: &Value) -> Result<Value, UcmdbError> {
        self.client
            .post_json("/uiserver/modeling/views/result/numberOfElementsForPath", request)
            .await
    }
}
