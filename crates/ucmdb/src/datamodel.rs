//! CI data model: bulk CI creation, updates, deletion, and class metadata.

use serde_json::Value;

use crate::client::UcmdbClient;
use crate::error::UcmdbError;

/// Flags for [`DataModel::add_cis`], mirroring the query parameters of the
/// `/dataModel` endpoint. The default is the server's own default for every
/// flag (all off).
#[derive(Debug, Clone, Copy, Default)]
pub struct AddCiOptions {
    /// The CI definitions carry valid global ids.
    pub is_global_id: bool,
    /// The CI definitions contain temporary ids.
    pub force_temporary_id: bool,
    /// Skip CIs that already exist instead of failing.
    pub ignore_existing: bool,
    /// Return a map from definition ids to the generated UCMDB ids.
    pub return_ids_map: bool,
    /// Drop CIs the reconciliation engine cannot identify.
    pub ignore_when_cant_identify: bool,
}

/// Data-model operations.
pub struct DataModel<'a> {
    client: &'a UcmdbClient,
}

impl<'a> DataModel<'a> {
    pub(crate) fn new(client: &'a UcmdbClient) -> Self {
        Self { client }
    }

    /// Adds a bulk of CIs (and optionally relations) defined in `payload`,
    /// e.g. `{"cis": [{"ucmdbId": "1", "type": "node", "properties": ...}]}`.
    pub async fn add_cis(
        &self,
        payload: &Value,
        options: AddCiOptions,
    ) -> Result<Value, UcmdbError> {
        let query = [
            ("isGlobalId", options.is_global_id.to_string()),
            ("forceTemporaryId", options.force_temporary_id.to_string()),
            ("ignoreExisting", options.ignore_existing.to_string()),
            ("returnIdsMap", options.return_ids_map.to_string()),
            (
                "ignoreWhenCantIdentify",
                options.ignore_when_cant_identify.to_string(),
            ),
        ];
        let query_string = query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        let path = format!("/dataModel?{query_string}");
        self.client.post_json(&path, payload).await
    }

    /// Deletes one CI by UCMDB id (or global id).
    pub async fn delete_ci(&self, id: &str, is_global_id: bool) -> Result<(), UcmdbError> {
        let path = format!("/dataModel/ci/{id}?isGlobalId={is_global_id}");
        self.client.delete_no_content(&path).await
    }

    /// Replaces the properties of one CI.
    pub async fn update_ci(&self, id: &str, update: &Value) -> Result<Value, UcmdbError> {
        let path = format!("/dataModel/ci/{id}");
        self.client.put_json(&path, update).await
    }

    /// Retrieves the class-model definition of a CI type.
    pub async fn ci_class(&self, ci_type: &str) -> Result<Value, UcmdbError> {
        let path = format!("/classModel/citypes/{ci_type}");
        self.client.get_json(&path).await
    }

    /// Retrieves a CI type's definition without its affected-resource list,
    /// which is where the identification rule lives.
    pub async fn identification_rule(&self, ci_type: &str) -> Result<Value, UcmdbError> {
        let path = format!("/classModel/citypes/{ci_type}?withAffectedResources=false");
        self.client.get_json(&path).await
    }
}
