//! Management zones: the scoping objects that bundle discovery activities.

use serde_json::Value;

use crate::client::UcmdbClient;
use crate::error::UcmdbError;

const ZONE_PATH: &str = "/discovery/managementzones";

/// Management-zone operations.
pub struct ManagementZones<'a> {
    client: &'a UcmdbClient,
}

impl<'a> ManagementZones<'a> {
    pub(crate) fn new(client: &'a UcmdbClient) -> Self {
        Self { client }
    }

    /// Lists every management zone.
    pub async fn list(&self) -> Result<Value, UcmdbError> {
        self.client.get_json(ZONE_PATH).await
    }

    /// Retrieves one management zone by id.
    pub async fn get(&self, zone_id: &str) -> Result<Value, UcmdbError> {
        let path = format!("{ZONE_PATH}/{zone_id}");
        self.client.get_json(&path).await
    }

    /// Creates a management zone from its full definition.
    pub async fn create(&self, zone: &Value) -> Result<(), UcmdbError> {
        self.client.post_no_content(ZONE_PATH, zone).await
    }

    /// Deletes one management zone by id.
    pub async fn delete(&self, zone_id: &str) -> Result<(), UcmdbError> {
        let path = format!("{ZONE_PATH}/{zone_id}");
        self.client.delete_no_content(&path).await
    }

    /// Starts the discovery activities of a zone.
    pub async fn activate(&self, zone_id: &str) -> Result<(), UcmdbError> {
        let path = format!("{ZONE_PATH}/{zone_id}?operation=activate");
        self.client.post_empty_no_content(&path).await
    }

    /// Discovery result statistics for one zone.
    pub async fn statistics(&self, zone_id: &str) -> Result<Value, UcmdbError> {
        let query = [("mzoneId", zone_id.to_owned())];
        self.client
            .get_json_query("/discovery/results/statistics", &query)
            .await
    }
}
