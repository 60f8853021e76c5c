//! Integration points.

use serde_json::Value;

use crate::client::UcmdbClient;
use crate::error::UcmdbError;

/// Integration-point operations.
pub struct Integration<'a> {
    client: &'a UcmdbClient,
}

impl<'a> Integration<'a> {
    pub(crate) fn new(client: &'a UcmdbClient) -> Self {
        Self { client }
    }

    /// Lists the integration points.
    pub async fn integration_points(&self) -> Result<Value, UcmdbError> {
        self.client.get_json("/integration/integrationpoints").await
    }

    /// Retrieves one integration point; `detail` includes the adapter
    /// configuration and job state.
    pub async fn integration_point(&self, name: &str, detail: bool) -> Result<Value, UcmdbError> {
        let path = format!("/integration/integrationpoints/{name}?detail={detail}");
        self.client.get_json(&path).await
    }
}
