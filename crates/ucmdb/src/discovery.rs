//! Discovery configuration: job groups, IP ranges, schedules, and the
//! discovery module metadata.

use serde_json::Value;

use crate::client::UcmdbClient;
use crate::error::UcmdbError;

const PROFILE_PATH: &str = "/discovery/discoveryprofiles";

/// Discovery operations.
pub struct Discovery<'a> {
    client: &'a UcmdbClient,
}

impl<'a> Discovery<'a> {
    pub(crate) fn new(client: &'a UcmdbClient) -> Self {
        Self { client }
    }

    /// Lists the discovery job groups, optionally restricted to a
    /// comma-separated field list.
    pub async fn job_groups(&self, fields: &str) -> Result<Value, UcmdbError> {
        if fields.is_empty() {
            self.client.get_json(PROFILE_PATH).await
        } else {
            let query = [("fields", fields.to_owned())];
            self.client.get_json_query(PROFILE_PATH, &query).await
        }
    }

    /// Retrieves one discovery job group by name.
    pub async fn job_group(&self, name: &str) -> Result<Value, UcmdbError> {
        let path = format!("{PROFILE_PATH}/{name}");
        self.client.get_json(&path).await
    }

    /// Creates a discovery job group.
    pub async fn create_job_group(&self, job_group: &Value) -> Result<Value, UcmdbError> {
        self.client.post_json(PROFILE_PATH, job_group).await
    }

    /// Deletes one discovery job group by name.
    pub async fn delete_job_group(&self, name: &str) -> Result<(), UcmdbError> {
        let path = format!("{PROFILE_PATH}/{name}");
        self.client.delete_no_content(&path).await
    }

    /// Lists the IP range profiles grouped by location.
    pub async fn ip_ranges(&self) -> Result<Value, UcmdbError> {
        self.client.get_json("/discovery/iprangeprofiles").await
    }

    /// Lists the discovery schedule profiles.
    pub async fn schedules(&self) -> Result<Value, UcmdbError> {
        self.client.get_json("/discovery/scheduleprofiles").await
    }

    /// Retrieves the discovery module tree metadata.
    pub async fn module_tree(&self) -> Result<Value, UcmdbError> {
        self.client
            .get_json("/discovery/discoverymetadata/moduletree")
            .await
    }
}
