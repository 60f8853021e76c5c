//! Infrastructure settings and notification recipients.

use serde_json::Value;

use crate::client::UcmdbClient;
use crate::error::UcmdbError;

/// Settings and administration operations.
pub struct Settings<'a> {
    client: &'a UcmdbClient,
}

impl<'a> Settings<'a> {
    pub(crate) fn new(client: &'a UcmdbClient) -> Self {
        Self { client }
    }

    /// Reads one infrastructure setting by its CMS name, e.g.
    /// `multi.tenancy.global.default.tenant_id`.
    pub async fn get_setting(&self, name: &str, locale: &str) -> Result<Value, UcmdbError> {
        let path = format!("/settings/{name}");
        let query = [("locale", locale.to_owned())];
        self.client.get_json_query(&path, &query).await
    }

    /// Writes one infrastructure setting; `body` carries the new value,
    /// e.g. `{"value": "someone@example.com"}`.
    pub async fn set_setting(
        &self,
        name: &str,
        locale: &str,
        body: &Value,
    ) -> Result<(), UcmdbError> {
        let path = format!("/settings/{name}?locale={locale}");
        self.client.put_no_content(&path, body).await
    }

    /// Lists the notification recipients.
    pub async fn recipients(&self) -> Result<Value, UcmdbError> {
        self.client.get_json("/administration/recipients").await
    }

    /// Adds a notification recipient.
    pub async fn add_recipient(&self, recipient: &Value) -> Result<(), UcmdbError> {
        self.client
            .post_no_content("/administration/recipients", recipient)
            .await
    }

    /// Updates a notification recipient by id.
    pub async fn update_recipient(&self, id: &str, update: &Value) -> Result<(), UcmdbError> {
        let path = format!("/administration/recipients/{id}");
        self.client.put_no_content(&path, update).await
    }

    /// Deletes notification recipients by id (comma-separated for several).
    pub async fn delete_recipients(&self, ids: &str) -> Result<(), UcmdbError> {
        let path = format!("/administration/recipients?ids={ids}");
        self.client.delete_no_content(&path).await
    }
}
