//! LDAP authentication settings.

use serde_json::Value;

use crate::client::UcmdbClient;
use crate::error::UcmdbError;

/// LDAP operations.
pub struct Ldap<'a> {
    client: &'a UcmdbClient,
}

impl<'a> Ldap<'a> {
    pub(crate) fn new(client: &'a UcmdbClient) -> Self {
        Self { client }
    }

    /// Retrieves the LDAP server settings.
    pub async fn settings(&self) -> Result<Value, UcmdbError> {
        self.client.get_json("/ldap/settings").await
    }
}
