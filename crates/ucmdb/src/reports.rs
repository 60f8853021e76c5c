//! Change reports over views.
//!
//! Time ranges travel as epoch milliseconds on the wire; the API here takes
//! [`DateTime<Utc>`] and converts at the boundary.

use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::client::UcmdbClient;
use crate::error::UcmdbError;

/// Change-report operations.
pub struct Reports<'a> {
    client: &'a UcmdbClient,
}

impl<'a> Reports<'a> {
    pub(crate) fn new(client: &'a UcmdbClient) -> Self {
        Self { client }
    }

    /// One page of the change report for a view, `page_size` rows starting
    /// at `start` (the endpoint counts from 1).
    pub async fn change_report_page(
        &self,
        view: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        attributes: &[&str],
        start: u64,
        page_size: NonZeroUsize,
    ) -> Result<Value, UcmdbError> {
        let filter = format!("type=ALL&attributes={}", attributes.join(","));
        let path = format!("/report/change/view/{view}/results");
        let query = [
            ("filter", filter),
            ("dateFrom", from.timestamp_millis().to_string()),
            ("dateTo", to.timestamp_millis().to_string()),
            ("start", start.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        self.client.get_json_query(&path, &query).await
    }

    /// Generates the blacklist change report for a view: attribute changes
    /// excluded from history by the blacklist.
    pub async fn blacklist(
        &self,
        view: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        attributes: &[&str],
    ) -> Result<Value, UcmdbError> {
        let body = generate_body(view, from, to, attributes);
        self.client
            .post_json("/changeReports/generate/blacklist", &body)
            .await
    }

    /// Generates the whitelist change report for a view.
    pub async fn whitelist(
        &self,
        view: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        attributes: &[&str],
    ) -> Result<Value, UcmdbError> {
        let body = generate_body(view, from, to, attributes);
        self.client
            .post_json("/changeReports/generate/whitelist", &body)
            .await
    }
}

/// The generate endpoints want the epoch-millisecond bounds as strings.
fn generate_body(view: &str, from: DateTime<Utc>, to: DateTime<Utc>, attributes: &[&str]) -> Value {
    serde_json::json!({
        "dateFrom": from.timestamp_millis().to_string(),
        "dateTo": to.timestamp_millis().to_string(),
        "viewName": view,
        "attributes": attributes,
    })
}
