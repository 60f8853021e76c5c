//! Package manager: deploy, export, and browse packages and content packs.
//!
//! The classic `/packagemanager` endpoints return whole collections; the
//! `uiserver` browsing endpoint is offset-paginated, and
//! [`Packages::list_all`] walks it with `compat::collect`, so exhaustion is
//! detected by the short-page rule rather than by trusting a total count.

use std::num::NonZeroUsize;

use serde::Deserialize;
use serde_json::Value;

use compat::{collect, require_version, AggregationError, PageCursor, ResultChunk};

use crate::client::UcmdbClient;
use crate::error::UcmdbError;
use crate::requirements;

/// One package as listed by the `uiserver` package browser.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSummary {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub last_modified_time: Option<i64>,
    #[serde(default)]
    pub factory: Option<bool>,
    #[serde(default)]
    pub hidden: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct PackagePage {
    #[serde(default)]
    collection: Vec<PackageSummary>,
}

/// Package-manager operations.
pub struct Packages<'a> {
    client: &'a UcmdbClient,
}

impl<'a> Packages<'a> {
    pub(crate) fn new(client: &'a UcmdbClient) -> Self {
        Self { client }
    }

    /// Lists every deployed package (the classic, unpaginated endpoint).
    pub async fn list(&self) -> Result<Vec<Value>, UcmdbError> {
        let gate = require_version("packages.list", requirements::PACKAGES_LIST);
        self.client
            .gated(&gate, || self.client.get_json("/packagemanager/packages"))
            .await
    }

    /// Retrieves one deployed package by name.
    pub async fn get(&self, name: &str) -> Result<Value, UcmdbError> {
        let path = format!("/packagemanager/packages/{name}");
        self.client.get_json(&path).await
    }

    /// One page of the `uiserver` package browser, `limit` entries starting
    /// at `start`. `search` filters by display name; empty matches all.
    pub async fn page(
        &self,
        start: u64,
        limit: NonZeroUsize,
        search: &str,
    ) -> Result<Vec<PackageSummary>, UcmdbError> {
        let gate = require_version("packages.browse", requirements::PACKAGES_BROWSE);
        let query = [
            ("isPaginationEnabled", "true".to_owned()),
            ("start", start.to_string()),
            ("limit", limit.to_string()),
            ("sortDir", "ASC".to_owned()),
            ("sortField", "name".to_owned()),
            ("search", search.to_owned()),
            ("filter", String::new()),
        ];
        self.client
            .gated(&gate, || async move {
                let page: PackagePage = self
                    .client
                    .get_json_query("/uiserver/packagemanager/packages", &query)
                    .await?;
                Ok(page.collection)
            })
            .await
    }

    /// Walks the package browser to the end, `page_size` entries at a time.
    ///
    /// A page shorter than `page_size` signals exhaustion; a failure part
    /// way through hands back the pages that did arrive.
    pub async fn list_all(
        &self,
        page_size: NonZeroUsize,
        max_pages: NonZeroUsize,
    ) -> Result<Vec<PackageSummary>, AggregationError<PackageSummary, UcmdbError>> {
        let fetch = |cursor: PageCursor, hint: NonZeroUsize| async move {
            let offset = match cursor {
                PageCursor::Offset(offset) => offset,
                PageCursor::Token(_) => 0,
            };
            let entries = self.page(offset, hint, "").await?;
            Ok(ResultChunk::unreported(entries))
        };
        let aggregated = collect(fetch, PageCursor::Offset(0), page_size, max_pages).await?;
        tracing::debug!(
            packages = aggregated.len(),
            pages = aggregated.chunks,
            "collected package list"
        );
        Ok(aggregated.into_entries())
    }

    /// Lists the installed content packs.
    pub async fn content_packs(&self) -> Result<Vec<Value>, UcmdbError> {
        let gate = require_version("packages.content_packs", requirements::CONTENT_PACKS);
        self.client
            .gated(&gate, || {
                self.client.get_json("/packagemanager/contentpacks")
            })
            .await
    }

    /// Deploys a package archive under the given file name.
    pub async fn deploy(&self, file_name: &str, archive: Vec<u8>) -> Result<Value, UcmdbError> {
        let part = reqwest::multipart::Part::bytes(archive).file_name(file_name.to_owned());
        let form = reqwest::multipart::Form::new().part("file", part);
        self.client
            .post_multipart("/packagemanager/packages", form)
            .await
    }

    /// Deployment progress for a package previously uploaded.
    pub async fn deploy_progress(&self, name: &str) -> Result<Value, UcmdbError> {
        let path = format!("/packagemanager/packages/{name}/progress");
        self.client.get_json(&path).await
    }

    /// Exports a package as a zip archive.
    pub async fn export(&self, name: &str) -> Result<Vec<u8>, UcmdbError> {
        let gate = require_version("packages.export", requirements::PACKAGES_BROWSE);
        let query = [("packageName", name.to_owned())];
        self.client
            .gated(&gate, || async move {
                self.client
                    .get_bytes("/uiserver/packagemanager/resources/export", &query)
                    .await
            })
            .await
    }

    /// Undeploys a package, returning the per-resource results.
    pub async fn delete(&self, name: &str) -> Result<Value, UcmdbError> {
        let path = format!("/packagemanager/packages/{name}");
        self.client.delete_json(&path).await
    }
}
