//! The authenticated client and its HTTP plumbing.
//!
//! [`UcmdbClient::connect`] performs the `/authenticate` round-trip once and
//! keeps the bearer token for every later request, so callers construct the
//! client and then reach any functional area through its service accessors:
//!
//! ```no_run
//! use ucmdb::{ClientConfig, Credentials, UcmdbClient};
//!
//! # async fn run() -> Result<(), ucmdb::UcmdbError> {
//! let client = UcmdbClient::connect(
//!     ClientConfig::new("cmdb.example.com"),
//!     &Credentials::new("admin", "password"),
//! )
//! .await?;
//!
//! let version = client.system().version_info().await?;
//! println!("content pack: {:?}", version.content_pack_version);
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use compat::{BoxError, CompatibilityGate, ServerKey, VersionCache, VersionSource};

use crate::config::{ClientConfig, Credentials};
use crate::dataflow::DataFlow;
use crate::datamodel::DataModel;
use crate::discovery::Discovery;
use crate::error::UcmdbError;
use crate::integration::Integration;
use crate::ldap::Ldap;
use crate::management_zones::ManagementZones;
use crate::packages::Packages;
use crate::policies::Policies;
use crate::reports::Reports;
use crate::settings::Settings;
use crate::system::System;
use crate::topology::Topology;

/// Correlates every log event of one authenticated session.
///
/// Generated fresh for each [`UcmdbClient::connect`]; attached to tracing
/// events so activity from one session can be followed across modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    username: &'a str,
    password: &'a str,
    #[serde(rename = "clientContext")]
    client_context: u32,
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
}

/// An authenticated session against one UCMDB server.
///
/// Owns the version cache for its server, so compatibility checks and cache
/// invalidation are scoped to the session — two clients against different
/// servers (or the same server across a test boundary) never share state.
pub struct UcmdbClient {
    http: reqwest::Client,
    base_url: String,
    server: ServerKey,
    token: String,
    versions: VersionCache,
    session: SessionId,
}

impl UcmdbClient {
    /// Authenticates against the server and returns a ready client.
    ///
    /// Fails with [`UcmdbError::AuthRejected`] when the server answers the
    /// `/authenticate` call with a non-success status, and with
    /// [`UcmdbError::Transport`] when it cannot be reached at all.
    pub async fn connect(
        config: ClientConfig,
        credentials: &Credentials,
    ) -> Result<Self, UcmdbError> {
        let http = config.build_http()?;
        let base_url = config.base_url();
        let server = config.server_key();
        let session = SessionId::new_random();

        let response = http
            .post(format!("{base_url}/authenticate"))
            .json(&AuthRequest {
                username: &credentials.username,
                password: credentials.password(),
                client_context: config.context(),
            })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UcmdbError::AuthRejected {
                server,
                status,
                body,
            });
        }
        let AuthResponse { token } = response.json().await?;
        tracing::info!(%server, %session, "authenticated");

        Ok(Self {
            http,
            base_url,
            server,
            token,
            versions: VersionCache::new(),
            session,
        })
    }

    /// The server this session is bound to.
    pub fn server(&self) -> &ServerKey {
        &self.server
    }

    /// This session's log-correlation id.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// The session's version cache.
    pub fn version_cache(&self) -> &VersionCache {
        &self.versions
    }

    /// Drops the cached version for this server, e.g. after an upgrade; the
    /// next gated call performs exactly one fresh version fetch.
    pub fn clear_cached_version(&self) {
        self.versions.clear(&self.server);
    }

    // -----------------------------------------------------------------
    // Service accessors, one per UCMDB functional area.
    // -----------------------------------------------------------------

    pub fn system(&self) -> System<'_> {
        System::new(self)
    }

    pub fn topology(&self) -> Topology<'_> {
        Topology::new(self)
    }

    pub fn datamodel(&self) -> DataModel<'_> {
        DataModel::new(self)
    }

    pub fn discovery(&self) -> Discovery<'_> {
        Discovery::new(self)
    }

    pub fn dataflow(&self) -> DataFlow<'_> {
        DataFlow::new(self)
    }

    pub fn packages(&self) -> Packages<'_> {
        Packages::new(self)
    }

    pub fn policies(&self) -> Policies<'_> {
        Policies::new(self)
    }

    pub fn reports(&self) -> Reports<'_> {
        Reports::new(self)
    }

    pub fn management_zones(&self) -> ManagementZones<'_> {
        ManagementZones::new(self)
    }

    pub fn settings(&self) -> Settings<'_> {
        Settings::new(self)
    }

    pub fn integration(&self) -> Integration<'_> {
        Integration::new(self)
    }

    pub fn ldap(&self) -> Ldap<'_> {
        Ldap::new(self)
    }

    // -----------------------------------------------------------------
    // Gating
    // -----------------------------------------------------------------

    /// Runs `operation` behind a version gate, using this session's cache
    /// and this client as the version source.
    pub(crate) async fn gated<T, F, Fut>(
        &self,
        gate: &CompatibilityGate,
        operation: F,
    ) -> Result<T, UcmdbError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, UcmdbError>>,
    {
        gate.invoke(&self.server, &self.versions, self, operation)
            .await
    }

    // -----------------------------------------------------------------
    // HTTP plumbing
    // -----------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, UcmdbError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        self.decode(path, response).await
    }

    pub(crate) async fn get_json_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, UcmdbError> {
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .bearer_auth(&self.token)
            .send()
            .await?;
        self.decode(path, response).await
    }

    pub(crate) async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, UcmdbError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        self.decode(path, response).await
    }

    pub(crate) async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T, UcmdbError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .http
            .put(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        self.decode(path, response).await
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, UcmdbError> {
        let response = self
            .http
            .delete(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        self.decode(path, response).await
    }

    /// POST whose success responses may be bodyless (200 or 204).
    pub(crate) async fn post_no_content<B>(&self, path: &str, body: &B) -> Result<(), UcmdbError>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        self.ensure_success(path, response).await
    }

    /// PUT whose success responses may be bodyless (200 or 204).
    pub(crate) async fn put_no_content<B>(&self, path: &str, body: &B) -> Result<(), UcmdbError>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .http
            .put(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        self.ensure_success(path, response).await
    }

    /// DELETE whose success responses may be bodyless (200 or 204).
    pub(crate) async fn delete_no_content(&self, path: &str) -> Result<(), UcmdbError> {
        let response = self
            .http
            .delete(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        self.ensure_success(path, response).await
    }

    /// Body-less POST returning a JSON response.
    pub(crate) async fn post_empty_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, UcmdbError> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        self.decode(path, response).await
    }

    /// Body-less POST whose success responses may be bodyless too.
    pub(crate) async fn post_empty_no_content(&self, path: &str) -> Result<(), UcmdbError> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        self.ensure_success(path, response).await
    }

    /// Multipart POST, used by the package-manager upload endpoints.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, UcmdbError> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await?;
        self.decode(path, response).await
    }

    /// GET returning the raw body, used by the export endpoints.
    pub(crate) async fn get_bytes(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<u8>, UcmdbError> {
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(self.api_error(path, status, response).await);
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, UcmdbError> {
        let status = response.status();
        if !status.is_success() {
            return Err(self.api_error(path, status, response).await);
        }
        Ok(response.json().await?)
    }

    async fn ensure_success(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<(), UcmdbError> {
        let status = response.status();
        if !status.is_success() {
            return Err(self.api_error(path, status, response).await);
        }
        Ok(())
    }

    async fn api_error(
        &self,
        path: &str,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> UcmdbError {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(session = %self.session, path, status = %status, "request failed");
        UcmdbError::Api {
            status,
            path: path.to_owned(),
            body,
        }
    }
}

impl std::fmt::Debug for UcmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UcmdbClient")
            .field("server", &self.server)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl VersionSource for UcmdbClient {
    /// One round-trip to the dashboard version endpoint.
    ///
    /// The `server` argument is part of the trait contract; this client is
    /// bound to a single server, so it is the same key it was built with.
    async fn fetch_version(&self, _server: &ServerKey) -> Result<String, BoxError> {
        let info = self.system().version_info().await?;
        Ok(info.preferred_release())
    }
}
