//! Client configuration.
//!
//! Everything needed to reach one UCMDB server: where it is, how to speak
//! TLS to it, and the session parameters the REST API expects. Loaded
//! programmatically (there is deliberately no credential-file loading here).

use std::time::Duration;

use compat::ServerKey;

use crate::error::UcmdbError;

/// Default REST port for a traditional UCMDB installation. Containerised
/// deployments commonly use 443 instead.
pub const DEFAULT_PORT: u16 = 8443;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// URL scheme used to reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// TLS (the default; UCMDB serves its REST API over HTTPS).
    Https,
    /// Plain HTTP, for lab setups and local mocks.
    Http,
}

impl Scheme {
    fn as_str(self) -> &'static str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        }
    }
}

/// Username and password for the `/authenticate` call.
///
/// The password never appears in `Debug` output or log events.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    password: String,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where and how to reach one UCMDB server.
///
/// ```
/// use ucmdb::ClientConfig;
///
/// let config = ClientConfig::new("cmdb.example.com")
///     .port(443)
///     .verify_tls(false);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    host: String,
    port: u16,
    scheme: Scheme,
    verify_tls: bool,
    timeout: Duration,
    client_context: u32,
}

impl ClientConfig {
    /// Configuration for `host` with the defaults: port 8443, HTTPS,
    /// certificate verification on, a 60 s request timeout, client
    /// context 1.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            scheme: Scheme::Https,
            verify_tls: true,
            timeout: DEFAULT_TIMEOUT,
            client_context: 1,
        }
    }

    /// Overrides the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Overrides the URL scheme.
    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Disables (or re-enables) TLS certificate verification.
    ///
    /// UCMDB installations frequently run with self-signed certificates;
    /// turning verification off is the operator's explicit choice here,
    /// never the default.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Overrides the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the `clientContext` value sent during authentication.
    pub fn client_context(mut self, client_context: u32) -> Self {
        self.client_context = client_context;
        self
    }

    /// The REST root, e.g. `https://cmdb.example.com:8443/rest-api`.
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}:{}/rest-api",
            self.scheme.as_str(),
            self.host,
            self.port
        )
    }

    /// The cache key identifying this server.
    pub fn server_key(&self) -> ServerKey {
        ServerKey::new(self.host.clone(), self.port)
    }

    pub(crate) fn context(&self) -> u32 {
        self.client_context
    }

    pub(crate) fn build_http(&self) -> Result<reqwest::Client, UcmdbError> {
        if self.host.trim().is_empty() {
            return Err(UcmdbError::Configuration {
                message: "host must not be empty".to_owned(),
            });
        }
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(!self.verify_tls)
            .build()?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_matches_the_rest_root_layout() {
        let config = ClientConfig::new("cmdb.example.com");
        assert_eq!(config.base_url(), "https://cmdb.example.com:8443/rest-api");

        let config = ClientConfig::new("127.0.0.1").port(9443).scheme(Scheme::Http);
        assert_eq!(config.base_url(), "http://127.0.0.1:9443/rest-api");
    }

    #[test]
    fn server_key_tracks_host_and_port() {
        let config = ClientConfig::new("cmdb.example.com").port(443);
        assert_eq!(config.server_key(), ServerKey::new("cmdb.example.com", 443));
    }

    #[test]
    fn empty_host_is_a_configuration_error() {
        let err = ClientConfig::new("  ").build_http().unwrap_err();
        assert!(matches!(err, UcmdbError::Configuration { .. }));
    }

    #[test]
    fn debug_output_never_contains_the_password() {
        let creds = Credentials::new("admin", "s3cret");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }
}
