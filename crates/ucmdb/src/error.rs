//! The client's error surface.
//!
//! Gate failures from the [`compat`] core convert in via `From`, so gated
//! operations compose with plain transport calls under one error type.

use compat::{CompatError, ServerKey};
use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced by [`crate::UcmdbClient`] and its service modules.
#[derive(Debug, Error)]
pub enum UcmdbError {
    /// The `/authenticate` call was answered but rejected.
    ///
    /// Produced only during [`crate::UcmdbClient::connect`]; the body is the
    /// server's own explanation, usually worth showing to an administrator.
    #[error("authentication rejected by {server} (HTTP {status}): {body}")]
    AuthRejected {
        /// The server that rejected the credentials.
        server: ServerKey,
        /// The HTTP status of the rejection.
        status: StatusCode,
        /// The response body, verbatim.
        body: String,
    },

    /// The request never produced a usable response: connection failures,
    /// timeouts, TLS errors, or a body that did not decode as expected.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned HTTP {status} for {path}")]
    Api {
        /// The HTTP status the server returned.
        status: StatusCode,
        /// The request path, relative to the REST root.
        path: String,
        /// The response body, verbatim, for diagnostics.
        body: String,
    },

    /// A version gate blocked the operation, or the server's version could
    /// not be resolved.
    #[error(transparent)]
    Compat(#[from] CompatError),

    /// The client configuration is invalid; the client never connects with
    /// an invalid configuration.
    #[error("invalid client configuration: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}
