//! Error types for identity API requests
//!
//! Configuration-time failures (missing client id/secret/redirect URI,
//! incomplete parameters) are raised before any request goes on the wire.
//! Transport failures wrap the underlying HTTP error; HTTP error statuses
//! are not errors here — they surface as unsuccessful responses.

use crate::result::ApiResponse;
use thiserror::Error;

/// Identity API request error types.
#[derive(Debug, Error)]
pub enum RequestError {
    /// No client id configured for an outbound call
    #[error("Request requires Client-ID")]
    MissingClientId,

    /// No client secret configured for an OAuth grant request
    #[error("Request requires client secret")]
    MissingClientSecret,

    /// No redirect URI configured for an authorization-code flow
    #[error("Request requires redirect URI")]
    MissingRedirectUri,

    /// No bearer token set on the client for an authenticated call
    #[error("Request requires authentication")]
    RequiresAuthentication,

    /// Parameter-presence validation failed before issuing a request
    #[error(
        "Request requires missing parameters. Required: {}. Given: {}",
        required.join(", "),
        given.join(", ")
    )]
    MissingParameters {
        /// Parameters the endpoint requires
        required: Vec<String>,
        /// Parameters actually supplied
        given: Vec<String>,
    },

    /// The client-credentials token refresh failed
    #[error("Fresh access token request failed. Status Code is {}.", .response.status)]
    FreshAccessToken {
        /// The response received from the token endpoint, for diagnostics
        response: Box<ApiResponse>,
    },

    /// Rate limit exceeded
    #[error("Rate Limit exceeded")]
    RateLimited,

    /// The configured base URL (or a path joined onto it) is invalid
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// HTTP transport failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result type for identity API operations.
pub type RequestResult<T> = Result<T, RequestError>;
