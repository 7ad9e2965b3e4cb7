//! Token claims for bearer and session authentication
//!
//! This module defines the two claim sets handled by the codec: the
//! provider-issued access token claims carried in `Authorization: Bearer`
//! headers, and the first-party session token embedded in the encrypted
//! cookie.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Claims decoded from a provider-issued bearer access token.
///
/// Produced only by a successful [`BearerTokenDecoder`] verification and
/// valid for the lifetime of one request.
///
/// [`BearerTokenDecoder`]: crate::codec::BearerTokenDecoder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID). The provider issues numeric subjects; both JSON
    /// numbers and strings are accepted and normalized to a string.
    #[serde(deserialize_with = "flexible_id")]
    pub sub: String,

    /// Audience (the OAuth client the token was issued to)
    pub aud: String,

    /// JWT ID (unique identifier for this access token)
    pub jti: String,

    /// Scopes granted to this token, in issuance order
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Issuing client metadata
    #[serde(default)]
    pub client: ClientClaim,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AccessTokenClaims {
    /// Check if the token is expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Get expiration as DateTime.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }
}

/// Client metadata embedded in access token claims.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ClientClaim {
    /// Whether the issuing client is first-party trusted
    #[serde(default)]
    pub trusted: bool,
}

/// First-party session token carried in the encrypted session cookie.
///
/// Created at login by the cookie factory and read back by the guard on
/// every cookie-authenticated request. The expiry lives in a custom
/// `expiry` claim; enforcement is the guard's responsibility, bound to the
/// CSRF policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    /// Subject (user ID)
    #[serde(deserialize_with = "flexible_id")]
    pub sub: String,

    /// CSRF proof the client must echo on state-changing requests
    pub csrf: String,

    /// Expiration time (Unix timestamp)
    pub expiry: i64,
}

impl SessionToken {
    /// Check whether the session has passed its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.expiry
    }
}

/// Accept a subject claim as either a JSON string or number.
fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
