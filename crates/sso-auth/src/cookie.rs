//! Session cookie factory
//!
//! Builds the first-party session cookie at login time: a signed session
//! token wrapped in a cookie descriptor whose attributes come from the
//! deployment's session configuration. The value still needs the host's
//! cookie encryption applied before it goes on the wire.

use crate::codec::SessionTokenCodec;
use crate::error::AuthResult;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default name for the session cookie.
pub const DEFAULT_COOKIE_NAME: &str = "sso_token";

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    /// Sent on same-site requests and top-level navigations
    Lax,
    /// Sent on same-site requests only
    Strict,
    /// Sent on all requests (requires `secure`)
    None,
}

impl SameSite {
    /// Attribute value as rendered into `Set-Cookie`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
            SameSite::None => "None",
        }
    }
}

/// Deployment session configuration sourced from the host application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in minutes
    pub lifetime_minutes: i64,

    /// Cookie path
    pub path: String,

    /// Cookie domain, if scoped
    pub domain: Option<String>,

    /// Only send over HTTPS
    pub secure: bool,

    /// `SameSite` attribute, if set
    pub same_site: Option<SameSite>,
}

impl Default for SessionConfig {
    /// Defaults suitable for a first-party web deployment.
    fn default() -> Self {
        Self {
            lifetime_minutes: 120,
            path: "/".to_string(),
            domain: None,
            secure: true,
            same_site: Some(SameSite::Lax),
        }
    }
}

/// A session cookie descriptor ready for the host's cookie layer.
///
/// `http_only` is always true: the cookie value is never readable by
/// scripts.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    /// Cookie name
    pub name: String,

    /// Signed session token (pre-encryption)
    pub value: String,

    /// Expiry instant
    pub expires_at: DateTime<Utc>,

    /// Cookie path
    pub path: String,

    /// Cookie domain, if scoped
    pub domain: Option<String>,

    /// Only send over HTTPS
    pub secure: bool,

    /// Never readable by scripts
    pub http_only: bool,

    /// `SameSite` attribute, if set
    pub same_site: Option<SameSite>,
}

impl SessionCookie {
    /// Render a `Set-Cookie` header value for this descriptor.
    pub fn header_value(&self) -> String {
        let mut parts = vec![
            format!("{}={}", self.name, self.value),
            format!(
                "Expires={}",
                self.expires_at.format("%a, %d %b %Y %H:%M:%S GMT")
            ),
            format!("Path={}", self.path),
        ];

        if let Some(domain) = &self.domain {
            parts.push(format!("Domain={}", domain));
        }
        if self.secure {
            parts.push("Secure".to_string());
        }
        if self.http_only {
            parts.push("HttpOnly".to_string());
        }
        if let Some(same_site) = self.same_site {
            parts.push(format!("SameSite={}", same_site.as_str()));
        }

        parts.join("; ")
    }
}

/// Factory for session cookies.
pub struct SessionCookieFactory {
    name: String,
    codec: SessionTokenCodec,
    config: SessionConfig,
}

impl SessionCookieFactory {
    /// Create a factory over the session codec and configuration.
    pub fn new(codec: SessionTokenCodec, config: SessionConfig) -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            codec,
            config,
        }
    }

    /// Override the cookie name.
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The configured cookie name.
    pub fn cookie_name(&self) -> &str {
        &self.name
    }

    /// Build a session cookie for the given user and CSRF proof.
    ///
    /// Expiry is now plus the configured session lifetime; the same instant
    /// is embedded in the signed token and set on the cookie.
    pub fn make(&self, user_id: &str, csrf_token: &str) -> AuthResult<SessionCookie> {
        let expires_at = Utc::now() + Duration::minutes(self.config.lifetime_minutes);
        let value = self.codec.build(user_id, csrf_token, expires_at)?;

        Ok(SessionCookie {
            name: self.name.clone(),
            value,
            expires_at,
            path: self.config.path.clone(),
            domain: self.config.domain.clone(),
            secure: self.config.secure,
            http_only: true,
            same_site: self.config.same_site,
        })
    }
}
