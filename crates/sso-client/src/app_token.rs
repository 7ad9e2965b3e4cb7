//! Application access token cache
//!
//! Machine-to-machine calls authenticate with a client-credentials token
//! scoped to everything the client is allowed to do. The token is fetched
//! once and cached until shortly before it expires, so steady-state calls
//! never touch the grant endpoint.

use crate::client::SsoClient;
use crate::error::{RequestError, RequestResult};
use crate::oauth::GrantType;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sso_auth::WILDCARD_SCOPE;
use tokio::sync::RwLock;
use tracing::debug;

/// Fallback cache lifetime when the grant response does not say how long
/// the token lives: one week.
const DEFAULT_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Safety margin subtracted from the token lifetime, so a token is
/// refreshed before the provider would reject it.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Source of application (client-credentials) access tokens.
#[async_trait]
pub trait AppTokenRepository: Send + Sync {
    /// A currently valid application access token.
    async fn access_token(&self) -> RequestResult<String>;

    /// Drop any cached token, forcing a refresh on the next call.
    async fn invalidate(&self);
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Utc::now() < self.expires_at
    }
}

/// In-memory caching token repository backed by the grant endpoint.
#[derive(Debug)]
pub struct CachedAppTokenRepository {
    client: SsoClient,
    cache: RwLock<Option<CachedToken>>,
}

impl CachedAppTokenRepository {
    /// Create a repository over a configured client.
    pub fn new(client: SsoClient) -> Self {
        Self {
            client,
            cache: RwLock::new(None),
        }
    }

    /// Request a fresh client-credentials token.
    ///
    /// Runs without holding the cache lock; two tasks racing a refresh
    /// each get a valid token and the later write wins.
    async fn refresh(&self) -> RequestResult<CachedToken> {
        let response = self
            .client
            .retrieving_token(GrantType::ClientCredentials, &[("scope", WILDCARD_SCOPE)])
            .await?;

        if !response.success() {
            return Err(RequestError::FreshAccessToken {
                response: Box::new(response),
            });
        }

        let token = match response.data()["access_token"].as_str() {
            Some(token) => token.to_string(),
            None => {
                return Err(RequestError::FreshAccessToken {
                    response: Box::new(response),
                })
            }
        };

        let ttl = response.data()["expires_in"]
            .as_i64()
            .unwrap_or(DEFAULT_TTL_SECS);
        let ttl = (ttl - EXPIRY_MARGIN_SECS).max(0);

        debug!(ttl_secs = ttl, "refreshed application access token");
        Ok(CachedToken {
            token,
            expires_at: Utc::now() + Duration::seconds(ttl),
        })
    }
}

#[async_trait]
impl AppTokenRepository for CachedAppTokenRepository {
    async fn access_token(&self) -> RequestResult<String> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.token.clone());
            }
        }

        let fresh = self.refresh().await?;
        let token = fresh.token.clone();
        *self.cache.write().await = Some(fresh);
        Ok(token)
    }

    async fn invalidate(&self) {
        *self.cache.write().await = None;
    }
}
