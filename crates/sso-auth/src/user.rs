//! User resolution bridge
//!
//! Maps a verified subject to a local persisted user. Bearer-authenticated
//! subjects unknown to the local store are provisioned from the remote
//! identity API's who-am-I endpoint; cookie-authenticated subjects are
//! never provisioned, since there is no bearer token to present remotely.

use crate::error::AuthResult;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// How the subject being resolved was authenticated.
#[derive(Debug, Clone, Copy)]
pub enum AuthSource<'a> {
    /// Verified bearer token, available for remote calls
    Bearer(&'a str),
    /// First-party session cookie; no bearer token present
    Session,
}

/// Persistent local user store collaborator.
///
/// Implemented by the host over its database. The bridge never deletes
/// users and never updates credentials other than the designated
/// access-token field.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// The host's user record type.
    type User: Send + Sync;

    /// Look up a user by the configured identifier field.
    async fn find_by_identifier(&self, identifier: &str) -> AuthResult<Option<Self::User>>;

    /// Create a user from mapped remote attributes.
    async fn create(&self, attributes: Map<String, Value>) -> AuthResult<Self::User>;

    /// Record the presented bearer token on the user's access-token field.
    ///
    /// Implementations must persist only when the stored value actually
    /// changed, to avoid redundant writes on every request.
    async fn sync_access_token(&self, user: &mut Self::User, token: &str) -> AuthResult<()>;
}

#[async_trait]
impl<T: UserStore + ?Sized> UserStore for Arc<T> {
    type User = T::User;

    async fn find_by_identifier(&self, identifier: &str) -> AuthResult<Option<Self::User>> {
        (**self).find_by_identifier(identifier).await
    }

    async fn create(&self, attributes: Map<String, Value>) -> AuthResult<Self::User> {
        (**self).create(attributes).await
    }

    async fn sync_access_token(&self, user: &mut Self::User, token: &str) -> AuthResult<()> {
        (**self).sync_access_token(user, token).await
    }
}

/// Remote identity API collaborator for first-sight provisioning.
///
/// Implemented by `sso-client`'s API client. A remote failure of any kind
/// yields `None`: the bridge then declines to provision rather than create
/// a user from unverified data.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Fetch the remote profile for the presented bearer token.
    async fn authed_user(&self, bearer_token: &str) -> Option<Value>;
}

/// Bridges verified subjects to local user records.
pub struct UserResolver<S> {
    store: S,
    gateway: Arc<dyn IdentityGateway>,
    identifier_field: String,
    fields: Vec<String>,
    access_token_field: Option<String>,
}

impl<S: UserStore> UserResolver<S> {
    /// Create a resolver over the local store and remote gateway.
    ///
    /// The identifier field defaults to `id`; no remote fields are copied
    /// and no access-token field is synced until configured.
    pub fn new(store: S, gateway: Arc<dyn IdentityGateway>) -> Self {
        Self {
            store,
            gateway,
            identifier_field: "id".to_string(),
            fields: Vec::new(),
            access_token_field: None,
        }
    }

    /// Set the local column holding the remote subject.
    pub fn with_identifier_field(mut self, field: impl Into<String>) -> Self {
        self.identifier_field = field.into();
        self
    }

    /// Set the remote profile fields copied onto newly provisioned users.
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// Set the local column tracking the last-used access token.
    pub fn with_access_token_field(mut self, field: impl Into<String>) -> Self {
        self.access_token_field = Some(field.into());
        self
    }

    /// Resolve a verified subject to a local user.
    ///
    /// Known subjects are returned directly (with the access-token field
    /// refreshed on the bearer path, when configured). Unknown subjects are
    /// provisioned from the remote who-am-I endpoint on the bearer path
    /// only; an unknown subject on the cookie path resolves to `None`.
    pub async fn resolve(
        &self,
        subject: &str,
        source: AuthSource<'_>,
    ) -> AuthResult<Option<S::User>> {
        if let Some(mut user) = self.store.find_by_identifier(subject).await? {
            if self.access_token_field.is_some() {
                if let AuthSource::Bearer(token) = source {
                    self.store.sync_access_token(&mut user, token).await?;
                }
            }

            return Ok(Some(user));
        }

        let AuthSource::Bearer(token) = source else {
            debug!(subject, "unknown subject on cookie path, not provisioning");
            return Ok(None);
        };

        let Some(profile) = self.gateway.authed_user(token).await else {
            debug!(subject, "who-am-i lookup failed, not provisioning");
            return Ok(None);
        };

        let mut attributes = Map::new();
        if let Some(remote) = profile.as_object() {
            for field in &self.fields {
                if let Some(value) = remote.get(field) {
                    attributes.insert(field.clone(), value.clone());
                }
            }
        }

        // The remote record's own id is authoritative for the identifier
        // field; the presented subject is the fallback.
        let identifier = profile
            .get("id")
            .cloned()
            .unwrap_or_else(|| Value::String(subject.to_string()));
        attributes.insert(self.identifier_field.clone(), identifier);

        if let Some(field) = &self.access_token_field {
            attributes.insert(field.clone(), Value::String(token.to_string()));
        }

        Ok(Some(self.store.create(attributes).await?))
    }
}
