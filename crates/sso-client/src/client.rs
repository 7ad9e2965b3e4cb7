//! Identity API client
//!
//! A cloneable handle over the HTTP transport. Every request carries the
//! `Client-ID` header and `Accept: application/json`; a bearer token is
//! attached when one is set on the handle. Parameters travel in the query
//! string for all verbs, matching the identity API's conventions; JSON
//! bodies are reserved for the `json` operation.

use crate::config::SsoConfig;
use crate::error::{RequestError, RequestResult};
use crate::pagination::Paginator;
use crate::result::ApiResponse;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Identity API client handle.
///
/// Cheap to clone; clones share the underlying connection pool. The
/// bearer token is per-handle, so a clone can act on behalf of another
/// token without disturbing the original.
#[derive(Clone)]
pub struct SsoClient {
    http: Client,
    base_url: Url,
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_uri: Option<String>,
    token: Option<String>,
}

impl std::fmt::Debug for SsoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsoClient")
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl SsoClient {
    /// Create a client from configuration.
    pub fn new(config: SsoConfig) -> RequestResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| RequestError::InvalidBaseUrl(e.to_string()))?;
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url,
            client_id: config.client_id,
            client_secret: config.client_secret,
            redirect_uri: config.redirect_url,
            token: None,
        })
    }

    /// Create a client from environment variables (see [`SsoConfig::from_env`]).
    pub fn from_env() -> RequestResult<Self> {
        Self::new(SsoConfig::from_env())
    }

    /// Fluid client id setter.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Fluid client secret setter.
    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Fluid redirect URI setter.
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Fluid OAuth bearer token setter.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the OAuth bearer token in place.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Get the client id, failing fast when unconfigured.
    pub fn client_id(&self) -> RequestResult<&str> {
        self.client_id.as_deref().ok_or(RequestError::MissingClientId)
    }

    /// Get the client secret, failing fast when unconfigured.
    pub fn client_secret(&self) -> RequestResult<&str> {
        self.client_secret
            .as_deref()
            .ok_or(RequestError::MissingClientSecret)
    }

    /// Get the redirect URI, failing fast when unconfigured.
    pub fn redirect_uri(&self) -> RequestResult<&str> {
        self.redirect_uri
            .as_deref()
            .ok_or(RequestError::MissingRedirectUri)
    }

    /// Get the bearer token, failing fast when none is set.
    pub fn token(&self) -> RequestResult<&str> {
        self.token
            .as_deref()
            .ok_or(RequestError::RequiresAuthentication)
    }

    /// `GET` a path.
    pub async fn get(&self, path: &str, parameters: &[(&str, &str)]) -> RequestResult<ApiResponse> {
        self.query(Method::GET, path, parameters, None, None).await
    }

    /// `GET` a path, threading a pagination cursor.
    pub async fn get_paginated(
        &self,
        path: &str,
        parameters: &[(&str, &str)],
        paginator: &Paginator,
    ) -> RequestResult<ApiResponse> {
        self.query(Method::GET, path, parameters, Some(paginator), None)
            .await
    }

    /// `POST` a path.
    pub async fn post(&self, path: &str, parameters: &[(&str, &str)]) -> RequestResult<ApiResponse> {
        self.query(Method::POST, path, parameters, None, None).await
    }

    /// `PUT` a path.
    pub async fn put(&self, path: &str, parameters: &[(&str, &str)]) -> RequestResult<ApiResponse> {
        self.query(Method::PUT, path, parameters, None, None).await
    }

    /// `DELETE` a path.
    pub async fn delete(
        &self,
        path: &str,
        parameters: &[(&str, &str)],
    ) -> RequestResult<ApiResponse> {
        self.query(Method::DELETE, path, parameters, None, None)
            .await
    }

    /// Send a JSON body, wrapped in the API's `data` envelope.
    pub async fn json(
        &self,
        method: Method,
        path: &str,
        body: Value,
    ) -> RequestResult<ApiResponse> {
        self.query(method, path, &[], None, Some(json!({ "data": body })))
            .await
    }

    /// Build and execute a request.
    pub(crate) async fn query(
        &self,
        method: Method,
        path: &str,
        parameters: &[(&str, &str)],
        paginator: Option<&Paginator>,
        json_body: Option<Value>,
    ) -> RequestResult<ApiResponse> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| RequestError::InvalidBaseUrl(e.to_string()))?;

        let mut query: Vec<(String, String)> = parameters
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        if let Some(pair) = paginator.and_then(Paginator::query_pair) {
            query.push(pair);
        }

        let mut request = self
            .http
            .request(method.clone(), url)
            .header("Client-ID", self.client_id()?)
            .header("Accept", "application/json");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(body) = &json_body {
            request = request.json(body);
        }

        debug!(%method, path, "issuing SSO API request");
        let response = request.send().await?;

        ApiResponse::from_response(response).await
    }

    /// Form-encoded POST, used by the OAuth grant endpoint. Unlike API
    /// requests, grants carry no identifying headers; the credentials
    /// travel in the form body.
    pub(crate) async fn form_post(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> RequestResult<ApiResponse> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| RequestError::InvalidBaseUrl(e.to_string()))?;

        debug!(path, "issuing SSO grant request");
        let response = self
            .http
            .post(url)
            .header("Accept", "application/json")
            .form(form)
            .send()
            .await?;

        ApiResponse::from_response(response).await
    }
}
