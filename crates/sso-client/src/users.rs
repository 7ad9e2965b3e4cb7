//! User endpoints
//!
//! Who-am-I lookup for the current bearer token, user creation, and
//! email existence checks. This module also implements the auth crate's
//! [`IdentityGateway`] seam so the token guard can provision users it
//! has never seen locally.

use crate::client::SsoClient;
use crate::error::RequestResult;
use crate::result::ApiResponse;
use crate::validation::validate_required;
use async_trait::async_trait;
use serde_json::Value;
use sso_auth::IdentityGateway;
use tracing::warn;

impl SsoClient {
    /// Fetch the profile of the user the current bearer token belongs to.
    pub async fn get_authed_user(&self) -> RequestResult<ApiResponse> {
        self.token()?;
        self.get("v3/user", &[]).await
    }

    /// Create a user at the provider. `email` is required.
    pub async fn create_user(
        &self,
        parameters: &[(&str, &str)],
    ) -> RequestResult<ApiResponse> {
        validate_required(parameters, &["email"])?;
        self.post("v3/users", parameters).await
    }

    /// Check whether an email address is already registered.
    pub async fn email_exists(&self, email: &str) -> RequestResult<ApiResponse> {
        self.post("v3/users/check", &[("email", email)]).await
    }
}

#[async_trait]
impl IdentityGateway for SsoClient {
    async fn authed_user(&self, bearer_token: &str) -> Option<Value> {
        let response = self
            .clone()
            .with_token(bearer_token)
            .get_authed_user()
            .await;

        match response {
            Ok(response) if response.success() => Some(response.data().clone()),
            Ok(response) => {
                warn!(status = response.status, "who-am-i lookup rejected");
                None
            }
            Err(error) => {
                warn!(%error, "who-am-i lookup failed");
                None
            }
        }
    }
}
