//! OAuth token grants
//!
//! Grant requests go to the provider's `/oauth/token` endpoint, which
//! lives at the origin rather than under the API base path, and carry
//! their parameters as a form body rather than in the query string. The
//! client's configured credentials are sent with every grant;
//! caller-supplied attributes override them.

use crate::client::SsoClient;
use crate::error::RequestResult;
use crate::result::ApiResponse;

/// OAuth grant endpoint, resolved against the base URL's origin.
const TOKEN_PATH: &str = "/oauth/token";

/// OAuth grant type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantType {
    /// Exchange an authorization code for a token pair
    AuthorizationCode,
    /// Exchange a refresh token for a fresh token pair
    RefreshToken,
    /// Machine-to-machine token for the client itself
    ClientCredentials,
}

impl GrantType {
    /// The wire name of the grant.
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::AuthorizationCode => "authorization_code",
            GrantType::RefreshToken => "refresh_token",
            GrantType::ClientCredentials => "client_credentials",
        }
    }
}

impl SsoClient {
    /// Request a token from the OAuth grant endpoint.
    ///
    /// The configured client id and secret plus the grant type are sent
    /// as defaults; any of them present in `attributes` wins over the
    /// configured value. Authorization-code exchanges supply their
    /// `code` and `redirect_uri` through `attributes`.
    pub async fn retrieving_token(
        &self,
        grant: GrantType,
        attributes: &[(&str, &str)],
    ) -> RequestResult<ApiResponse> {
        let defaults = [
            ("grant_type", grant.as_str()),
            ("client_id", self.client_id()?),
            ("client_secret", self.client_secret()?),
        ];

        let mut form: Vec<(&str, &str)> = defaults
            .iter()
            .filter(|(name, _)| !attributes.iter().any(|(given, _)| given == name))
            .copied()
            .collect();
        form.extend_from_slice(attributes);

        self.form_post(TOKEN_PATH, &form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SsoConfig;
    use crate::error::RequestError;

    #[test]
    fn test_grant_wire_names() {
        assert_eq!(GrantType::AuthorizationCode.as_str(), "authorization_code");
        assert_eq!(GrantType::RefreshToken.as_str(), "refresh_token");
        assert_eq!(GrantType::ClientCredentials.as_str(), "client_credentials");
    }

    #[tokio::test]
    async fn test_grant_requires_credentials() {
        let client = SsoClient::new(SsoConfig::default())
            .unwrap()
            .with_client_id("id");

        let err = client
            .retrieving_token(GrantType::ClientCredentials, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::MissingClientSecret));
    }
}
