//! JWT verification and session token encoding
//!
//! Two key profiles are supported: an asymmetric verify-only profile for
//! bearer tokens signed by the remote identity provider (RS256), and a
//! symmetric profile for first-party session tokens (HS256) keyed by the
//! deployment's session secret.

use crate::claims::{AccessTokenClaims, SessionToken};
use crate::error::{AuthError, AuthResult};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Clock-skew leeway applied when verifying bearer tokens, in seconds.
pub const BEARER_LEEWAY_SECS: u64 = 60;

/// Verify-only decoder for provider-issued bearer tokens.
///
/// Holds the provider's RS256 public key. Verification applies the fixed
/// [`BEARER_LEEWAY_SECS`] clock-skew leeway and fails closed: any
/// structural, signature, or expiry violation is an error and no partial
/// claims are ever returned. Audience is not validated here since the
/// provider addresses tokens per OAuth client.
pub struct BearerTokenDecoder {
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for BearerTokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerTokenDecoder")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl BearerTokenDecoder {
    /// Create a decoder from the provider's public key in PEM form.
    pub fn from_rsa_pem(pem: &[u8]) -> AuthResult<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(pem)
            .map_err(|e| AuthError::ConfigError(format!("Invalid RSA public key: {}", e)))?;

        Ok(Self { decoding_key })
    }

    /// Verify and decode a compact bearer token.
    pub fn decode(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = BEARER_LEEWAY_SECS;
        // The `aud` claim carries the issuing client id, checked downstream.
        validation.validate_aud = false;

        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map_err(map_jwt_error)?;

        Ok(token_data.claims)
    }
}

/// Symmetric codec for first-party session tokens.
///
/// Signs and opens HS256 tokens over `{sub, csrf, expiry}` using the
/// deployment's session secret. The `expiry` claim is carried but not
/// enforced here; the guard applies the expiry policy together with the
/// CSRF check.
#[derive(Clone)]
pub struct SessionTokenCodec {
    secret: Vec<u8>,
}

impl std::fmt::Debug for SessionTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenCodec")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl SessionTokenCodec {
    /// Create a codec over the deployment's symmetric session secret.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Build a compact session token for the given subject.
    pub fn build(
        &self,
        subject: &str,
        csrf_token: &str,
        expiry: DateTime<Utc>,
    ) -> AuthResult<String> {
        let claims = SessionToken {
            sub: subject.to_string(),
            csrf: csrf_token.to_string(),
            expiry: expiry.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| AuthError::Internal(format!("Session token encoding failed: {}", e)))
    }

    /// Open and verify a compact session token.
    pub fn open(&self, token: &str) -> AuthResult<SessionToken> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry lives in the custom `expiry` claim and is checked by the
        // guard, not the codec.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<SessionToken>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map_err(map_jwt_error)?;

        Ok(token_data.claims)
    }
}

fn map_jwt_error(e: jsonwebtoken::errors::Error) -> AuthError {
    match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidToken => {
            AuthError::InvalidToken("Malformed token".to_string())
        }
        jsonwebtoken::errors::ErrorKind::InvalidSignature => {
            AuthError::InvalidToken("Invalid signature".to_string())
        }
        _ => AuthError::InvalidToken(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    const RSA_PRIVATE: &str = include_str!("../tests/fixtures/rsa_private.pem");
    const RSA_PUBLIC: &str = include_str!("../tests/fixtures/rsa_public.pem");

    fn sign_bearer(claims: &serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::RS256),
            claims,
            &EncodingKey::from_rsa_pem(RSA_PRIVATE.as_bytes()).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_bearer_decode_valid_token() {
        let decoder = BearerTokenDecoder::from_rsa_pem(RSA_PUBLIC.as_bytes()).unwrap();
        let token = sign_bearer(&json!({
            "sub": 42,
            "aud": "client-1",
            "jti": "tok-1",
            "scopes": ["user:read", "user:write"],
            "client": {"trusted": true},
            "exp": Utc::now().timestamp() + 3600,
        }));

        let claims = decoder.decode(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.aud, "client-1");
        assert_eq!(claims.jti, "tok-1");
        assert_eq!(claims.scopes, vec!["user:read", "user:write"]);
        assert!(claims.client.trusted);
    }

    #[test]
    fn test_bearer_decode_expired_token() {
        let decoder = BearerTokenDecoder::from_rsa_pem(RSA_PUBLIC.as_bytes()).unwrap();
        // Beyond the 60 second leeway.
        let token = sign_bearer(&json!({
            "sub": 42,
            "aud": "client-1",
            "jti": "tok-2",
            "scopes": [],
            "exp": Utc::now().timestamp() - 120,
        }));

        assert!(matches!(
            decoder.decode(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_bearer_decode_within_leeway() {
        let decoder = BearerTokenDecoder::from_rsa_pem(RSA_PUBLIC.as_bytes()).unwrap();
        let token = sign_bearer(&json!({
            "sub": 42,
            "aud": "client-1",
            "jti": "tok-3",
            "scopes": [],
            "exp": Utc::now().timestamp() - 30,
        }));

        assert!(decoder.decode(&token).is_ok());
    }

    #[test]
    fn test_bearer_decode_tampered_token() {
        let decoder = BearerTokenDecoder::from_rsa_pem(RSA_PUBLIC.as_bytes()).unwrap();
        let token = sign_bearer(&json!({
            "sub": 42,
            "aud": "client-1",
            "jti": "tok-4",
            "scopes": [],
            "exp": Utc::now().timestamp() + 3600,
        }));

        // Flip a character inside the signature segment.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(decoder.decode(&tampered).is_err());
        assert!(decoder.decode("not-a-jwt").is_err());
    }

    #[test]
    fn test_bearer_rejects_hs256_token_signed_with_public_key() {
        // A token signed symmetrically must never verify against the
        // asymmetric profile.
        let decoder = BearerTokenDecoder::from_rsa_pem(RSA_PUBLIC.as_bytes()).unwrap();
        let forged = encode(
            &Header::new(Algorithm::HS256),
            &json!({
                "sub": 42,
                "aud": "client-1",
                "jti": "tok-5",
                "exp": Utc::now().timestamp() + 3600,
            }),
            &EncodingKey::from_secret(RSA_PUBLIC.as_bytes()),
        )
        .unwrap();

        assert!(decoder.decode(&forged).is_err());
    }

    #[test]
    fn test_session_token_round_trip() {
        let codec = SessionTokenCodec::new("session-secret-key");
        let expiry = Utc::now() + Duration::minutes(120);

        let token = codec.build("42", "csrf-proof", expiry).unwrap();
        let opened = codec.open(&token).unwrap();

        assert_eq!(opened.sub, "42");
        assert_eq!(opened.csrf, "csrf-proof");
        assert_eq!(opened.expiry, expiry.timestamp());
    }

    #[test]
    fn test_session_token_wrong_secret() {
        let codec = SessionTokenCodec::new("session-secret-key");
        let other = SessionTokenCodec::new("different-secret");
        let token = codec
            .build("42", "csrf-proof", Utc::now() + Duration::minutes(5))
            .unwrap();

        assert!(matches!(
            other.open(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_session_token_expired_still_opens() {
        // The codec carries expiry; the guard enforces it.
        let codec = SessionTokenCodec::new("session-secret-key");
        let token = codec
            .build("42", "csrf-proof", Utc::now() - Duration::minutes(5))
            .unwrap();

        let opened = codec.open(&token).unwrap();
        assert!(opened.is_expired());
    }
}
