//! # SSO Token Authentication
//!
//! This crate decides, per inbound request, whether a caller is
//! authenticated against the froxlor SSO identity provider — via a bearer
//! JWT signed by the provider, or via a first-party encrypted session
//! cookie — and exposes a scoped-capability model for authorization
//! checks.
//!
//! ## Overview
//!
//! The sso-auth crate handles:
//! - **Token codec**: RS256 verify-only decoding of provider-issued bearer
//!   tokens; HS256 signing and opening of first-party session tokens
//! - **Session cookies**: building the encrypted, HttpOnly session cookie
//!   at login time
//! - **CSRF**: constant-time validation of the proof embedded in the
//!   session token against the request's CSRF headers
//! - **Guard**: the per-request state machine selecting and validating an
//!   authentication path
//! - **Scopes**: wildcard-aware capability grants and the
//!   `require_all`/`require_any` authorization checks
//! - **User resolution**: mapping verified subjects to local users, with
//!   first-sight provisioning from the remote identity API
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sso_auth::{
//!     AuthRequest, BearerTokenDecoder, NoopEncrypter, SessionTokenCodec, TokenGuard,
//!     UserResolver,
//! };
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     store: impl sso_auth::UserStore,
//! #     gateway: Arc<dyn sso_auth::IdentityGateway>,
//! #     public_key_pem: &[u8],
//! # ) -> sso_auth::AuthResult<()> {
//! let guard = TokenGuard::new(
//!     BearerTokenDecoder::from_rsa_pem(public_key_pem)?,
//!     SessionTokenCodec::new("session-secret"),
//!     Arc::new(NoopEncrypter),
//!     UserResolver::new(store, gateway)
//!         .with_fields(vec!["name".into(), "email".into()])
//!         .with_access_token_field("sso_access_token"),
//! );
//!
//! let mut request = AuthRequest::new().with_bearer_token("eyJ...");
//! let identity = guard.authenticate(&mut request).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Cross-crate integration
//!
//! - `sso-client`: implements [`IdentityGateway`] over the remote identity
//!   API so the guard can provision users on first sight

pub mod claims;
pub mod codec;
pub mod cookie;
pub mod csrf;
pub mod encrypt;
pub mod error;
pub mod guard;
pub mod scopes;
pub mod user;

// Re-export main types
pub use claims::{AccessTokenClaims, ClientClaim, SessionToken};
pub use codec::{BearerTokenDecoder, SessionTokenCodec, BEARER_LEEWAY_SECS};
pub use cookie::{
    SameSite, SessionConfig, SessionCookie, SessionCookieFactory, DEFAULT_COOKIE_NAME,
};
pub use encrypt::{CookieEncrypter, NoopEncrypter};
pub use error::{AuthError, AuthResult};
pub use guard::{AuthRequest, Authentication, GuardConfig, TokenContext, TokenGuard};
pub use scopes::{check_client_scopes, require_all, require_any, Grant, WILDCARD_SCOPE};
pub use user::{AuthSource, IdentityGateway, UserResolver, UserStore};
