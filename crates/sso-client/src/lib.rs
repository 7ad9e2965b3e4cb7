//! HTTP client for the froxlor SSO identity API.
//!
//! Wraps the provider's REST API behind a cloneable [`SsoClient`]: OAuth
//! token grants, the who-am-I lookup, user and SSH key management, cursor
//! pagination, and rate-limit reporting. The client also implements the
//! `sso-auth` crate's `IdentityGateway` seam, so it can plug straight into
//! the token guard for first-sight user provisioning.
//!
//! ```no_run
//! use sso_client::{SsoClient, SsoConfig};
//!
//! # async fn example() -> Result<(), sso_client::RequestError> {
//! let client = SsoClient::new(SsoConfig::from_env())?
//!     .with_token("user-access-token");
//!
//! let me = client.get_authed_user().await?;
//! if me.success() {
//!     println!("signed in as {}", me.data()["email"]);
//! }
//! # Ok(())
//! # }
//! ```

mod app_token;
mod client;
mod config;
mod error;
mod oauth;
mod pagination;
mod result;
mod ssh_keys;
mod users;
mod validation;

pub use app_token::{AppTokenRepository, CachedAppTokenRepository};
pub use client::SsoClient;
pub use config::{SsoConfig, DEFAULT_BASE_URL};
pub use error::{RequestError, RequestResult};
pub use oauth::GrantType;
pub use pagination::{PageAction, Paginator};
pub use result::{ApiResponse, Pagination, RateLimit, API_UNAVAILABLE};
pub use validation::validate_required;
