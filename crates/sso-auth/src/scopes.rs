//! Scope and capability model
//!
//! A [`Grant`] is the set of scopes attached to an authenticated identity
//! for one request. Bearer authentication carries the token's scopes;
//! cookie authentication carries the wildcard grant, since the caller is a
//! fully logged-in first-party session. The wildcard `*` satisfies every
//! capability check.

use crate::claims::AccessTokenClaims;
use crate::error::{AuthError, AuthResult};
use crate::guard::Authentication;
use serde::{Deserialize, Serialize};

/// The scope that grants every capability.
pub const WILDCARD_SCOPE: &str = "*";

/// The capability grant held by an authenticated identity.
///
/// Never persisted; lives for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    scopes: Vec<String>,
}

impl Grant {
    /// Create a grant over an ordered scope list.
    pub fn new(scopes: Vec<String>) -> Self {
        Self { scopes }
    }

    /// The grant that satisfies every capability check.
    pub fn wildcard() -> Self {
        Self {
            scopes: vec![WILDCARD_SCOPE.to_string()],
        }
    }

    /// The granted scopes, in issuance order.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Whether this grant carries the wildcard scope.
    pub fn is_wildcard(&self) -> bool {
        self.scopes.iter().any(|s| s == WILDCARD_SCOPE)
    }

    /// Whether the grant satisfies a single capability.
    pub fn can(&self, scope: &str) -> bool {
        self.is_wildcard() || self.scopes.iter().any(|s| s == scope)
    }

    /// Whether the grant satisfies at least one of the capabilities.
    pub fn can_any<S: AsRef<str>>(&self, scopes: &[S]) -> bool {
        scopes.iter().any(|scope| self.can(scope.as_ref()))
    }
}

/// Require an authenticated identity holding every listed scope.
///
/// Fails with [`AuthError::AuthenticationRequired`] for anonymous callers
/// and [`AuthError::MissingScope`] listing the unmet scopes otherwise. The
/// wildcard grant short-circuits.
pub fn require_all<U>(auth: Option<&Authentication<U>>, scopes: &[&str]) -> AuthResult<()> {
    let auth = auth.ok_or(AuthError::AuthenticationRequired)?;

    if auth.grant.is_wildcard() {
        return Ok(());
    }

    let unmet: Vec<String> = scopes
        .iter()
        .filter(|scope| !auth.grant.can(scope))
        .map(|scope| scope.to_string())
        .collect();

    if unmet.is_empty() {
        Ok(())
    } else {
        Err(AuthError::MissingScope(unmet))
    }
}

/// Require an authenticated identity holding at least one listed scope.
///
/// Fails with [`AuthError::AuthenticationRequired`] for anonymous callers
/// and [`AuthError::MissingScope`] listing the requested scopes when none
/// match.
pub fn require_any<U>(auth: Option<&Authentication<U>>, scopes: &[&str]) -> AuthResult<()> {
    let auth = auth.ok_or(AuthError::AuthenticationRequired)?;

    if auth.grant.can_any(scopes) {
        Ok(())
    } else {
        Err(AuthError::MissingScope(
            scopes.iter().map(|s| s.to_string()).collect(),
        ))
    }
}

/// Validate decoded client-credentials claims against required scopes.
///
/// Used on machine-to-machine routes where a bearer token is decoded
/// without resolving a user. The wildcard scope short-circuits.
pub fn check_client_scopes(claims: &AccessTokenClaims, scopes: &[&str]) -> AuthResult<()> {
    if claims.scopes.iter().any(|s| s == WILDCARD_SCOPE) {
        return Ok(());
    }

    for scope in scopes {
        if !claims.scopes.iter().any(|s| s == scope) {
            return Err(AuthError::MissingScope(
                scopes.iter().map(|s| s.to_string()).collect(),
            ));
        }
    }

    Ok(())
}
