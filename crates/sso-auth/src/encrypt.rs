//! Cookie encryption collaborator seam
//!
//! The session cookie travels encrypted by the host application's cookie
//! layer. The guard only needs to undo (and the login flow to apply) that
//! outer layer; the actual cipher belongs to the host.

use crate::error::{AuthError, AuthResult};

/// Host-provided encryption for cookie values.
///
/// Implementations wrap whatever the host framework uses for its cookies.
/// `decrypt` is also used to unwrap the `X-XSRF-TOKEN` header when the
/// plain `X-CSRF-TOKEN` header is absent.
pub trait CookieEncrypter: Send + Sync {
    /// Encrypt a cookie value for the wire.
    fn encrypt(&self, plaintext: &str) -> AuthResult<String>;

    /// Decrypt a cookie value from the wire.
    fn decrypt(&self, ciphertext: &str) -> AuthResult<String>;
}

/// Pass-through encrypter.
///
/// For deployments whose cookie layer encrypts transparently before values
/// reach the guard, and for tests. The session token inside remains signed
/// either way.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEncrypter;

impl CookieEncrypter for NoopEncrypter {
    fn encrypt(&self, plaintext: &str) -> AuthResult<String> {
        Ok(plaintext.to_string())
    }

    fn decrypt(&self, ciphertext: &str) -> AuthResult<String> {
        Ok(ciphertext.to_string())
    }
}

/// Reject everything. Useful in tests for undecryptable-cookie paths.
#[cfg(test)]
pub(crate) struct FailingEncrypter;

#[cfg(test)]
impl CookieEncrypter for FailingEncrypter {
    fn encrypt(&self, _plaintext: &str) -> AuthResult<String> {
        Err(AuthError::Internal("encryption unavailable".to_string()))
    }

    fn decrypt(&self, _ciphertext: &str) -> AuthResult<String> {
        Err(AuthError::InvalidToken("Undecryptable cookie".to_string()))
    }
}
