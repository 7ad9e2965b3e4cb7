//! CSRF proof validation
//!
//! The session token embeds a CSRF proof at login time; clients echo it on
//! requests via the `X-CSRF-TOKEN` header, or via the encrypted
//! `X-XSRF-TOKEN` header as a fallback. Comparison against the embedded
//! proof is constant-time.

use crate::encrypt::CookieEncrypter;
use crate::guard::AuthRequest;
use subtle::ConstantTimeEq;

/// Constant-time equality over the embedded proof and the presented proof.
pub fn tokens_match(expected: &str, presented: &str) -> bool {
    expected
        .as_bytes()
        .ct_eq(presented.as_bytes())
        .into()
}

/// Extract the CSRF proof from the request.
///
/// Prefers the plain `X-CSRF-TOKEN` header; falls back to decrypting the
/// `X-XSRF-TOKEN` header through the cookie encrypter. Returns `None` when
/// neither yields a value.
pub(crate) fn request_csrf_token(
    request: &AuthRequest,
    encrypter: &dyn CookieEncrypter,
) -> Option<String> {
    if let Some(token) = &request.csrf_header {
        return Some(token.clone());
    }

    request
        .xsrf_header
        .as_ref()
        .and_then(|header| encrypter.decrypt(header).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encrypt::NoopEncrypter;

    #[test]
    fn test_tokens_match() {
        assert!(tokens_match("abc", "abc"));
        assert!(!tokens_match("abc", "xyz"));
        assert!(!tokens_match("abc", "abcd"));
        assert!(!tokens_match("abc", ""));
    }

    #[test]
    fn test_header_preferred_over_xsrf() {
        let request = AuthRequest::new()
            .with_csrf_header("from-header")
            .with_xsrf_header("from-xsrf");

        assert_eq!(
            request_csrf_token(&request, &NoopEncrypter),
            Some("from-header".to_string())
        );
    }

    #[test]
    fn test_xsrf_fallback() {
        let request = AuthRequest::new().with_xsrf_header("from-xsrf");

        assert_eq!(
            request_csrf_token(&request, &NoopEncrypter),
            Some("from-xsrf".to_string())
        );
    }

    #[test]
    fn test_no_proof_present() {
        let request = AuthRequest::new();
        assert_eq!(request_csrf_token(&request, &NoopEncrypter), None);
    }

    #[test]
    fn test_undecryptable_xsrf_is_absent() {
        let request = AuthRequest::new().with_xsrf_header("garbage");
        assert_eq!(
            request_csrf_token(&request, &crate::encrypt::FailingEncrypter),
            None
        );
    }
}
