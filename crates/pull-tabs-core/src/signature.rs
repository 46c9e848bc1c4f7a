//! GitHub webhook signature verification using HMAC-SHA1.
//!
//! GitHub signs each delivery with the webhook secret and sends the result in
//! the `X-Hub-Signature` header as `sha1=<lowercase hex>`. The digest covers
//! the exact bytes of the request body, so verification must run against the
//! raw body before any JSON decoding.
//!
//! An empty secret switches verification off. [`SignatureVerifier::new`] logs
//! a warning when that happens so the mode is never silent.

use crate::config::WebhookSecret;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;
use tracing::warn;

type HmacSha1 = Hmac<Sha1>;

/// Algorithm tag GitHub prepends to the hex digest.
pub const SIGNATURE_PREFIX: &str = "sha1=";

/// Errors raised while computing a signature.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("Secret cannot be used as an HMAC key")]
    InvalidKey,
}

/// Compute the `X-Hub-Signature` header value for `payload`.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidKey`] if the HMAC cannot be keyed with
/// `secret`.
///
/// # Examples
///
/// ```
/// use pull_tabs_core::signature::{compute_signature, verify_signature};
///
/// let header = compute_signature("my-secret", b"{}").unwrap();
/// assert!(header.starts_with("sha1="));
/// assert!(verify_signature("my-secret", b"{}", Some(&header)));
/// ```
pub fn compute_signature(secret: &str, payload: &[u8]) -> Result<String, SignatureError> {
    let mut mac =
        HmacSha1::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(payload);
    Ok(format!(
        "{}{}",
        SIGNATURE_PREFIX,
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Verify a webhook signature.
///
/// - empty `secret`: always `true` (verification disabled)
/// - non-empty `secret` and no `signature`: `false`
/// - otherwise: `true` only if `signature` equals the expected
///   `sha1=<hex>` value, compared in constant time
pub fn verify_signature(secret: &str, payload: &[u8], signature: Option<&str>) -> bool {
    if secret.is_empty() {
        return true;
    }

    let Some(provided) = signature else {
        return false;
    };

    match compute_signature(secret, payload) {
        Ok(expected) => expected.as_bytes().ct_eq(provided.as_bytes()).into(),
        Err(_) => false,
    }
}

// ============================================================================
// SignatureVerifier
// ============================================================================

/// Verifier bound to the configured webhook secret.
pub struct SignatureVerifier {
    secret: WebhookSecret,
}

impl SignatureVerifier {
    /// Create a verifier for `secret`.
    ///
    /// Emits a `WARN` log when the secret is empty, because every request
    /// will then be accepted without authentication.
    pub fn new(secret: WebhookSecret) -> Self {
        if secret.is_empty() {
            warn!(
                "Webhook secret is empty - signature verification is DISABLED. \
                 Any caller can trigger notifications. Configure notifier.secret \
                 before exposing this service."
            );
        }
        Self { secret }
    }

    /// Returns `true` when a secret is configured and signatures are checked.
    pub fn is_enabled(&self) -> bool {
        !self.secret.is_empty()
    }

    /// Check `signature` against the HMAC of `payload`.
    pub fn verify(&self, payload: &[u8], signature: Option<&str>) -> bool {
        verify_signature(self.secret.expose(), payload, signature)
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
