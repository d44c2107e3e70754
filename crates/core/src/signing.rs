//! Webhook payload signing.
//!
//! When an automation has a signing secret, every delivery carries an
//! `X-HiperFlow-Signature` header: the HMAC-SHA256 of the exact request
//! body, hex-encoded. Receivers recompute it over the raw bytes to verify
//! origin and integrity.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute an HMAC-SHA256 signature for a webhook payload.
///
/// The `secret` is the automation-specific signing secret. The `body` is the
/// JSON body being delivered. Returns the hex-encoded signature string.
pub fn sign_payload(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    let signature = mac.finalize().into_bytes();
    format!("{signature:x}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_hex_string() {
        let sig = sign_payload("my_secret", br#"{"event":"test"}"#);
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_is_deterministic() {
        let a = sign_payload("secret", b"payload");
        let b = sign_payload("secret", b"payload");
        assert_eq!(a, b);
    }

    #[test]
    fn signature_depends_on_secret_and_body() {
        let base = sign_payload("secret", b"payload");
        assert_ne!(base, sign_payload("other", b"payload"));
        assert_ne!(base, sign_payload("secret", b"payload2"));
    }

    #[test]
    fn matches_known_rfc4231_vector() {
        // RFC 4231 test case 2: key "Jefe", data "what do ya want for nothing?".
        let sig = sign_payload("Jefe", b"what do ya want for nothing?");
        assert_eq!(
            sig,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }
}
