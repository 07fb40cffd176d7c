use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex-encoded HMAC-SHA256 of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

fn hex_digest(payload: &[u8], secret: &str) -> Option<String> {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return None;
    };
    mac.update(payload);
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Lowercase hex HMAC-SHA256 of `payload` keyed by `secret`, as SEOBeast
/// sends it in [`SIGNATURE_HEADER`].
///
/// Returns an empty string if the key is refused, which never verifies.
pub fn sign(payload: &[u8], secret: &str) -> String {
    hex_digest(payload, secret).unwrap_or_default()
}

/// Verifies a SEOBeast webhook signature using constant-time comparison.
///
/// `payload` must be the body exactly as received. The header must equal
/// the lowercase hex digest byte for byte, so uppercase hex, prefixes such
/// as `sha256=` and truncated values are all rejected. Returns `false` for
/// an empty payload, signature or secret.
pub fn verify(payload: &[u8], signature: &str, secret: &str) -> bool {
    if payload.is_empty() || signature.is_empty() || secret.is_empty() {
        return false;
    }

    let Some(expected) = hex_digest(payload, secret) else {
        return false;
    };

    // ct_eq is false for slices of different length.
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"event":"post.updated","timestamp":"2024-01-01T00:00:00Z"}"#;

    #[test]
    fn valid_signature_passes() {
        let sig = sign(BODY, "test-secret");
        assert!(verify(BODY, &sig, "test-secret"));
    }

    #[test]
    fn wrong_secret_fails() {
        let sig = sign(BODY, "correct-secret");
        assert!(!verify(BODY, &sig, "wrong-secret"));
    }

    #[test]
    fn tampered_body_fails() {
        let sig = sign(b"original body", "secret");
        assert!(verify(b"original body", &sig, "secret"));
        assert!(!verify(b"tampered body", &sig, "secret"));
    }

    #[test]
    fn signature_is_lowercase_hex_sha256() {
        let sig = sign(b"hello", "secret");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        // Known answer for HMAC-SHA256(key = "secret", msg = "hello").
        assert_eq!(
            sig,
            "88aab3ede8d3adf94d26ab90d3bafd4a2083070c3bcce9c014ee04a443847c0b"
        );
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let sig = sign(BODY, "secret");
        assert!(!verify(b"", &sig, "secret"));
        assert!(!verify(BODY, "", "secret"));
        assert!(!verify(BODY, &sig, ""));
    }

    #[test]
    fn empty_payload_is_rejected_even_when_correctly_signed() {
        let sig = sign(b"", "secret");
        assert!(!verify(b"", &sig, "secret"));
    }

    #[test]
    fn non_hex_signature_fails() {
        assert!(!verify(BODY, "not-valid-hex!", "secret"));
        assert!(!verify(BODY, "abc", "secret"));
    }

    #[test]
    fn truncated_or_extended_signature_fails() {
        let sig = sign(BODY, "secret");
        assert!(!verify(BODY, &sig[..62], "secret"));
        assert!(!verify(BODY, &format!("{sig}00"), "secret"));
    }

    #[test]
    fn prefixed_signature_fails() {
        let sig = sign(BODY, "secret");
        assert!(!verify(BODY, &format!("sha256={sig}"), "secret"));
    }

    #[test]
    fn uppercase_hex_fails() {
        let sig = sign(BODY, "secret");
        assert!(!verify(BODY, &sig.to_uppercase(), "secret"));

        let mut mixed = sig.clone();
        if let Some(pos) = mixed.find(|c: char| c.is_ascii_lowercase()) {
            let upper = mixed[pos..=pos].to_uppercase();
            mixed.replace_range(pos..=pos, &upper);
        }
        assert_ne!(mixed, sig);
        assert!(!verify(BODY, &mixed, "secret"));
    }

    #[test]
    fn unicode_signature_does_not_panic() {
        assert!(!verify(BODY, "ü🚀", "secret"));
    }
}
