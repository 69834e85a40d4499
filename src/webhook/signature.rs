use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the payload signature on incoming webhooks.
pub const SIGNATURE_HEADER: &str = "X-Helius-Signature";

/// Checks `signature`, a hex HMAC-SHA256 of `body` keyed with `secret`.
///
/// Returns `false` for an empty signature or secret and for malformed hex.
/// The comparison runs in constant time.
///
/// ```
/// let body = br#"[{"signature":"5h6x"}]"#;
/// let signature = helius::webhook::compute_signature(body, "secret");
/// assert!(helius::webhook::validate_signature(body, &signature, "secret"));
/// assert!(!helius::webhook::validate_signature(body, &signature, "other"));
/// ```
pub fn validate_signature(body: &[u8], signature: &str, secret: &str) -> bool {
    if signature.is_empty() || secret.is_empty() {
        return false;
    }

    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Hex HMAC-SHA256 of `body` keyed with `secret`, as sent by the server.
pub fn compute_signature(body: &[u8], secret: &str) -> String {
    // HMAC accepts keys of any length.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("hmac key length is unrestricted"));
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}
