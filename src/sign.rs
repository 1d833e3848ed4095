//! Webhook security-setting signature.
//!
//! Robots configured with the "sign" security setting expect every send URL
//! to carry a `timestamp` and a `sign` query parameter, where `sign` is
//! HMAC-SHA256 over `"{timestamp}\n{secret}"` keyed by the secret, standard
//! base64 encoded.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 `data` keyed by `secret`, base64 encoded.
pub fn sign(data: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any size");
    mac.update(data.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// The signature DingTalk expects on a signed webhook URL.
///
/// `timestamp` is unix time in seconds; it must match the `timestamp` query
/// parameter sent alongside the signature.
pub fn webhook_sign(timestamp: i64, secret: &str) -> String {
    let data = format!("{timestamp}\n{secret}");
    sign(&data, secret)
}
