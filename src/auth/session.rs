use base64ct::{Base64Url, Encoding};
use sha2::{Digest, Sha256};

/// Opaque session fingerprint returned in the login response body.
///
/// Legacy: the frontend stores this value but no endpoint ever verifies it.
/// Authentication relies solely on the `access_token` cookie. Kept for wire
/// compatibility with existing clients.
pub fn fingerprint(email: &str) -> String {
    let digest = Sha256::digest(email.as_bytes());
    Base64Url::encode_string(&digest)
}
