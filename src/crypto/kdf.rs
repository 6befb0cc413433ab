use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::{KEY_LEN, SALT_LEN};

/// Derive a 256-bit encryption key from a password and salt with
/// PBKDF2-HMAC-SHA256.
///
/// Deterministic: identical inputs always produce identical keys. A wrong
/// password still derives successfully; it is only detected later by the
/// AEAD tag check. Empty passwords are not rejected here, that is the
/// caller's policy decision.
///
/// The returned buffer is zeroed when dropped.
pub fn derive_key(
    password: &str,
    salt: &[u8; SALT_LEN],
    iterations: u32,
) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut *key);
    key
}
