use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit, Payload},
};
use getrandom::fill;
use zeroize::Zeroizing;

use super::{KEY_LEN, NONCE_LEN, SALT_LEN};
use crate::error::NpfError;

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<(), NpfError> {
    fill(buf).map_err(|_| NpfError::Io(std::io::Error::other("OS random generator unavailable")))
}

/// Generate a fresh key-derivation salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN], NpfError> {
    let mut salt = [0u8; SALT_LEN];
    secure_random(&mut salt)?;
    Ok(salt)
}

/// Generate a fresh nonce. Must be called once per encryption; nonce
/// reuse under the same key voids the GCM security guarantees.
pub fn generate_nonce() -> Result<[u8; NONCE_LEN], NpfError> {
    let mut nonce = [0u8; NONCE_LEN];
    secure_random(&mut nonce)?;
    Ok(nonce)
}

/// Encrypt plaintext under a fresh random nonce, binding `aad` into the
/// authentication tag.
///
/// Returns `ciphertext || tag` and the nonce that must travel with it.
/// Empty plaintext is valid and still produces a tag.
pub fn encrypt(
    key: &[u8; KEY_LEN],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<(Vec<u8>, [u8; NONCE_LEN]), NpfError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

    let nonce = generate_nonce()?;

    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| NpfError::Io(std::io::Error::other("encryption failed")))?;

    Ok((ciphertext, nonce))
}

/// Decrypt `ciphertext || tag`, verifying the tag over both the
/// ciphertext and `aad`.
///
/// Decryption and verification are a single fused step: on tag mismatch
/// no plaintext is returned, and the failure is always
/// [`NpfError::Authentication`] whether the cause was a wrong password or
/// tampered data.
pub fn decrypt(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>, NpfError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| NpfError::Authentication)?;
    Ok(Zeroizing::new(plaintext))
}
