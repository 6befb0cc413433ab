//! NPF: a password-encrypted container for image files.
//!
//! An NPF container holds an AES-256-GCM ciphertext of the original image
//! plus a JSON metadata block, keyed by PBKDF2-HMAC-SHA256 over the
//! password and a per-file salt. The metadata is bound into the
//! authentication tag, so neither the image nor its metadata can be
//! altered without the decryption failing closed.

mod crypto;
mod error;
mod format;
mod metadata;
mod storage;

pub use crate::error::NpfError;
pub use crate::format::MAGIC;
pub use crate::metadata::{FORMAT_VERSION, Metadata};
pub use crate::storage::Storage;

use crate::crypto::PBKDF2_ITERATIONS;
use crate::format::Container;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Encrypt a payload into a self-contained NPF container.
///
/// A fresh salt and nonce are drawn per call, so encrypting the same
/// payload twice yields entirely different containers. The derived key
/// lives only for the duration of this call and is wiped on return.
pub fn encrypt(plaintext: &[u8], metadata: Metadata, password: &str) -> Result<Vec<u8>, NpfError> {
    let salt = crypto::generate_salt()?;
    let key = crypto::derive_key(password, &salt, PBKDF2_ITERATIONS);

    let aad = metadata.to_bytes();
    let (ciphertext, nonce) = crypto::encrypt(&key, plaintext, &aad)?;

    let container = Container::new(salt, nonce, metadata, ciphertext);
    Ok(format::encode(&container))
}

/// Decrypt an NPF container, returning the payload and its metadata.
///
/// Fails closed: a wrong password and a tampered container are both
/// reported as [`NpfError::Authentication`], and no plaintext is ever
/// returned on failure. Each call is stateless; retrying with another
/// password is a fresh attempt.
pub fn decrypt(data: &[u8], password: &str) -> Result<(Zeroizing<Vec<u8>>, Metadata), NpfError> {
    let container = format::decode(data)?;

    let key = crypto::derive_key(password, container.salt(), PBKDF2_ITERATIONS);
    let plaintext = crypto::decrypt(
        &key,
        container.nonce(),
        container.ciphertext(),
        container.metadata_bytes(),
    )?;

    Ok((plaintext, container.into_metadata()))
}

/// Returns `true` if the bytes look like an NPF container (magic check
/// only, no password required).
pub fn is_npf_file(data: &[u8]) -> bool {
    format::is_npf(data)
}

/// Extract the metadata block without a password.
///
/// Structural validation only: the returned metadata is unauthenticated
/// until a successful [`decrypt`] confirms it.
pub fn get_metadata(data: &[u8]) -> Result<Metadata, NpfError> {
    Ok(format::decode(data)?.into_metadata())
}

/// Encrypt a file on disk into an `.npf` container.
///
/// Metadata records the original filename and size. With no explicit
/// output path, `.npf` is appended to the input name. Returns the path
/// written.
pub fn encrypt_file(
    input: &Path,
    output: Option<&Path>,
    password: &str,
) -> Result<PathBuf, NpfError> {
    let plaintext = Zeroizing::new(Storage::new(input.to_path_buf()).load()?);

    let original_filename = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let metadata = Metadata::for_payload(&original_filename, plaintext.len());

    let container = encrypt(&plaintext, metadata, password)?;

    let output = match output {
        Some(p) => p.to_path_buf(),
        None => {
            let mut name = input.as_os_str().to_os_string();
            name.push(".npf");
            PathBuf::from(name)
        }
    };
    Storage::new(output.clone()).save(&container)?;
    Ok(output)
}

/// Decrypt an `.npf` container back to a file on disk.
///
/// With no explicit output path the original filename from the metadata
/// is restored next to the input. Returns the path written and the
/// container's metadata.
pub fn decrypt_file(
    input: &Path,
    output: Option<&Path>,
    password: &str,
) -> Result<(PathBuf, Metadata), NpfError> {
    let data = Storage::new(input.to_path_buf()).load()?;
    let (plaintext, metadata) = decrypt(&data, password)?;

    let output = match output {
        Some(p) => p.to_path_buf(),
        None => default_output(input, &metadata),
    };
    Storage::new(output.clone()).save(&plaintext)?;
    Ok((output, metadata))
}

fn default_output(input: &Path, metadata: &Metadata) -> PathBuf {
    if let Some(name) = metadata.get("original_filename") {
        if !name.is_empty() {
            return input.with_file_name(name);
        }
    }
    if input.extension().is_some_and(|e| e == "npf") {
        return input.with_extension("");
    }
    input.with_extension("decrypted")
}
