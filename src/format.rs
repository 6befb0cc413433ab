//! Byte-level framing of NPF containers.
//!
//! Layout (all integers big-endian):
//! ```text
//! MAGIC (19) | SALT_LEN (4) | SALT (16) | NONCE_LEN (4) | NONCE (12) |
//! META_LEN (4) | METADATA (JSON) | CIPHERTEXT || TAG
//! ```
//!
//! The codec is pure data transformation: it validates structure, never
//! authenticity. The metadata bytes embedded here are the exact bytes the
//! cipher engine binds as associated data.

use crate::crypto::{NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::NpfError;
use crate::metadata::Metadata;

/// Magic bytes identifying an NPF container.
pub const MAGIC: &[u8] = b"NPF_ENCRYPTED_IMAGE";

const LEN_FIELD: usize = 4;

/// A parsed (or about-to-be-serialized) NPF container.
///
/// Holds both the parsed metadata and its serialized form: the raw bytes
/// are what the authentication tag covers, so they must survive the
/// decode verbatim.
#[derive(Debug)]
pub struct Container {
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
    metadata: Metadata,
    metadata_bytes: Vec<u8>,
    ciphertext: Vec<u8>,
}

impl Container {
    /// Assembles a container from freshly encrypted parts. `ciphertext`
    /// includes the trailing authentication tag.
    pub fn new(
        salt: [u8; SALT_LEN],
        nonce: [u8; NONCE_LEN],
        metadata: Metadata,
        ciphertext: Vec<u8>,
    ) -> Self {
        let metadata_bytes = metadata.to_bytes();
        Self {
            salt,
            nonce,
            metadata,
            metadata_bytes,
            ciphertext,
        }
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The serialized metadata exactly as framed; used as AEAD
    /// associated data.
    pub fn metadata_bytes(&self) -> &[u8] {
        &self.metadata_bytes
    }

    /// `ciphertext || tag`, opaque to the codec.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn into_metadata(self) -> Metadata {
        self.metadata
    }
}

/// Returns `true` if the buffer starts with the NPF magic. No crypto, no
/// allocation; usable by a viewer to tell "not ours" from "wrong
/// password".
pub fn is_npf(data: &[u8]) -> bool {
    data.starts_with(MAGIC)
}

/// Serializes a container to its byte layout.
pub fn encode(container: &Container) -> Vec<u8> {
    let meta = container.metadata_bytes();

    let mut buf = Vec::with_capacity(
        MAGIC.len()
            + LEN_FIELD * 3
            + SALT_LEN
            + NONCE_LEN
            + meta.len()
            + container.ciphertext().len(),
    );

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&(SALT_LEN as u32).to_be_bytes());
    buf.extend_from_slice(container.salt());
    buf.extend_from_slice(&(NONCE_LEN as u32).to_be_bytes());
    buf.extend_from_slice(container.nonce());
    buf.extend_from_slice(&(meta.len() as u32).to_be_bytes());
    buf.extend_from_slice(meta);
    buf.extend_from_slice(container.ciphertext());

    buf
}

/// Parses a container, validating structure in order: magic, declared
/// lengths against the remaining buffer, then the metadata block.
///
/// # Errors
///
/// - [`NpfError::NotAnNpfFile`] if the magic is absent
/// - [`NpfError::Truncated`] if any declared length overruns the buffer,
///   a declared salt/nonce length disagrees with the format constants, or
///   the trailing region is too short to hold an authentication tag
/// - [`NpfError::MalformedMetadata`] if the metadata block is not a JSON
///   string map
pub fn decode(data: &[u8]) -> Result<Container, NpfError> {
    if !is_npf(data) {
        return Err(NpfError::NotAnNpfFile);
    }

    let mut offset = MAGIC.len();

    let salt_len = read_len(data, &mut offset)?;
    if salt_len != SALT_LEN {
        return Err(NpfError::Truncated);
    }
    let salt: [u8; SALT_LEN] = read_exact(data, &mut offset, SALT_LEN)?
        .try_into()
        .map_err(|_| NpfError::Truncated)?;

    let nonce_len = read_len(data, &mut offset)?;
    if nonce_len != NONCE_LEN {
        return Err(NpfError::Truncated);
    }
    let nonce: [u8; NONCE_LEN] = read_exact(data, &mut offset, NONCE_LEN)?
        .try_into()
        .map_err(|_| NpfError::Truncated)?;

    let meta_len = read_len(data, &mut offset)?;
    let metadata_bytes = read_exact(data, &mut offset, meta_len)?.to_vec();

    let ciphertext = data[offset..].to_vec();
    if ciphertext.len() < TAG_LEN {
        return Err(NpfError::Truncated);
    }

    let metadata = Metadata::from_bytes(&metadata_bytes)?;

    Ok(Container {
        salt,
        nonce,
        metadata,
        metadata_bytes,
        ciphertext,
    })
}

/// Reads a big-endian u32 length field.
fn read_len(data: &[u8], offset: &mut usize) -> Result<usize, NpfError> {
    let bytes = read_exact(data, offset, LEN_FIELD)?;
    let len = u32::from_be_bytes(bytes.try_into().map_err(|_| NpfError::Truncated)?);
    Ok(len as usize)
}

/// Reads `len` bytes, failing if the buffer is exhausted.
fn read_exact<'a>(data: &'a [u8], offset: &mut usize, len: usize) -> Result<&'a [u8], NpfError> {
    let end = offset.checked_add(len).ok_or(NpfError::Truncated)?;
    if end > data.len() {
        return Err(NpfError::Truncated);
    }
    let slice = &data[*offset..end];
    *offset = end;
    Ok(slice)
}
