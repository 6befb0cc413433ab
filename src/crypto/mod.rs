//! Cryptographic engine for NPF containers.
//!
//! Provides key derivation, authenticated encryption, and random
//! salt/nonce generation. The constants below are format parameters:
//! encode and decode must agree on all of them, so changing any one is a
//! breaking format change and requires a version bump.

pub mod aead;
pub mod kdf;

pub use aead::{decrypt, encrypt, generate_salt};
pub use kdf::derive_key;

/// Length of the key-derivation salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the AES-GCM nonce (12 bytes).
pub const NONCE_LEN: usize = 12;
/// Length of the encryption key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the GCM authentication tag (16 bytes).
pub const TAG_LEN: usize = 16;
/// PBKDF2 iteration count. Not stored per file for derivation purposes;
/// identical between encrypt and decrypt by construction.
pub const PBKDF2_ITERATIONS: u32 = 100_000;
