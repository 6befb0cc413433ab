use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::crypto::PBKDF2_ITERATIONS;
use crate::error::NpfError;

/// Container format version, recorded in the metadata block.
pub const FORMAT_VERSION: &str = "1";

/// String-to-string metadata stored alongside the ciphertext.
///
/// Serialized as a JSON object inside the container and bound into the
/// authentication tag as associated data, so it cannot be altered without
/// failing decryption. A `BTreeMap` keeps the serialized form
/// deterministic.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Metadata {
    entries: BTreeMap<String, String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the standard metadata set for an encrypted payload:
    /// original filename and size, format version, creation timestamp,
    /// and the KDF iteration count (informational; decryption always
    /// derives with the format constant).
    pub fn for_payload(original_filename: &str, original_size: usize) -> Self {
        let mut meta = Self::new();
        meta.insert("original_filename", original_filename);
        meta.insert("original_size", &original_size.to_string());
        meta.insert("format_version", FORMAT_VERSION);
        meta.insert("created_at", &Local::now().to_rfc3339());
        meta.insert("kdf_iterations", &PBKDF2_ITERATIONS.to_string());
        meta
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to the exact bytes embedded in the container and fed to
    /// the AEAD as associated data.
    pub fn to_bytes(&self) -> Vec<u8> {
        // serializing a string map cannot fail
        serde_json::to_vec(self).expect("metadata serialization")
    }

    /// Parse a metadata block from its serialized form.
    pub fn from_bytes(data: &[u8]) -> Result<Self, NpfError> {
        serde_json::from_slice(data).map_err(NpfError::MalformedMetadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_payload_sets_standard_keys() {
        let meta = Metadata::for_payload("cat.jpg", 1024);

        assert_eq!(meta.get("original_filename"), Some("cat.jpg"));
        assert_eq!(meta.get("original_size"), Some("1024"));
        assert_eq!(meta.get("format_version"), Some(FORMAT_VERSION));
        assert_eq!(meta.get("kdf_iterations"), Some("100000"));
        assert_ne!(meta.get("created_at"), None);
    }

    #[test]
    fn bytes_roundtrip() {
        let meta = Metadata::for_payload("cat.jpg", 1024);

        let bytes = meta.to_bytes();
        let parsed = Metadata::from_bytes(&bytes).unwrap();

        assert_eq!(parsed, meta);
    }

    #[test]
    fn serialization_is_deterministic() {
        let mut a = Metadata::new();
        a.insert("zeta", "1");
        a.insert("alpha", "2");

        let mut b = Metadata::new();
        b.insert("alpha", "2");
        b.insert("zeta", "1");

        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn non_json_fails_as_malformed() {
        let err = Metadata::from_bytes(b"not json at all").unwrap_err();
        assert!(matches!(err, NpfError::MalformedMetadata(_)));
    }

    #[test]
    fn non_string_values_fail_as_malformed() {
        let err = Metadata::from_bytes(br#"{"size": 10}"#).unwrap_err();
        assert!(matches!(err, NpfError::MalformedMetadata(_)));
    }
}
