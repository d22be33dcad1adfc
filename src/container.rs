//! Binary container for encrypted files
//!
//! The container format is:
//! - salt: 16 bytes
//! - nonce: 12 bytes
//! - ciphertext: everything remaining (includes the 16-byte GCM tag)
//!
//! There is no version tag, algorithm identifier or length prefix.

use crate::error::{CryptosafeError, ErrorCategory, ErrorKind, Result};
use crate::params::{HEADER_LEN, NONCE_LEN, SALT_LEN};

/// An encrypted file, split into its three fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
}

impl Container {
    pub fn new(salt: [u8; SALT_LEN], nonce: [u8; NONCE_LEN], ciphertext: Vec<u8>) -> Self {
        Self {
            salt,
            nonce,
            ciphertext,
        }
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Total encoded size in bytes.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.ciphertext.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        encode(&self.salt, &self.nonce, &self.ciphertext)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode(bytes)
    }
}

/// Concatenate `salt ‖ nonce ‖ ciphertext`.
pub fn encode(salt: &[u8; SALT_LEN], nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    output.extend_from_slice(salt);
    output.extend_from_slice(nonce);
    output.extend_from_slice(ciphertext);
    output
}

/// Split a container into its fields.
///
/// A zero-length ciphertext is accepted here; the engine rejects it.
pub fn decode(bytes: &[u8]) -> Result<Container> {
    if bytes.len() < HEADER_LEN {
        return Err(CryptosafeError::with_kind(
            ErrorCategory::User,
            ErrorKind::ContainerTooShort,
            format!(
                "input is {} bytes, shorter than the {}-byte salt and nonce header; likely truncated",
                bytes.len(),
                HEADER_LEN
            ),
        ));
    }

    let (salt, rest) = bytes.split_at(SALT_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

    let salt: [u8; SALT_LEN] = salt.try_into().map_err(|_| {
        CryptosafeError::with_kind(
            ErrorCategory::Internal,
            ErrorKind::InternalInvariant,
            "failed to read salt",
        )
    })?;
    let nonce: [u8; NONCE_LEN] = nonce.try_into().map_err(|_| {
        CryptosafeError::with_kind(
            ErrorCategory::Internal,
            ErrorKind::InternalInvariant,
            "failed to read nonce",
        )
    })?;

    Ok(Container::new(salt, nonce, ciphertext.to_vec()))
}
