//! Encryption parameters and fixed format constants
//!
//! Only the AES key size is selectable. Everything else (KDF, iteration
//! count, salt and nonce sizes) is fixed, and none of it is recorded in
//! the container, so the same parameters must be supplied on open.

use std::fmt;
use std::str::FromStr;

use crate::error::{CryptosafeError, ErrorCategory, ErrorKind, Result};

/// Length of salt in bytes
pub const SALT_LEN: usize = 16;

/// Length of nonce in bytes
pub const NONCE_LEN: usize = 12;

/// Length of the AES-GCM authentication tag in bytes
pub const TAG_LEN: usize = 16;

/// Bytes preceding the ciphertext in a container
pub const HEADER_LEN: usize = SALT_LEN + NONCE_LEN;

/// PBKDF2-HMAC-SHA256 iteration count
pub const KDF_ITERATIONS: u32 = 100_000;

/// AES-GCM key size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyLength {
    Aes128,
    Aes192,
    #[default]
    Aes256,
}

impl KeyLength {
    pub const ALL: [KeyLength; 3] = [KeyLength::Aes128, KeyLength::Aes192, KeyLength::Aes256];

    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            128 => Ok(KeyLength::Aes128),
            192 => Ok(KeyLength::Aes192),
            256 => Ok(KeyLength::Aes256),
            other => Err(CryptosafeError::with_kind(
                ErrorCategory::User,
                ErrorKind::UnsupportedKeyLength,
                format!("unsupported key length: {} bits (expected 128, 192 or 256)", other),
            )),
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            KeyLength::Aes128 => 128,
            KeyLength::Aes192 => 192,
            KeyLength::Aes256 => 256,
        }
    }

    pub fn key_bytes(self) -> usize {
        self.bits() as usize / 8
    }

    pub fn name(self) -> &'static str {
        match self {
            KeyLength::Aes128 => "aes-128",
            KeyLength::Aes192 => "aes-192",
            KeyLength::Aes256 => "aes-256",
        }
    }
}

impl fmt::Display for KeyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyLength {
    type Err = CryptosafeError;

    /// Parses algorithm names such as `aes-256`. Names of ciphers that are
    /// not implemented are rejected rather than mapped onto AES-GCM.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "aes-128" | "aes128" => Ok(KeyLength::Aes128),
            "aes-192" | "aes192" => Ok(KeyLength::Aes192),
            "aes-256" | "aes256" => Ok(KeyLength::Aes256),
            "blowfish" => Err(CryptosafeError::with_kind(
                ErrorCategory::User,
                ErrorKind::UnsupportedAlgorithm,
                "blowfish is not supported; use aes-256, aes-192 or aes-128",
            )),
            _ => Err(CryptosafeError::with_kind(
                ErrorCategory::User,
                ErrorKind::UnsupportedAlgorithm,
                format!("unknown algorithm {:?}; use aes-256, aes-192 or aes-128", s),
            )),
        }
    }
}

/// Per-operation configuration. Not persisted in the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncryptionParameters {
    pub key_length: KeyLength,
}

impl EncryptionParameters {
    pub fn new(key_length: KeyLength) -> Self {
        Self { key_length }
    }

    /// Builds parameters from a raw bit count, rejecting unsupported sizes.
    pub fn from_key_bits(bits: u32) -> Result<Self> {
        Ok(Self::new(KeyLength::from_bits(bits)?))
    }

    pub fn kdf_iterations(&self) -> u32 {
        KDF_ITERATIONS
    }

    /// Container length for a plaintext of `plaintext_len` bytes.
    pub fn sealed_len(&self, plaintext_len: usize) -> usize {
        HEADER_LEN + plaintext_len + TAG_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_aes256() {
        let params = EncryptionParameters::default();
        assert_eq!(params.key_length, KeyLength::Aes256);
        assert_eq!(params.key_length.key_bytes(), 32);
        assert_eq!(params.kdf_iterations(), 100_000);
    }

    #[test]
    fn test_from_bits() {
        for key_length in KeyLength::ALL {
            assert_eq!(KeyLength::from_bits(key_length.bits()).unwrap(), key_length);
        }
    }

    #[test]
    fn test_unsupported_bits() {
        for bits in [0, 64, 255, 512] {
            let err = EncryptionParameters::from_key_bits(bits).expect_err("expected rejection");
            assert_eq!(err.kind, Some(ErrorKind::UnsupportedKeyLength));
            assert_eq!(err.category, ErrorCategory::User);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("aes-256".parse::<KeyLength>().unwrap(), KeyLength::Aes256);
        assert_eq!("AES-192".parse::<KeyLength>().unwrap(), KeyLength::Aes192);
        assert_eq!("aes128".parse::<KeyLength>().unwrap(), KeyLength::Aes128);
        for key_length in KeyLength::ALL {
            assert_eq!(key_length.to_string().parse::<KeyLength>().unwrap(), key_length);
        }
    }

    #[test]
    fn test_blowfish_is_rejected() {
        let err = "blowfish".parse::<KeyLength>().expect_err("expected rejection");
        assert_eq!(err.kind, Some(ErrorKind::UnsupportedAlgorithm));
    }

    #[test]
    fn test_unknown_algorithm() {
        let err = "chacha20".parse::<KeyLength>().expect_err("expected rejection");
        assert_eq!(err.kind, Some(ErrorKind::UnsupportedAlgorithm));
    }

    #[test]
    fn test_sealed_len() {
        let params = EncryptionParameters::default();
        assert_eq!(params.sealed_len(0), 44);
        assert_eq!(params.sealed_len(11), 28 + 11 + 16);
    }
}
