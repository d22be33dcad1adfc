//! Cryptosafe - Passphrase-based file encryption using PBKDF2 and AES-GCM
//!
//! An encrypted file is a container of `salt(16) ‖ nonce(12) ‖ ciphertext`,
//! where the ciphertext carries the 16-byte GCM tag. The key is derived with
//! PBKDF2-HMAC-SHA256 at 100000 iterations.

#![forbid(unsafe_code)]

pub mod container;
pub mod crypt;
pub mod engine;
pub mod error;
pub mod file_ops;
pub mod params;
pub mod passphrase;
pub mod random;

pub use container::Container;
pub use crypt::{open, seal};
pub use error::{CryptosafeError, ErrorCategory, ErrorKind, Result};
pub use params::{EncryptionParameters, KeyLength};
