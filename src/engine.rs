//! Passphrase-based authenticated encryption
//!
//! This module implements the cipher engine using:
//! - PBKDF2-HMAC-SHA256 (100000 iterations) to derive a key from the passphrase and salt
//! - AES-GCM (128, 192 or 256-bit key, 96-bit nonce, no associated data) for
//!   authenticated encryption
//!
//! Derived keys live in `Zeroizing` buffers and are wiped when the call
//! returns, on success and on every error path. The AES key schedule built
//! from them is wiped when the cipher is dropped.

use aes::Aes192;
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, KeyInit, Nonce};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::container::Container;
use crate::error::{CryptosafeError, ErrorCategory, ErrorKind, Result};
use crate::params::{EncryptionParameters, KDF_ITERATIONS, KeyLength, NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::random::{OsRandom, SecureRandom};

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Derive a key of the requested size from a passphrase and salt
fn derive_key(
    passphrase: &[u8],
    salt: &[u8; SALT_LEN],
    key_length: KeyLength,
) -> Zeroizing<Vec<u8>> {
    debug!(
        key_bits = key_length.bits(),
        iterations = KDF_ITERATIONS,
        "deriving key"
    );
    let mut key = Zeroizing::new(vec![0u8; key_length.key_bytes()]);
    pbkdf2_hmac::<Sha256>(passphrase, salt, KDF_ITERATIONS, key.as_mut_slice());
    key
}

fn check_passphrase(passphrase: &[u8]) -> Result<()> {
    if passphrase.is_empty() {
        return Err(CryptosafeError::with_kind(
            ErrorCategory::User,
            ErrorKind::EmptyPassphrase,
            "passphrase must not be empty",
        ));
    }
    Ok(())
}

fn internal(msg: &str) -> CryptosafeError {
    CryptosafeError::with_kind(ErrorCategory::Internal, ErrorKind::InternalInvariant, msg)
}

fn aead_seal<C: Aead + KeyInit>(
    key: &[u8],
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let cipher =
        C::new_from_slice(key).map_err(|_| internal("derived key does not fit the cipher"))?;
    cipher
        .encrypt(Nonce::<C>::from_slice(nonce), plaintext)
        .map_err(|_| internal("AES-GCM encryption failed"))
}

fn aead_open<C: Aead + KeyInit>(
    key: &[u8],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let cipher =
        C::new_from_slice(key).map_err(|_| internal("derived key does not fit the cipher"))?;
    cipher
        .decrypt(Nonce::<C>::from_slice(nonce), ciphertext)
        .map_err(|_| CryptosafeError::authentication_failed())
}

/// Encrypt plaintext with a passphrase using fresh random salt and nonce
/// from the operating system CSPRNG
pub fn seal(
    plaintext: &[u8],
    passphrase: &[u8],
    params: &EncryptionParameters,
) -> Result<Container> {
    seal_with_rng(plaintext, passphrase, params, &mut OsRandom)
}

/// Encrypt plaintext with a passphrase, drawing salt and nonce from `rng`
pub fn seal_with_rng(
    plaintext: &[u8],
    passphrase: &[u8],
    params: &EncryptionParameters,
    rng: &mut dyn SecureRandom,
) -> Result<Container> {
    check_passphrase(passphrase)?;

    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt)?;

    let mut nonce = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce)?;

    seal_deterministic(plaintext, passphrase, params, &salt, &nonce)
}

/// Encrypt plaintext with a passphrase using provided salt and nonce
///
/// This function is ONLY for testing purposes to generate deterministic output.
/// NEVER use this in production - always use `seal()` which generates random salt/nonce.
pub fn seal_deterministic(
    plaintext: &[u8],
    passphrase: &[u8],
    params: &EncryptionParameters,
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Container> {
    check_passphrase(passphrase)?;

    let key = derive_key(passphrase, salt, params.key_length);
    let ciphertext = match params.key_length {
        KeyLength::Aes128 => aead_seal::<Aes128Gcm>(&key, nonce, plaintext),
        KeyLength::Aes192 => aead_seal::<Aes192Gcm>(&key, nonce, plaintext),
        KeyLength::Aes256 => aead_seal::<Aes256Gcm>(&key, nonce, plaintext),
    }?;
    trace!(
        plaintext_len = plaintext.len(),
        ciphertext_len = ciphertext.len(),
        "sealed"
    );

    Ok(Container::new(*salt, *nonce, ciphertext))
}

/// Decrypt and verify a ciphertext with a passphrase
///
/// Every verification failure, including a ciphertext too short to carry
/// a tag, is reported as `AuthenticationFailed` without further detail.
pub fn open(
    salt: &[u8],
    nonce: &[u8],
    ciphertext: &[u8],
    passphrase: &[u8],
    params: &EncryptionParameters,
) -> Result<Vec<u8>> {
    check_passphrase(passphrase)?;

    let salt: &[u8; SALT_LEN] = salt.try_into().map_err(|_| {
        CryptosafeError::with_kind(
            ErrorCategory::User,
            ErrorKind::InvalidSaltLength,
            format!("salt must be {} bytes, got {}", SALT_LEN, salt.len()),
        )
    })?;
    let nonce: &[u8; NONCE_LEN] = nonce.try_into().map_err(|_| {
        CryptosafeError::with_kind(
            ErrorCategory::User,
            ErrorKind::InvalidNonceLength,
            format!("nonce must be {} bytes, got {}", NONCE_LEN, nonce.len()),
        )
    })?;

    if ciphertext.len() < TAG_LEN {
        debug!(
            ciphertext_len = ciphertext.len(),
            "ciphertext shorter than authentication tag"
        );
        return Err(CryptosafeError::authentication_failed());
    }

    let key = derive_key(passphrase, salt, params.key_length);
    let plaintext = match params.key_length {
        KeyLength::Aes128 => aead_open::<Aes128Gcm>(&key, nonce, ciphertext),
        KeyLength::Aes192 => aead_open::<Aes192Gcm>(&key, nonce, ciphertext),
        KeyLength::Aes256 => aead_open::<Aes256Gcm>(&key, nonce, ciphertext),
    }?;
    trace!(plaintext_len = plaintext.len(), "opened");

    Ok(plaintext)
}

/// Decrypt and verify a decoded container
pub fn open_container(
    container: &Container,
    passphrase: &[u8],
    params: &EncryptionParameters,
) -> Result<Vec<u8>> {
    open(
        container.salt(),
        container.nonce(),
        container.ciphertext(),
        passphrase,
        params,
    )
}
