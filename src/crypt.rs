//! Byte-in, byte-out encryption for callers that only handle opaque buffers.

use crate::container;
use crate::engine;
use crate::error::Result;
use crate::params::EncryptionParameters;

/// Encrypt plaintext and return the encoded container:
/// salt(16) + nonce(12) + ciphertext(variable, includes 16-byte tag)
pub fn seal(plaintext: &[u8], passphrase: &[u8], params: &EncryptionParameters) -> Result<Vec<u8>> {
    let sealed = engine::seal(plaintext, passphrase, params)?;
    Ok(sealed.to_bytes())
}

/// Decode a container and decrypt it
pub fn open(bytes: &[u8], passphrase: &[u8], params: &EncryptionParameters) -> Result<Vec<u8>> {
    let container = container::decode(bytes)?;
    engine::open_container(&container, passphrase, params)
}
