//! Golden test vector validation
//!
//! The vectors in testdata/golden-vectors.json were produced by an
//! independent PBKDF2-HMAC-SHA256 + AES-GCM implementation.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use serde::Deserialize;

use cryptosafe::engine;
use cryptosafe::params::EncryptionParameters;
use cryptosafe::{ErrorKind, container};

#[derive(Debug, Deserialize)]
struct GoldenVector {
    plaintext: String,
    passphrase: String,
    salt: String,
    nonce: String,
    key_bits: u32,
    container: String,
    comment: String,
}

struct Decoded {
    plaintext: Vec<u8>,
    passphrase: Vec<u8>,
    salt: [u8; 16],
    nonce: [u8; 12],
    params: EncryptionParameters,
    container: Vec<u8>,
}

fn load_golden_vectors() -> Vec<GoldenVector> {
    let json_data = include_str!("../testdata/golden-vectors.json");
    serde_json::from_str(json_data).expect("failed to parse golden vectors")
}

fn decode(vector: &GoldenVector) -> Decoded {
    let b64 = |field: &str| BASE64_STANDARD.decode(field).expect("invalid base64");
    Decoded {
        plaintext: b64(&vector.plaintext),
        passphrase: b64(&vector.passphrase),
        salt: b64(&vector.salt).try_into().expect("salt must be 16 bytes"),
        nonce: b64(&vector.nonce).try_into().expect("nonce must be 12 bytes"),
        params: EncryptionParameters::from_key_bits(vector.key_bits).expect("bad key size"),
        container: b64(&vector.container),
    }
}

#[test]
fn test_golden_vectors_seal() {
    let vectors = load_golden_vectors();
    assert!(!vectors.is_empty(), "No golden vectors were loaded");

    for (i, vector) in vectors.iter().enumerate() {
        let v = decode(vector);
        let sealed = engine::seal_deterministic(
            &v.plaintext,
            &v.passphrase,
            &v.params,
            &v.salt,
            &v.nonce,
        )
        .unwrap_or_else(|e| panic!("vector {} ({}): seal failed: {}", i, vector.comment, e));

        assert_eq!(
            sealed.to_bytes(),
            v.container,
            "vector {} ({}): container mismatch",
            i,
            vector.comment
        );
    }
}

#[test]
fn test_golden_vectors_open() {
    for (i, vector) in load_golden_vectors().iter().enumerate() {
        let v = decode(vector);
        let opened = cryptosafe::open(&v.container, &v.passphrase, &v.params)
            .unwrap_or_else(|e| panic!("vector {} ({}): open failed: {}", i, vector.comment, e));
        assert_eq!(opened, v.plaintext, "vector {} ({})", i, vector.comment);
    }
}

#[test]
fn test_golden_vectors_reject_tampered_tag() {
    for (i, vector) in load_golden_vectors().iter().enumerate() {
        let v = decode(vector);
        let mut tampered = v.container.clone();
        let last = tampered.len() - 1;
        tampered[last] ^= 0x80;

        let parsed = container::decode(&tampered).expect("structurally valid");
        let err = engine::open_container(&parsed, &v.passphrase, &v.params)
            .expect_err("tampered vector must not open");
        assert_eq!(
            err.kind,
            Some(ErrorKind::AuthenticationFailed),
            "vector {} ({})",
            i,
            vector.comment
        );
    }
}
