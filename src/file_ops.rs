//! File encryption/decryption operations
//!
//! High-level operations that read a whole file into memory, run it through
//! the cipher engine, and write the result. Encrypted files hold the raw
//! container bytes.

use crate::crypt;
use crate::error::{CryptosafeError, ErrorCategory, ErrorKind, Result};
use crate::params::EncryptionParameters;
use crate::passphrase::PassphraseReader;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Suffix appended to encrypted files
pub const ENCRYPTED_SUFFIX: &str = "encrypted";

/// Suffix appended to decrypted files whose name did not end in `.encrypted`
pub const DECRYPTED_SUFFIX: &str = "decrypted";

/// Default output path for encrypting `input`: `<input>.encrypted`
pub fn encrypted_output_path(input: &Path) -> PathBuf {
    with_appended_suffix(input, ENCRYPTED_SUFFIX)
}

/// Default output path for decrypting `input`
///
/// Strips a trailing `.encrypted`, otherwise appends `.decrypted`. A file
/// named exactly `.encrypted` has nothing left to strip, so it becomes
/// `.encrypted.decrypted`.
pub fn decrypted_output_path(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext == ENCRYPTED_SUFFIX => input.with_extension(""),
        _ => with_appended_suffix(input, DECRYPTED_SUFFIX),
    }
}

fn with_appended_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Encrypt a file with a passphrase
///
/// Reads plaintext from `input_path`, encrypts it using a passphrase from
/// `passphrase_reader`, and writes the container to `output_path`.
///
/// An existing `output_path` is an error unless `overwrite` is set. The
/// output ends up with mode 0o600 on Unix either way.
pub fn encrypt_file(
    input_path: &Path,
    output_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
    params: &EncryptionParameters,
    overwrite: bool,
) -> Result<()> {
    let plaintext = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let passphrase = passphrase_reader.read_passphrase()?;
    debug!(
        input = %input_path.display(),
        bytes = plaintext.len(),
        algorithm = %params.key_length,
        "encrypting"
    );
    let sealed = crypt::seal(&plaintext, &passphrase, params)
        .map_err(|e| e.with_context("encryption failed"))?;
    write_file_secure(output_path, &sealed, overwrite)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;
    info!(output = %output_path.display(), bytes = sealed.len(), "wrote encrypted file");

    Ok(())
}

/// Decrypt a file with a passphrase
///
/// Reads a container from `input_path`, decrypts it using a passphrase from
/// `passphrase_reader`, and writes the plaintext to `output_path`. Nothing is
/// written unless decryption succeeds.
///
/// Overwrite and permission rules are the same as for [`encrypt_file`].
pub fn decrypt_file(
    input_path: &Path,
    output_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
    params: &EncryptionParameters,
    overwrite: bool,
) -> Result<()> {
    let sealed = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let passphrase = passphrase_reader.read_passphrase()?;
    debug!(
        input = %input_path.display(),
        bytes = sealed.len(),
        algorithm = %params.key_length,
        "decrypting"
    );
    let plaintext = crypt::open(&sealed, &passphrase, params)
        .map_err(|e| e.with_context("failed to decrypt"))?;
    write_file_secure(output_path, &plaintext, overwrite)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;
    info!(output = %output_path.display(), bytes = plaintext.len(), "wrote decrypted file");

    Ok(())
}

/// Update an encrypted file with new plaintext using the same passphrase
///
/// This function:
/// 1. Decrypts the existing file at `crypt_path` to validate the passphrase
/// 2. Reads new plaintext from `plain_path`
/// 3. Encrypts the new plaintext with the validated passphrase (fresh salt and nonce)
/// 4. Atomically writes to `crypt_path` (tempfile + fsync + rename)
///
/// Either the old file or the new file exists afterwards, never a partial one.
pub fn update_file(
    plain_path: &Path,
    crypt_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
    params: &EncryptionParameters,
) -> Result<()> {
    let existing = fs::read(crypt_path).map_err(|e| read_error(crypt_path, e))?;
    let passphrase = passphrase_reader.read_passphrase()?;

    // Validate passphrase by decrypting existing file (discard plaintext)
    crypt::open(&existing, &passphrase, params)
        .map_err(|e| e.with_context("failed to decrypt"))?;

    let new_plaintext = fs::read(plain_path).map_err(|e| read_error(plain_path, e))?;
    let sealed = crypt::seal(&new_plaintext, &passphrase, params)
        .map_err(|e| e.with_context("failed to encrypt"))?;

    let crypt_dir = match crypt_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        Some(_) => Path::new("."),
        None => {
            return Err(CryptosafeError::with_kind(
                ErrorCategory::User,
                ErrorKind::Io,
                "crypt_path has no parent directory",
            ));
        }
    };
    let mut temp_file = tempfile::NamedTempFile::new_in(crypt_dir)
        .map_err(|e| internal_io("failed to create tempfile", e))?;

    temp_file
        .write_all(&sealed)
        .map_err(|e| internal_io("failed to write to tempfile", e))?;
    // Flush and fsync() such that the rename later, if it succeeds, will
    // always point to a valid file.
    temp_file
        .flush()
        .map_err(|e| internal_io("failed to flush tempfile", e))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| internal_io("failed to sync file prior to rename", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp_file
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| internal_io("failed to set tempfile permissions", e))?;
    }
    temp_file.persist(crypt_path).map_err(|e| {
        CryptosafeError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to rename to target file {}", crypt_path.display()),
            e,
        )
    })?;
    info!(output = %crypt_path.display(), bytes = sealed.len(), "replaced encrypted file");

    Ok(())
}

/// Write file with secure permissions (0o600 on Unix)
///
/// Without `overwrite` the file must not exist yet. A replaced file is
/// narrowed to 0o600 before any contents are written, since `mode` only
/// applies at creation.
fn write_file_secure(path: &Path, contents: &[u8], overwrite: bool) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|e| {
        let msg = if e.kind() == io::ErrorKind::AlreadyExists {
            format!("refusing to overwrite existing {}", path.display())
        } else {
            format!("failed to open {}", path.display())
        };
        CryptosafeError::with_kind_and_source(ErrorCategory::User, ErrorKind::Io, msg, e)
    })?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| internal_io(format!("failed to restrict {}", path.display()), e))?;
    }
    file.write_all(contents)
        .map_err(|e| internal_io(format!("failed to write {}", path.display()), e))?;
    Ok(())
}

fn internal_io(msg: impl Into<String>, err: io::Error) -> CryptosafeError {
    CryptosafeError::with_kind_and_source(ErrorCategory::Internal, ErrorKind::Io, msg, err)
}

fn read_error(path: &Path, err: io::Error) -> CryptosafeError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    CryptosafeError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}
