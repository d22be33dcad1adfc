use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to any other error
    /// category in this enum.
    ///
    /// In particular this means that use of Internal is never a guarantee
    /// the error is not, for example, due to a user error - merely that it
    /// cannot be confidently determined by the code.
    Internal,

    /// The user provided invalid input or performed an action that is
    /// unsupported or impossible to complete.
    User,
}

/// Fine-grained condition flags for consumers that want to branch on error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An empty passphrase was supplied.
    EmptyPassphrase,
    /// A salt of the wrong length was handed to the engine.
    InvalidSaltLength,
    /// A nonce of the wrong length was handed to the engine.
    InvalidNonceLength,
    /// The container is too short to hold a salt and a nonce.
    ContainerTooShort,
    /// Authentication failed due to an incorrect passphrase or tampering
    /// or corruption. Deliberately does not say which.
    AuthenticationFailed,
    /// The operating system CSPRNG could not be read.
    RandomnessUnavailable,
    /// A key size other than 128, 192 or 256 bits was requested.
    UnsupportedKeyLength,
    /// An algorithm name was given that this build does not implement.
    UnsupportedAlgorithm,
    /// Passphrase could not be obtained from the configured reader.
    PassphraseUnavailable,
    /// Unexpected state reached within cryptosafe logic.
    InternalInvariant,
    /// Interaction with the filesystem, stdin/stdout, or other I/O failed.
    Io,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct CryptosafeError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Optional specific condition tag for consumers that need to
    /// branch their behavior. Any code consuming errors MUST handle
    /// the absence of a defined kind.
    pub kind: Option<ErrorKind>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl CryptosafeError {
    /// Creates a new error with a required category and display message.
    pub fn new(category: ErrorCategory, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: None,
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that also tags the failure with a kind.
    pub fn with_kind(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that carries both a kind tag and the originating source error.
    pub fn with_kind_and_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// The single error reported for every failed open. Wrong passphrase,
    /// truncation and tampering are indistinguishable to the caller.
    pub fn authentication_failed() -> Self {
        Self::with_kind(
            ErrorCategory::User,
            ErrorKind::AuthenticationFailed,
            "incorrect passphrase or corrupted file",
        )
    }

    /// The user-facing message carried by the error.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Wraps the current error with a higher-level message while preserving the original as source.
    ///
    /// Category and kind are carried over so callers can still branch on them.
    pub fn with_context(self, msg: impl Into<String>) -> Self {
        let category = self.category;
        let kind = self.kind;
        Self {
            category,
            kind,
            source: Some(Box::new(self)),
            msg: msg.into(),
        }
    }

    /// Renders the message followed by every source message, separated by ": ".
    pub fn chain_message(&self) -> String {
        let mut out = self.msg.clone();
        let mut next = StdError::source(self);
        while let Some(err) = next {
            out.push_str(": ");
            out.push_str(&err.to_string());
            next = err.source();
        }
        out
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, CryptosafeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_preserves_kind_and_category() {
        let err = CryptosafeError::authentication_failed().with_context("failed to decrypt");
        assert_eq!(err.kind, Some(ErrorKind::AuthenticationFailed));
        assert_eq!(err.category, ErrorCategory::User);
        assert_eq!(err.message(), "failed to decrypt");
        assert!(err.source_error().is_some());
    }

    #[test]
    fn test_chain_message() {
        let err = CryptosafeError::authentication_failed()
            .with_context("failed to decrypt")
            .with_context("decrypting secret.txt.encrypted");
        assert_eq!(
            err.chain_message(),
            "decrypting secret.txt.encrypted: failed to decrypt: incorrect passphrase or corrupted file"
        );
    }

    #[test]
    fn test_new_has_no_kind() {
        let err = CryptosafeError::new(ErrorCategory::Internal, "boom");
        assert_eq!(err.kind, None);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_source_is_kept() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = CryptosafeError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::Io,
            "failed to read from x",
            io,
        );
        assert_eq!(err.chain_message(), "failed to read from x: missing");
    }
}
