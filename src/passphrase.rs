//! Where the CLI gets its passphrase from
//!
//! Every source hands back raw bytes in a `Zeroizing` buffer. The cipher
//! engine never sees a `String`, so non-UTF-8 passphrases work whenever the
//! source can deliver them.

use crate::error::{CryptosafeError, ErrorCategory, ErrorKind, Result};
use std::io::{self, IsTerminal, Read, Write};
use zeroize::Zeroizing;

const TERMINAL_PROMPT: &str = "Passphrase (cryptosafe): ";

/// A source of passphrase bytes
pub trait PassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>>;
}

/// Hands out the same passphrase on every call
pub struct ConstantPassphraseReader {
    passphrase: Zeroizing<Vec<u8>>,
}

impl ConstantPassphraseReader {
    pub fn new(passphrase: impl Into<Vec<u8>>) -> Self {
        Self {
            passphrase: Zeroizing::new(passphrase.into()),
        }
    }
}

impl PassphraseReader for ConstantPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        Ok(self.passphrase.clone())
    }
}

/// Drains an `io::Read` (stdin for `--passphrase-stdin`) and uses every
/// byte as the passphrase. A trailing newline is part of the passphrase.
pub struct ReaderPassphraseReader<R> {
    reader: R,
}

impl<R: Read> ReaderPassphraseReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> PassphraseReader for ReaderPassphraseReader<R> {
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        let mut buf = Zeroizing::new(Vec::new());
        self.reader
            .read_to_end(&mut buf)
            .map_err(|e| io_failure(ErrorKind::Io, "could not read passphrase input", e))?;
        Ok(buf)
    }
}

/// Prompts on stderr and reads a line from the terminal without echo
///
/// Only UTF-8 input is possible here; use a `ReaderPassphraseReader` for
/// arbitrary bytes.
#[derive(Default)]
pub struct TerminalPassphraseReader;

impl TerminalPassphraseReader {
    pub fn new() -> Self {
        Self
    }
}

impl PassphraseReader for TerminalPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        if !io::stdin().is_terminal() {
            return Err(CryptosafeError::with_kind(
                ErrorCategory::User,
                ErrorKind::PassphraseUnavailable,
                "stdin is not a terminal; pass --passphrase-stdin to pipe a passphrase",
            ));
        }

        let mut stderr = io::stderr();
        stderr
            .write_all(TERMINAL_PROMPT.as_bytes())
            .and_then(|()| stderr.flush())
            .map_err(|e| io_failure(ErrorKind::Io, "could not show passphrase prompt", e))?;

        let line = Zeroizing::new(rpassword::read_password().map_err(|e| {
            io_failure(ErrorKind::PassphraseUnavailable, "could not read passphrase", e)
        })?);
        Ok(Zeroizing::new(line.as_bytes().to_vec()))
    }
}

fn io_failure(kind: ErrorKind, msg: &str, err: io::Error) -> CryptosafeError {
    CryptosafeError::with_kind_and_source(
        ErrorCategory::Internal,
        kind,
        format!("{}: {}", msg, err),
        err,
    )
}
