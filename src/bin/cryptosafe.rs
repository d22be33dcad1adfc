//! Cryptosafe CLI - Passphrase-based file encryption
//!
//! Command-line interface for encrypting and decrypting files using
//! AES-GCM with PBKDF2-HMAC-SHA256 key derivation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use cryptosafe::file_ops;
use cryptosafe::params::{EncryptionParameters, KeyLength};
use cryptosafe::passphrase::{PassphraseReader, ReaderPassphraseReader, TerminalPassphraseReader};

#[derive(Parser)]
#[command(name = "cryptosafe")]
#[command(version)]
#[command(about = "Passphrase-based file encryption.", long_about = None)]
struct Cli {
    /// Read passphrase from stdin instead of from terminal
    #[arg(long, global = true)]
    passphrase_stdin: bool,

    /// Cipher to use: aes-256, aes-192 or aes-128. Encrypted files do not
    /// record it, so decrypt and update need the value used to encrypt.
    #[arg(long, global = true, value_name = "ALGORITHM", default_value = "aes-256")]
    algorithm: KeyLength,

    /// Replace the output file of encrypt or decrypt if it already exists
    #[arg(long, global = true)]
    force: bool,

    /// Log filter used when RUST_LOG is not set (e.g. "debug", "cryptosafe=trace")
    #[arg(long, global = true, value_name = "FILTER", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file
    #[command(alias = "e")]
    Encrypt {
        /// Path to the file whose contents is to be encrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to write the encrypted file to [default: <input>.encrypted]
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Decrypt a file
    #[command(alias = "d")]
    Decrypt {
        /// Path to the file whose contents is to be decrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to write the decrypted file to [default: <input> without
        /// ".encrypted", or <input>.decrypted]
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Update an encrypted file with new content, while validating
    /// that the passphrase is not accidentally changed.
    #[command(alias = "u")]
    Update {
        /// Path to the file whose contents is to be encrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the existing encrypted file to replace
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let params = EncryptionParameters::new(cli.algorithm);
    let mut reader = get_passphrase_reader(cli.passphrase_stdin);

    let result = match cli.command {
        Commands::Encrypt { input, output } => {
            let output = output.unwrap_or_else(|| file_ops::encrypted_output_path(&input));
            file_ops::encrypt_file(&input, &output, &mut *reader, &params, cli.force)
        }
        Commands::Decrypt { input, output } => {
            let output = output.unwrap_or_else(|| file_ops::decrypted_output_path(&input));
            file_ops::decrypt_file(&input, &output, &mut *reader, &params, cli.force)
        }
        Commands::Update { input, output } => {
            file_ops::update_file(&input, &output, &mut *reader, &params)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e.chain_message());
        process::exit(1);
    }
}

fn get_passphrase_reader(use_stdin: bool) -> Box<dyn PassphraseReader> {
    if use_stdin {
        Box::new(ReaderPassphraseReader::new(std::io::stdin()))
    } else {
        Box::new(TerminalPassphraseReader::new())
    }
}
