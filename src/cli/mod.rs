// Ciphergate — CLI Module
//
// Command-line interface using clap derive macros.
// Subcommands: encrypt, decrypt, logs, clear-logs, inspect-key, serve.

mod commands;

use clap::{Parser, Subcommand};

pub use commands::execute;

/// Ciphergate — RSA-OAEP encryption gateway with an audit ledger.
#[derive(Parser, Debug)]
#[command(name = "ciphergate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Audit database descriptor. Overrides the DATABASE_URL environment variable.
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encrypt a message with a PEM public key and print the base64 ciphertext.
    Encrypt {
        /// Path to the PEM public key, or "-" to read it from stdin.
        #[arg(long)]
        key: String,

        /// The plaintext to encrypt.
        #[arg(long)]
        data: String,
    },

    /// Decrypt a base64 ciphertext with a PEM private key.
    Decrypt {
        /// Path to the PEM private key, or "-" to read it from stdin.
        #[arg(long)]
        key: String,

        /// The base64 ciphertext.
        #[arg(long)]
        data: String,
    },

    /// Show audit records, newest first.
    Logs {
        /// Page size (default 10, at most 100).
        #[arg(long, allow_negative_numbers = true)]
        size: Option<i64>,

        /// Number of records to skip.
        #[arg(long, allow_negative_numbers = true)]
        offset: Option<i64>,

        /// Print the page as JSON instead of a table.
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Delete every audit record.
    ClearLogs,

    /// Show the armor lines, length, and classification of a PEM key.
    InspectKey {
        /// Path to the PEM key, or "-" to read it from stdin.
        #[arg(long)]
        key: String,
    },

    /// Start the JSON-RPC gateway over TCP.
    Serve {
        /// Listen address. Overrides CIPHERGATE_LISTEN.
        #[arg(long)]
        listen: Option<String>,

        /// Record the `forwarded_for` request member instead of the peer address.
        #[arg(long, default_value = "false")]
        trust_forwarded: bool,
    },
}
