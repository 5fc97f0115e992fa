// Ciphergate — Configuration
//
// All runtime configuration is injected explicitly. The only required value
// is the storage descriptor in `DATABASE_URL`; its absence is fatal at
// startup. Command-line flags take precedence over the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::store::Database;

/// Names the SQLite file that holds the audit ledger.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Address the JSON-RPC server binds to.
pub const LISTEN_ENV: &str = "CIPHERGATE_LISTEN";

/// When truthy, a `forwarded_for` request member overrides the peer address.
pub const TRUST_FORWARDED_ENV: &str = "CIPHERGATE_TRUST_FORWARDED";

pub const DEFAULT_LISTEN: &str = "127.0.0.1:7878";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL is not set; point it at the audit database (e.g. sqlite:///var/lib/ciphergate/audit.db)")]
    MissingDatabaseUrl,

    #[error("Unsupported storage descriptor '{0}': only SQLite database files are supported")]
    UnsupportedDescriptor(String),

    #[error("In-memory storage does not outlive the process: '{0}'")]
    InMemoryDescriptor(String),

    #[error("Invalid listen address '{value}': {reason}")]
    InvalidListenAddress { value: String, reason: String },
}

/// Resolved gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub database: Database,
    pub listen_addr: SocketAddr,
    pub trust_forwarded: bool,
}

impl GatewayConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let descriptor = lookup(DATABASE_URL_ENV).ok_or(ConfigError::MissingDatabaseUrl)?;
        let database = parse_database_url(&descriptor)?;

        let listen = lookup(LISTEN_ENV).unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let listen_addr = listen
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidListenAddress {
                value: listen.clone(),
                reason: e.to_string(),
            })?;

        let trust_forwarded = lookup(TRUST_FORWARDED_ENV)
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        Ok(Self {
            database,
            listen_addr,
            trust_forwarded,
        })
    }
}

/// Parse a storage descriptor into a database location.
///
/// Accepts `sqlite://<path>`, `sqlite:<path>`, `file:<path>` (query strings
/// are ignored), or a bare filesystem path.
pub fn parse_database_url(descriptor: &str) -> Result<Database, ConfigError> {
    let descriptor = descriptor.trim();
    if descriptor.is_empty() {
        return Err(ConfigError::MissingDatabaseUrl);
    }

    let location = if let Some(rest) = descriptor.strip_prefix("sqlite://") {
        strip_query(rest)
    } else if let Some(rest) = descriptor.strip_prefix("sqlite:") {
        strip_query(rest)
    } else if let Some(rest) = descriptor.strip_prefix("file:") {
        strip_query(rest)
    } else if descriptor.contains("://") {
        return Err(ConfigError::UnsupportedDescriptor(descriptor.to_string()));
    } else {
        descriptor
    };

    if location.is_empty() || location == ":memory:" || descriptor.contains("mode=memory") {
        return Err(ConfigError::InMemoryDescriptor(descriptor.to_string()));
    }

    Ok(Database::new(PathBuf::from(location)))
}

fn strip_query(s: &str) -> &str {
    s.split_once('?').map(|(path, _)| path).unwrap_or(s)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ─── Tests ───────────────────────────────────────────────────────────────────
