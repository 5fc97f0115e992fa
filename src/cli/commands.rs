// Ciphergate — CLI Command Handlers
//
// Each function handles one CLI subcommand against a `Gateway` built from
// the resolved configuration. Local commands record the "unknown" source;
// `serve` starts the TCP JSON-RPC server.

use std::io::Read;

use crate::config::{
    ConfigError, GatewayConfig, DATABASE_URL_ENV, LISTEN_ENV, TRUST_FORWARDED_ENV,
};
use crate::error::CiphergateError;
use crate::gateway::{Gateway, SourceAddress, TcpServer};
use crate::pem;

use super::{Cli, Commands};

/// Values given on the command line that take precedence over the environment.
#[derive(Debug, Default)]
struct ConfigOverrides {
    database_url: Option<String>,
    listen: Option<String>,
    trust_forwarded: bool,
}

impl ConfigOverrides {
    fn resolve(&self) -> Result<GatewayConfig, ConfigError> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    fn resolve_with<F>(&self, env: F) -> Result<GatewayConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        GatewayConfig::from_lookup(|key| match key {
            DATABASE_URL_ENV => self.database_url.clone().or_else(|| env(key)),
            LISTEN_ENV => self.listen.clone().or_else(|| env(key)),
            TRUST_FORWARDED_ENV if self.trust_forwarded => Some("true".to_string()),
            _ => env(key),
        })
    }
}

/// Execute the parsed CLI command.
pub async fn execute(cli: Cli) -> Result<(), CiphergateError> {
    let mut overrides = ConfigOverrides {
        database_url: cli.database_url,
        ..Default::default()
    };

    match cli.command {
        Commands::Encrypt { key, data } => cmd_encrypt(&overrides, &key, &data),
        Commands::Decrypt { key, data } => cmd_decrypt(&overrides, &key, &data),
        Commands::Logs { size, offset, json } => cmd_logs(&overrides, size, offset, json),
        Commands::ClearLogs => cmd_clear_logs(&overrides),
        Commands::InspectKey { key } => cmd_inspect_key(&key),
        Commands::Serve {
            listen,
            trust_forwarded,
        } => {
            overrides.listen = listen;
            overrides.trust_forwarded = trust_forwarded;
            cmd_serve(&overrides).await
        }
    }
}

// ─── Encrypt / Decrypt ───────────────────────────────────────────────────────

fn cmd_encrypt(overrides: &ConfigOverrides, key_path: &str, data: &str) -> Result<(), CiphergateError> {
    let gateway = open_gateway(overrides)?;
    let key = read_key(key_path)?;

    let response = gateway.encrypt(Some(key.as_str()), Some(data), &SourceAddress::unknown())?;
    println!("{}", response.ciphertext);

    Ok(())
}

fn cmd_decrypt(overrides: &ConfigOverrides, key_path: &str, data: &str) -> Result<(), CiphergateError> {
    let gateway = open_gateway(overrides)?;
    let key = read_key(key_path)?;

    let response = gateway.decrypt(Some(key.as_str()), Some(data), &SourceAddress::unknown())?;
    println!("{}", response.plaintext);

    Ok(())
}

// ─── Logs ────────────────────────────────────────────────────────────────────

fn cmd_logs(
    overrides: &ConfigOverrides,
    size: Option<i64>,
    offset: Option<i64>,
    json: bool,
) -> Result<(), CiphergateError> {
    let gateway = open_gateway(overrides)?;
    let page = gateway.list_logs(size, offset)?;

    if json {
        let text = serde_json::to_string_pretty(&page)
            .map_err(|e| CiphergateError::Other(format!("Failed to encode records: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    if page.items.is_empty() {
        println!("No audit records on this page.");
        return Ok(());
    }

    println!("Audit records ({}):", page.items.len());
    println!("{:-<80}", "");
    for record in &page.items {
        println!("{}", record);
    }
    println!("{:-<80}", "");

    Ok(())
}

fn cmd_clear_logs(overrides: &ConfigOverrides) -> Result<(), CiphergateError> {
    let gateway = open_gateway(overrides)?;
    gateway.clear_logs()?;
    println!("✓ Audit log cleared");

    Ok(())
}

// ─── Inspect ─────────────────────────────────────────────────────────────────

fn cmd_inspect_key(key_path: &str) -> Result<(), CiphergateError> {
    let key = read_key(key_path)?;
    let preview = pem::inspect(Some(key.as_str()))
        .filter(|p| p.length > 0)
        .ok_or_else(|| CiphergateError::Other("Key file is empty".to_string()))?;

    println!("Key preview:\n");
    println!("  First line: {}", preview.first);
    println!("  Last line:  {}", preview.last);
    println!("  Length:     {}", preview.length);
    println!("  Kind:       {}", preview.kind);

    Ok(())
}

// ─── Serve ───────────────────────────────────────────────────────────────────

async fn cmd_serve(overrides: &ConfigOverrides) -> Result<(), CiphergateError> {
    let config = overrides.resolve()?;
    tracing::info!(
        database = %config.database.path().display(),
        "Using audit database"
    );

    let gateway = Gateway::from_config(&config);
    let server = TcpServer::new(gateway, config.listen_addr, config.trust_forwarded);
    server.run().await?;

    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn open_gateway(overrides: &ConfigOverrides) -> Result<Gateway, CiphergateError> {
    let config = overrides.resolve()?;
    Ok(Gateway::from_config(&config))
}

/// Read a PEM key from a file, or from stdin when `path` is "-".
fn read_key(path: &str) -> Result<String, CiphergateError> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|e| {
        CiphergateError::Other(format!("Failed to read key file '{}': {}", path, e))
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
