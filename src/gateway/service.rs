// Ciphergate — Gateway Operations
//
// The four logical operations (encrypt, decrypt, list, clear) plus health
// and key inspection, independent of any transport. Key and payload checks
// run before anything touches the engine or the store.
//
// A successful encrypt/decrypt is only released once its audit record is
// durably written. If the append fails the result is dropped and the
// request fails with `StorageUnavailable`.

use serde::{Deserialize, Serialize};

use super::error::GatewayError;
use super::origin::SourceAddress;
use crate::config::GatewayConfig;
use crate::engine::{self, EngineError};
use crate::pem::{self, KeyKind, KeyPreview, PemKey};
use crate::store::{AuditLog, OperationRecord, Outcome, Page, SqliteAuditLog};

// ─── Response Types ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptResponse {
    pub ciphertext: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptResponse {
    pub plaintext: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsResponse {
    pub items: Vec<OperationRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearResponse {
    pub cleared: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Gateway {
    log: SqliteAuditLog,
}

impl Gateway {
    pub fn new(log: SqliteAuditLog) -> Self {
        Self { log }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(SqliteAuditLog::new(config.database.clone()))
    }

    pub fn audit_log(&self) -> &SqliteAuditLog {
        &self.log
    }

    /// Encrypt `data` with a public key and record `"encrypt ok"`.
    pub fn encrypt(
        &self,
        key: Option<&str>,
        data: Option<&str>,
        source: &SourceAddress,
    ) -> Result<EncryptResponse, GatewayError> {
        let key = require_key(key, KeyKind::Public)?;
        let data = require_data(data)?;

        let ciphertext = engine::encrypt(&key, data).map_err(|e| {
            tracing::debug!(key = %key.fingerprint(), error = %e, "Encryption rejected");
            match e {
                EngineError::EmptyInput => GatewayError::MissingData,
                EngineError::MalformedKey(_) | EngineError::KindMismatch { .. } => {
                    GatewayError::InvalidKey {
                        expected: KeyKind::Public,
                    }
                }
                EngineError::MessageTooLong
                | EngineError::Encryption(_)
                | EngineError::Decryption => GatewayError::EncryptionFailed,
            }
        })?;

        self.record(Outcome::EncryptOk, source)?;
        Ok(EncryptResponse { ciphertext })
    }

    /// Decrypt base64 `data` with a private key and record `"decrypt ok"`.
    pub fn decrypt(
        &self,
        key: Option<&str>,
        data: Option<&str>,
        source: &SourceAddress,
    ) -> Result<DecryptResponse, GatewayError> {
        let key = require_key(key, KeyKind::Private)?;
        let data = require_data(data)?;

        let plaintext = engine::decrypt(&key, data).map_err(|e| {
            tracing::debug!(key = %key.fingerprint(), error = %e, "Decryption rejected");
            match e {
                EngineError::EmptyInput => GatewayError::MissingData,
                EngineError::MalformedKey(_) | EngineError::KindMismatch { .. } => {
                    GatewayError::InvalidKey {
                        expected: KeyKind::Private,
                    }
                }
                EngineError::MessageTooLong
                | EngineError::Encryption(_)
                | EngineError::Decryption => GatewayError::DecryptionFailed,
            }
        })?;

        self.record(Outcome::DecryptOk, source)?;
        Ok(DecryptResponse {
            plaintext: plaintext.as_str().to_string(),
        })
    }

    /// Newest-first page of audit records. Defaults and clamps per `Page`.
    pub fn list_logs(
        &self,
        size: Option<i64>,
        offset: Option<i64>,
    ) -> Result<LogsResponse, GatewayError> {
        let page = Page::new(size, offset);
        let items = self.log.list(page).map_err(|e| {
            tracing::error!(error = %e, "Failed to list audit records");
            GatewayError::StorageUnavailable(e)
        })?;
        Ok(LogsResponse { items })
    }

    /// Remove every audit record.
    pub fn clear_logs(&self) -> Result<ClearResponse, GatewayError> {
        self.log.clear().map_err(|e| {
            tracing::error!(error = %e, "Failed to clear audit log");
            GatewayError::StorageUnavailable(e)
        })?;
        Ok(ClearResponse { cleared: true })
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "ok".to_string(),
        }
    }

    /// Armor lines, length, and classification of a key, without its body.
    pub fn inspect_key(&self, key: Option<&str>) -> Result<KeyPreview, GatewayError> {
        pem::inspect(key).ok_or_else(|| GatewayError::InputMalformed("Missing 'key'".to_string()))
    }

    fn record(&self, outcome: Outcome, source: &SourceAddress) -> Result<(), GatewayError> {
        let record = OperationRecord::new(outcome, source.as_str());
        self.log.append(&record).map_err(|e| {
            tracing::error!(
                error = %e,
                outcome = %outcome,
                "Audit write failed; withholding operation result"
            );
            GatewayError::StorageUnavailable(e)
        })
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn require_key(key: Option<&str>, expected: KeyKind) -> Result<PemKey, GatewayError> {
    PemKey::parse(key)
        .filter(|k| k.kind() == expected)
        .ok_or(GatewayError::InvalidKey { expected })
}

fn require_data(data: Option<&str>) -> Result<&str, GatewayError> {
    match data {
        Some(d) if !d.is_empty() => Ok(d),
        _ => Err(GatewayError::MissingData),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
