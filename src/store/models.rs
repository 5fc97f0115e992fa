// Ciphergate — Audit data models
//
// SECURITY: An `OperationRecord` has no field that can carry a key,
// plaintext, or ciphertext. Records are built from an `Outcome`, so the
// label vocabulary is closed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel recorded when the caller's origin cannot be determined.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// The successful operation a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    EncryptOk,
    DecryptOk,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::EncryptOk => "encrypt ok",
            Outcome::DecryptOk => "decrypt ok",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry in the audit ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub id: Uuid,
    /// Unix seconds at creation.
    pub timestamp: i64,
    pub source_address: String,
    pub outcome_label: String,
}

impl OperationRecord {
    /// Create a record for `outcome`, stamped now with a fresh id.
    pub fn new(outcome: Outcome, source_address: impl Into<String>) -> Self {
        let source_address = source_address.into();
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now().timestamp(),
            source_address: if source_address.trim().is_empty() {
                UNKNOWN_SOURCE.to_string()
            } else {
                source_address
            },
            outcome_label: outcome.label().to_string(),
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

impl fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let when = self
            .created_at()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| self.timestamp.to_string());
        write!(
            f,
            "[{}] {} from '{}' ({})",
            when, self.outcome_label, self.source_address, self.id
        )
    }
}

/// A clamped page request: `size` in `[0, MAX_SIZE]`, `offset` non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    size: u32,
    offset: i64,
}

impl Page {
    pub const DEFAULT_SIZE: i64 = 10;
    pub const MAX_SIZE: i64 = 100;

    /// Build a page from optional caller input, applying defaults and clamps.
    pub fn new(size: Option<i64>, offset: Option<i64>) -> Self {
        let size = size.unwrap_or(Self::DEFAULT_SIZE).clamp(0, Self::MAX_SIZE);
        let offset = offset.unwrap_or(0).max(0);
        Self {
            size: size as u32,
            offset,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels_are_fixed() {
        assert_eq!(Outcome::EncryptOk.label(), "encrypt ok");
        assert_eq!(Outcome::DecryptOk.label(), "decrypt ok");
        assert_eq!(Outcome::DecryptOk.to_string(), "decrypt ok");
    }

    #[test]
    fn test_new_record_is_stamped_now() {
        let before = Utc::now().timestamp();
        let record = OperationRecord::new(Outcome::EncryptOk, "10.0.0.1");
        let after = Utc::now().timestamp();

        assert!(record.timestamp >= before && record.timestamp <= after);
        assert_eq!(record.source_address, "10.0.0.1");
        assert_eq!(record.outcome_label, "encrypt ok");
        assert_eq!(record.id.get_version(), Some(uuid::Version::Random));
    }

    #[test]
    fn test_new_record_ids_are_unique() {
        let a = OperationRecord::new(Outcome::EncryptOk, "a");
        let b = OperationRecord::new(Outcome::EncryptOk, "a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_blank_source_becomes_unknown() {
        let record = OperationRecord::new(Outcome::DecryptOk, "  ");
        assert_eq!(record.source_address, UNKNOWN_SOURCE);
    }

    #[test]
    fn test_record_json_has_only_ledger_fields() {
        let record = OperationRecord::new(Outcome::DecryptOk, "127.0.0.1");
        let json = serde_json::to_value(&record).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(keys, vec!["id", "outcome_label", "source_address", "timestamp"]);
    }

    #[test]
    fn test_record_display() {
        let record = OperationRecord {
            id: Uuid::nil(),
            timestamp: 0,
            source_address: "192.168.1.7".to_string(),
            outcome_label: "encrypt ok".to_string(),
        };
        let display = format!("{}", record);
        assert!(display.contains("1970-01-01 00:00:00"));
        assert!(display.contains("encrypt ok"));
        assert!(display.contains("192.168.1.7"));
    }

    #[test]
    fn test_page_defaults() {
        let page = Page::default();
        assert_eq!(page.size(), 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_clamps_size_and_offset() {
        assert_eq!(Page::new(Some(200), None).size(), 100);
        assert_eq!(Page::new(Some(-5), None).size(), 0);
        assert_eq!(Page::new(Some(100), None).size(), 100);
        assert_eq!(Page::new(Some(0), None).size(), 0);
        assert_eq!(Page::new(None, Some(-3)).offset(), 0);
        assert_eq!(Page::new(None, Some(42)).offset(), 42);
        assert_eq!(Page::new(Some(i64::MAX), Some(i64::MIN)).size(), 100);
    }
}
