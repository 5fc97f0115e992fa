// Ciphergate — Gateway error taxonomy
//
// Every client-input condition is detected before any mutation. Display
// strings are what callers see; `StorageUnavailable` and `Internal` are
// opaque and their causes are only reported to operators through tracing.

use thiserror::Error;

use crate::pem::KeyKind;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Malformed request: {0}")]
    InputMalformed(String),

    #[error("Invalid {expected} key. Provide a PEM-formatted RSA {expected} key.")]
    InvalidKey { expected: KeyKind },

    #[error("Data is required")]
    MissingData,

    #[error("Ciphertext could not be decrypted with the provided private key")]
    DecryptionFailed,

    #[error("Encryption failed. The payload may be too large for this RSA key.")]
    EncryptionFailed,

    #[error("Internal storage error")]
    StorageUnavailable(#[source] StoreError),

    /// A server-side fault unrelated to storage, such as failing to encode a
    /// response. The detail is logged, not returned.
    #[error("Internal error")]
    Internal(String),

    #[error("Unknown method: {0}")]
    NotFound(String),
}

impl GatewayError {
    /// True for conditions caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            GatewayError::StorageUnavailable(_) | GatewayError::Internal(_)
        )
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_messages_name_the_expected_kind() {
        let public = GatewayError::InvalidKey { expected: KeyKind::Public };
        let private = GatewayError::InvalidKey { expected: KeyKind::Private };
        assert_eq!(
            public.to_string(),
            "Invalid public key. Provide a PEM-formatted RSA public key."
        );
        assert!(private.to_string().contains("RSA private key"));
    }

    #[test]
    fn test_storage_error_is_opaque() {
        let cause = StoreError::Unavailable(rusqlite::Error::InvalidQuery);
        let err = GatewayError::StorageUnavailable(cause);
        assert_eq!(err.to_string(), "Internal storage error");
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let err = GatewayError::Internal("key must be a string".into());
        assert_eq!(err.to_string(), "Internal error");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_input_errors_are_client_errors() {
        for err in [
            GatewayError::InputMalformed("x".into()),
            GatewayError::MissingData,
            GatewayError::DecryptionFailed,
            GatewayError::EncryptionFailed,
            GatewayError::NotFound("x".into()),
        ] {
            assert!(err.is_client_error(), "{err} should be a client error");
        }
    }
}
