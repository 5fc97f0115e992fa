// Ciphergate — Engine error types

use thiserror::Error;

use crate::pem::KeyKind;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Expected a {expected:?} key, got {actual:?}")]
    KindMismatch { expected: KeyKind, actual: KeyKind },

    #[error("Input must not be empty")]
    EmptyInput,

    #[error("Key material is malformed: {0}")]
    MalformedKey(String),

    #[error("Message is too long for this RSA key")]
    MessageTooLong,

    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Deliberately carries no detail: bad base64, wrong key, and a failed
    /// padding check are indistinguishable to the caller.
    #[error("Decryption failed")]
    Decryption,
}
