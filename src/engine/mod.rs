// Ciphergate — Engine Module
//
// RSA-OAEP encryption and decryption with SHA-256 as both the OAEP digest and
// the MGF1 digest. The padding scheme is fixed; callers cannot select another.

mod error;
mod oaep;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::EngineError;
pub use oaep::{decrypt, encrypt, oaep_capacity};
