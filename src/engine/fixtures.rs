// Ciphergate — Test key fixtures
//
// RSA key generation is slow in debug builds, so each keypair is generated
// once per test binary and shared.

use std::sync::OnceLock;

use rand_core::OsRng;
use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};

/// One keypair in every PEM encoding the gateway accepts.
pub struct TestKeypair {
    /// `PUBLIC KEY` (SPKI)
    pub public_pem: String,
    /// `RSA PUBLIC KEY` (PKCS#1)
    pub public_pkcs1_pem: String,
    /// `PRIVATE KEY` (PKCS#8)
    pub private_pem: String,
    /// `RSA PRIVATE KEY` (PKCS#1)
    pub private_pkcs1_pem: String,
}

impl TestKeypair {
    fn generate(bits: usize) -> Self {
        let private = RsaPrivateKey::new(&mut OsRng, bits).expect("key generation");
        let public = RsaPublicKey::from(&private);

        Self {
            public_pem: public.to_public_key_pem(LineEnding::LF).expect("spki pem"),
            public_pkcs1_pem: public.to_pkcs1_pem(LineEnding::LF).expect("pkcs1 public pem"),
            private_pem: private
                .to_pkcs8_pem(LineEnding::LF)
                .expect("pkcs8 pem")
                .as_str()
                .to_string(),
            private_pkcs1_pem: private
                .to_pkcs1_pem(LineEnding::LF)
                .expect("pkcs1 private pem")
                .as_str()
                .to_string(),
        }
    }
}

static PRIMARY: OnceLock<TestKeypair> = OnceLock::new();
static SECONDARY: OnceLock<TestKeypair> = OnceLock::new();

/// A 2048-bit keypair.
pub fn primary() -> &'static TestKeypair {
    PRIMARY.get_or_init(|| TestKeypair::generate(2048))
}

/// An unrelated 1024-bit keypair, for wrong-key cases.
pub fn secondary() -> &'static TestKeypair {
    SECONDARY.get_or_init(|| TestKeypair::generate(1024))
}
